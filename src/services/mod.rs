pub mod bounties;
pub mod feed;
pub mod message;
pub mod profile;
pub mod tasks;
pub mod threads;

pub use message::MessageService;
pub use profile::ProfileService;
pub use threads::{ConversationPreview, ThreadCache, Threads};
