//! The backend contract the client is written against.
//!
//! Everything the dashboard shows comes from a [`Backend`]: the client never owns
//! durable state, it only keeps the latest [`Snapshot`] and re-reads it after every
//! mutation. The binary wires in [`InMemoryBackend`]; tests build their own.

pub mod memory;
pub mod worker;

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    Bounty, ChatMessage, DirectMessage, Notification, Post, PostComment, PostDraft,
    PreferencesUpdate, ProfileUpdate, Team, TeamDraft, Theme, User,
};

pub use memory::InMemoryBackend;
pub use worker::{dispatch, run_worker};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Read-through copy of every collection the backend exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub user: User,
    pub theme: Theme,
    pub posts: Vec<Post>,
    pub global_messages: Vec<ChatMessage>,
    pub direct_messages: Vec<DirectMessage>,
    pub teams: Vec<Team>,
    pub bounties: Vec<Bounty>,
    pub all_profiles: Vec<User>,
    pub following_ids: HashSet<Uuid>,
    pub follower_count: u32,
    pub following_count: u32,
    pub notifications: Vec<Notification>,
    pub global_online_users: Vec<Uuid>,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn snapshot(&self) -> BackendResult<Snapshot>;

    async fn like_post(&self, id: Uuid) -> BackendResult<()>;
    async fn delete_post(&self, id: Uuid) -> BackendResult<()>;
    async fn add_post(&self, draft: PostDraft) -> BackendResult<Post>;
    async fn fetch_comments(&self, post_id: Uuid) -> BackendResult<Vec<PostComment>>;
    async fn add_comment(
        &self,
        post_id: Uuid,
        content: String,
        reply_to: Option<Uuid>,
    ) -> BackendResult<()>;

    async fn follow_user(&self, id: Uuid) -> BackendResult<()>;
    async fn unfollow_user(&self, id: Uuid) -> BackendResult<()>;
    async fn fetch_followers_list(&self, user_id: Uuid) -> BackendResult<Vec<User>>;
    async fn fetch_following_list(&self, user_id: Uuid) -> BackendResult<Vec<User>>;
    async fn search_users(&self, query: &str) -> BackendResult<Vec<User>>;

    async fn send_global_message(&self, content: String) -> BackendResult<()>;
    async fn send_direct_message(&self, receiver_id: Uuid, content: String) -> BackendResult<()>;
    async fn mark_all_dms_as_read(&self) -> BackendResult<()>;

    async fn claim_bounty(&self, id: Uuid) -> BackendResult<()>;
    async fn add_team(&self, draft: TeamDraft) -> BackendResult<Team>;
    async fn join_team(&self, code: &str) -> BackendResult<bool>;

    async fn update_profile(&self, update: ProfileUpdate) -> BackendResult<()>;
    async fn update_preferences(&self, update: PreferencesUpdate) -> BackendResult<()>;
    async fn connect_github(&self) -> BackendResult<()>;
    async fn connect_github_manual(&self, username: &str) -> BackendResult<()>;
    async fn disconnect_github(&self) -> BackendResult<()>;

    async fn logout(&self) -> BackendResult<()>;
    async fn toggle_theme(&self) -> BackendResult<()>;
    async fn mark_as_read(&self, id: Uuid) -> BackendResult<()>;
    async fn mark_all_notifications_as_read(&self) -> BackendResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowListKind {
    Followers,
    Following,
}

/// Requests sent from the UI loop to the backend worker.
///
/// Requests whose answer lands in ephemeral UI state carry the token they were
/// issued for (`generation` or `seq`) so late answers can be recognised and dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    Refresh,
    LikePost(Uuid),
    DeletePost(Uuid),
    AddPost(PostDraft),
    FetchComments { post_id: Uuid, generation: u64 },
    AddComment { post_id: Uuid, content: String, reply_to: Option<Uuid>, generation: u64 },
    FollowUser(Uuid),
    UnfollowUser(Uuid),
    FetchFollowList { user_id: Uuid, kind: FollowListKind, generation: u64 },
    SearchUsers { seq: u64, query: String },
    SendGlobalMessage(String),
    SendDirectMessage { receiver_id: Uuid, content: String },
    MarkAllDmsAsRead,
    ClaimBounty(Uuid),
    AddTeam(TeamDraft),
    JoinTeam(String),
    UpdateProfile(ProfileUpdate),
    UpdatePreferences(PreferencesUpdate),
    ConnectGitHub,
    ConnectGitHubManual(String),
    DisconnectGitHub,
    Logout,
    ToggleTheme,
    MarkAsRead(Uuid),
    MarkAllNotificationsAsRead,
}

impl BackendRequest {
    pub fn op(&self) -> &'static str {
        match self {
            BackendRequest::Refresh => "refresh",
            BackendRequest::LikePost(_) => "like_post",
            BackendRequest::DeletePost(_) => "delete_post",
            BackendRequest::AddPost(_) => "add_post",
            BackendRequest::FetchComments { .. } => "fetch_comments",
            BackendRequest::AddComment { .. } => "add_comment",
            BackendRequest::FollowUser(_) => "follow_user",
            BackendRequest::UnfollowUser(_) => "unfollow_user",
            BackendRequest::FetchFollowList { .. } => "fetch_follow_list",
            BackendRequest::SearchUsers { .. } => "search_users",
            BackendRequest::SendGlobalMessage(_) => "send_global_message",
            BackendRequest::SendDirectMessage { .. } => "send_direct_message",
            BackendRequest::MarkAllDmsAsRead => "mark_all_dms_as_read",
            BackendRequest::ClaimBounty(_) => "claim_bounty",
            BackendRequest::AddTeam(_) => "add_team",
            BackendRequest::JoinTeam(_) => "join_team",
            BackendRequest::UpdateProfile(_) => "update_profile",
            BackendRequest::UpdatePreferences(_) => "update_preferences",
            BackendRequest::ConnectGitHub => "connect_github",
            BackendRequest::ConnectGitHubManual(_) => "connect_github_manual",
            BackendRequest::DisconnectGitHub => "disconnect_github",
            BackendRequest::Logout => "logout",
            BackendRequest::ToggleTheme => "toggle_theme",
            BackendRequest::MarkAsRead(_) => "mark_as_read",
            BackendRequest::MarkAllNotificationsAsRead => "mark_all_notifications_as_read",
        }
    }

    /// The token a failure of this request must be reported with, if any.
    pub fn lookup(&self) -> Option<Lookup> {
        match self {
            BackendRequest::FetchComments { post_id, generation } => {
                Some(Lookup::Comments { post_id: *post_id, generation: *generation })
            }
            BackendRequest::FetchFollowList { user_id, kind, generation } => {
                Some(Lookup::FollowList { user_id: *user_id, kind: *kind, generation: *generation })
            }
            BackendRequest::SearchUsers { seq, query } => Some(Lookup::Search { seq: *seq, query: query.clone() }),
            _ => None,
        }
    }

    /// Pure lookups; these never need a snapshot afterwards and may run concurrently.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            BackendRequest::FetchComments { .. }
                | BackendRequest::FetchFollowList { .. }
                | BackendRequest::SearchUsers { .. }
        )
    }
}

/// Events sent from the backend worker back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Snapshot(Box<Snapshot>),
    Comments { post_id: Uuid, generation: u64, comments: Vec<PostComment> },
    FollowList { user_id: Uuid, kind: FollowListKind, generation: u64, users: Vec<User> },
    SearchResults { seq: u64, query: String, users: Vec<User> },
    PostPublished(Post),
    BountyClaimed(Uuid),
    TeamCreated(Team),
    TeamJoined { code: String, joined: bool },
    ProfileSaved,
    GitHubLinked,
    LoggedOut,
    /// A guarded lookup failed; carries the same token as its answer would have.
    LookupFailed { lookup: Lookup, message: String },
    Failed { op: &'static str, message: String },
}

/// Identity of a lookup whose answer lands in ephemeral UI state.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Comments { post_id: Uuid, generation: u64 },
    FollowList { user_id: Uuid, kind: FollowListKind, generation: u64 },
    Search { seq: u64, query: String },
}
