pub mod bounty;
pub mod comms;
pub mod community;
pub mod dashboard;
pub mod data;
pub mod notification;
pub mod search;
pub mod settings;
pub mod ui;

pub use bounty::BountyState;
pub use comms::{CommsAction, CommsMode, CommsState, IntelView, OpenRequest};
pub use community::{CommunityFocus, CommunityState, ComposeField, ComposeForm, PostDetail};
pub use dashboard::{DashboardFocus, DashboardForm, DashboardState, TeamField, TeamForm};
pub use data::DataState;
pub use notification::{NotificationState, ToastLevel};
pub use search::{SearchState, SearchTicket};
pub use settings::{ProfileField, ProfileForm, SettingsState, SettingsTab};
pub use ui::{AppMode, FollowListPopup, UiState};

use std::time::Duration;
use thiserror::Error;

/// Configuration constants for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub max_message_length: usize,
    pub max_post_length: usize,
    pub search_debounce: Duration,
    pub toast_timeout_ms: u64,
    pub tick_rate: Duration,
    pub refresh_interval: Duration,
    pub min_two_column_width: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            max_post_length: 5000,
            search_debounce: Duration::from_millis(300),
            toast_timeout_ms: 4000,
            tick_rate: Duration::from_millis(50),
            refresh_interval: Duration::from_secs(15),
            min_two_column_width: 110,
        }
    }
}

impl AppConfig {
    /// Number of ticks that cover `ms` milliseconds, rounded up.
    pub fn ticks_for(&self, ms: u64) -> u64 {
        let tick_ms = self.tick_rate.as_millis().max(1) as u64;
        ms.div_ceil(tick_ms)
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Preferences error: {0}")]
    Prefs(#[from] serde_json::Error),
    #[error("Connection error: {0}")]
    Channel(String),
    #[error("Logging error: {0}")]
    Logging(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_round_up() {
        let config = AppConfig::default();
        assert_eq!(config.ticks_for(4000), 80);
        assert_eq!(config.ticks_for(10), 1);
        assert_eq!(config.ticks_for(0), 0);
    }
}
