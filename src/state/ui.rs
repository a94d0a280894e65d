use uuid::Uuid;

use crate::backend::FollowListKind;
use crate::model::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Dashboard,
    Community,
    Comms,
    Bounties,
    Settings,
}

impl AppMode {
    pub const ALL: [AppMode; 5] = [
        AppMode::Dashboard,
        AppMode::Community,
        AppMode::Comms,
        AppMode::Bounties,
        AppMode::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AppMode::Dashboard => "SQUADS",
            AppMode::Community => "FEED",
            AppMode::Comms => "COMMS",
            AppMode::Bounties => "BOUNTIES",
            AppMode::Settings => "SETTINGS",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }
}

/// Followers/following list opened from a profile. Answers are matched on `generation`.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowListPopup {
    pub user_id: Uuid,
    pub kind: FollowListKind,
    pub generation: u64,
    pub users: Vec<User>,
    pub loading: bool,
    pub selected: usize,
}

/// State management for UI-specific state
#[derive(Debug)]
pub struct UiState {
    pub mode: AppMode,
    pub should_quit: bool,
    pub tick_count: u64,

    pub show_notifications: bool,
    pub show_presence: bool,
    pub compact: bool,

    pub show_quit_confirm: bool,
    pub quit_confirm_selected: usize,

    pub follow_list: Option<FollowListPopup>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: AppMode::Dashboard,
            should_quit: false,
            tick_count: 0,
            show_notifications: false,
            show_presence: true,
            compact: false,
            show_quit_confirm: false,
            quit_confirm_selected: 1,
            follow_list: None,
        }
    }
}

impl UiState {
    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn has_popup(&self) -> bool {
        self.show_quit_confirm || self.show_notifications || self.follow_list.is_some()
    }
}
