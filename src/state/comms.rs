//! Communication panel view state.
//!
//! All transitions go through [`CommsState::apply`]. Deep links from elsewhere in the
//! app ("message this operative") arrive as an [`OpenRequest`] stamped with a
//! generation; a request older than the last one applied is ignored.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommsMode {
    #[default]
    Global,
    Intel,
    Operatives,
    Bounties,
}

impl CommsMode {
    pub const ALL: [CommsMode; 4] = [CommsMode::Global, CommsMode::Intel, CommsMode::Operatives, CommsMode::Bounties];

    pub fn title(self) -> &'static str {
        match self {
            CommsMode::Global => "GLOBAL",
            CommsMode::Intel => "INTEL",
            CommsMode::Operatives => "OPERATIVES",
            CommsMode::Bounties => "BOUNTIES",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    pub fn cycle(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = self.index();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ALL[next]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntelView {
    #[default]
    NoThreadSelected,
    ThreadSelected(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenRequest {
    pub mode: CommsMode,
    pub target_user_id: Option<Uuid>,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsAction {
    SelectMode(CommsMode),
    OpenThread(Uuid),
    Back,
    Open(OpenRequest),
    Close,
    Reopen,
}

#[derive(Debug, Default)]
pub struct CommsState {
    pub mode: CommsMode,
    pub intel: IntelView,
    pub is_open: bool,
    last_request: OpenRequest,
    applied_generation: u64,

    pub global_input: String,
    pub dm_input: String,
    pub input_error: Option<String>,
    pub thread_selected: usize,
    pub operative_selected: usize,
    pub bounty_selected: usize,
    pub global_scroll: usize,
}

impl CommsState {
    pub fn new(default_mode: CommsMode) -> Self {
        Self {
            mode: default_mode,
            last_request: OpenRequest { mode: default_mode, target_user_id: None, generation: 0 },
            ..Default::default()
        }
    }

    /// Returns true if the action changed anything.
    pub fn apply(&mut self, action: CommsAction) -> bool {
        let before = (self.mode, self.intel, self.is_open);
        match action {
            CommsAction::SelectMode(mode) => self.mode = mode,
            CommsAction::OpenThread(partner) => {
                self.mode = CommsMode::Intel;
                self.intel = IntelView::ThreadSelected(partner);
            }
            CommsAction::Back => {
                if self.mode == CommsMode::Intel {
                    self.intel = IntelView::NoThreadSelected;
                }
            }
            CommsAction::Open(request) => {
                if request.generation <= self.applied_generation {
                    return false;
                }
                self.applied_generation = request.generation;
                self.last_request = request;
                self.is_open = true;
                self.apply_request(request);
            }
            CommsAction::Close => self.is_open = false,
            CommsAction::Reopen => {
                // Without a newer request the panel comes back to the last one it was given,
                // not to whatever was on screen when it closed.
                self.is_open = true;
                self.apply_request(self.last_request);
            }
        }
        if self.intel == IntelView::NoThreadSelected {
            self.dm_input.clear();
        }
        before != (self.mode, self.intel, self.is_open)
    }

    fn apply_request(&mut self, request: OpenRequest) {
        match request.target_user_id {
            Some(target) => {
                self.mode = CommsMode::Intel;
                self.intel = IntelView::ThreadSelected(target);
            }
            None => {
                self.mode = request.mode;
                self.intel = IntelView::NoThreadSelected;
            }
        }
    }

    pub fn selected_partner(&self) -> Option<Uuid> {
        match (self.mode, self.intel) {
            (CommsMode::Intel, IntelView::ThreadSelected(partner)) => Some(partner),
            _ => None,
        }
    }

    pub fn last_request(&self) -> OpenRequest {
        self.last_request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(mode: CommsMode, target: Option<Uuid>, generation: u64) -> CommsAction {
        CommsAction::Open(OpenRequest { mode, target_user_id: target, generation })
    }

    #[test]
    fn tab_clicks_set_mode_directly() {
        let mut comms = CommsState::new(CommsMode::Global);
        assert!(comms.apply(CommsAction::SelectMode(CommsMode::Operatives)));
        assert_eq!(comms.mode, CommsMode::Operatives);
        assert!(!comms.apply(CommsAction::SelectMode(CommsMode::Operatives)));
    }

    #[test]
    fn open_with_target_jumps_to_thread() {
        let mut comms = CommsState::new(CommsMode::Global);
        let partner = Uuid::new_v4();
        comms.apply(open(CommsMode::Intel, Some(partner), 1));
        assert_eq!(comms.mode, CommsMode::Intel);
        assert_eq!(comms.intel, IntelView::ThreadSelected(partner));
        assert_eq!(comms.selected_partner(), Some(partner));
    }

    #[test]
    fn back_returns_to_thread_list_not_global() {
        let mut comms = CommsState::new(CommsMode::Global);
        comms.apply(CommsAction::OpenThread(Uuid::new_v4()));
        comms.dm_input.push_str("half typed");
        comms.apply(CommsAction::Back);
        assert_eq!(comms.mode, CommsMode::Intel);
        assert_eq!(comms.intel, IntelView::NoThreadSelected);
        assert!(comms.dm_input.is_empty());
    }

    #[test]
    fn back_outside_intel_is_a_no_op() {
        let mut comms = CommsState::new(CommsMode::Global);
        assert!(!comms.apply(CommsAction::Back));
        assert_eq!(comms.mode, CommsMode::Global);
    }

    #[test]
    fn newer_request_overrides_current_view() {
        let mut comms = CommsState::new(CommsMode::Global);
        comms.apply(open(CommsMode::Operatives, None, 1));
        comms.apply(CommsAction::SelectMode(CommsMode::Bounties));
        let partner = Uuid::new_v4();
        comms.apply(open(CommsMode::Intel, Some(partner), 2));
        assert_eq!(comms.intel, IntelView::ThreadSelected(partner));
    }

    #[test]
    fn stale_request_is_ignored() {
        let mut comms = CommsState::new(CommsMode::Global);
        let newest = Uuid::new_v4();
        comms.apply(open(CommsMode::Intel, Some(newest), 5));
        assert!(!comms.apply(open(CommsMode::Global, None, 3)));
        assert!(!comms.apply(open(CommsMode::Global, None, 5)));
        assert_eq!(comms.selected_partner(), Some(newest));
    }

    #[test]
    fn reopen_resets_to_last_request() {
        let mut comms = CommsState::new(CommsMode::Global);
        comms.apply(open(CommsMode::Operatives, None, 1));
        comms.apply(CommsAction::OpenThread(Uuid::new_v4()));
        comms.apply(CommsAction::Close);
        assert!(!comms.is_open);

        comms.apply(CommsAction::Reopen);
        assert!(comms.is_open);
        assert_eq!(comms.mode, CommsMode::Operatives);
        assert_eq!(comms.intel, IntelView::NoThreadSelected);
    }

    #[test]
    fn switching_tabs_keeps_the_thread() {
        let mut comms = CommsState::new(CommsMode::Global);
        let partner = Uuid::new_v4();
        comms.apply(CommsAction::OpenThread(partner));
        comms.apply(CommsAction::SelectMode(CommsMode::Global));
        assert_eq!(comms.selected_partner(), None);
        comms.apply(CommsAction::SelectMode(CommsMode::Intel));
        assert_eq!(comms.selected_partner(), Some(partner));
    }

    #[test]
    fn mode_cycle_wraps() {
        assert_eq!(CommsMode::Bounties.cycle(true), CommsMode::Global);
        assert_eq!(CommsMode::Global.cycle(false), CommsMode::Bounties);
    }
}
