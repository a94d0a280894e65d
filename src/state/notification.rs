#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    /// Tick at which the toast closes by itself; `None` stays until a key press.
    pub close_tick: Option<u64>,
}

/// Toasts plus the notification panel selection.
#[derive(Debug, Default)]
pub struct NotificationState {
    pub current: Option<Toast>,
    pub panel_selected: usize,
}

impl NotificationState {
    pub fn set_toast(&mut self, message: impl Into<String>, level: ToastLevel, close_tick: Option<u64>) {
        self.current = Some(Toast { message: message.into(), level, close_tick });
    }

    pub fn clear_toast(&mut self) {
        self.current = None;
    }

    pub fn should_close(&self, tick_count: u64) -> bool {
        matches!(&self.current, Some(Toast { close_tick: Some(close), .. }) if tick_count >= *close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_expires_on_its_tick() {
        let mut state = NotificationState::default();
        state.set_toast("saved", ToastLevel::Success, Some(10));
        assert!(!state.should_close(9));
        assert!(state.should_close(10));
    }

    #[test]
    fn sticky_toast_never_expires() {
        let mut state = NotificationState::default();
        state.set_toast("join failed", ToastLevel::Error, None);
        assert!(!state.should_close(u64::MAX));
    }
}
