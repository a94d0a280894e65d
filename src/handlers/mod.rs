pub mod bounty;
pub mod comms;
pub mod community;
pub mod dashboard;
pub mod navigation;
pub mod settings;

use crate::app::App;
use crate::state::{AppMode, CommsMode, CommunityFocus, SettingsTab};
use crossterm::event::{KeyEvent, KeyEventKind};

/// Main input handler dispatcher
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Handle quit confirmation dialog
    if app.ui.show_quit_confirm {
        handle_quit_confirm_input(key, app);
        return;
    }

    // A sticky toast is dismissed by the next key press, which it consumes
    if matches!(&app.notifications.current, Some(toast) if toast.close_tick.is_none()) {
        app.notifications.clear_toast();
        return;
    }

    // Handle global shortcuts first
    if navigation::handle_global_shortcuts(key, app) {
        return;
    }

    if app.ui.follow_list.is_some() {
        navigation::handle_follow_list_input(key, app);
        return;
    }
    if app.ui.show_notifications {
        navigation::handle_notifications_panel(key, app);
        return;
    }

    match app.ui.mode {
        AppMode::Dashboard => dashboard::handle_dashboard_input(key, app),
        AppMode::Community => community::handle_community_input(key, app),
        AppMode::Comms => comms::handle_comms_input(key, app),
        AppMode::Bounties => bounty::handle_bounty_input(key, app),
        AppMode::Settings => settings::handle_settings_input(key, app),
    }
}

/// True when plain letter keys belong to a text field on the current screen.
pub fn is_typing(app: &App) -> bool {
    match app.ui.mode {
        AppMode::Dashboard => app.dashboard.form.is_some() || app.dashboard.editing_query,
        AppMode::Community => {
            app.community.compose.is_some()
                || app.community.detail.is_some()
                || app.community.focus == CommunityFocus::Search
        }
        AppMode::Comms => match app.comms.mode {
            CommsMode::Global | CommsMode::Operatives => true,
            CommsMode::Intel => app.comms.selected_partner().is_some(),
            CommsMode::Bounties => false,
        },
        AppMode::Bounties => app.bounty.editing_query,
        AppMode::Settings => {
            app.settings.tab == SettingsTab::Profile || app.settings.editing_github
        }
    }
}

/// Move a list cursor by `delta`, clamped to `0..len`.
pub fn move_selection(selected: &mut usize, len: usize, delta: isize) {
    if len == 0 {
        *selected = 0;
        return;
    }
    let next = (*selected as isize + delta).clamp(0, len as isize - 1);
    *selected = next as usize;
}

fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    use crossterm::event::{KeyCode, KeyModifiers};

    match key.code {
        KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            app.ui.quit_confirm_selected = if app.ui.quit_confirm_selected == 0 { 1 } else { 0 };
        }
        KeyCode::Enter => {
            if app.ui.quit_confirm_selected == 0 {
                app.ui.quit();
            }
            app.ui.show_quit_confirm = false;
        }
        KeyCode::Char('y') => {
            app.ui.quit();
            app.ui.show_quit_confirm = false;
        }
        KeyCode::Esc | KeyCode::Char('n') => {
            app.ui.show_quit_confirm = false;
        }
        // Ctrl+C again closes the dialog
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ui.show_quit_confirm = false;
        }
        _ => {}
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::app::App;
    use crate::backend::{Backend, BackendEvent, BackendRequest, InMemoryBackend};
    use crate::global_prefs::LocalPrefs;
    use crate::state::AppConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc;

    pub async fn loaded_app() -> (App, mpsc::UnboundedReceiver<BackendRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = App::new(tx, AppConfig::default(), &LocalPrefs::default());
        let snapshot = InMemoryBackend::seeded(None).snapshot().await.unwrap();
        app.handle_backend_event(BackendEvent::Snapshot(Box::new(snapshot)));
        (app, rx)
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            super::handle_key_event(key(KeyCode::Char(c)), app);
        }
    }

    pub fn drain(rx: &mut mpsc::UnboundedReceiver<BackendRequest>) -> Vec<BackendRequest> {
        let mut out = Vec::new();
        while let Ok(request) = rx.try_recv() {
            out.push(request);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn selection_is_clamped() {
        let mut selected = 0;
        move_selection(&mut selected, 3, -1);
        assert_eq!(selected, 0);
        move_selection(&mut selected, 3, 5);
        assert_eq!(selected, 2);
        move_selection(&mut selected, 0, 1);
        assert_eq!(selected, 0);
    }

    #[tokio::test]
    async fn ctrl_c_asks_before_quitting() {
        let (mut app, _rx) = loaded_app().await;
        handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut app);
        assert!(app.ui.show_quit_confirm);
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert!(!app.ui.should_quit);

        handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut app);
        handle_key_event(key(KeyCode::Left), &mut app);
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert!(app.ui.should_quit);
    }

    #[tokio::test]
    async fn number_keys_switch_screens_unless_typing() {
        let (mut app, _rx) = loaded_app().await;
        handle_key_event(key(KeyCode::Char('2')), &mut app);
        assert_eq!(app.ui.mode, AppMode::Community);
        handle_key_event(key(KeyCode::F(3)), &mut app);
        assert_eq!(app.ui.mode, AppMode::Comms);
        // Global chat input owns the digits
        handle_key_event(key(KeyCode::Char('1')), &mut app);
        assert_eq!(app.ui.mode, AppMode::Comms);
        assert_eq!(app.comms.global_input, "1");
    }

    #[tokio::test]
    async fn sticky_toast_swallows_one_key() {
        let (mut app, _rx) = loaded_app().await;
        app.set_toast("Failed to join squad", crate::state::ToastLevel::Error, None);
        handle_key_event(key(KeyCode::Char('2')), &mut app);
        assert!(app.notifications.current.is_none());
        assert_eq!(app.ui.mode, AppMode::Dashboard);
    }
}
