use crate::app::App;
use crate::backend::BackendRequest;
use crate::handlers::{is_typing, move_selection};
use crate::state::AppMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle global shortcuts that work across all modes
pub fn handle_global_shortcuts(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            // Show quit confirmation dialog
            app.ui.show_quit_confirm = true;
            app.ui.quit_confirm_selected = 1; // Default to "No"
            return true;
        }
        KeyCode::F(n @ 1..=5) => {
            close_popups(app);
            app.set_mode(AppMode::ALL[n as usize - 1]);
            return true;
        }
        _ => {}
    }

    if is_typing(app) || key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }

    match key.code {
        KeyCode::Char(c @ '1'..='5') if app.ui.follow_list.is_none() => {
            close_popups(app);
            let idx = c as usize - '1' as usize;
            app.set_mode(AppMode::ALL[idx]);
            true
        }
        KeyCode::Char('n') => {
            app.ui.show_notifications = !app.ui.show_notifications;
            app.notifications.panel_selected = 0;
            true
        }
        KeyCode::Char('p') => {
            app.toggle_preference(crate::state::settings::PreferenceItem::PresenceSidebar);
            true
        }
        KeyCode::Char('t') => {
            app.send(BackendRequest::ToggleTheme);
            true
        }
        KeyCode::Char('q') if !app.ui.has_popup() => {
            app.ui.show_quit_confirm = true;
            app.ui.quit_confirm_selected = 1;
            true
        }
        _ => false,
    }
}

fn close_popups(app: &mut App) {
    app.ui.show_notifications = false;
    app.ui.follow_list = None;
}

/// Notification panel: browse, mark one or all as read.
pub fn handle_notifications_panel(key: KeyEvent, app: &mut App) {
    let ids: Vec<_> = app
        .snapshot()
        .map(|s| s.notifications.iter().map(|n| (n.id, n.read)).collect())
        .unwrap_or_default();

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.notifications.panel_selected, ids.len(), -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.notifications.panel_selected, ids.len(), 1),
        KeyCode::Enter => {
            if let Some((id, false)) = ids.get(app.notifications.panel_selected).copied() {
                app.send(BackendRequest::MarkAsRead(id));
            }
        }
        KeyCode::Char('a') => {
            if ids.iter().any(|(_, read)| !read) {
                app.send(BackendRequest::MarkAllNotificationsAsRead);
            }
        }
        KeyCode::Esc => app.ui.show_notifications = false,
        _ => {}
    }
}

/// Followers/following popup: message or follow someone from the list.
pub fn handle_follow_list_input(key: KeyEvent, app: &mut App) {
    let Some(popup) = app.ui.follow_list.as_mut() else { return };
    let len = popup.users.len();
    let selected_user = popup.users.get(popup.selected).map(|u| u.id);

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut popup.selected, len, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut popup.selected, len, 1),
        KeyCode::Enter | KeyCode::Char('m') => {
            if let Some(user_id) = selected_user {
                app.ui.follow_list = None;
                app.open_dm_with(user_id);
            }
        }
        KeyCode::Char('f') => {
            if let Some(user_id) = selected_user {
                app.toggle_follow(user_id);
            }
        }
        KeyCode::Esc | KeyCode::Char('q') => app.ui.follow_list = None,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEvent, FollowListKind};
    use crate::handlers::handle_key_event;
    use crate::handlers::test_support::*;

    #[tokio::test]
    async fn notification_panel_marks_read() {
        let (mut app, mut rx) = loaded_app().await;
        drain(&mut rx);
        handle_key_event(key(KeyCode::Char('n')), &mut app);
        assert!(app.ui.show_notifications);
        handle_key_event(key(KeyCode::Char('a')), &mut app);
        assert!(drain(&mut rx).contains(&BackendRequest::MarkAllNotificationsAsRead));
        handle_key_event(key(KeyCode::Esc), &mut app);
        assert!(!app.ui.show_notifications);
    }

    #[tokio::test]
    async fn follow_list_opens_a_dm() {
        let (mut app, _rx) = loaded_app().await;
        let me = app.me().unwrap();
        let other = app.snapshot().unwrap().all_profiles.iter().find(|u| u.id != me).cloned().unwrap();
        app.open_follow_list(me, FollowListKind::Followers);
        let generation = app.ui.follow_list.as_ref().unwrap().generation;
        app.handle_backend_event(BackendEvent::FollowList {
            user_id: me,
            kind: FollowListKind::Followers,
            generation,
            users: vec![other.clone()],
        });

        handle_key_event(key(KeyCode::Enter), &mut app);

        assert!(app.ui.follow_list.is_none());
        assert_eq!(app.ui.mode, AppMode::Comms);
        assert_eq!(app.comms.selected_partner(), Some(other.id));
    }
}
