use crate::app::App;
use crate::backend::BackendRequest;
use crate::handlers::move_selection;
use crate::services::ProfileService;
use crate::state::settings::PreferenceItem;
use crate::state::{ProfileField, SettingsTab};
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_settings_input(key: KeyEvent, app: &mut App) {
    if app.settings.confirm_logout {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.settings.confirm_logout = false;
                app.send(BackendRequest::Logout);
            }
            KeyCode::Char('n') | KeyCode::Esc => app.settings.confirm_logout = false,
            _ => {}
        }
        return;
    }

    if !app.settings.editing_github {
        match key.code {
            KeyCode::Tab => {
                app.settings.tab = app.settings.tab.cycle(true);
                return;
            }
            KeyCode::BackTab => {
                app.settings.tab = app.settings.tab.cycle(false);
                return;
            }
            _ => {}
        }
    }

    match app.settings.tab {
        SettingsTab::Profile => handle_profile_input(key, app),
        SettingsTab::Preferences => handle_preferences_input(key, app),
        SettingsTab::Integrations => handle_integrations_input(key, app),
        SettingsTab::Account => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('l')) {
                app.settings.confirm_logout = true;
            }
        }
    }
}

fn handle_profile_input(key: KeyEvent, app: &mut App) {
    if app.settings.saving {
        return;
    }
    let settings = &mut app.settings;
    match key.code {
        KeyCode::Down => settings.profile_field = settings.profile_field.next(true),
        KeyCode::Up => settings.profile_field = settings.profile_field.next(false),
        KeyCode::Enter if settings.profile_field == ProfileField::Save => {
            match ProfileService::validate_profile(&settings.profile_form) {
                Ok(()) => {
                    settings.profile_error = None;
                    settings.saving = true;
                    let update = settings.profile_form.to_update();
                    app.send(BackendRequest::UpdateProfile(update));
                }
                Err(e) => settings.profile_error = Some(e.to_string()),
            }
        }
        KeyCode::Enter => settings.profile_field = settings.profile_field.next(true),
        KeyCode::Char(c) => {
            if let Some(text) = settings.profile_form.field_mut(settings.profile_field) {
                text.push(c);
                settings.profile_error = None;
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = settings.profile_form.field_mut(settings.profile_field) {
                text.pop();
            }
        }
        KeyCode::Esc => {
            // Discard edits
            if let Some(user) = app.data.user().cloned() {
                app.settings.load_profile(&user);
            }
        }
        _ => {}
    }
}

fn handle_preferences_input(key: KeyEvent, app: &mut App) {
    let len = PreferenceItem::ALL.len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.settings.pref_selected, len, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.settings.pref_selected, len, 1),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let item = PreferenceItem::ALL[app.settings.pref_selected.min(len - 1)];
            app.toggle_preference(item);
        }
        _ => {}
    }
}

fn handle_integrations_input(key: KeyEvent, app: &mut App) {
    if app.settings.editing_github {
        match key.code {
            KeyCode::Char(c) => {
                app.settings.github_input.push(c);
                app.settings.github_error = None;
            }
            KeyCode::Backspace => {
                app.settings.github_input.pop();
            }
            KeyCode::Enter => {
                let username = app.settings.github_input.trim().to_string();
                if ProfileService::is_valid_github_username(&username) {
                    app.settings.github_error = None;
                    app.send(BackendRequest::ConnectGitHubManual(username));
                } else {
                    app.settings.github_error = Some("GitHub username is not valid".to_string());
                }
            }
            KeyCode::Esc => {
                app.settings.editing_github = false;
                app.settings.github_input.clear();
                app.settings.github_error = None;
            }
            _ => {}
        }
        return;
    }

    let connected = app.data.user().map(|u| u.github_connected).unwrap_or(false);
    match key.code {
        KeyCode::Enter | KeyCode::Char('c') if !connected => app.send(BackendRequest::ConnectGitHub),
        KeyCode::Char('m') if !connected => app.settings.editing_github = true,
        KeyCode::Char('d') if connected => app.send(BackendRequest::DisconnectGitHub),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendEvent;
    use crate::handlers::handle_key_event;
    use crate::handlers::test_support::*;
    use crate::state::{AppMode, ToastLevel};

    async fn settings_app() -> (App, tokio::sync::mpsc::UnboundedReceiver<BackendRequest>) {
        let (mut app, mut rx) = loaded_app().await;
        app.set_mode(AppMode::Settings);
        drain(&mut rx);
        (app, rx)
    }

    #[tokio::test]
    async fn profile_save_sends_update_and_failure_toasts() {
        let (mut app, mut rx) = settings_app().await;
        // Name -> Role
        handle_key_event(key(KeyCode::Down), &mut app);
        type_str(&mut app, "!");
        // Role -> Name -> Save
        handle_key_event(key(KeyCode::Up), &mut app);
        handle_key_event(key(KeyCode::Up), &mut app);
        assert_eq!(app.settings.profile_field, ProfileField::Save);
        handle_key_event(key(KeyCode::Enter), &mut app);

        let sent = drain(&mut rx);
        assert!(matches!(sent.as_slice(), [BackendRequest::UpdateProfile(u)] if u.role.as_deref().is_some_and(|r| r.ends_with('!'))));
        assert!(app.settings.saving);

        app.handle_backend_event(BackendEvent::Failed { op: "update_profile", message: "offline".into() });
        assert!(!app.settings.saving);
        assert_eq!(app.notifications.current.as_ref().unwrap().level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn empty_name_is_refused_inline() {
        let (mut app, mut rx) = settings_app().await;
        let name_len = app.settings.profile_form.name.chars().count();
        for _ in 0..name_len {
            handle_key_event(key(KeyCode::Backspace), &mut app);
        }
        handle_key_event(key(KeyCode::Up), &mut app);
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert!(drain(&mut rx).is_empty());
        assert!(app.settings.profile_error.is_some());
    }

    #[tokio::test]
    async fn logout_needs_confirmation() {
        let (mut app, mut rx) = settings_app().await;
        handle_key_event(key(KeyCode::BackTab), &mut app);
        assert_eq!(app.settings.tab, SettingsTab::Account);
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert!(drain(&mut rx).is_empty());
        handle_key_event(key(KeyCode::Char('y')), &mut app);
        assert_eq!(drain(&mut rx), vec![BackendRequest::Logout]);
    }

    #[tokio::test]
    async fn manual_github_username_is_validated() {
        let (mut app, mut rx) = settings_app().await;
        app.settings.tab = SettingsTab::Integrations;
        if app.data.user().unwrap().github_connected {
            return;
        }
        handle_key_event(key(KeyCode::Char('m')), &mut app);
        type_str(&mut app, "-bad");
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert!(app.settings.github_error.is_some());
        assert!(drain(&mut rx).is_empty());
    }
}
