use std::time::Instant;

use crate::app::App;
use crate::backend::{BackendRequest, FollowListKind};
use crate::handlers::move_selection;
use crate::services::MessageService;
use crate::state::{CommsAction, CommsMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_comms_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Tab => {
            app.select_comms_mode(app.comms.mode.cycle(true));
            return;
        }
        KeyCode::BackTab => {
            app.select_comms_mode(app.comms.mode.cycle(false));
            return;
        }
        _ => {}
    }

    match app.comms.mode {
        CommsMode::Global => handle_global_input(key, app),
        CommsMode::Intel => match app.comms.selected_partner() {
            Some(_) => handle_thread_input(key, app),
            None => handle_thread_list_input(key, app),
        },
        CommsMode::Operatives => handle_operatives_input(key, app),
        CommsMode::Bounties => handle_bounties_input(key, app),
    }
}

fn handle_global_input(key: KeyEvent, app: &mut App) {
    let total = app.snapshot().map(|s| s.global_messages.len()).unwrap_or(0);
    match key.code {
        KeyCode::Char(c) => {
            app.comms.global_input.push(c);
            app.comms.input_error = None;
        }
        KeyCode::Backspace => {
            app.comms.global_input.pop();
        }
        KeyCode::Enter => match MessageService::validate_message(&app.comms.global_input, app.config.max_message_length) {
            Ok(content) => {
                app.comms.global_input.clear();
                app.comms.global_scroll = 0;
                app.send(BackendRequest::SendGlobalMessage(content));
            }
            Err(e) => app.comms.input_error = Some(e.to_string()),
        },
        KeyCode::Up | KeyCode::PageUp => {
            let step = if key.code == KeyCode::PageUp { 10 } else { 1 };
            app.comms.global_scroll = (app.comms.global_scroll + step).min(total.saturating_sub(1));
        }
        KeyCode::Down | KeyCode::PageDown => {
            let step = if key.code == KeyCode::PageDown { 10 } else { 1 };
            app.comms.global_scroll = app.comms.global_scroll.saturating_sub(step);
        }
        KeyCode::Esc => {
            app.comms.global_input.clear();
            app.comms.input_error = None;
        }
        _ => {}
    }
}

fn handle_thread_list_input(key: KeyEvent, app: &mut App) {
    let conversations = app.conversations();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.comms.thread_selected, conversations.len(), -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.comms.thread_selected, conversations.len(), 1),
        KeyCode::Enter => {
            if let Some(preview) = conversations.get(app.comms.thread_selected) {
                app.comms.apply(CommsAction::OpenThread(preview.partner_id));
            }
        }
        _ => {}
    }
}

fn handle_thread_input(key: KeyEvent, app: &mut App) {
    let Some(partner) = app.comms.selected_partner() else { return };
    match key.code {
        KeyCode::Esc => {
            app.comms.apply(CommsAction::Back);
            app.comms.input_error = None;
        }
        KeyCode::Char(c) => {
            app.comms.dm_input.push(c);
            app.comms.input_error = None;
        }
        KeyCode::Backspace => {
            app.comms.dm_input.pop();
        }
        KeyCode::Enter => match MessageService::validate_message(&app.comms.dm_input, app.config.max_message_length) {
            Ok(content) => {
                app.comms.dm_input.clear();
                app.send(BackendRequest::SendDirectMessage { receiver_id: partner, content });
            }
            Err(e) => app.comms.input_error = Some(e.to_string()),
        },
        _ => {}
    }
}

fn handle_operatives_input(key: KeyEvent, app: &mut App) {
    let operatives: Vec<_> = app.operatives().iter().map(|u| u.id).collect();
    let selected = operatives.get(app.comms.operative_selected).copied();
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('f') if ctrl => {
            if let Some(id) = selected {
                app.toggle_follow(id);
            }
        }
        KeyCode::Char('o') if ctrl => {
            if let Some(id) = selected {
                app.open_follow_list(id, FollowListKind::Followers);
            }
        }
        KeyCode::Char(c) if !ctrl => {
            app.search.push_char(c, Instant::now());
            app.comms.operative_selected = 0;
        }
        KeyCode::Backspace => {
            app.search.pop_char(Instant::now());
            app.comms.operative_selected = 0;
        }
        KeyCode::Esc => {
            app.search.clear();
            app.comms.operative_selected = 0;
        }
        KeyCode::Up => move_selection(&mut app.comms.operative_selected, operatives.len(), -1),
        KeyCode::Down => move_selection(&mut app.comms.operative_selected, operatives.len(), 1),
        KeyCode::Enter => {
            if let Some(id) = selected {
                app.open_dm_with(id);
            }
        }
        _ => {}
    }
}

fn handle_bounties_input(key: KeyEvent, app: &mut App) {
    let bounties: Vec<_> = app.snapshot().map(|s| s.bounties.iter().map(|b| b.id).collect()).unwrap_or_default();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.comms.bounty_selected, bounties.len(), -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.comms.bounty_selected, bounties.len(), 1),
        KeyCode::Enter | KeyCode::Char('c') => {
            if let Some(id) = bounties.get(app.comms.bounty_selected).copied() {
                app.claim_bounty(id);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::handle_key_event;
    use crate::handlers::test_support::*;
    use crate::state::{AppMode, IntelView};

    async fn comms_app() -> (App, tokio::sync::mpsc::UnboundedReceiver<BackendRequest>) {
        let (mut app, mut rx) = loaded_app().await;
        app.set_mode(AppMode::Comms);
        drain(&mut rx);
        (app, rx)
    }

    #[tokio::test]
    async fn global_chat_sends_trimmed_and_rejects_blank() {
        let (mut app, mut rx) = comms_app().await;
        type_str(&mut app, "   ");
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert!(app.comms.input_error.is_some());
        assert!(drain(&mut rx).is_empty());

        type_str(&mut app, "gm ");
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert_eq!(drain(&mut rx), vec![BackendRequest::SendGlobalMessage("gm".into())]);
        assert!(app.comms.global_input.is_empty());
    }

    #[tokio::test]
    async fn intel_thread_list_opens_and_back_returns_to_list() {
        let (mut app, mut rx) = comms_app().await;
        handle_key_event(key(KeyCode::Tab), &mut app);
        assert_eq!(app.comms.mode, CommsMode::Intel);
        let partner = app.conversations()[0].partner_id;

        handle_key_event(key(KeyCode::Enter), &mut app);
        assert_eq!(app.comms.intel, IntelView::ThreadSelected(partner));

        type_str(&mut app, "on it");
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert!(drain(&mut rx)
            .contains(&BackendRequest::SendDirectMessage { receiver_id: partner, content: "on it".into() }));

        handle_key_event(key(KeyCode::Esc), &mut app);
        assert_eq!(app.comms.mode, CommsMode::Intel);
        assert_eq!(app.comms.intel, IntelView::NoThreadSelected);
    }

    #[tokio::test]
    async fn operative_search_goes_through_the_debouncer() {
        let (mut app, mut rx) = comms_app().await;
        app.select_comms_mode(CommsMode::Operatives);
        type_str(&mut app, "ne");
        assert!(drain(&mut rx).is_empty());
        assert_eq!(app.search.query, "ne");

        app.poll_search(Instant::now() + app.config.search_debounce);
        assert!(matches!(drain(&mut rx).as_slice(), [BackendRequest::SearchUsers { query, .. }] if query == "ne"));

        handle_key_event(key(KeyCode::Esc), &mut app);
        assert!(app.search.query.is_empty());
    }
}
