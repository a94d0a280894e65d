use crate::app::App;
use crate::backend::BackendRequest;
use crate::handlers::move_selection;
use crate::state::dashboard::JoinForm;
use crate::state::{DashboardFocus, DashboardForm, TeamField, TeamForm, ToastLevel};
use crossterm::event::{KeyCode, KeyEvent};

const MAX_JOIN_CODE: usize = 12;

pub fn handle_dashboard_input(key: KeyEvent, app: &mut App) {
    if app.dashboard.form.is_some() {
        handle_form_input(key, app);
        return;
    }
    if app.dashboard.editing_query {
        handle_board_query_input(key, app);
        return;
    }

    let teams = app.snapshot().map(|s| s.teams.len()).unwrap_or(0);
    let board = app.board_tasks().len();

    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            app.dashboard.focus = match app.dashboard.focus {
                DashboardFocus::Teams => DashboardFocus::Board,
                DashboardFocus::Board => DashboardFocus::Teams,
            };
        }
        KeyCode::Up | KeyCode::Char('k') => match app.dashboard.focus {
            DashboardFocus::Teams => move_selection(&mut app.dashboard.team_selected, teams, -1),
            DashboardFocus::Board => move_selection(&mut app.dashboard.board_selected, board, -1),
        },
        KeyCode::Down | KeyCode::Char('j') => match app.dashboard.focus {
            DashboardFocus::Teams => move_selection(&mut app.dashboard.team_selected, teams, 1),
            DashboardFocus::Board => move_selection(&mut app.dashboard.board_selected, board, 1),
        },
        KeyCode::Char('c') => {
            app.dashboard.form = Some(DashboardForm::CreateTeam(TeamForm::default()));
        }
        KeyCode::Char('J') | KeyCode::Char('g') => app.open_join_form(),
        KeyCode::Char('/') => {
            app.dashboard.focus = DashboardFocus::Board;
            app.dashboard.editing_query = true;
        }
        KeyCode::Enter if app.dashboard.focus == DashboardFocus::Teams => {
            let code = app
                .snapshot()
                .and_then(|s| s.teams.get(app.dashboard.team_selected))
                .map(|t| (t.name.clone(), t.join_code.clone()));
            if let Some((name, code)) = code {
                let timeout = app.config.toast_timeout_ms;
                app.set_toast(format!("{} join code: {}", name, code), ToastLevel::Info, Some(timeout));
            }
        }
        _ => {}
    }
}

fn handle_board_query_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(c) => {
            app.dashboard.board_query.push(c);
            app.dashboard.board_selected = 0;
        }
        KeyCode::Backspace => {
            app.dashboard.board_query.pop();
            app.dashboard.board_selected = 0;
        }
        KeyCode::Enter => app.dashboard.editing_query = false,
        KeyCode::Esc => {
            app.dashboard.board_query.clear();
            app.dashboard.editing_query = false;
        }
        _ => {}
    }
}

fn handle_form_input(key: KeyEvent, app: &mut App) {
    if key.code == KeyCode::Esc {
        app.dashboard.form = None;
        return;
    }
    if app.dashboard.pending {
        return;
    }

    let request = match app.dashboard.form.as_mut() {
        Some(DashboardForm::CreateTeam(form)) => handle_team_form(key, form),
        Some(DashboardForm::JoinTeam(form)) => handle_join_form(key, form),
        None => None,
    };
    if let Some(request) = request {
        app.dashboard.pending = true;
        app.send(request);
    }
}

fn handle_team_form(key: KeyEvent, form: &mut TeamForm) -> Option<BackendRequest> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(true),
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.next(false),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.field == TeamField::Visibility => {
            form.toggle_visibility();
        }
        KeyCode::Enter if form.field == TeamField::Submit => match form.to_draft() {
            Ok(draft) => {
                form.error = None;
                return Some(BackendRequest::AddTeam(draft));
            }
            Err(e) => form.error = Some(e.to_string()),
        },
        KeyCode::Enter => form.field = form.field.next(true),
        KeyCode::Char(c) => {
            let numeric_only = form.field == TeamField::MaxMembers;
            if let Some(text) = form.active_text_mut() {
                if !numeric_only || c.is_ascii_digit() {
                    text.push(c);
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = form.active_text_mut() {
                text.pop();
            }
        }
        _ => {}
    }
    None
}

fn handle_join_form(key: KeyEvent, form: &mut JoinForm) -> Option<BackendRequest> {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_alphanumeric() && form.code.len() < MAX_JOIN_CODE => {
            form.code.push(c.to_ascii_uppercase());
            form.error = None;
        }
        KeyCode::Backspace => {
            form.code.pop();
        }
        KeyCode::Enter => {
            let code = form.code.trim().to_string();
            if code.is_empty() {
                form.error = Some("Enter a join code.".to_string());
            } else {
                return Some(BackendRequest::JoinTeam(code));
            }
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendEvent;
    use crate::handlers::handle_key_event;
    use crate::handlers::test_support::*;
    use crate::model::Visibility;

    #[tokio::test]
    async fn create_team_form_submits_a_draft() {
        let (mut app, mut rx) = loaded_app().await;
        drain(&mut rx);
        handle_key_event(key(KeyCode::Char('c')), &mut app);
        type_str(&mut app, "Night Owls");
        // Name -> Event -> Kind -> Visibility
        for _ in 0..3 {
            handle_key_event(key(KeyCode::Tab), &mut app);
        }
        handle_key_event(key(KeyCode::Char(' ')), &mut app);
        handle_key_event(key(KeyCode::Tab), &mut app);
        handle_key_event(key(KeyCode::Backspace), &mut app);
        type_str(&mut app, "x6");
        handle_key_event(key(KeyCode::Tab), &mut app);
        handle_key_event(key(KeyCode::Enter), &mut app);

        let sent = drain(&mut rx);
        match sent.as_slice() {
            [BackendRequest::AddTeam(draft)] => {
                assert_eq!(draft.name, "Night Owls");
                assert_eq!(draft.max_members, 6);
                assert_eq!(draft.visibility, Visibility::Private);
            }
            other => panic!("unexpected requests: {:?}", other),
        }
        assert!(app.dashboard.pending);
    }

    #[tokio::test]
    async fn invalid_team_form_stays_open_with_an_error() {
        let (mut app, mut rx) = loaded_app().await;
        drain(&mut rx);
        handle_key_event(key(KeyCode::Char('c')), &mut app);
        handle_key_event(key(KeyCode::BackTab), &mut app);
        handle_key_event(key(KeyCode::Enter), &mut app);

        assert!(drain(&mut rx).is_empty());
        assert!(matches!(&app.dashboard.form, Some(DashboardForm::CreateTeam(f)) if f.error.is_some()));
    }

    #[tokio::test]
    async fn join_code_is_uppercased_and_sent() {
        let (mut app, mut rx) = loaded_app().await;
        drain(&mut rx);
        handle_key_event(key(KeyCode::Char('J')), &mut app);
        type_str(&mut app, "byte99");
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert_eq!(drain(&mut rx), vec![BackendRequest::JoinTeam("BYTE99".into())]);

        app.handle_backend_event(BackendEvent::TeamJoined { code: "BYTE99".into(), joined: true });
        assert!(app.dashboard.form.is_none());
    }

    #[tokio::test]
    async fn board_query_filters_tasks() {
        let (mut app, _rx) = loaded_app().await;
        let all = app.board_tasks().len();
        handle_key_event(key(KeyCode::Char('/')), &mut app);
        type_str(&mut app, "zzzz-no-match");
        assert!(app.board_tasks().is_empty());
        handle_key_event(key(KeyCode::Esc), &mut app);
        assert_eq!(app.board_tasks().len(), all);
    }
}
