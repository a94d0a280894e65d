use crate::app::App;
use crate::handlers::move_selection;
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_bounty_input(key: KeyEvent, app: &mut App) {
    if let Some(id) = app.bounty.detail {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.bounty.close_detail(),
            KeyCode::Enter | KeyCode::Char('c') => app.claim_bounty(id),
            _ => {}
        }
        return;
    }

    if app.bounty.editing_query {
        match key.code {
            KeyCode::Char(c) => {
                app.bounty.query.push(c);
                app.bounty.selected = 0;
            }
            KeyCode::Backspace => {
                app.bounty.query.pop();
                app.bounty.selected = 0;
            }
            KeyCode::Enter => app.bounty.editing_query = false,
            KeyCode::Esc => {
                app.bounty.query.clear();
                app.bounty.editing_query = false;
            }
            _ => {}
        }
        return;
    }

    let visible: Vec<_> = app.visible_bounties().iter().map(|b| b.id).collect();
    let selected = visible.get(app.bounty.selected).copied();

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.bounty.selected, visible.len(), -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.bounty.selected, visible.len(), 1),
        KeyCode::Enter => {
            if let Some(id) = selected {
                app.bounty.open_detail(id);
            }
        }
        KeyCode::Char('c') => {
            if let Some(id) = selected {
                app.claim_bounty(id);
            }
        }
        KeyCode::Char('f') | KeyCode::Tab => {
            let next = app.bounty.filter.cycle();
            app.bounty.set_filter(next);
        }
        KeyCode::Char('/') => app.bounty.editing_query = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendRequest;
    use crate::handlers::handle_key_event;
    use crate::handlers::test_support::*;
    use crate::model::BountyStatus;
    use crate::services::bounties::BountyFilter;
    use crate::state::AppMode;

    #[tokio::test]
    async fn claiming_an_open_bounty_sends_a_request() {
        let (mut app, mut rx) = loaded_app().await;
        app.set_mode(AppMode::Bounties);
        handle_key_event(key(KeyCode::Char('f')), &mut app);
        assert_eq!(app.bounty.filter, BountyFilter::Open);
        drain(&mut rx);

        let id = app.visible_bounties()[0].id;
        handle_key_event(key(KeyCode::Enter), &mut app);
        assert_eq!(app.bounty.detail, Some(id));
        handle_key_event(key(KeyCode::Char('c')), &mut app);

        assert_eq!(drain(&mut rx), vec![BackendRequest::ClaimBounty(id)]);
        assert_eq!(app.bounty.claiming, Some(id));
    }

    #[tokio::test]
    async fn closed_bounties_are_refused_locally() {
        let (mut app, mut rx) = loaded_app().await;
        app.set_mode(AppMode::Bounties);
        drain(&mut rx);
        let id = app
            .snapshot()
            .unwrap()
            .bounties
            .iter()
            .find(|b| b.status == BountyStatus::Completed)
            .unwrap()
            .id;

        app.claim_bounty(id);

        assert!(drain(&mut rx).is_empty());
        assert!(app.notifications.current.is_some());
    }
}
