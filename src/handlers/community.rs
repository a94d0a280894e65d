use crate::app::App;
use crate::backend::{BackendRequest, FollowListKind};
use crate::handlers::move_selection;
use crate::services::feed::build_draft;
use crate::services::MessageService;
use crate::state::{CommunityFocus, ComposeField, ComposeForm};
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_community_input(key: KeyEvent, app: &mut App) {
    if app.community.detail.is_some() {
        handle_detail_input(key, app);
        return;
    }
    if app.community.compose.is_some() {
        handle_compose_input(key, app);
        return;
    }
    if app.community.focus == CommunityFocus::Search {
        handle_search_input(key, app);
        return;
    }

    let len = app.visible_posts().len();
    let selected = app.selected_post().map(|p| (p.id, p.user_id));
    let me = app.me();

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.community.selected, len, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.community.selected, len, 1),
        KeyCode::Home => app.community.selected = 0,
        KeyCode::End => app.community.selected = len.saturating_sub(1),
        KeyCode::Enter => {
            if let Some((post_id, _)) = selected {
                app.open_post_detail(post_id);
            }
        }
        KeyCode::Char('l') => {
            if let Some((post_id, _)) = selected {
                app.send(BackendRequest::LikePost(post_id));
            }
        }
        KeyCode::Char('d') => {
            if let Some((post_id, author)) = selected {
                if Some(author) == me {
                    app.send(BackendRequest::DeletePost(post_id));
                }
            }
        }
        KeyCode::Char('m') => {
            if let Some((_, author)) = selected {
                app.open_dm_with(author);
            }
        }
        KeyCode::Char('o') => {
            if let Some((_, author)) = selected {
                app.toggle_follow(author);
            }
        }
        KeyCode::Char('v') => {
            if let Some((_, author)) = selected {
                app.open_follow_list(author, FollowListKind::Followers);
            }
        }
        KeyCode::Char('V') => {
            if let Some((_, author)) = selected {
                app.open_follow_list(author, FollowListKind::Following);
            }
        }
        KeyCode::Char('c') | KeyCode::Char('i') => app.community.compose = Some(ComposeForm::default()),
        KeyCode::Char('f') => {
            app.community.filter = app.community.filter.cycle();
            app.community.selected = 0;
        }
        KeyCode::Char('/') | KeyCode::Tab => app.community.focus = CommunityFocus::Search,
        _ => {}
    }
}

fn handle_search_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(c) => {
            app.community.query.push(c);
            app.community.selected = 0;
        }
        KeyCode::Backspace => {
            app.community.query.pop();
            app.community.selected = 0;
        }
        KeyCode::Enter | KeyCode::Tab | KeyCode::Down => app.community.focus = CommunityFocus::Feed,
        KeyCode::Esc => {
            app.community.query.clear();
            app.community.selected = 0;
            app.community.focus = CommunityFocus::Feed;
        }
        _ => {}
    }
}

fn handle_compose_input(key: KeyEvent, app: &mut App) {
    let max_len = app.config.max_post_length;
    let Some(form) = app.community.compose.as_mut() else { return };

    match key.code {
        KeyCode::Esc => {
            app.community.compose = None;
        }
        KeyCode::Tab => form.focus_next(true),
        KeyCode::BackTab => form.focus_next(false),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.field == ComposeField::Kind => form.cycle_kind(),
        KeyCode::Enter if form.field == ComposeField::Submit => match build_draft(form, max_len) {
            Ok(draft) => {
                form.error = None;
                app.send(BackendRequest::AddPost(draft));
            }
            Err(e) => form.error = Some(e.to_string()),
        },
        // Snippets and post bodies are multi-line
        KeyCode::Enter if matches!(form.field, ComposeField::CodeSnippet | ComposeField::Content) => {
            if let Some(text) = form.active_text_mut() {
                text.push('\n');
            }
        }
        KeyCode::Enter => form.focus_next(true),
        KeyCode::Char(c) => {
            if let Some(text) = form.active_text_mut() {
                text.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = form.active_text_mut() {
                text.pop();
            }
        }
        _ => {}
    }
}

fn handle_detail_input(key: KeyEvent, app: &mut App) {
    let max_len = app.config.max_message_length;
    let Some(detail) = app.community.detail.as_mut() else { return };
    let flat_len = detail.flattened().len();

    match key.code {
        KeyCode::Esc => {
            if detail.reply_to.is_some() {
                detail.reply_to = None;
            } else {
                app.community.close_detail();
            }
        }
        KeyCode::Up => move_selection(&mut detail.selected_comment, flat_len, -1),
        KeyCode::Down => move_selection(&mut detail.selected_comment, flat_len, 1),
        KeyCode::Tab => {
            // Replies stay one level deep: answering a reply targets its parent thread.
            let target = detail
                .comments
                .iter()
                .flat_map(|c| std::iter::repeat(c.id).take(1 + c.replies.len()))
                .nth(detail.selected_comment);
            detail.reply_to = target;
        }
        KeyCode::Char(c) => detail.input.push(c),
        KeyCode::Backspace => {
            detail.input.pop();
        }
        KeyCode::Enter => {
            if let Ok(content) = MessageService::validate_message(&detail.input, max_len) {
                let request = BackendRequest::AddComment {
                    post_id: detail.post_id,
                    content,
                    reply_to: detail.reply_to.take(),
                    generation: detail.generation,
                };
                detail.input.clear();
                app.send(request);
            }
        }
        _ => {}
    }
}
