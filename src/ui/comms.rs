//! Communication panel: global channel, DM threads, operative search and a bounty feed.

use chrono::{Local, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};
use uuid::Uuid;

use crate::app::App;
use crate::model::{ChatKind, ChatMessage, User};
use crate::services::message::MessageService;
use crate::state::CommsMode;
use crate::ui::bounties::bounty_item;
use crate::ui::theme::UiTheme;
use crate::ui::time_format::{format_timestamp, short_ago};

pub fn draw_comms(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let chunks = Layout::default()
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let titles: Vec<Line> = CommsMode::ALL
        .iter()
        .map(|mode| {
            if *mode == CommsMode::Intel {
                let unread = app.data.unread_direct_messages();
                if unread > 0 {
                    return Line::from(format!("{} ({})", mode.title(), unread));
                }
            }
            Line::from(mode.title())
        })
        .collect();
    f.render_widget(
        Tabs::new(titles)
            .select(app.comms.mode.index())
            .highlight_style(theme.selected_style())
            .block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    match app.comms.mode {
        CommsMode::Global => draw_global(f, app, theme, chunks[1]),
        CommsMode::Intel => match app.comms.selected_partner() {
            Some(partner) => draw_thread(f, app, theme, partner, chunks[1]),
            None => draw_thread_list(f, app, theme, chunks[1]),
        },
        CommsMode::Operatives => draw_operatives(f, app, theme, chunks[1]),
        CommsMode::Bounties => draw_bounty_feed(f, app, theme, chunks[1]),
    }
}

fn split_input(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    (chunks[0], chunks[1])
}

fn draw_input(f: &mut Frame, app: &App, theme: &dyn UiTheme, text: &str, placeholder: &str, area: Rect) {
    let (content, title) = match &app.comms.input_error {
        Some(error) => (
            Line::from(Span::raw(format!("{}_", text))),
            Span::styled(format!(" {} ", error), Style::default().fg(theme.accents().error)),
        ),
        None if text.is_empty() => (
            Line::from(Span::styled(placeholder.to_string(), theme.muted_style())),
            Span::styled(" MESSAGE ", theme.title_style()),
        ),
        None => (Line::from(format!("{}_", text)), Span::styled(" MESSAGE ", theme.title_style())),
    };
    f.render_widget(
        Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_color(app.ui.tick_count)))
                .title(title),
        ),
        area,
    );
}

fn draw_global(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let (messages_area, input_area) = split_input(area);
    let messages = app.snapshot().map(|s| s.global_messages.as_slice()).unwrap_or(&[]);
    let colors = theme.colors();
    let me = app.me();
    let user = app.data.user();

    let rows = messages_area.height.saturating_sub(2) as usize;
    let end = messages.len().saturating_sub(app.comms.global_scroll);
    let start = end.saturating_sub(rows);
    let lines: Vec<Line> = messages[start..end]
        .iter()
        .map(|m| match m.kind {
            ChatKind::System => Line::from(Span::styled(
                format!("*** {}", m.content),
                Style::default().fg(theme.accents().info).add_modifier(Modifier::ITALIC),
            )),
            ChatKind::User => {
                let name_style = if m.user_id.is_some() && m.user_id == me {
                    Style::default().fg(colors.secondary).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.primary).add_modifier(Modifier::BOLD)
                };
                let content_style = if mentions_me(m, user) {
                    Style::default().fg(theme.accents().warning).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{} ", m.created_at.with_timezone(&Local).format("%H:%M")), theme.muted_style()),
                    Span::styled(format!("<{}> ", m.user), name_style),
                    Span::styled(m.content.as_str(), content_style),
                ])
            }
        })
        .collect();

    let online = app.snapshot().map(|s| s.global_online_users.len()).unwrap_or(0);
    let title = if app.comms.global_scroll > 0 {
        format!(" #global · {} online · scrolled ", online)
    } else {
        format!(" #global · {} online ", online)
    };
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(Span::styled(title, theme.title_style()))),
        messages_area,
    );
    draw_input(f, app, theme, &app.comms.global_input, "Say something to everyone...", input_area);
}

/// Someone else `@`-mentioned the signed-in operative.
fn mentions_me(message: &ChatMessage, me: Option<&User>) -> bool {
    match me {
        Some(user) => message.user_id != Some(user.id) && MessageService::mentions(&message.content, &user.name),
        None => false,
    }
}

fn draw_thread_list(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let conversations = app.conversations();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" SECURE CHANNELS ", theme.title_style()));

    if conversations.is_empty() {
        f.render_widget(
            Paragraph::new("No conversations yet. Find someone in OPERATIVES and hit Enter.")
                .style(theme.muted_style())
                .block(block),
            area,
        );
        return;
    }

    let now = Utc::now();
    let accents = theme.accents();
    let items: Vec<ListItem> = conversations
        .iter()
        .map(|c| {
            let online = if app.data.is_online(c.partner_id) {
                Span::styled("● ", Style::default().fg(accents.success))
            } else {
                Span::styled("○ ", theme.muted_style())
            };
            let unread = if c.unread > 0 {
                Span::styled(format!(" ({})", c.unread), Style::default().fg(accents.warning).add_modifier(Modifier::BOLD))
            } else {
                Span::raw("")
            };
            let prefix = if c.last_from_me { "you: " } else { "" };
            ListItem::new(vec![
                Line::from(vec![
                    online,
                    Span::styled(c.partner_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    unread,
                    Span::styled(format!("  {}", short_ago(c.last_at, now)), theme.muted_style()),
                ]),
                Line::from(Span::styled(format!("  {}{}", prefix, c.last_message), theme.muted_style())),
            ])
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.comms.thread_selected.min(conversations.len() - 1)));
    f.render_stateful_widget(
        List::new(items).block(block).highlight_style(theme.selected_style()).highlight_symbol("> "),
        area,
        &mut state,
    );
}

fn draw_thread(f: &mut Frame, app: &App, theme: &dyn UiTheme, partner: Uuid, area: Rect) {
    let (messages_area, input_area) = split_input(area);
    let messages = app.thread_messages(partner);
    let partner_name = app
        .data
        .profile(partner)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| "Unknown operative".to_string());
    let colors = theme.colors();
    let me = app.me();
    let now = Local::now();

    let lines: Vec<Line> = if messages.is_empty() {
        vec![Line::from(Span::styled(
            format!("This is the start of your channel with {}.", partner_name),
            theme.muted_style(),
        ))]
    } else {
        messages
            .iter()
            .map(|m| {
                let mine = Some(m.sender_id) == me;
                let (name, style) = if mine {
                    ("you", Style::default().fg(colors.secondary).add_modifier(Modifier::BOLD))
                } else {
                    (m.sender_name.as_str(), Style::default().fg(colors.primary).add_modifier(Modifier::BOLD))
                };
                Line::from(vec![
                    Span::styled(format!("{} ", format_timestamp(m.created_at, now)), theme.muted_style()),
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(m.content.as_str()),
                ])
            })
            .collect()
    };

    // Keep the newest messages visible.
    let rows = messages_area.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(rows);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();

    let status = if app.data.is_online(partner) { "online" } else { "offline" };
    f.render_widget(
        Paragraph::new(visible).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" @{} · {} · [Esc] back ", partner_name, status), theme.title_style())),
        ),
        messages_area,
    );
    draw_input(f, app, theme, &app.comms.dm_input, "Encrypted channel open...", input_area);
}

fn draw_operatives(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let chunks = Layout::default()
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let query = if app.search.query.is_empty() {
        Span::styled("Type to search operatives by name, role or skill", theme.muted_style())
    } else {
        Span::raw(format!("{}_", app.search.query))
    };
    let search_title = if app.search.loading { " SEARCH · scanning... " } else { " SEARCH " };
    f.render_widget(
        Paragraph::new(Line::from(query)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_color(app.ui.tick_count)))
                .title(search_title),
        ),
        chunks[0],
    );

    let operatives = app.operatives();
    let title = format!(" OPERATIVES ({}) ", operatives.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, theme.title_style()));
    if operatives.is_empty() {
        let message = if app.search.loading { "Scanning..." } else { "No operatives found." };
        f.render_widget(Paragraph::new(message).style(theme.muted_style()).block(block), chunks[1]);
        return;
    }

    let accents = theme.accents();
    let items: Vec<ListItem> = operatives
        .iter()
        .map(|u| {
            let dot = if app.data.is_online(u.id) {
                Span::styled("● ", Style::default().fg(accents.success))
            } else {
                Span::styled("○ ", theme.muted_style())
            };
            let following = if app.data.is_following(u.id) {
                Span::styled(" [following]", Style::default().fg(accents.warning))
            } else {
                Span::raw("")
            };
            ListItem::new(vec![
                Line::from(vec![
                    dot,
                    Span::styled(u.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {} · {} · {} XP", u.role, u.rank, u.reputation), theme.muted_style()),
                    following,
                ]),
                Line::from(Span::styled(format!("  {}", u.skills.join(", ")), theme.muted_style())),
            ])
        })
        .collect();
    let mut state = ListState::default().with_selected(Some(app.comms.operative_selected.min(operatives.len() - 1)));
    f.render_stateful_widget(
        List::new(items)
            .block(block.title_bottom(" [Enter] Message · [Ctrl+F] Follow · [Ctrl+O] Followers "))
            .highlight_style(theme.selected_style())
            .highlight_symbol("> "),
        chunks[1],
        &mut state,
    );
}

fn draw_bounty_feed(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let bounties = app.snapshot().map(|s| s.bounties.as_slice()).unwrap_or(&[]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" BOUNTY WIRE ", theme.title_style()));
    if bounties.is_empty() {
        f.render_widget(Paragraph::new("No bounties posted.").style(theme.muted_style()).block(block), area);
        return;
    }
    let me = app.me();
    let now = Utc::now();
    let items: Vec<ListItem> = bounties
        .iter()
        .map(|b| bounty_item(b, me, app.bounty.claiming == Some(b.id), now, theme))
        .collect();
    let mut state = ListState::default().with_selected(Some(app.comms.bounty_selected.min(bounties.len() - 1)));
    f.render_stateful_widget(
        List::new(items).block(block).highlight_style(theme.selected_style()).highlight_symbol("> "),
        area,
        &mut state,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::loaded_app;

    #[tokio::test]
    async fn only_other_operatives_mentioning_me_are_highlighted() {
        let (app, _rx) = loaded_app().await;
        let snapshot = app.snapshot().unwrap();
        let me = &snapshot.user;

        let seeded: Vec<&ChatMessage> = snapshot
            .global_messages
            .iter()
            .filter(|m| mentions_me(m, Some(me)))
            .collect();
        assert_eq!(seeded.len(), 1);

        let mut own = seeded[0].clone();
        own.user_id = Some(me.id);
        assert!(!mentions_me(&own, Some(me)));

        let mut shouted = seeded[0].clone();
        shouted.content = format!("ping @{}", me.name.to_uppercase());
        assert!(mentions_me(&shouted, Some(me)));

        shouted.content = format!("ping {}", me.name);
        assert!(!mentions_me(&shouted, Some(me)));
        assert!(!mentions_me(seeded[0], None));
    }
}
