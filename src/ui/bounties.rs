use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};
use uuid::Uuid;

use crate::app::App;
use crate::model::{Bounty, BountyStatus};
use crate::services::bounties::{total_claimed_xp, BountyFilter};
use crate::ui::theme::UiTheme;
use crate::ui::time_format::format_deadline;

pub fn draw_bounties(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let chunks = Layout::default()
        .constraints([Constraint::Length(2), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let filters: Vec<Line> = BountyFilter::ALL.iter().map(|f| Line::from(f.label())).collect();
    let selected = BountyFilter::ALL.iter().position(|f| *f == app.bounty.filter).unwrap_or(0);
    f.render_widget(
        Tabs::new(filters)
            .select(selected)
            .highlight_style(theme.selected_style())
            .block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let claimed_xp = app
        .snapshot()
        .map(|s| total_claimed_xp(&s.bounties, s.user.id))
        .unwrap_or(0);
    let query = if app.bounty.query.is_empty() && !app.bounty.editing_query {
        Span::styled("[/] search bounties", theme.muted_style())
    } else {
        Span::raw(format!("{}{}", app.bounty.query, if app.bounty.editing_query { "_" } else { "" }))
    };
    let border = if app.bounty.editing_query {
        Style::default().fg(theme.border_color(app.ui.tick_count))
    } else {
        theme.muted_style()
    };
    f.render_widget(
        Paragraph::new(Line::from(query)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" SEARCH · {} XP on the line ", claimed_xp)),
        ),
        chunks[1],
    );

    let bounties = app.visible_bounties();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" BOUNTIES ({}) ", bounties.len()), theme.title_style()));
    if bounties.is_empty() {
        f.render_widget(
            Paragraph::new("No bounties match.").style(theme.muted_style()).block(block),
            chunks[2],
        );
        return;
    }

    let me = app.me();
    let now = Utc::now();
    let items: Vec<ListItem> = bounties
        .iter()
        .map(|b| bounty_item(b, me, app.bounty.claiming == Some(b.id), now, theme))
        .collect();
    let mut state = ListState::default().with_selected(Some(app.bounty.selected.min(bounties.len() - 1)));
    f.render_stateful_widget(
        List::new(items).block(block).highlight_style(theme.selected_style()).highlight_symbol("> "),
        chunks[2],
        &mut state,
    );
}

pub fn status_color(status: BountyStatus, theme: &dyn UiTheme) -> ratatui::style::Color {
    let accents = theme.accents();
    match status {
        BountyStatus::Open => accents.success,
        BountyStatus::Claimed | BountyStatus::InProgress => accents.warning,
        BountyStatus::Completed => theme.colors().muted,
    }
}

fn difficulty_color(difficulty: &str, theme: &dyn UiTheme) -> ratatui::style::Color {
    let accents = theme.accents();
    match difficulty.to_ascii_lowercase().as_str() {
        "easy" => accents.success,
        "medium" => accents.warning,
        "hard" | "expert" => accents.error,
        _ => theme.colors().muted,
    }
}

/// Two-line row shared by the bounty board and the comms bounty wire.
pub fn bounty_item<'a>(
    bounty: &'a Bounty,
    me: Option<Uuid>,
    claiming: bool,
    now: DateTime<Utc>,
    theme: &dyn UiTheme,
) -> ListItem<'a> {
    let accents = theme.accents();
    let status = if claiming {
        Span::styled("CLAIMING...", Style::default().fg(accents.info))
    } else {
        Span::styled(bounty.status.label(), Style::default().fg(status_color(bounty.status, theme)))
    };
    let mine = if me.is_some() && bounty.claimed_by == me {
        Span::styled(" [yours]", Style::default().fg(theme.colors().secondary))
    } else {
        Span::raw("")
    };
    let deadline = bounty
        .deadline
        .map(|d| format!(" · due {}", format_deadline(d, now)))
        .unwrap_or_default();

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(format!("{:>5} XP ", bounty.reward_xp), Style::default().fg(accents.warning).add_modifier(Modifier::BOLD)),
            Span::styled(bounty.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            status,
            mine,
        ]),
        Line::from(vec![
            Span::raw("         "),
            Span::styled(bounty.difficulty.as_str(), Style::default().fg(difficulty_color(&bounty.difficulty, theme))),
            Span::styled(format!(" · {}{}", bounty.kind, deadline), theme.muted_style()),
        ]),
    ])
}
