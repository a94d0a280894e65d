//! Squads screen: team cards with progress, and the cross-squad operations board.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::model::Visibility;
use crate::state::DashboardFocus;
use crate::ui::theme::{named_color, priority_color, UiTheme};

pub fn draw_dashboard(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    draw_teams(f, app, theme, columns[0]);
    draw_board(f, app, theme, columns[1]);
}

fn panel_block<'a>(title: String, focused: bool, app: &App, theme: &dyn UiTheme) -> Block<'a> {
    let border = if focused {
        Style::default().fg(theme.border_color(app.ui.tick_count))
    } else {
        theme.muted_style()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Double } else { BorderType::Plain })
        .border_style(border)
        .title(Span::styled(title, theme.title_style()))
}

fn draw_teams(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let focused = app.dashboard.focus == DashboardFocus::Teams;
    let teams = app.snapshot().map(|s| s.teams.as_slice()).unwrap_or(&[]);
    let block = panel_block(format!(" MY SQUADS ({}) ", teams.len()), focused, app, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if teams.is_empty() {
        f.render_widget(
            Paragraph::new("No squads yet. [c] create one or [J] join with a code.").style(theme.muted_style()),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner);

    let colors = theme.colors();
    let items: Vec<ListItem> = teams
        .iter()
        .map(|team| {
            let accent = named_color(&team.color, colors.primary);
            let lock = match team.visibility {
                Visibility::Public => "",
                Visibility::Private => " [private]",
            };
            let full = if team.is_full() { " FULL" } else { "" };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled("▌", Style::default().fg(accent)),
                    Span::styled(team.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(lock, theme.muted_style()),
                    Span::styled(full, Style::default().fg(theme.accents().warning)),
                ]),
                Line::from(Span::styled(
                    format!(
                        "  {} · {} · {}/{} members · {} open tasks",
                        team.event,
                        team.kind,
                        team.current_members.len(),
                        team.max_members,
                        team.tasks.iter().filter(|t| !crate::services::tasks::is_done(&t.status)).count()
                    ),
                    theme.muted_style(),
                )),
            ])
        })
        .collect();
    let selected = app.dashboard.team_selected.min(teams.len() - 1);
    let mut state = ListState::default().with_selected(Some(selected));
    let list = List::new(items)
        .highlight_style(if focused { theme.selected_style() } else { Style::default().add_modifier(Modifier::BOLD) })
        .highlight_symbol("> ");
    f.render_stateful_widget(list, rows[0], &mut state);

    let team = &teams[selected];
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::TOP).title(format!(" {} progress ", team.name)))
        .gauge_style(Style::default().fg(named_color(&team.color, colors.primary)))
        .percent(u16::from(team.progress.min(100)));
    f.render_widget(gauge, rows[1]);
}

fn draw_board(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let focused = app.dashboard.focus == DashboardFocus::Board;
    let tasks = app.board_tasks();
    let title = if app.dashboard.board_query.is_empty() && !app.dashboard.editing_query {
        format!(" OPS BOARD ({}) ", tasks.len())
    } else {
        let cursor = if app.dashboard.editing_query { "_" } else { "" };
        format!(" OPS BOARD ({}) filter: {}{} ", tasks.len(), app.dashboard.board_query, cursor)
    };
    let block = panel_block(title, focused, app, theme);

    if tasks.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new("Nothing pending.").style(theme.muted_style()), inner);
        return;
    }

    let colors = theme.colors();
    let accents = theme.accents();
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<7}", task.priority.to_uppercase()),
                    Style::default().fg(priority_color(&task.priority, &accents)).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::raw(task.title.clone()),
                Span::styled(format!("  [{}]", task.status), theme.muted_style()),
                Span::styled(
                    format!("  {}", task.team_name),
                    Style::default().fg(named_color(&task.team_color, colors.primary)),
                ),
            ]))
        })
        .collect();
    let mut state = ListState::default().with_selected(Some(app.dashboard.board_selected.min(tasks.len() - 1)));
    let list = List::new(items)
        .block(block)
        .highlight_style(if focused { theme.selected_style() } else { Style::default() })
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}
