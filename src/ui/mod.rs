//! Main UI module. Re-exports submodules and provides the main entry point.

pub mod bounties;
pub mod comms;
pub mod community;
pub mod dashboard;
pub mod popups;
pub mod settings;
pub mod theme;
pub mod time_format;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::state::AppMode;
use crate::ui::theme::{theme_for, UiTheme};

const PRESENCE_WIDTH: u16 = 26;

pub fn ui(f: &mut Frame, app: &App) {
    let theme = theme_for(app.data.theme());
    let size = f.area();
    let chunks = Layout::default()
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(size);

    draw_header(f, app, theme, chunks[0]);
    draw_footer(f, app, theme, chunks[2]);

    let mut main_area = chunks[1];
    if !app.data.loaded {
        f.render_widget(
            Paragraph::new("Connecting to HackMate...")
                .alignment(Alignment::Center)
                .style(theme.muted_style()),
            main_area,
        );
        return;
    }

    if app.ui.show_presence && size.width >= app.config.min_two_column_width {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(PRESENCE_WIDTH)])
            .split(main_area);
        main_area = split[0];
        draw_presence(f, app, theme, split[1]);
    }

    match app.ui.mode {
        AppMode::Dashboard => dashboard::draw_dashboard(f, app, theme, main_area),
        AppMode::Community => community::draw_community(f, app, theme, main_area),
        AppMode::Comms => comms::draw_comms(f, app, theme, main_area),
        AppMode::Bounties => bounties::draw_bounties(f, app, theme, main_area),
        AppMode::Settings => settings::draw_settings(f, app, theme, main_area),
    }

    if app.community.detail.is_some() && app.ui.mode == AppMode::Community {
        popups::draw_post_detail_popup(f, app, theme);
    }
    if app.community.compose.is_some() && app.ui.mode == AppMode::Community {
        popups::draw_compose_popup(f, app, theme);
    }
    if app.dashboard.form.is_some() && app.ui.mode == AppMode::Dashboard {
        popups::draw_dashboard_form_popup(f, app, theme);
    }
    if app.bounty.detail.is_some() && app.ui.mode == AppMode::Bounties {
        popups::draw_bounty_detail_popup(f, app, theme);
    }
    if app.settings.confirm_logout && app.ui.mode == AppMode::Settings {
        popups::draw_logout_confirm_popup(f, theme);
    }
    if app.ui.follow_list.is_some() {
        popups::draw_follow_list_popup(f, app, theme);
    }
    if app.ui.show_notifications {
        popups::draw_notifications_popup(f, app, theme);
    }
    if app.notifications.current.is_some() {
        popups::draw_toast(f, app, theme);
    }
    if app.ui.show_quit_confirm {
        popups::draw_quit_confirm_popup(f, app, theme);
    }
}

fn draw_header(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let colors = theme.colors();
    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(area);

    let titles: Vec<Line> = AppMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let mut label = format!("{} {}", i + 1, mode.title());
            if *mode == AppMode::Comms {
                let unread = app.data.unread_direct_messages();
                if unread > 0 {
                    label.push_str(&format!(" ({})", unread));
                }
            }
            Line::from(label)
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.ui.mode.index())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title(Span::styled(" HACKMATE ", theme.title_style()))
                .border_style(Style::default().fg(theme.border_color(app.ui.tick_count))),
        )
        .style(Style::default().fg(colors.text))
        .highlight_style(theme.selected_style());
    f.render_widget(tabs, split[0]);

    let unread = app.data.unread_notifications();
    let bell = if unread > 0 {
        Span::styled(format!("[n] {} new ", unread), Style::default().fg(theme.accents().warning).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("[n] no alerts ", theme.muted_style())
    };
    let rep = app
        .data
        .user()
        .map(|u| Span::styled(format!("{} XP ", u.reputation), Style::default().fg(colors.primary)))
        .unwrap_or_else(|| Span::raw(""));
    f.render_widget(
        Paragraph::new(Line::from(vec![rep, bell]))
            .alignment(Alignment::Right)
            .block(Block::default().borders(Borders::BOTTOM)),
        split[1],
    );
}

fn draw_footer(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let help_text = match app.ui.mode {
        AppMode::Dashboard => "[Tab] Focus | [c] New squad | [J] Join | [/] Filter board | [Enter] Join code",
        AppMode::Community => "[c] Post | [Enter] Open | [l] Like | [m] Message | [o] Follow | [v/V] Lists | [f] Filter | [/] Search",
        AppMode::Comms => "[Tab] Channel | [Enter] Send/Open | [Esc] Back | Operatives: type to search, [Ctrl+F] Follow",
        AppMode::Bounties => "[↑↓] Nav | [Enter] Details | [c] Claim | [f] Filter | [/] Search",
        AppMode::Settings => "[Tab] Section | [↑↓] Field | [Enter] Save/Toggle | [Esc] Discard",
    };
    let status_text = match app.data.user() {
        Some(user) => format!("{} · {} · {}", user.name, user.role, user.rank),
        None => "Not signed in".to_string(),
    };

    let footer_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(67), Constraint::Percentage(33)])
        .split(area);

    f.render_widget(
        Paragraph::new(format!("{}\n[F1-F5] Screens | [n] Alerts | [p] Presence | [t] Theme | [Ctrl+C] Quit", help_text))
            .wrap(Wrap { trim: true })
            .style(theme.muted_style())
            .block(Block::default().borders(Borders::TOP)),
        footer_chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(status_text, Style::default().fg(theme.accents().warning)))
            .alignment(Alignment::Right)
            .block(Block::default().borders(Borders::TOP)),
        footer_chunks[1],
    );
}

fn draw_presence(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let Some(snapshot) = app.snapshot() else { return };
    let accents = theme.accents();
    let mut profiles: Vec<_> = snapshot.all_profiles.iter().filter(|u| u.id != snapshot.user.id).collect();
    // Online first, then by name
    profiles.sort_by_key(|u| (!app.data.is_online(u.id), u.name.to_lowercase()));

    let items: Vec<ListItem> = profiles
        .into_iter()
        .map(|u| {
            let online = app.data.is_online(u.id);
            let dot = if online {
                Span::styled("● ", Style::default().fg(accents.success))
            } else {
                Span::styled("○ ", theme.muted_style())
            };
            let following = if app.data.is_following(u.id) { " ★" } else { "" };
            ListItem::new(Line::from(vec![dot, Span::raw(u.name.clone()), Span::styled(following, Style::default().fg(accents.warning))]))
        })
        .collect();

    let title = format!(" ONLINE {} ", snapshot.global_online_users.len());
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(Span::styled(title, theme.title_style()))),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::loaded_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[tokio::test]
    async fn every_screen_renders() {
        let (mut app, _rx) = loaded_app().await;
        for mode in AppMode::ALL {
            app.set_mode(mode);
            let screen = render(&app, 140, 40);
            assert!(screen.contains("HACKMATE"), "{:?} header missing", mode);
        }
    }

    #[tokio::test]
    async fn narrow_terminal_hides_presence_and_popups_render() {
        let (mut app, _rx) = loaded_app().await;
        assert!(render(&app, 140, 40).contains("ONLINE"));
        assert!(!render(&app, 80, 30).contains("ONLINE"));

        app.ui.show_notifications = true;
        app.ui.show_quit_confirm = true;
        let screen = render(&app, 80, 30);
        assert!(screen.contains("Quit"));
    }

    #[tokio::test]
    async fn tiny_terminal_does_not_panic() {
        let (mut app, _rx) = loaded_app().await;
        for mode in AppMode::ALL {
            app.set_mode(mode);
            render(&app, 20, 8);
        }
    }
}
