use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::Theme;
use crate::state::settings::PreferenceItem;
use crate::state::{ProfileField, SettingsTab};
use crate::ui::theme::UiTheme;

pub fn draw_settings(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let chunks = Layout::default()
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let titles: Vec<Line> = SettingsTab::ALL.iter().map(|t| Line::from(t.title())).collect();
    f.render_widget(
        Tabs::new(titles)
            .select(app.settings.tab.index())
            .highlight_style(theme.selected_style())
            .block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    match app.settings.tab {
        SettingsTab::Profile => draw_profile(f, app, theme, chunks[1]),
        SettingsTab::Preferences => draw_preferences(f, app, theme, chunks[1]),
        SettingsTab::Integrations => draw_integrations(f, app, theme, chunks[1]),
        SettingsTab::Account => draw_account(f, app, theme, chunks[1]),
    }
}

fn draw_profile(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let form = &app.settings.profile_form;
    let fields = [
        (ProfileField::Name, "Callsign", form.name.as_str()),
        (ProfileField::Role, "Role", form.role.as_str()),
        (ProfileField::Bio, "Bio", form.bio.as_str()),
        (ProfileField::Skills, "Skills", form.skills.as_str()),
        (ProfileField::Github, "GitHub", form.github.as_str()),
        (ProfileField::Linkedin, "LinkedIn", form.linkedin.as_str()),
        (ProfileField::Twitter, "Twitter", form.twitter.as_str()),
        (ProfileField::Website, "Website", form.website.as_str()),
    ];

    let focused = app.settings.profile_field;
    let mut lines: Vec<Line> = fields
        .iter()
        .map(|(field, label, value)| {
            let active = *field == focused;
            let label_style = if active { theme.title_style() } else { theme.muted_style() };
            let cursor = if active && !app.settings.saving { "_" } else { "" };
            Line::from(vec![
                Span::styled(format!("{}{:<10}", if active { "> " } else { "  " }, label), label_style),
                Span::raw(format!("{}{}", value, cursor)),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    let save_label = if app.settings.saving { "[ SAVING... ]" } else { "[ SAVE ]" };
    let save_style = if focused == ProfileField::Save {
        theme.selected_style()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(vec![Span::raw("  "), Span::styled(save_label, save_style)]));
    if let Some(error) = &app.settings.profile_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(theme.accents().error))));
    }

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" OPERATIVE PROFILE ", theme.title_style()))
                .title_bottom(" [↑↓] Field · [Enter] Next/Save · [Esc] Discard "),
        ),
        area,
    );
}

fn check(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

fn draw_preferences(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let prefs = app.data.user().map(|u| u.preferences).unwrap_or_default();
    let items: Vec<ListItem> = PreferenceItem::ALL
        .iter()
        .map(|item| {
            let (label, value) = match item {
                PreferenceItem::Theme => {
                    let dark = app.data.theme() == Theme::Dark;
                    ("Dark theme", check(dark))
                }
                PreferenceItem::EmailNotifications => ("Email notifications", check(prefs.email_notifications)),
                PreferenceItem::PublicProfile => ("Public profile", check(prefs.public_profile)),
                PreferenceItem::ShowOnlineStatus => ("Show online status", check(prefs.show_online_status)),
                PreferenceItem::PresenceSidebar => ("Presence sidebar (local)", check(app.ui.show_presence)),
                PreferenceItem::CompactFeed => ("Compact feed (local)", check(app.ui.compact)),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", value), Style::default().fg(theme.colors().primary)),
                Span::raw(label),
            ]))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.settings.pref_selected.min(PreferenceItem::ALL.len() - 1)));
    f.render_stateful_widget(
        List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" PREFERENCES ", theme.title_style()))
                    .title_bottom(" [Enter/Space] Toggle "),
            )
            .highlight_style(theme.selected_style())
            .highlight_symbol("> "),
        area,
        &mut state,
    );
}

fn draw_integrations(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let accents = theme.accents();
    let user = app.data.user();
    let connected = user.map(|u| u.github_connected).unwrap_or(false);

    let mut lines = vec![Line::from(Span::styled("GitHub", theme.title_style())), Line::from("")];
    if connected {
        let name = user.and_then(|u| u.github_username.as_deref()).unwrap_or("unknown");
        lines.push(Line::from(vec![
            Span::styled("● Connected as ", Style::default().fg(accents.success)),
            Span::styled(format!("@{}", name), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("[d] Disconnect", theme.muted_style())));
    } else if app.settings.editing_github {
        lines.push(Line::from(vec![
            Span::styled("Username: ", theme.muted_style()),
            Span::raw(format!("{}_", app.settings.github_input)),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("[Enter] Link · [Esc] Cancel", theme.muted_style())));
    } else {
        lines.push(Line::from(Span::styled("○ Not connected", theme.muted_style())));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[c] Connect with GitHub · [m] Enter a username manually",
            theme.muted_style(),
        )));
    }
    if let Some(error) = &app.settings.github_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(accents.error))));
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(Span::styled(" INTEGRATIONS ", theme.title_style()))),
        area,
    );
}

fn draw_account(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let Some(snapshot) = app.snapshot() else { return };
    let user = &snapshot.user;
    let colors = theme.colors();
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("[{}] ", user.avatar), theme.muted_style()),
            Span::styled(user.name.as_str(), Style::default().fg(colors.primary).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(format!("{} · {}", user.role, user.rank), theme.muted_style())),
        Line::from(""),
        Line::from(format!("Reputation   {} XP", user.reputation)),
        Line::from(format!("Followers    {}", snapshot.follower_count)),
        Line::from(format!("Following    {}", snapshot.following_count)),
        Line::from(format!("Squads       {}", snapshot.teams.len())),
        Line::from(""),
        Line::from(Span::styled("[l] Log out", Style::default().fg(theme.accents().error))),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(Span::styled(" ACCOUNT ", theme.title_style()))),
        area,
    );
}
