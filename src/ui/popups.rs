use chrono::{Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::backend::FollowListKind;
use crate::model::{NotificationKind, PostKind, Visibility};
use crate::state::{ComposeField, DashboardForm, TeamField, ToastLevel};
use crate::ui::bounties::status_color;
use crate::ui::theme::UiTheme;
use crate::ui::time_format::{format_deadline, format_timestamp, short_ago};

pub fn draw_centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn popup_block<'a>(title: impl Into<Line<'a>>, theme: &dyn UiTheme) -> Block<'a> {
    Block::default()
        .title(title.into())
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme.colors().primary))
}

fn field_line<'a>(label: &'a str, value: &str, active: bool, theme: &dyn UiTheme) -> Line<'a> {
    let label_style = if active { theme.title_style() } else { theme.muted_style() };
    Line::from(vec![
        Span::styled(format!("{}{:<12}", if active { "> " } else { "  " }, label), label_style),
        Span::raw(format!("{}{}", value, if active { "_" } else { "" })),
    ])
}

fn button<'a>(label: &'a str, active: bool, theme: &dyn UiTheme) -> Line<'a> {
    let style = if active { theme.selected_style() } else { Style::default().add_modifier(Modifier::BOLD) };
    Line::from(vec![Span::raw("  "), Span::styled(label, style)])
}

pub fn draw_post_detail_popup(f: &mut Frame, app: &App, theme: &dyn UiTheme) {
    let Some(detail) = &app.community.detail else { return };
    let area = draw_centered_rect(f.area(), 80, 80);
    f.render_widget(Clear, area);

    let post = app.snapshot().and_then(|s| s.posts.iter().find(|p| p.id == detail.post_id));
    let block = popup_block(Span::styled(" TRANSMISSION ", theme.title_style()), theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .constraints([Constraint::Percentage(40), Constraint::Min(3), Constraint::Length(3)])
        .split(inner);

    let now = Local::now();
    let mut body = Vec::new();
    match post {
        Some(post) => {
            body.push(Line::from(vec![
                Span::styled(post.user.as_str(), theme.title_style()),
                Span::styled(format!("  {}", format_timestamp(post.created_at, now)), theme.muted_style()),
            ]));
            body.push(Line::from(""));
            body.extend(post.content.lines().map(Line::from));
            if let Some(snippet) = &post.code_snippet {
                body.push(Line::from(""));
                body.extend(
                    snippet
                        .lines()
                        .map(|l| Line::from(Span::styled(format!("│ {}", l), Style::default().fg(theme.accents().info)))),
                );
            }
            if let Some(project) = &post.project {
                body.push(Line::from(""));
                body.push(Line::from(Span::styled(project.name.as_str(), Style::default().add_modifier(Modifier::BOLD))));
                body.push(Line::from(project.description.as_str()));
                body.push(Line::from(Span::styled(format!("Stack: {}", project.tech_stack.join(", ")), theme.muted_style())));
                body.push(Line::from(Span::styled(format!("Roles: {}", project.open_roles.join(", ")), theme.muted_style())));
            }
            body.push(Line::from(""));
            body.push(Line::from(Span::styled(format!("♥ {}  ✉ {}", post.likes, post.comments), theme.muted_style())));
        }
        None => body.push(Line::from(Span::styled("This post is no longer available.", theme.muted_style()))),
    }
    f.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), chunks[0]);

    let comments_block = Block::default().borders(Borders::TOP).title(" COMMENTS ");
    if detail.loading {
        f.render_widget(Paragraph::new("Loading comments...").style(theme.muted_style()).block(comments_block), chunks[1]);
    } else {
        let flat = detail.flattened();
        if flat.is_empty() {
            f.render_widget(Paragraph::new("No comments yet.").style(theme.muted_style()).block(comments_block), chunks[1]);
        } else {
            let items: Vec<ListItem> = flat
                .iter()
                .map(|(comment, is_reply)| {
                    let indent = if *is_reply { "    ↳ " } else { "" };
                    ListItem::new(Line::from(vec![
                        Span::raw(indent),
                        Span::styled(format!("{}: ", comment.author_name), theme.title_style()),
                        Span::raw(comment.content.as_str()),
                        Span::styled(format!("  {}", short_ago(comment.created_at, Utc::now())), theme.muted_style()),
                    ]))
                })
                .collect();
            let mut state = ListState::default().with_selected(Some(detail.selected_comment.min(flat.len() - 1)));
            f.render_stateful_widget(
                List::new(items).block(comments_block).highlight_style(theme.selected_style()),
                chunks[1],
                &mut state,
            );
        }
    }

    let reply_target = detail.reply_to.and_then(|id| detail.comments.iter().find(|c| c.id == id));
    let input_title = match reply_target {
        Some(c) => format!(" Reply to {} · [Esc] cancel ", c.author_name),
        None => " Comment · [Tab] reply to selected ".to_string(),
    };
    f.render_widget(
        Paragraph::new(format!("{}_", detail.input)).block(Block::default().borders(Borders::ALL).title(input_title)),
        chunks[2],
    );
}

pub fn draw_compose_popup(f: &mut Frame, app: &App, theme: &dyn UiTheme) {
    let Some(form) = &app.community.compose else { return };
    let area = draw_centered_rect(f.area(), 70, 70);
    f.render_widget(Clear, area);

    let kind_label = match form.kind {
        PostKind::Text => "◀ Text ▶",
        PostKind::Code => "◀ Code ▶",
        PostKind::Project => "◀ Project ▶",
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{}{:<12}", if form.field == ComposeField::Kind { "> " } else { "  " }, "Type"),
            if form.field == ComposeField::Kind { theme.title_style() } else { theme.muted_style() },
        ),
        Span::raw(kind_label),
    ])];
    for field in ComposeField::for_kind(form.kind) {
        let (label, value) = match field {
            ComposeField::Content => ("Message", form.content.as_str()),
            ComposeField::CodeLanguage => ("Language", form.code_language.as_str()),
            ComposeField::CodeSnippet => ("Snippet", form.code_snippet.as_str()),
            ComposeField::ProjectName => ("Project", form.project_name.as_str()),
            ComposeField::ProjectDescription => ("Description", form.project_description.as_str()),
            ComposeField::TechStack => ("Tech stack", form.tech_stack.as_str()),
            ComposeField::OpenRoles => ("Open roles", form.open_roles.as_str()),
            ComposeField::Kind | ComposeField::Submit => continue,
        };
        let active = form.field == *field;
        let mut value_lines = value.split('\n');
        lines.push(field_line(label, value_lines.next().unwrap_or_default(), active && !value.contains('\n'), theme));
        for extra in value_lines {
            lines.push(Line::from(format!("{:14}{}", "", extra)));
        }
    }
    lines.push(Line::from(""));
    lines.push(button("[ TRANSMIT ]", form.field == ComposeField::Submit, theme));
    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(theme.accents().error))));
    }
    let hint = format!(" {}/{} · [Tab] next · [Esc] cancel ", form.content.chars().count(), app.config.max_post_length);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(popup_block(Span::styled(" NEW POST ", theme.title_style()), theme).title_bottom(hint)),
        area,
    );
}

pub fn draw_dashboard_form_popup(f: &mut Frame, app: &App, theme: &dyn UiTheme) {
    let Some(form) = &app.dashboard.form else { return };
    let pending = app.dashboard.pending;
    match form {
        DashboardForm::CreateTeam(team) => {
            let area = draw_centered_rect(f.area(), 60, 60);
            f.render_widget(Clear, area);
            let visibility = match team.visibility {
                Visibility::Public => "◀ Public ▶",
                Visibility::Private => "◀ Private ▶",
            };
            let mut lines = vec![
                field_line("Name", &team.name, team.field == TeamField::Name, theme),
                field_line("Event", &team.event, team.field == TeamField::Event, theme),
                field_line("Type", &team.kind, team.field == TeamField::Kind, theme),
                Line::from(vec![
                    Span::styled(
                        format!("{}{:<12}", if team.field == TeamField::Visibility { "> " } else { "  " }, "Visibility"),
                        if team.field == TeamField::Visibility { theme.title_style() } else { theme.muted_style() },
                    ),
                    Span::raw(visibility),
                ]),
                field_line("Max members", &team.max_members, team.field == TeamField::MaxMembers, theme),
                Line::from(""),
                button(if pending { "[ CREATING... ]" } else { "[ CREATE SQUAD ]" }, team.field == TeamField::Submit, theme),
            ];
            if let Some(error) = &team.error {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(theme.accents().error))));
            }
            f.render_widget(
                Paragraph::new(lines).block(popup_block(Span::styled(" NEW SQUAD ", theme.title_style()), theme)),
                area,
            );
        }
        DashboardForm::JoinTeam(join) => {
            let area = draw_centered_rect(f.area(), 50, 30);
            f.render_widget(Clear, area);
            let mut lines = vec![
                Line::from(Span::styled("Enter the squad's join code", theme.muted_style())),
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}_", join.code),
                    Style::default().fg(theme.colors().primary).add_modifier(Modifier::BOLD),
                )),
            ];
            if pending {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Joining...", theme.muted_style())));
            }
            if let Some(error) = &join.error {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(theme.accents().error))));
            }
            f.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .block(popup_block(Span::styled(" JOIN SQUAD ", theme.title_style()), theme)),
                area,
            );
        }
    }
}

pub fn draw_bounty_detail_popup(f: &mut Frame, app: &App, theme: &dyn UiTheme) {
    let Some(id) = app.bounty.detail else { return };
    let Some(bounty) = app.snapshot().and_then(|s| s.bounties.iter().find(|b| b.id == id)) else { return };
    let area = draw_centered_rect(f.area(), 60, 50);
    f.render_widget(Clear, area);

    let claimer = bounty
        .claimed_by
        .and_then(|uid| app.data.profile(uid))
        .map(|u| u.name.as_str())
        .unwrap_or("nobody");
    let deadline = bounty
        .deadline
        .map(|d| format_deadline(d, Utc::now()))
        .unwrap_or_else(|| "none".to_string());
    let action = if app.bounty.claiming == Some(id) {
        "Claiming..."
    } else if bounty.status == crate::model::BountyStatus::Open {
        "[c] Claim · [Esc] Close"
    } else {
        "[Esc] Close"
    };

    let lines = vec![
        Line::from(Span::styled(bounty.title.as_str(), theme.title_style())),
        Line::from(""),
        Line::from(bounty.description.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Status     ", theme.muted_style()),
            Span::styled(bounty.status.label(), Style::default().fg(status_color(bounty.status, theme))),
        ]),
        Line::from(format!("Reward     {} XP", bounty.reward_xp)),
        Line::from(format!("Difficulty {}", bounty.difficulty)),
        Line::from(format!("Type       {}", bounty.kind)),
        Line::from(format!("Deadline   {}", deadline)),
        Line::from(format!("Claimed by {}", claimer)),
        Line::from(""),
        Line::from(Span::styled(action, theme.muted_style())),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(popup_block(Span::styled(" BOUNTY ", theme.title_style()), theme)),
        area,
    );
}

fn draw_confirm(f: &mut Frame, theme: &dyn UiTheme, title: &str, question: &str, yes_selected: Option<bool>) {
    let area = draw_centered_rect(f.area(), 40, 25);
    f.render_widget(Clear, area);
    let accents = theme.accents();
    let (yes_style, no_style) = match yes_selected {
        Some(true) => (
            Style::default().fg(theme.colors().selected_fg).bg(accents.success).add_modifier(Modifier::BOLD),
            Style::default().fg(accents.error),
        ),
        Some(false) => (
            Style::default().fg(accents.success),
            Style::default().fg(theme.colors().selected_fg).bg(accents.error).add_modifier(Modifier::BOLD),
        ),
        None => (Style::default().fg(accents.success), Style::default().fg(accents.error)),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(question.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![Span::styled("[ Yes ]", yes_style), Span::raw("  "), Span::styled("[ No ]", no_style)]),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(popup_block(title.to_string(), theme)),
        area,
    );
}

pub fn draw_logout_confirm_popup(f: &mut Frame, theme: &dyn UiTheme) {
    draw_confirm(f, theme, " Log out ", "Log out of HackMate? (y/n)", None);
}

pub fn draw_quit_confirm_popup(f: &mut Frame, app: &App, theme: &dyn UiTheme) {
    draw_confirm(f, theme, " Quit ", "Do you really want to quit?", Some(app.ui.quit_confirm_selected == 0));
}

pub fn draw_follow_list_popup(f: &mut Frame, app: &App, theme: &dyn UiTheme) {
    let Some(popup) = &app.ui.follow_list else { return };
    let area = draw_centered_rect(f.area(), 50, 60);
    f.render_widget(Clear, area);

    let owner = app.data.profile(popup.user_id).map(|u| u.name.as_str()).unwrap_or("operative");
    let title = match popup.kind {
        FollowListKind::Followers => format!(" {}'s followers ", owner),
        FollowListKind::Following => format!(" {} follows ", owner),
    };
    let block = popup_block(Span::styled(title, theme.title_style()), theme)
        .title_bottom(" [Enter/m] Message · [f] Follow · [Esc] Close ");

    if popup.loading || popup.users.is_empty() {
        let message = if popup.loading { "Loading..." } else { "Nobody here yet." };
        f.render_widget(Paragraph::new(message).style(theme.muted_style()).block(block), area);
        return;
    }

    let items: Vec<ListItem> = popup
        .users
        .iter()
        .map(|u| {
            let following = if app.data.is_following(u.id) { " ★" } else { "" };
            ListItem::new(Line::from(vec![
                Span::raw(u.name.as_str()),
                Span::styled(format!("  {}", u.role), theme.muted_style()),
                Span::styled(following, Style::default().fg(theme.accents().warning)),
            ]))
        })
        .collect();
    let mut state = ListState::default().with_selected(Some(popup.selected.min(popup.users.len() - 1)));
    f.render_stateful_widget(
        List::new(items).block(block).highlight_style(theme.selected_style()).highlight_symbol("> "),
        area,
        &mut state,
    );
}

pub fn draw_notifications_popup(f: &mut Frame, app: &App, theme: &dyn UiTheme) {
    let area = draw_centered_rect(f.area(), 60, 60);
    f.render_widget(Clear, area);
    let notifications = app.snapshot().map(|s| s.notifications.as_slice()).unwrap_or(&[]);
    let block = popup_block(
        Span::styled(format!(" ALERTS ({} unread) ", app.data.unread_notifications()), theme.title_style()),
        theme,
    )
    .title_bottom(" [Enter] Mark read · [a] Mark all · [Esc] Close ");

    if notifications.is_empty() {
        f.render_widget(Paragraph::new("All quiet.").style(theme.muted_style()).block(block), area);
        return;
    }

    let accents = theme.accents();
    let now = Utc::now();
    let items: Vec<ListItem> = notifications
        .iter()
        .map(|n| {
            let icon = match n.kind {
                NotificationKind::Info => "i",
                NotificationKind::Social => "@",
                NotificationKind::Team => "#",
                NotificationKind::Bounty => "$",
            };
            let title_style = if n.read {
                theme.muted_style()
            } else {
                Style::default().fg(accents.warning).add_modifier(Modifier::BOLD)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("[{}] ", icon), theme.muted_style()),
                    Span::styled(n.title.as_str(), title_style),
                    Span::styled(format!("  {}", short_ago(n.created_at, now)), theme.muted_style()),
                ]),
                Line::from(Span::styled(format!("    {}", n.body), theme.muted_style())),
            ])
        })
        .collect();
    let mut state = ListState::default().with_selected(Some(app.notifications.panel_selected.min(notifications.len() - 1)));
    f.render_stateful_widget(
        List::new(items).block(block).highlight_style(theme.selected_style()),
        area,
        &mut state,
    );
}

pub fn draw_toast(f: &mut Frame, app: &App, theme: &dyn UiTheme) {
    let Some(toast) = &app.notifications.current else { return };
    let size = f.area();
    let accents = theme.accents();
    let color = match toast.level {
        ToastLevel::Info => accents.info,
        ToastLevel::Success => accents.success,
        ToastLevel::Error => accents.error,
    };
    let suffix = if toast.close_tick.is_none() { "  [any key]" } else { "" };
    let text = format!("{}{}", toast.message, suffix);

    let wanted = u16::try_from(text.chars().count()).unwrap_or(u16::MAX).saturating_add(4);
    let width = wanted.max(24).min(size.width.saturating_sub(2));
    let height = 3u16.min(size.height);
    let x = size.x + size.width.saturating_sub(width + 1);
    let y = size.y + 1u16.min(size.height.saturating_sub(height));
    let area = Rect { x, y, width, height };

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(color)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}
