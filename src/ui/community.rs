use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::model::{Post, PostKind};
use crate::services::feed::FeedFilter;
use crate::state::CommunityFocus;
use crate::ui::theme::UiTheme;
use crate::ui::time_format::format_timestamp;

pub fn draw_community(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let chunks = Layout::default()
        .constraints([Constraint::Length(2), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let filters: Vec<Line> = FeedFilter::ALL.iter().map(|f| Line::from(f.label())).collect();
    let selected = FeedFilter::ALL.iter().position(|f| *f == app.community.filter).unwrap_or(0);
    f.render_widget(
        Tabs::new(filters)
            .select(selected)
            .highlight_style(theme.selected_style())
            .block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let searching = app.community.focus == CommunityFocus::Search;
    let search_style = if searching {
        Style::default().fg(theme.border_color(app.ui.tick_count))
    } else {
        theme.muted_style()
    };
    let query = if app.community.query.is_empty() && !searching {
        Span::styled("[/] search posts, authors, #tags", theme.muted_style())
    } else {
        Span::raw(format!("{}{}", app.community.query, if searching { "_" } else { "" }))
    };
    f.render_widget(
        Paragraph::new(Line::from(query))
            .block(Block::default().borders(Borders::ALL).border_style(search_style).title(" SEARCH ")),
        chunks[1],
    );

    draw_feed(f, app, theme, chunks[2]);
}

fn draw_feed(f: &mut Frame, app: &App, theme: &dyn UiTheme, area: Rect) {
    let posts = app.visible_posts();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" TRANSMISSIONS ({}) ", posts.len()), theme.title_style()));

    if posts.is_empty() {
        let empty = if app.community.query.is_empty() {
            "Quiet in here. [c] to post something."
        } else {
            "No posts match your search."
        };
        f.render_widget(Paragraph::new(empty).style(theme.muted_style()).block(block), area);
        return;
    }

    let me = app.me();
    let now = Local::now();
    let items: Vec<ListItem> = posts
        .iter()
        .map(|post| ListItem::new(post_lines(post, Some(post.user_id) == me, app.ui.compact, now, theme)))
        .collect();

    let mut state = ListState::default().with_selected(Some(app.community.selected.min(posts.len() - 1)));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(theme.colors().selected_bg))
        .highlight_symbol("▶ ");
    f.render_stateful_widget(list, area, &mut state);
}

fn post_lines<'a>(post: &'a Post, mine: bool, compact: bool, now: chrono::DateTime<Local>, theme: &dyn UiTheme) -> Vec<Line<'a>> {
    let colors = theme.colors();
    let accents = theme.accents();
    let kind = match post.kind {
        PostKind::Text => Span::raw(""),
        PostKind::Code => Span::styled(" [CODE]", Style::default().fg(accents.info)),
        PostKind::Project => Span::styled(" [PROJECT]", Style::default().fg(accents.success)),
    };
    let author_style = if mine {
        Style::default().fg(colors.secondary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.primary).add_modifier(Modifier::BOLD)
    };
    let heart = if post.is_liked { "♥" } else { "♡" };

    let header = Line::from(vec![
        Span::styled(format!("[{}] ", post.avatar), theme.muted_style()),
        Span::styled(post.user.as_str(), author_style),
        kind,
        Span::styled(format!("  {}", format_timestamp(post.created_at, now)), theme.muted_style()),
    ]);
    let stats = Span::styled(
        format!("  {} {}  ✉ {}", heart, post.likes, post.comments),
        Style::default().fg(if post.is_liked { accents.error } else { colors.muted }),
    );

    if compact {
        let first = post.content.lines().next().unwrap_or_default();
        let mut line = header;
        line.spans.push(Span::raw("  "));
        line.spans.push(Span::raw(first));
        line.spans.push(stats);
        return vec![line];
    }

    let mut lines = vec![header];
    lines.extend(post.content.lines().map(|l| Line::from(format!("  {}", l))));
    if let Some(snippet) = &post.code_snippet {
        let language = post.code_language.as_deref().unwrap_or("code");
        lines.push(Line::from(Span::styled(format!("  ┌─ {}", language), theme.muted_style())));
        for code in snippet.lines().take(4) {
            lines.push(Line::from(vec![
                Span::styled("  │ ", theme.muted_style()),
                Span::styled(code, Style::default().fg(accents.info)),
            ]));
        }
    }
    if let Some(project) = &post.project {
        lines.push(Line::from(vec![
            Span::styled("  ◆ ", Style::default().fg(accents.success)),
            Span::styled(project.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", project.tech_stack.join(" · ")), theme.muted_style()),
        ]));
        if !project.open_roles.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    Looking for: {}", project.open_roles.join(", ")),
                Style::default().fg(accents.warning),
            )));
        }
    }
    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(Line::from(Span::styled(format!("  {}", tags.join(" ")), Style::default().fg(colors.secondary))));
    }
    lines.push(Line::from(stats));
    lines.push(Line::from(""));
    lines
}
