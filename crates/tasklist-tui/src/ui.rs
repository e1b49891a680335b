use crate::app::{App, Focus};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tasklist::controller::{AlertLevel, AuthField, AuthMode, View};
use tasklist::render::TaskItem;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(5),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    match app.view() {
        View::Auth => draw_auth(frame, app, chunks[1]),
        View::Tasks => draw_tasks(frame, app, chunks[1]),
    }
    draw_status_bar(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled(" tasklist", title)];
    if let Some(session) = app.controller.session() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            session.username().to_string(),
            Style::default().fg(Color::Green),
        ));
    }
    if app.controller.is_busy() {
        spans.push(Span::styled(
            "  working\u{2026}",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_auth(frame: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let (title, other) = match controller.auth_mode() {
        AuthMode::Login => (" Login ", "Don't have an account? Ctrl+S to sign up"),
        AuthMode::Signup => (" Sign Up ", "Already have an account? Ctrl+S to log in"),
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // username
            Constraint::Length(3), // password
            Constraint::Length(1), // hint
            Constraint::Min(0),
        ])
        .split(inner);

    let form = controller.auth_form();
    let masked = "\u{2022}".repeat(form.password.chars().count());
    draw_field(frame, rows[0], " Username ", &form.username, form.focus == AuthField::Username);
    draw_field(frame, rows[1], " Password ", &masked, form.focus == AuthField::Password);

    let hint = Paragraph::new(Line::from(vec![Span::styled(
        format!(" {other} \u{b7} Enter to submit"),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )]));
    frame.render_widget(hint, rows[2]);
}

fn draw_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let field = Paragraph::new(value.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title.to_string()),
    );
    frame.render_widget(field, area);
    if focused {
        let len = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(len);
        if x < area.x.saturating_add(area.width.saturating_sub(1)) {
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

fn draw_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let tasks = app.controller.tasks();
    let items: Vec<ListItem> = tasks.items().iter().map(task_line).collect();
    let list_focused = app.focus == Focus::List;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(list_focused))
        .title(format!(" Tasks ({}) ", tasks.len()));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if list_focused {
        state.select(tasks.selected_index());
    }
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let input_focused = app.focus == Focus::Input;
    let input = Paragraph::new(app.controller.draft())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(input_focused))
                .title(" New task (Enter to add, Tab for list) "),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(input, chunks[1]);
}

fn task_line(item: &TaskItem) -> ListItem<'_> {
    let text_style = if item.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    let mark = if item.completed { "[x] " } else { "[ ] " };
    ListItem::new(Line::from(vec![
        Span::styled(mark, Style::default().fg(Color::Cyan)),
        Span::styled(item.text.as_str(), text_style),
        Span::styled(
            format!("  <{}> <{}>", item.toggle_label(), item.delete_label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.controller.alert() {
        Some(alert) => {
            let color = match alert.level {
                AlertLevel::Info => Color::Green,
                AlertLevel::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(" {} ", alert.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::raw(match app.view() {
            View::Auth => " Tab: switch field | Ctrl+S: login/signup | Esc: quit",
            View::Tasks => {
                " Tab: focus | Space: toggle | d: delete | Ctrl+R: refresh | Ctrl+L: logout | Esc: quit"
            }
        })),
    };
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}
