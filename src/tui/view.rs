use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{App, CreateScreen, DetailsScreen, ListScreen, Load, Screen};
use crate::form::Field;
use crate::model::{display_date, Task, TaskPriority, TaskStatus};

pub const COMPLETED_MARK: &str = "✓";

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    match &mut app.screen {
        Screen::List(s) => render_list(frame, s, chunks[0]),
        Screen::Details(s) => render_details(frame, s, chunks[0]),
        Screen::Create(s) => render_create(frame, s, chunks[0]),
    }
    render_hints(frame, app, chunks[1]);

    if app.show_help {
        render_help(frame);
    }
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Pending => Style::default().fg(Color::Yellow),
        TaskStatus::InProgress => Style::default().fg(Color::Cyan),
        TaskStatus::Completed => Style::default().fg(Color::Green),
    }
}

fn priority_style(priority: TaskPriority) -> Style {
    match priority {
        TaskPriority::Low => Style::default().fg(Color::DarkGray),
        TaskPriority::Medium => Style::default().fg(Color::Yellow),
        TaskPriority::High => Style::default().fg(Color::Red),
    }
}

fn loading(frame: &mut Frame, block: Block, area: Rect) {
    frame.render_widget(Paragraph::new("Loading...").block(block), area);
}

fn failed(frame: &mut Frame, block: Block, area: Rect, message: &str, retry: bool) {
    let mut lines = vec![Line::styled(
        format!("Error: {message}"),
        Style::default().fg(Color::Red),
    )];
    if retry {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("[r] ", Style::default().fg(Color::Cyan)),
            Span::raw("Retry"),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_list(frame: &mut Frame, screen: &mut ListScreen, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Tasks ");

    let tasks = match &screen.state {
        Load::Loading => return loading(frame, block, area),
        Load::Failed(message) => return failed(frame, block, area, message, true),
        Load::Loaded(tasks) => tasks,
    };

    if tasks.is_empty() {
        let lines = vec![
            Line::styled("No tasks yet", Style::default().bold()),
            Line::raw("Create your first task to get started"),
            Line::raw(""),
            Line::from(vec![
                Span::styled("[c] ", Style::default().fg(Color::Cyan)),
                Span::raw("Create Task"),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = tasks.iter().map(|task| ListItem::new(task_card(task))).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, area, &mut screen.list_state);
}

fn task_card(task: &Task) -> Vec<Line<'_>> {
    let mark = if task.is_done() {
        format!("{COMPLETED_MARK} ")
    } else {
        "  ".to_string()
    };

    let mut header = vec![
        Span::styled(mark, Style::default().fg(Color::Green)),
        Span::styled(task.title.as_str(), Style::default().bold()),
        Span::raw("  "),
        Span::styled(task.status.label(), status_style(task.status)),
        Span::raw(" · "),
        Span::styled(task.priority.as_str(), priority_style(task.priority)),
    ];
    if let Some(deadline) = &task.deadline {
        header.push(Span::styled(
            format!("  due {}", display_date(deadline)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(header)];
    if let Some(desc) = &task.description {
        lines.push(Line::styled(
            format!("  {desc}"),
            Style::default().fg(Color::Gray),
        ));
    }
    lines.push(Line::raw(""));
    lines
}

fn render_details(frame: &mut Frame, screen: &DetailsScreen, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Task ")
        .title_bottom(" Esc: back ");

    let task = match &screen.state {
        Load::Loading => return loading(frame, block, area),
        Load::Failed(message) => return failed(frame, block, area, message, false),
        Load::Loaded(None) => {
            frame.render_widget(Paragraph::new("Task not found").block(block), area);
            return;
        }
        Load::Loaded(Some(task)) => task,
    };

    let mut title = vec![Span::styled(task.title.as_str(), Style::default().bold())];
    if task.is_done() {
        title.push(Span::styled(
            format!(" {COMPLETED_MARK}"),
            Style::default().fg(Color::Green),
        ));
    }

    let mut lines = vec![Line::from(title), Line::raw("")];

    if let Some(desc) = &task.description {
        lines.push(Line::styled("Description", Style::default().underlined()));
        lines.push(Line::raw(desc.as_str()));
        lines.push(Line::raw(""));
    }

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));
    lines.push(Line::from(vec![
        label("Status:   "),
        Span::styled(task.status.label(), status_style(task.status)),
    ]));
    lines.push(Line::from(vec![
        label("Priority: "),
        Span::styled(task.priority.as_str(), priority_style(task.priority)),
    ]));
    if let Some(deadline) = &task.deadline {
        lines.push(Line::from(vec![
            label("Deadline: "),
            Span::raw(display_date(deadline)),
        ]));
    }
    if let Some(created) = &task.created_at {
        lines.push(Line::from(vec![
            label("Created:  "),
            Span::raw(display_date(created)),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_create(frame: &mut Frame, screen: &CreateScreen, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Create New Task ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = Vec::new();
    if screen.error.is_some() {
        constraints.push(Constraint::Length(2));
    }
    // label, input, error line
    constraints.extend(Field::ALL.map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Length(1)); // submit
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut idx = 0;

    if let Some(err) = &screen.error {
        frame.render_widget(
            Paragraph::new(err.as_str()).style(Style::default().fg(Color::White).bg(Color::Red)),
            chunks[idx],
        );
        idx += 1;
    }

    for field in Field::ALL {
        render_field(frame, screen, field, chunks[idx]);
        idx += 1;
    }

    let (text, style) = if screen.submitting {
        ("[ Creating... ]", Style::default().fg(Color::DarkGray))
    } else if screen.can_submit() {
        ("[ Create Task ]", Style::default().fg(Color::Black).bg(Color::Cyan))
    } else {
        ("[ Create Task ]", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(Paragraph::new(text).style(style), chunks[idx]);
}

fn render_field(frame: &mut Frame, screen: &CreateScreen, field: Field, area: Rect) {
    let focused = screen.focused == field;
    let error = screen.visible_error(field);

    let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default()
    };
    let value = screen.form.value(field);
    let input = if field.is_choice() {
        let shown = match field {
            Field::Status => TaskStatus::parse(value).map(|s| s.label()).unwrap_or(value),
            _ => value,
        };
        format!("< {shown} >")
    } else if focused {
        format!("{value}_")
    } else if value.is_empty() && field == Field::Deadline {
        "YYYY-MM-DD".to_string()
    } else {
        value.to_string()
    };
    let input_style = match (error.is_some(), focused) {
        (true, _) => Style::default().fg(Color::Red),
        (false, true) => Style::default().fg(Color::White),
        (false, false) => Style::default().fg(Color::Gray),
    };

    let mut lines = vec![
        Line::styled(field.label(), label_style),
        Line::styled(format!("  {input}"), input_style),
    ];
    if let Some(err) = error {
        lines.push(Line::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match &app.screen {
        Screen::List(_) => "j/k: move  Enter: open  c: Create Task  r: reload  ?: help  q: quit",
        Screen::Details(_) => "Esc/b: back  r: reload  ?: help  q: quit",
        Screen::Create(_) => {
            "Enter: submit  Tab/S-Tab: fields  ←/→/Space: choose  C-e: editor  C-u: clear  Esc: cancel"
        }
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_help(frame: &mut Frame) {
    let term = frame.area();
    let width = 50.min(term.width.saturating_sub(4));
    let height = 14.min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan));

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{k:<10}"), Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ])
    };
    let help_text = vec![
        key("j/Down", "Move down"),
        key("k/Up", "Move up"),
        key("Enter", "Open task / submit form"),
        key("c", "Create task"),
        key("r", "Reload / retry"),
        key("Esc/b", "Back to list"),
        key("Tab", "Next form field"),
        key("C-e", "Edit description in $EDITOR"),
        key("?", "Toggle help"),
        key("q", "Quit"),
        Line::raw(""),
        Line::styled("Press any key to close", Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}
