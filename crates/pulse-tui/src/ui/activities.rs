use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, Editing};
use crate::ui::short_id;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // activity list
            Constraint::Length(3), // quick insert
            Constraint::Length(1), // hints
        ])
        .split(area);

    render_list(f, app, chunks[0]);
    render_insert(f, app, chunks[1]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::raw(":Select  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(":Trigger tab  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(":Refresh  "),
        Span::styled("R", Style::default().fg(Color::Yellow)),
        Span::raw(":Reload all  "),
        Span::styled("i", Style::default().fg(Color::Yellow)),
        Span::raw(":Insert  "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(":Complete  "),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(":Delete"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[2]);
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        format!("  {:<10} {:<14} {:<12} {}", "ID", "TYPE", "STATUS", "CREATED"),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
    ))];

    if app.activities.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No activities yet. Press i to insert one, r to refresh.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (i, activity) in app.activities.iter().enumerate() {
        let selected = i == app.activity_cursor;
        let marker = if selected { "▸ " } else { "  " };
        let status_color = match activity.status.as_str() {
            "completed" => Color::Green,
            "pending" => Color::Yellow,
            _ => Color::White,
        };
        let base = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<10}", short_id(&activity.id)), base.fg(Color::Cyan)),
            Span::styled(format!(" {:<14}", activity.display_type), base),
            Span::styled(format!(" {:<12}", activity.status), base.fg(status_color)),
            Span::styled(format!(" {}", activity.display_time), base.fg(Color::DarkGray)),
        ]));
    }

    let list = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Activities ({}) ", app.activities.len())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(list, area);
}

fn render_insert(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.editing == Editing::Payload;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title = if editing {
        " Quick insert — JSON payload (Enter to insert, Esc to cancel) "
    } else {
        " Quick insert — press i to edit "
    };
    let input = Paragraph::new(app.payload_input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}
