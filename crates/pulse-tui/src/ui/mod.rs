mod activities;
mod chat;
mod help;
mod logs;
mod trigger;
mod vectors;
mod voice;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use pulse_types::log::Severity;

use crate::app::{App, Screen};

/// Main render function — tab bar, active screen, status footer.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Min(1),    // screen body
            Constraint::Length(1), // status footer
        ])
        .split(f.area());

    render_tabs(f, app, chunks[0]);

    match app.screen {
        Screen::Activities => activities::render(f, app, chunks[1]),
        Screen::Trigger => trigger::render(f, app, chunks[1]),
        Screen::Chat => chat::render(f, app, chunks[1]),
        Screen::Voice => voice::render(f, app, chunks[1]),
        Screen::Vectors => vectors::render(f, app, chunks[1]),
        Screen::Logs => logs::render(f, app, chunks[1]),
    }

    render_status(f, app, chunks[2]);

    // Help overlay on top of everything
    if app.show_help {
        help::render(f);
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " ⚡ Pulse ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for screen in Screen::ALL {
        let style = if screen == app.screen {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", screen.label()), style));
    }
    if let Some(ping) = &app.ping {
        spans.push(Span::styled(
            format!("  {} ({})", ping.app_id, ping.mode),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let color = match app.status_severity {
        Severity::Info => Color::Blue,
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
    };

    let task = &app.task;
    let task_summary = match &task.tracked {
        Some(id) => format!("task {} · {}", short_id(id), task.local_status),
        None => format!("task · {}", task.local_status),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.status_line), Style::default().fg(color)),
        Span::raw("  "),
        Span::styled(task_summary, Style::default().fg(Color::DarkGray)),
        Span::styled("  Tab:Switch  ?:Help  Ctrl+C:Quit", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// First eight characters of an id, for compact display.
pub(crate) fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
