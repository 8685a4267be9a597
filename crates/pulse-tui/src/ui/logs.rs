use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use pulse_types::log::Severity;

use crate::app::App;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(1),    // log entries
            Constraint::Length(1), // footer
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " 📋 Session Log ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("({} entries, newest first)", app.log_entries.len())),
    ]));
    f.render_widget(header, chunks[0]);

    let visible_height = chunks[1].height as usize;
    let total = app.log_entries.len();

    let lines: Vec<Line> = if total == 0 {
        vec![Line::from(Span::styled(
            "  Nothing logged yet. Refresh or trigger something.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        // Entries come most-recent-first; scroll offset pages into history
        let start = app.logs_scroll.min(total.saturating_sub(1));
        let end = (start + visible_height).min(total);

        app.log_entries[start..end]
            .iter()
            .map(|entry| {
                let color = match entry.severity {
                    Severity::Info => Color::Blue,
                    Severity::Success => Color::Green,
                    Severity::Error => Color::Red,
                };
                Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", entry.time()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(entry.message.clone(), Style::default().fg(color)),
                ])
            })
            .collect()
    };

    let log_block = Paragraph::new(lines)
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: false });
    f.render_widget(log_block, chunks[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" ↑↓", Style::default().fg(Color::Yellow)),
        Span::raw(":Scroll  "),
        Span::styled("G", Style::default().fg(Color::Yellow)),
        Span::raw(":Newest  "),
        Span::styled("g", Style::default().fg(Color::Yellow)),
        Span::raw(":Oldest  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(":Back"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[2]);
}
