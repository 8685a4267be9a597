use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use pulse_types::chat::Role;

use crate::app::App;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // messages
            Constraint::Length(3), // input
        ])
        .split(area);

    render_messages(f, app, chunks[0]);
    render_input(f, app, chunks[1]);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for msg in &app.transcript {
        let (prefix, style) = match msg.role {
            Role::User => ("You", Style::default().fg(Color::Cyan)),
            Role::Assistant => ("Assistant", Style::default().fg(Color::Green)),
            Role::System => ("System", Style::default().fg(Color::Yellow)),
        };

        lines.push(Line::from(Span::styled(
            format!("─── {prefix} ───"),
            style.add_modifier(Modifier::BOLD),
        )));
        for text_line in msg.content.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
        lines.push(Line::from(""));
    }

    // Streaming tail (if active)
    if app.is_streaming && !app.streaming_text.is_empty() {
        lines.push(Line::from(Span::styled(
            "─── Assistant ───",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        for text_line in app.streaming_text.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
        lines.push(Line::from(Span::styled("▊", Style::default().fg(Color::Green))));
    } else if app.is_streaming {
        lines.push(Line::from(Span::styled(
            "⏳ Thinking…",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let total_lines = lines.len();
    let visible = area.height as usize;

    // Scroll offset 0 = bottom (most recent)
    let max_scroll = total_lines.saturating_sub(visible);
    let scroll_pos = max_scroll.saturating_sub(app.chat_scroll.min(max_scroll));

    let messages = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Chat "))
        .wrap(Wrap { trim: false })
        .scroll((scroll_pos as u16, 0));
    f.render_widget(messages, area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let model = app
        .orchestrator
        .state()
        .selection()
        .chat_model
        .map(|k| k.to_string())
        .unwrap_or_else(|| "default model".to_string());
    let input = Paragraph::new(app.chat_input.as_str()).block(
        Block::default().borders(Borders::ALL).title(format!(
            " Message · {model} (Enter sends, Ctrl+P model, Ctrl+L clears) "
        )),
    );
    f.render_widget(input, area);
}
