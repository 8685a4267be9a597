use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, Editing};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // text to speak
            Constraint::Min(1),    // providers + stream progress
            Constraint::Length(1), // hints
        ])
        .split(area);

    let editing = app.editing == Editing::Speech;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title = if editing {
        " Text to speak (Enter/Esc to finish) "
    } else {
        " Text to speak — press e to edit "
    };
    let input = Paragraph::new(app.speech_input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, chunks[0]);

    let selection = app.orchestrator.state().selection();
    let tts = app.orchestrator.state().tts_providers();
    let stt = app.orchestrator.state().stt_providers();

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("TTS provider  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            selection.tts_provider.clone().unwrap_or_else(|| "default".to_string()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  (v to cycle, {} available)", tts.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("STT provider  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            selection.stt_provider.clone().unwrap_or_else(|| "default".to_string()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  (b to cycle, {} available)", stt.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));

    if app.speech_chunks > 0 || app.speech_bytes > 0 {
        lines.push(Line::from(vec![
            Span::styled("Synthesis     ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} chunk(s), {} bytes", app.speech_chunks, app.speech_bytes),
                Style::default().fg(Color::Green),
            ),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "No synthesis yet — Enter streams, s synthesizes in one call.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "l listens on the microphone; the transcript lands in the chat input.",
        Style::default().fg(Color::DarkGray),
    )));

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Speech "))
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(":Stream  "),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::raw(":Speak  "),
        Span::styled("l", Style::default().fg(Color::Yellow)),
        Span::raw(":Listen  "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(":Use last reply  "),
        Span::styled("v/b", Style::default().fg(Color::Yellow)),
        Span::raw(":Providers"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[2]);
}
