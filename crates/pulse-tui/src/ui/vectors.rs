use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, Editing};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // ingest block
            Constraint::Length(3), // query
            Constraint::Min(1),    // hits
            Constraint::Length(1), // hints
        ])
        .split(area);

    render_ingest(f, app, chunks[0]);
    render_query(f, app, chunks[1]);
    render_hits(f, app, chunks[2]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("i", Style::default().fg(Color::Yellow)),
        Span::raw(":Ingest (Ctrl+S stores)  "),
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(":Query  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(":Search  "),
        Span::styled("e", Style::default().fg(Color::Yellow)),
        Span::raw(":Embed  "),
        Span::styled("m", Style::default().fg(Color::Yellow)),
        Span::raw(":Model  "),
        Span::styled("x", Style::default().fg(Color::Yellow)),
        Span::raw(":Clear store  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(":Refresh workspaces"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[3]);
}

fn render_ingest(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.editing == Editing::Ingest;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title = if editing {
        " Ingest — one text per line (Ctrl+S to store, Esc to cancel) "
    } else {
        " Ingest — press i to edit "
    };
    let input = Paragraph::new(app.ingest_input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(input, area);
}

fn render_query(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.editing == Editing::Query;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(app.query_input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Semantic search "));
    f.render_widget(input, area);
}

fn render_hits(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if app.search_hits.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No results yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for hit in &app.search_hits {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>5.3} ", hit.score), Style::default().fg(Color::Green)),
            Span::styled(hit.id.clone(), Style::default().fg(Color::Cyan)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("        {}", hit.metadata),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = format!(
        " Results ({}) · workspaces: {} ",
        app.search_hits.len(),
        if app.vector_workspaces.is_empty() {
            "—".to_string()
        } else {
            app.vector_workspaces.join(", ")
        }
    );
    let hits = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(hits, area);
}
