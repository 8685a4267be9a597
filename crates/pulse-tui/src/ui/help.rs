use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub fn render(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());

    let lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Tab / Shift+Tab   switch screen"),
        Line::from("  Ctrl+C            quit"),
        Line::from(""),
        Line::from("  Activities   ↑↓ select · r refresh · R reload all"),
        Line::from("               i insert JSON · c complete · d delete"),
        Line::from("  Trigger      a/w/t cycle selections · m mode · p prompt"),
        Line::from("               Enter trigger · s/o/x/u task lifecycle"),
        Line::from("  Chat         type + Enter · Ctrl+P model · Ctrl+L clear"),
        Line::from("  Voice        e edit text · Enter stream · s speak · l listen"),
        Line::from("               c speak the last chat reply · v/b providers"),
        Line::from("  Vectors      i ingest · / query · Enter search · e embed"),
        Line::from("               m embedding model · x clear store"),
        Line::from("  Logs         ↑↓ scroll · G newest · g oldest"),
        Line::from(""),
        Line::from(Span::styled(
            "  Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
