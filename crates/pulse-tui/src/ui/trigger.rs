use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, Editing};
use crate::ui::short_id;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_config(f, app, columns[0]);
    render_task_panel(f, app, columns[1]);
}

fn render_config(f: &mut Frame, app: &App, area: Rect) {
    let selection = app.orchestrator.state().selection();

    let mut lines: Vec<Line> = Vec::new();

    match app.selected_activity() {
        Some(activity) => {
            lines.push(Line::from(vec![
                Span::styled("Activity  ", Style::default().fg(Color::DarkGray)),
                Span::styled(short_id(&activity.id), Style::default().fg(Color::Cyan)),
                Span::raw(format!("  {} · {}", activity.display_type, activity.status)),
            ]));
            lines.push(Line::from(Span::styled(
                format!("  {}", activity.raw_data),
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "No activity selected — pick one on the Activities tab",
            Style::default().fg(Color::Red),
        ))),
    }
    lines.push(Line::from(""));

    let mode_label = if app.auto_run {
        Span::styled("auto — execute immediately", Style::default().fg(Color::Green))
    } else {
        Span::styled("manual — create review record", Style::default().fg(Color::Yellow))
    };
    lines.push(Line::from(vec![
        Span::styled("Mode      ", Style::default().fg(Color::DarkGray)),
        mode_label,
        Span::styled("  (m to toggle)", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));

    lines.push(selector_line("Agent", selection.agent.as_deref()));
    lines.push(selector_line("Workspace", selection.workspace.as_deref()));
    lines.push(selector_line("Thread", selection.thread.as_deref()));
    lines.push(Line::from(Span::styled(
        "  a/w/t cycle the selections; threads follow the workspace",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    let prompt_style = if app.editing == Editing::Prompt {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    lines.push(Line::from(vec![
        Span::styled("Prompt    ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.prompt_input.clone(), prompt_style),
        Span::styled("  (p to edit)", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: TRIGGER AGENT NOW",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));

    let block = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Trigger Configuration "))
        .wrap(Wrap { trim: false });
    f.render_widget(block, area);
}

fn selector_line(label: &str, value: Option<&str>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(Color::DarkGray)),
        match value {
            Some(v) => Span::styled(v.to_string(), Style::default().fg(Color::Cyan)),
            None => Span::styled("— none —", Style::default().fg(Color::Red)),
        },
    ])
}

fn render_task_panel(f: &mut Frame, app: &App, area: Rect) {
    let task = &app.task;
    let mut lines: Vec<Line> = Vec::new();

    let status_color = match task.local_status {
        pulse_types::task::LocalTaskStatus::Idle => Color::DarkGray,
        pulse_types::task::LocalTaskStatus::Processing => Color::Yellow,
        pulse_types::task::LocalTaskStatus::Completed => Color::Green,
        pulse_types::task::LocalTaskStatus::Failed => Color::Red,
    };
    lines.push(Line::from(vec![
        Span::styled("Reported  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            task.local_status.to_string(),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Tracked   ", Style::default().fg(Color::DarkGray)),
        Span::raw(task.tracked.clone().unwrap_or_else(|| "—".to_string())),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Last uuid ", Style::default().fg(Color::DarkGray)),
        Span::raw(task.last_triggered.clone().unwrap_or_else(|| "—".to_string())),
    ]));

    let id_style = if app.editing == Editing::TaskId {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    lines.push(Line::from(vec![
        Span::styled("Task id   ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            if app.task_id_input.is_empty() {
                "(uses tracked / last uuid)".to_string()
            } else {
                app.task_id_input.clone()
            },
            id_style,
        ),
        Span::styled("  (k to edit)", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));

    // Platform-observed status, fetched on demand; allowed to diverge from
    // the reported status above.
    match &app.remote_task {
        Some(snapshot) => {
            lines.push(Line::from(vec![
                Span::styled("Remote    ", Style::default().fg(Color::DarkGray)),
                Span::styled(snapshot.status.to_string(), Style::default().fg(Color::Cyan)),
                Span::raw(format!(
                    "  {}",
                    snapshot.source.clone().unwrap_or_default()
                )),
            ]));
            if let Some(created) = &snapshot.created_at {
                lines.push(Line::from(Span::styled(
                    format!("          created {created}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Remote    press u to query the platform",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "s:Start  o:Complete  x:Fail  u:Query",
        Style::default().fg(Color::Yellow),
    )));

    let block = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Task Lifecycle "))
        .wrap(Wrap { trim: false });
    f.render_widget(block, area);
}
