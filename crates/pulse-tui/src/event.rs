use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::broadcast;
use tracing::warn;

use pulse_types::event::SessionEvent;

use crate::app::{App, Editing, Screen};

pub struct EventHandler {
    rx: tokio::sync::Mutex<broadcast::Receiver<SessionEvent>>,
}

impl EventHandler {
    pub fn new(rx: broadcast::Receiver<SessionEvent>) -> Self {
        Self {
            rx: tokio::sync::Mutex::new(rx),
        }
    }

    /// Poll for terminal input events and session events.
    /// This is called once per frame from the main loop.
    pub async fn handle(&self, app: &mut App) -> Result<()> {
        // Drain all available session events (non-blocking)
        {
            let mut rx = self.rx.lock().await;
            loop {
                match rx.try_recv() {
                    Ok(event) => app.handle_session_event(event),
                    Err(broadcast::error::TryRecvError::Empty) => break,
                    Err(broadcast::error::TryRecvError::Lagged(n)) => {
                        warn!("Event bus lagged by {n} events");
                    }
                    Err(broadcast::error::TryRecvError::Closed) => break,
                }
            }
        }

        // Poll for terminal input with a short timeout so we keep draining
        // session events while a stream is running
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events — ignore release/repeat
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key).await?;
                }
            }
        }

        Ok(())
    }
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    if app.show_help {
        // Any key dismisses help
        app.show_help = false;
        return Ok(());
    }

    if key.code == KeyCode::Char('?') && app.editing == Editing::None && app.screen != Screen::Chat
    {
        app.show_help = true;
        return Ok(());
    }

    // A focused text field captures everything else
    if app.editing != Editing::None {
        return handle_editing_key(app, key).await;
    }

    // Screen cycling
    match key.code {
        KeyCode::Tab => {
            app.screen = app.screen.next();
            return Ok(());
        }
        KeyCode::BackTab => {
            app.screen = app.screen.prev();
            return Ok(());
        }
        _ => {}
    }

    match app.screen {
        Screen::Activities => handle_activities_key(app, key).await,
        Screen::Trigger => handle_trigger_key(app, key).await,
        Screen::Chat => handle_chat_key(app, key).await,
        Screen::Voice => handle_voice_key(app, key).await,
        Screen::Vectors => handle_vectors_key(app, key).await,
        Screen::Logs => handle_logs_key(app, key).await,
    }
}

async fn handle_activities_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.activity_cursor = app.activity_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if !app.activities.is_empty() {
                app.activity_cursor = (app.activity_cursor + 1).min(app.activities.len() - 1);
            }
        }
        KeyCode::Char('r') => app.refresh_activities().await,
        KeyCode::Char('R') => app.refresh_everything().await,
        KeyCode::Char('i') => app.editing = Editing::Payload,
        KeyCode::Char('c') => app.mark_selected_completed().await,
        KeyCode::Char('d') => app.delete_selected().await,
        KeyCode::Enter => {
            // Carry the selection over to the trigger screen
            app.screen = Screen::Trigger;
        }
        _ => {}
    }
    Ok(())
}

async fn handle_trigger_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('a') => app.cycle_agent(),
        KeyCode::Char('w') => app.cycle_workspace().await,
        KeyCode::Char('t') => app.cycle_thread(),
        KeyCode::Char('m') => app.auto_run = !app.auto_run,
        KeyCode::Char('p') => app.editing = Editing::Prompt,
        KeyCode::Char('k') => app.editing = Editing::TaskId,
        KeyCode::Enter => app.trigger_selected().await,
        KeyCode::Char('s') => app.start_sim_task().await,
        KeyCode::Char('o') => app.complete_sim_task().await,
        KeyCode::Char('x') => app.fail_sim_task().await,
        KeyCode::Char('u') => app.query_sim_task().await,
        KeyCode::Esc => app.screen = Screen::Activities,
        _ => {}
    }
    Ok(())
}

async fn handle_chat_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_chat();
        }
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cycle_chat_model();
        }
        KeyCode::Enter => app.send_chat(),
        KeyCode::Char(c) => app.chat_input.push(c),
        KeyCode::Backspace => {
            app.chat_input.pop();
        }
        KeyCode::Up => {
            app.chat_scroll = app.chat_scroll.saturating_add(1);
        }
        KeyCode::Down => {
            app.chat_scroll = app.chat_scroll.saturating_sub(1);
        }
        KeyCode::Esc => {
            if app.chat_input.is_empty() {
                app.screen = Screen::Activities;
            } else {
                app.chat_input.clear();
            }
        }
        _ => {}
    }
    Ok(())
}

async fn handle_voice_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('e') => app.editing = Editing::Speech,
        KeyCode::Enter => app.speak_streaming(),
        KeyCode::Char('s') => app.speak_once().await,
        KeyCode::Char('l') => app.listen_mic().await,
        KeyCode::Char('c') => app.use_last_reply_for_speech(),
        KeyCode::Char('v') => app.cycle_tts_provider(),
        KeyCode::Char('b') => app.cycle_stt_provider(),
        KeyCode::Esc => app.screen = Screen::Activities,
        _ => {}
    }
    Ok(())
}

async fn handle_vectors_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('i') => app.editing = Editing::Ingest,
        KeyCode::Char('/') => app.editing = Editing::Query,
        KeyCode::Enter => app.search_now().await,
        KeyCode::Char('e') => app.embed_query().await,
        KeyCode::Char('m') => app.cycle_embed_model(),
        KeyCode::Char('x') => app.clear_vectors_now().await,
        KeyCode::Char('r') => {
            app.orchestrator.refresh_vector_workspaces().await;
            app.sync_from_state();
        }
        KeyCode::Esc => app.screen = Screen::Activities,
        _ => {}
    }
    Ok(())
}

async fn handle_logs_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.logs_scroll = app.logs_scroll.saturating_add(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.logs_scroll = app.logs_scroll.saturating_sub(1);
        }
        KeyCode::Char('G') => {
            app.logs_scroll = 0; // jump to newest
        }
        KeyCode::Char('g') => {
            app.logs_scroll = app.log_entries.len().saturating_sub(1);
        }
        KeyCode::Esc => app.screen = Screen::Activities,
        _ => {}
    }
    Ok(())
}

async fn handle_editing_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // The ingest block is multi-line: Enter inserts a newline and Ctrl+S
    // submits. Every other field submits (or just closes) on Enter.
    match key.code {
        KeyCode::Enter if app.editing == Editing::Ingest => {
            app.ingest_input.push('\n');
            return Ok(());
        }
        KeyCode::Char('s')
            if key.modifiers.contains(KeyModifiers::CONTROL) && app.editing == Editing::Ingest =>
        {
            app.editing = Editing::None;
            app.ingest_now().await;
            return Ok(());
        }
        KeyCode::Enter => {
            let field = app.editing;
            app.editing = Editing::None;
            match field {
                Editing::Payload => app.insert_activity().await,
                Editing::Query => app.search_now().await,
                _ => {}
            }
            return Ok(());
        }
        KeyCode::Esc => {
            app.editing = Editing::None;
            return Ok(());
        }
        _ => {}
    }

    let buffer = match app.editing {
        Editing::Payload => &mut app.payload_input,
        Editing::Prompt => &mut app.prompt_input,
        Editing::TaskId => &mut app.task_id_input,
        Editing::Speech => &mut app.speech_input,
        Editing::Ingest => &mut app.ingest_input,
        Editing::Query => &mut app.query_input,
        Editing::None => return Ok(()),
    };

    match key.code {
        KeyCode::Char(c) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
    Ok(())
}
