pub mod app;
pub mod event;
pub mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use pulse_core::{config, Orchestrator};

use app::App;
use event::EventHandler;

/// Run the TUI. Call this from main or from the CLI `pulse tui` subcommand.
pub async fn run() -> Result<()> {
    let cfg = config::load_config().context("Failed to load config")?;

    let orchestrator = Arc::new(Orchestrator::new(cfg));
    info!("Orchestrator initialized");

    // Subscribe before the initial load so nothing is missed
    let event_handler = EventHandler::new(orchestrator.subscribe_events());

    // Initial load: the startup set plus the provider catalogs
    orchestrator.initial_load().await;
    orchestrator.refresh_providers().await;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Arc::clone(&orchestrator));

    let result = run_loop(&mut terminal, &mut app, &event_handler).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;
        event_handler.handle(app).await?;
        if app.should_quit {
            return Ok(());
        }
    }
}
