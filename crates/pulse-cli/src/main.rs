use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pulse", version, about = "Pulse — console client for the Pulse realtime platform")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal UI
    Tui,
    /// Show current configuration
    Status,
    /// Ping the platform and print what it says
    Ping,
    /// One-shot chat completion printed to stdout
    Ask { message: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Tui) => pulse_tui::run().await,
        Some(Commands::Status) => {
            let cfg = pulse_core::config::load_config()?;
            println!("Pulse v{}", env!("CARGO_PKG_VERSION"));
            println!("Platform: {}", cfg.platform.base_url);
            println!("App: {} ({})", cfg.platform.app_name, cfg.platform.app_id);
            println!(
                "API key: {}",
                if cfg.platform.api_key.is_some() || std::env::var("PULSE_API_KEY").is_ok() {
                    "configured"
                } else {
                    "not set"
                }
            );
            println!("Activity limit: {}", cfg.client.activity_limit);
            println!("Config: {}", pulse_core::config::config_path().display());
            Ok(())
        }
        Some(Commands::Ping) => {
            let cfg = pulse_core::config::load_config()?;
            let orchestrator = pulse_core::Orchestrator::new(cfg);
            match orchestrator.query_ping().await {
                Ok(info) => {
                    println!("ok: {} ({})", info.app_id, info.mode);
                    if let Ok(dir) = orchestrator.app_data_dir().await {
                        println!("data dir: {dir}");
                    }
                    Ok(())
                }
                Err(e) => Err(anyhow::anyhow!("ping failed: {e}")),
            }
        }
        Some(Commands::Ask { message }) => {
            let cfg = pulse_core::config::load_config()?;
            let orchestrator = pulse_core::Orchestrator::new(cfg);
            let reply = orchestrator
                .chat(&message)
                .await
                .map_err(|e| anyhow::anyhow!("chat failed: {e}"))?;
            println!("{reply}");
            Ok(())
        }
    }
}
