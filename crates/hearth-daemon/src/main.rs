//! Hearth Daemon - Main entry point
//!
//! Serves the scene document store that the editor persists to.

mod api;
mod config;
mod server;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "hearth")]
#[command(about = "Scene document store for the Hearth kitchen editor")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "hearth.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Directory holding stored documents
    #[arg(short, long)]
    data: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Hearth v{}", env!("CARGO_PKG_VERSION"));

    if args.init_config {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // Command line overrides
    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }
    if let Some(data) = args.data {
        config.storage.path = data;
    }

    info!(
        bind = %config.daemon.bind,
        storage = %config.storage.path,
        "Configuration loaded"
    );

    // Create application state
    let state = state::AppState::new(config.clone())?;

    server::run(state, &config.daemon.bind).await?;

    Ok(())
}
