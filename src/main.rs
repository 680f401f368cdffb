// ABOUTME: Entry point for the berth CLI application.
// ABOUTME: Parses arguments, loads configuration and dispatches to command handlers.

mod cli;
mod commands;

use berth::config::{self, Config};
use berth::error::Result;
use berth::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);

    if let Commands::Init { force } = cli.command {
        let cwd = env::current_dir()?;
        config::init_config(&cwd, force)?;
        output.success(&format!("Created {}", config::CONFIG_FILENAME));
        return Ok(());
    }

    let config = load_config(&cli)?;
    if !config.enabled {
        output.success("Provisioning is disabled (enabled: false), nothing to do");
        return Ok(());
    }
    config.validate()?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling in-flight runtime calls");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Network => commands::network(config, output, cancel).await,
        Commands::Collector => commands::collector(config, output, cancel).await,
        Commands::Up => commands::up(config, output, cancel).await,
        Commands::Status { names } => commands::status(config, names, output, cancel).await,
    }
}

/// Load from `--config` or discover in the current directory.
fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}
