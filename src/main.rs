//! iron-list end-to-end CLI
//!
//! Runs list scenarios against a demo page through a WebDriver server.

use std::path::PathBuf;

use clap::Parser;
use ironlist_e2e::common::{logging, Config};
use ironlist_e2e::{cli, commands::Commands};

#[derive(Parser)]
#[command(name = "ironlist-e2e", about = "End-to-end tests for iron-list components")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a file in the data directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Held until exit so buffered file logs get flushed
    let log_guard = if cli.log_file {
        logging::init_with_file().map(|(path, guard)| {
            tracing::info!("Logging to {}", path.display());
            guard
        })
    } else {
        logging::init_cli();
        None
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let result = match config {
        Ok(config) => cli::dispatch(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        drop(log_guard);
        std::process::exit(1);
    }
}
