//! CLI command definitions
//!
//! Defines the clap commands for the iron-list end-to-end CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios against a live page through a WebDriver server
    Run {
        /// Built-in scenario to run (repeatable; default: all built-ins
        /// unless --file is given)
        #[arg(long = "scenario", short = 's')]
        scenarios: Vec<String>,

        /// YAML scenario file to run (repeatable)
        #[arg(long = "file", short = 'f')]
        files: Vec<PathBuf>,

        /// WebDriver server URL (overrides config)
        #[arg(long)]
        webdriver: Option<String>,

        /// Root URL of the demo application (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        /// Run the browser headless
        #[arg(long)]
        headless: bool,

        /// Wait timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },

    /// List the built-in scenarios
    List,

    /// Parse a YAML scenario file and print its steps without running it
    Check {
        /// Path to the YAML test scenario file
        path: PathBuf,
    },
}
