use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pitwatch: smoker and food-probe temperature watcher
///
/// Watches the smoker and two food probes and raises an alert when a
/// sensor's temperature moves too far, too fast, within its recent window.
#[derive(Parser, Debug)]
#[command(name = "pitwatch")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a thermometer CSV export through the detectors, with notifications
    #[command(alias = "r")]
    Replay {
        /// CSV file (defaults to general.csv_path from the config)
        file: Option<PathBuf>,

        /// Delay between rows in milliseconds (defaults to the config value)
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Forward empty cells as missing readings instead of dropping them
        #[arg(long)]
        keep_gaps: bool,
    },

    /// Read `channel,timestamp,value` lines from stdin
    #[command(alias = "l")]
    Listen,

    /// Run a CSV export offline and print the alerts it would raise
    #[command(alias = "c")]
    Check {
        /// CSV file to analyze
        file: PathBuf,

        /// Forward empty cells as missing readings instead of dropping them
        #[arg(long)]
        keep_gaps: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active window rules
    Rules {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
