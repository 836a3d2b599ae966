//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sleep log reports.
///
/// Reads an exported sleep log and splits it into wake-to-wake logical days
/// with day/night sleep and awake time.
#[derive(Debug, Parser)]
#[command(name = "sleeplog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Sleep log export to read (`-` for stdin). Overrides `log_path`.
    #[arg(short, long, global = true)]
    pub log: Option<PathBuf>,

    /// Evaluate as of this time instead of the local clock
    /// (e.g., 2024-01-03T23:00:00 or '2 hours ago').
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List logical days, oldest first.
    Days {
        /// Only show the most recent N days.
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the logical day in progress.
    Today {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Average sleep over recent completed days.
    Summary {
        /// Number of completed days to average.
        #[arg(long, default_value_t = 7)]
        days: usize,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Report rows that need correcting in the sheet.
    Check,
}
