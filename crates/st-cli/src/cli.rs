//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Daily screen-time accounting.
///
/// Replays the session activity transition log into per-day active-time
/// totals and keeps them persisted while watching.
#[derive(Debug, Parser)]
#[command(name = "st", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Poll the transition log on an interval and keep totals persisted.
    Watch,

    /// Print today's active time once.
    Today {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a table of recent daily totals.
    Report {
        /// Number of trailing days to include.
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
