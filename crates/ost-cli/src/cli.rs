//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ORB-SLAM status log evaluator.
///
/// Interprets tracker status logs into typed event timelines and tracking
/// metrics for reporting and rendering.
#[derive(Debug, Parser)]
#[command(name = "ost", version, about, long_about = None)]
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
    /// Evaluate a single status log.
    Evaluate {
        /// Path to the status log.
        log: PathBuf,

        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Include the list of tracking spans.
        #[arg(long)]
        spans: bool,
    },

    /// Emit the timeline segments and markers for a log as JSON.
    Timeline {
        /// Path to the status log.
        log: PathBuf,
    },

    /// Evaluate every run below a directory.
    Batch {
        /// Directory containing one subdirectory per run.
        runs_dir: PathBuf,

        /// Write the aggregate summary JSON to this file.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Status log file name to look for in each run directory.
        #[arg(long)]
        log_name: Option<String>,

        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}
