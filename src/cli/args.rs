//! CLI argument definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::storage::DATE_FORMAT;

/// Visitation reports from camera-trap bird photos.
#[derive(Debug, Parser)]
#[command(name = "perchwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Common options for the report run.
    #[command(flatten)]
    pub report: ReportArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the report run.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Photo storage root to scan (overrides config).
    #[arg(short, long, env = "PERCHWATCH_DIR")]
    pub dir: Option<PathBuf>,

    /// Aggregate only photos from this calendar date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Path to the classifier labels file for scientific names
    /// (overrides config).
    #[arg(long, env = "PERCHWATCH_LABELS")]
    pub labels: Option<PathBuf>,

    /// Output path for the summary JSON (default: `<root>/visitations.json`).
    #[arg(short, long, env = "PERCHWATCH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Maximum gap in seconds between same-species records grouped without
    /// a visitation id.
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub gap_seconds: Option<i64>,

    /// Drop single-record visitations with low classification confidence.
    #[arg(long)]
    pub drop_poor: bool,

    /// Suppress the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Suppress informational output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse and validate a calendar date.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| format!("'{s}' is not a valid date (expected YYYY-MM-DD)"))
}
