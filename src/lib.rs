//! Perchwatch - bird visitation tracking for camera traps.
//!
//! This crate turns per-frame bird detections into visitation records and
//! aggregates the resulting photo storage tree into daily reports.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod detect;
pub mod error;
pub mod imaging;
pub mod photo;
pub mod report;
pub mod tracking;

use clap::Parser;
use cli::{Cli, Command};
use config::{
    Config, config_file_path, load_default_config, save_default_config, validate_config,
};

pub use error::{Error, Result};

/// Main entry point for the perchwatch CLI.
///
/// # Errors
///
/// Returns an error when configuration loading or the selected command
/// fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.report.verbose, cli.report.quiet);

    // Load configuration
    let config = load_default_config()?;

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command);
    }

    // Default: aggregate the photo tree and print the report
    validate_config(&config)?;
    report::command::execute(&cli.report, &config)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // Build filter string based on verbosity level.
    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // Diagnostics go to stderr; stdout carries the report text.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  set storage.root to the photo tree perchwatch should scan");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
