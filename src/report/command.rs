//! Report command execution.

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cli::ReportArgs;
use crate::config::{AggregationConfig, Config};
use crate::constants::storage::SUMMARY_FILENAME;
use crate::error::{Error, Result};

use super::{
    daily_summary_text, format_visitation, group_boxed_records, scan_photos, split_records,
    summarize_groups, write_summary_json,
};

/// Execute the report command.
///
/// # Errors
///
/// Returns an error if the storage root is missing or unreadable, or the
/// summary file cannot be written.
pub fn execute(args: &ReportArgs, config: &Config) -> Result<()> {
    let root = args
        .dir
        .clone()
        .or_else(|| config.storage.root.clone())
        .ok_or_else(|| Error::ConfigValidation {
            message: "no storage root (use --dir or set storage.root in config)".to_string(),
        })?;
    if !root.is_dir() {
        return Err(Error::StorageRootNotFound { path: root });
    }

    let labels = args
        .labels
        .clone()
        .or_else(|| config.storage.labels.clone());
    // Command-line overrides win over the config file.
    let aggregation = AggregationConfig {
        drop_poor: args.drop_poor || config.aggregation.drop_poor,
        poor_score_max: config.aggregation.poor_score_max,
        legacy_gap_seconds: args
            .gap_seconds
            .unwrap_or(config.aggregation.legacy_gap_seconds),
    };

    info!("Scanning photo storage {}", root.display());
    let now = Local::now().naive_local();
    let records = scan_photos(&root, args.date, now)?;
    let (boxed_records, full_records) = split_records(records);
    info!(
        "Parsed {} boxed and {} full photo records",
        boxed_records.len(),
        full_records.len()
    );

    let groups = group_boxed_records(boxed_records, aggregation.legacy_gap_seconds);

    // Progress bar over visitation groups
    #[allow(clippy::cast_possible_truncation)]
    let pb = if args.no_progress || args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(groups.len() as u64);
        // Template is hardcoded and known to be valid
        #[allow(clippy::expect_used)]
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} visitations ({msg})")
                .expect("valid progress template")
                .progress_chars("#>-"),
        );
        pb
    };

    let summaries = summarize_groups(
        &groups,
        &full_records,
        labels.as_deref(),
        &aggregation,
        Some(&pb),
    );
    pb.finish_with_message("done");

    let output = args
        .output
        .clone()
        .or_else(|| config.storage.summary_path.clone())
        .unwrap_or_else(|| root.join(SUMMARY_FILENAME));
    write_summary_json(&output, &summaries)?;

    // The textual report is the command's stdout contract.
    println!("{} visitations", summaries.len());
    for summary in &summaries {
        println!("{}", format_visitation(summary));
    }
    println!();
    println!("{}", daily_summary_text(&summaries));

    Ok(())
}
