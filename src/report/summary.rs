//! Summary serialization and the daily text report.

use std::collections::HashMap;
use std::io::BufWriter;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

use super::VisitationSummary;

/// Write the summary list as a pretty-printed JSON array.
///
/// This file is the persisted contract with downstream consumers; it is
/// written even when the list is empty.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialized.
pub fn write_summary_json(path: &Path, summaries: &[VisitationSummary]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path).map_err(|e| Error::SummaryWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), summaries).map_err(|e| {
        Error::SummaryWrite {
            path: path.to_path_buf(),
            source: e.into(),
        }
    })?;

    info!(
        "Wrote {} visitation summaries to {}",
        summaries.len(),
        path.display()
    );
    Ok(())
}

/// One-line daily summary: visit total plus one clause per dominant
/// species, most frequent first.
pub fn daily_summary_text(summaries: &[VisitationSummary]) -> String {
    if summaries.is_empty() {
        return "No visitations today.".to_string();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for summary in summaries {
        let species = if summary.species.is_empty() {
            "an unidentified bird"
        } else {
            summary.species.as_str()
        };
        *counts.entry(species).or_insert(0) += 1;
    }

    let mut ordered: Vec<(&str, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let total = summaries.len();
    let mut text = format!("Today I was visited {total} time{}. ", plural(total));
    for (species, count) in ordered {
        text.push_str(&format!("{count} visit{} from {species}. ", plural(count)));
    }
    text.trim_end().to_string()
}

/// Human-readable block for one visitation.
pub fn format_visitation(summary: &VisitationSummary) -> String {
    let records: usize = summary
        .species_observations
        .iter()
        .map(|observation| observation.count)
        .sum();

    format!(
        "----------\n  Species: {}\n  Start: {}\n  Duration: {}s\n  Records: {}\n  Best photo: {}",
        if summary.species.is_empty() {
            "(unclassified)"
        } else {
            &summary.species
        },
        summary.start_datetime,
        summary.duration_seconds,
        records,
        summary.best_photo,
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
