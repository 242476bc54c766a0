//! Visitation grouping and summary construction.
//!
//! Turns the day's photo records into visitation summaries: boxed records
//! are sorted by timestamp and split into contiguous groups, each group gets
//! its best photo, species breakdown, and matching full frame, and the
//! result is sorted newest-first.

use std::path::Path;

use chrono::Duration;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::debug;

use crate::config::AggregationConfig;
use crate::photo::PhotoType;

use super::PhotoRecord;
use super::species::{SpeciesObservation, create_species_observations, find_species};

/// Offline reconstruction of one visitation plus its aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitationSummary {
    /// Visitation id; empty for legacy data with no recoverable id.
    pub visitation_id: String,
    /// Timestamp of the first record.
    pub start_datetime: chrono::NaiveDateTime,
    /// Timestamp of the last record.
    pub end_datetime: chrono::NaiveDateTime,
    /// Whole seconds between first and last record; 0 for a single record.
    pub duration_seconds: i64,
    /// Most frequent species, kept for older consumers of the summary file.
    pub species: String,
    /// Per-species aggregates, most observed first.
    pub species_observations: Vec<SpeciesObservation>,
    /// Number of distinct species observed.
    pub species_count: usize,
    /// Path of the highest-scoring boxed photo.
    pub best_photo: String,
    /// Path of the matching full-frame photo; empty if none was found.
    pub full_image: String,
}

/// Split records into boxed and full-frame sets.
pub fn split_records(records: Vec<PhotoRecord>) -> (Vec<PhotoRecord>, Vec<PhotoRecord>) {
    records
        .into_iter()
        .partition(|record| record.kind == PhotoType::Boxed)
}

/// Sort boxed records by timestamp and split them into visitation groups.
///
/// Contiguous records with visitation ids group by id equality. Records
/// without ids (legacy filenames) group by the time-gap heuristic: same
/// species and at most `gap_seconds` apart. A boundary between an id-bearing
/// and an id-less record always splits.
pub fn group_boxed_records(
    mut records: Vec<PhotoRecord>,
    gap_seconds: i64,
) -> Vec<Vec<PhotoRecord>> {
    records.sort_by_key(|record| record.timestamp);
    let gap = Duration::try_seconds(gap_seconds).unwrap_or(Duration::MAX);

    let mut groups: Vec<Vec<PhotoRecord>> = Vec::new();
    for record in records {
        if let Some(group) = groups.last_mut()
            && let Some(previous) = group.last()
            && same_visitation(previous, &record, gap)
        {
            group.push(record);
        } else {
            groups.push(vec![record]);
        }
    }
    groups
}

fn same_visitation(previous: &PhotoRecord, next: &PhotoRecord, gap: Duration) -> bool {
    match (
        previous.visitation_id.is_empty(),
        next.visitation_id.is_empty(),
    ) {
        (false, false) => previous.visitation_id == next.visitation_id,
        (true, true) => {
            previous.species == next.species && next.timestamp - previous.timestamp <= gap
        }
        _ => false,
    }
}

/// Highest-scoring record by classification + detection + clarity.
///
/// Full frames never win; ties resolve to the earliest record.
pub fn find_best_photo(records: &[PhotoRecord]) -> Option<&PhotoRecord> {
    let mut best: Option<(&PhotoRecord, f64)> = None;
    for record in records {
        if record.kind == PhotoType::Full {
            continue;
        }
        let score = record.total_score();
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((record, score)),
        }
    }
    best.map(|(record, _)| record)
}

/// Whether a group is a "poor" visitation: a single record classified below
/// the configured score.
pub fn is_poor(group: &[PhotoRecord], poor_score_max: u8) -> bool {
    group.len() == 1 && group[0].classification_score < poor_score_max
}

/// Build the summary for one visitation group.
///
/// Returns `None` for an empty group.
pub fn build_summary(
    group: &[PhotoRecord],
    full_records: &[PhotoRecord],
    labels: Option<&Path>,
) -> Option<VisitationSummary> {
    let first = group.first()?;
    let last = group.last()?;

    let visitation_id = first.visitation_id.clone();
    let species_observations = create_species_observations(group, labels);
    let best_photo = find_best_photo(group)
        .map(|record| record.path.to_string_lossy().into_owned())
        .unwrap_or_default();
    let full_image = associate_full_image(&visitation_id, full_records);

    Some(VisitationSummary {
        visitation_id,
        start_datetime: first.timestamp,
        end_datetime: last.timestamp,
        duration_seconds: (last.timestamp - first.timestamp).num_seconds(),
        species: find_species(group),
        species_count: species_observations.len(),
        species_observations,
        best_photo,
        full_image,
    })
}

/// Full frame belonging to a visitation: an exact id match first, then a
/// path containing the id. Legacy groups without ids get none.
fn associate_full_image(visitation_id: &str, full_records: &[PhotoRecord]) -> String {
    if visitation_id.is_empty() {
        return String::new();
    }
    if let Some(record) = full_records
        .iter()
        .find(|record| record.visitation_id == visitation_id)
    {
        return record.path.to_string_lossy().into_owned();
    }
    full_records
        .iter()
        .find(|record| record.path.to_string_lossy().contains(visitation_id))
        .map(|record| record.path.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Aggregate a day's records into summaries, newest first.
pub fn summarize(
    records: Vec<PhotoRecord>,
    labels: Option<&Path>,
    config: &AggregationConfig,
) -> Vec<VisitationSummary> {
    let (boxed_records, full_records) = split_records(records);
    let groups = group_boxed_records(boxed_records, config.legacy_gap_seconds);
    summarize_groups(&groups, &full_records, labels, config, None)
}

/// Summarize pre-grouped records, newest first.
///
/// `progress` ticks once per group, dropped groups included, and carries
/// each kept summary's dominant species as its message.
pub fn summarize_groups(
    groups: &[Vec<PhotoRecord>],
    full_records: &[PhotoRecord],
    labels: Option<&Path>,
    config: &AggregationConfig,
    progress: Option<&ProgressBar>,
) -> Vec<VisitationSummary> {
    let mut summaries = Vec::with_capacity(groups.len());
    for group in groups {
        if config.drop_poor && is_poor(group, config.poor_score_max) {
            debug!(
                "Dropping poor visitation with single record {}",
                group[0].path.display()
            );
        } else if let Some(summary) = build_summary(group, full_records, labels) {
            if let Some(pb) = progress {
                pb.set_message(summary.species.clone());
            }
            summaries.push(summary);
        }
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    summaries.sort_by(|a, b| b.start_datetime.cmp(&a.start_datetime));
    summaries
}
