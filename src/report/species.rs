//! Per-species statistics and scientific-name enrichment.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::constants::aggregation::UNKNOWN_SCIENTIFIC_NAME;

use super::{PhotoRecord, find_best_photo};

/// Binomial name in parentheses at the end of a labels line, e.g.
/// `1 american-robin (Turdus migratorius)`.
static SCIENTIFIC_NAME: LazyLock<Regex> = LazyLock::new(|| {
    // Pattern is hardcoded and known to be valid
    #[allow(clippy::expect_used)]
    Regex::new(r"\(([A-Z][a-z]+ [a-z]+)\)").expect("valid scientific name pattern")
});

/// Aggregate statistics for one species within one visitation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesStats {
    /// Number of records of this species.
    pub count: usize,
    /// Earliest record timestamp.
    pub first_seen: NaiveDateTime,
    /// Latest record timestamp.
    pub last_seen: NaiveDateTime,
    /// Mean classification confidence scaled to `[0,1]`, rounded to two
    /// decimals.
    pub avg_confidence: f64,
}

/// One species' aggregate within a visitation summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesObservation {
    /// Common species name.
    pub common_name: String,
    /// Scientific (binomial) name, `"Unknown"` when not resolvable.
    pub scientific_name: String,
    /// Number of records of this species.
    pub count: usize,
    /// Earliest record timestamp.
    pub first_seen: NaiveDateTime,
    /// Latest record timestamp.
    pub last_seen: NaiveDateTime,
    /// Mean classification confidence scaled to `[0,1]`.
    pub avg_confidence: f64,
    /// Paths of this species' photos in timestamp order.
    pub photos: Vec<String>,
    /// Path of the highest-scoring photo of this species.
    pub best_photo: String,
}

/// Most frequent species among the records; empty for no records.
///
/// Ties resolve to the species seen first.
pub fn find_species(records: &[PhotoRecord]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.species.as_str()).or_insert(0) += 1;
    }

    let mut best = "";
    let mut best_count = 0;
    for record in records {
        let count = counts[record.species.as_str()];
        if count > best_count {
            best = &record.species;
            best_count = count;
        }
    }
    best.to_string()
}

/// Per-species statistics over the records.
pub fn find_all_species(records: &[PhotoRecord]) -> HashMap<String, SpeciesStats> {
    let mut grouped: HashMap<&str, Vec<&PhotoRecord>> = HashMap::new();
    for record in records {
        grouped.entry(record.species.as_str()).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(species, members)| {
            let stats = SpeciesStats {
                count: members.len(),
                first_seen: min_timestamp(&members),
                last_seen: max_timestamp(&members),
                avg_confidence: average_confidence(&members),
            };
            (species.to_string(), stats)
        })
        .collect()
}

/// Build the sorted species observation list for one visitation's records.
///
/// Observations sort by descending count, then ascending first-seen, so the
/// most observed species comes first and the output is deterministic.
pub fn create_species_observations(
    records: &[PhotoRecord],
    labels: Option<&Path>,
) -> Vec<SpeciesObservation> {
    let stats = find_all_species(records);

    let mut observations: Vec<SpeciesObservation> = stats
        .into_iter()
        .map(|(species, stats)| {
            let members: Vec<PhotoRecord> = records
                .iter()
                .filter(|r| r.species == species)
                .cloned()
                .collect();
            let best_photo = find_best_photo(&members)
                .map(|r| r.path.to_string_lossy().into_owned())
                .unwrap_or_default();
            let photos = members
                .iter()
                .map(|r| r.path.to_string_lossy().into_owned())
                .collect();

            SpeciesObservation {
                scientific_name: get_scientific_name(&species, labels),
                common_name: species,
                count: stats.count,
                first_seen: stats.first_seen,
                last_seen: stats.last_seen,
                avg_confidence: stats.avg_confidence,
                photos,
                best_photo,
            }
        })
        .collect();

    observations.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });
    observations
}

/// Resolve a common name to its scientific name through the labels file.
///
/// The labels file carries one `<index> <common-name> (<Genus species>)`
/// line per class. The query is lowercased and hyphenated before the
/// substring search. A missing or unreadable file, or no matching line,
/// resolves to `"Unknown"` rather than an error.
pub fn get_scientific_name(common_name: &str, labels: Option<&Path>) -> String {
    let Some(path) = labels else {
        return UNKNOWN_SCIENTIFIC_NAME.to_string();
    };

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!("Could not read labels file {}: {e}", path.display());
            return UNKNOWN_SCIENTIFIC_NAME.to_string();
        }
    };

    let needle = common_name.trim().to_lowercase().replace(' ', "-");
    if needle.is_empty() {
        return UNKNOWN_SCIENTIFIC_NAME.to_string();
    }

    for line in contents.lines() {
        if line.to_lowercase().contains(&needle)
            && let Some(captures) = SCIENTIFIC_NAME.captures(line)
        {
            return captures[1].to_string();
        }
    }

    UNKNOWN_SCIENTIFIC_NAME.to_string()
}

fn min_timestamp(members: &[&PhotoRecord]) -> NaiveDateTime {
    members
        .iter()
        .map(|r| r.timestamp)
        .min()
        .unwrap_or_default()
}

fn max_timestamp(members: &[&PhotoRecord]) -> NaiveDateTime {
    members
        .iter()
        .map(|r| r.timestamp)
        .max()
        .unwrap_or_default()
}

#[allow(clippy::cast_precision_loss)]
fn average_confidence(members: &[&PhotoRecord]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let total: f64 = members
        .iter()
        .map(|r| f64::from(r.classification_score))
        .sum();
    let mean = total / members.len() as f64 / 100.0;
    (mean * 100.0).round() / 100.0
}
