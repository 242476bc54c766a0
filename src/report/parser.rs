//! Photo record reconstruction.
//!
//! Rebuilds a [`PhotoRecord`] from whatever persisted form a photo file
//! carries: a JSON metadata sidecar when one exists, otherwise the legacy
//! underscore-delimited filename encoding. Parsing is best-effort and never
//! fails; a name nothing matches still yields a record of defaults so one
//! odd file cannot abort an aggregation run.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::constants::legacy;
use crate::constants::storage::{DATE_FORMAT, FULL_SUFFIX, HIGH_RES_SUFFIX};
use crate::photo::{self, PhotoMetadata, PhotoType};

use super::PhotoRecord;

/// Reconstruct a photo record from a file path.
///
/// Looks for a metadata sidecar first; without one, decodes the legacy
/// filename format. `now` is the timestamp fallback for names that carry no
/// parseable datetime.
pub fn parse_photo(path: &Path, now: NaiveDateTime) -> PhotoRecord {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let base = stem.strip_suffix(HIGH_RES_SUFFIX).unwrap_or(stem);

    if let Some(sidecar) = photo::find_sidecar(path) {
        match photo::load_metadata(&sidecar) {
            Ok(meta) => return record_from_sidecar(path, &meta, now),
            Err(e) => {
                warn!("Ignoring unreadable sidecar for {}: {e}", path.display());
            }
        }
    }

    let record = PhotoRecord::new(path.to_path_buf(), kind_from_name(base), now);
    parse_legacy_name(base, record, now)
}

/// Photo kind implied by the filename alone.
///
/// Full frames carry either the legacy `full_` prefix or the `_full` stem
/// suffix; everything else is a boxed crop.
fn kind_from_name(base: &str) -> PhotoType {
    let legacy_full = base
        .strip_prefix(legacy::FULL_FRAGMENT)
        .is_some_and(|rest| rest.starts_with('_'));
    if legacy_full || base.ends_with(FULL_SUFFIX) || base == legacy::FULL_FRAGMENT {
        PhotoType::Full
    } else {
        PhotoType::Boxed
    }
}

fn record_from_sidecar(path: &Path, meta: &PhotoMetadata, now: NaiveDateTime) -> PhotoRecord {
    let mut record = PhotoRecord::new(path.to_path_buf(), meta.photo_type, now);
    record.visitation_id = meta.visitation_id.clone();
    record.timestamp = meta.datetime;
    record.detection_score = score_to_percent(meta.detection.score);

    if let Some(classification) = meta.classifications.first() {
        record.species = classification.species.replace('-', " ");
        record.classification_score = score_to_percent(classification.score);
    }
    if let Some(clarity) = meta.clarity_score {
        record.seed_clarity(clarity);
    }

    record
}

/// Decode the legacy underscore-delimited filename into the record.
///
/// Boxed names carry 6 segments, or 7 when a visitation id is embedded;
/// full-frame names carry 4 or 5. Anything else leaves the defaults in
/// place.
fn parse_legacy_name(base: &str, mut record: PhotoRecord, now: NaiveDateTime) -> PhotoRecord {
    let segments: Vec<&str> = base.split('_').collect();

    match (record.kind, segments.len()) {
        (PhotoType::Boxed, legacy::BOXED_SEGMENTS_WITHOUT_ID) => {
            record.timestamp = parse_timestamp(segments[1], segments[2], now);
            record.detection_score = parse_percent(segments[3]);
            record.species = segments[4].replace('-', " ");
            record.classification_score = parse_percent(segments[5]);
        }
        (PhotoType::Boxed, legacy::BOXED_SEGMENTS_WITH_ID) => {
            record.timestamp = parse_timestamp(segments[1], segments[2], now);
            record.detection_score = parse_percent(segments[3]);
            record.visitation_id = segments[4].to_string();
            record.species = segments[5].replace('-', " ");
            record.classification_score = parse_percent(segments[6]);
        }
        (PhotoType::Full, legacy::FULL_SEGMENTS_WITHOUT_ID) => {
            record.timestamp = parse_timestamp(segments[1], segments[2], now);
            record.detection_score = parse_percent(segments[3]);
        }
        (PhotoType::Full, legacy::FULL_SEGMENTS_WITH_ID) => {
            record.timestamp = parse_timestamp(segments[1], segments[2], now);
            record.detection_score = parse_percent(segments[3]);
            record.visitation_id = segments[4].to_string();
        }
        _ => {
            debug!("No legacy encoding in '{base}', keeping defaults");
        }
    }

    record
}

/// Parse an integer percentage segment; malformed or out-of-range values
/// score 0.
fn parse_percent(segment: &str) -> u8 {
    segment
        .parse::<u8>()
        .ok()
        .filter(|value| *value <= 100)
        .unwrap_or(0)
}

/// Convert a unit-interval sidecar score to an integer percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn score_to_percent(score: f32) -> u8 {
    (f64::from(score) * 100.0).round().clamp(0.0, 100.0) as u8
}

fn parse_timestamp(date: &str, time: &str, now: NaiveDateTime) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(
        &format!("{date} {time}"),
        &format!("{DATE_FORMAT} {}", legacy::TIME_FORMAT),
    )
    .unwrap_or(now)
}
