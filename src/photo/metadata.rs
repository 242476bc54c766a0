//! Photo metadata sidecar files.
//!
//! Every saved photo gets a JSON sidecar next to it carrying the structured
//! fields the offline aggregation needs. The photo and sidecar share a stem:
//! `<photo_id>.png` / `<photo_id>.json`, with full-frame photos marked by a
//! `_full` suffix and higher-resolution duplicates by `_hires`.

use crate::constants::classification;
use crate::constants::storage::{FULL_SUFFIX, HIGH_RES_SUFFIX, SIDECAR_EXTENSION};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of saved photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoType {
    /// Crop of a detection's bounding box.
    Boxed,
    /// The entire frame, uncropped.
    Full,
}

impl std::fmt::Display for PhotoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boxed => write!(f, "boxed"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Detector output recorded at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionMeta {
    /// Detection confidence (0.0 - 1.0).
    pub score: f32,
    /// Pixel bounding box inside the source frame, absent for full photos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BboxMeta>,
}

/// Pixel bounding box as persisted in sidecars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BboxMeta {
    /// Left edge in pixels.
    pub x0: u32,
    /// Top edge in pixels.
    pub y0: u32,
    /// Right edge in pixels.
    pub x1: u32,
    /// Bottom edge in pixels.
    pub y1: u32,
}

/// Qualitative confidence band for a classification score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// Score at or above the high-confidence threshold.
    High,
    /// Score at or above the medium-confidence threshold.
    Medium,
    /// Everything below.
    Low,
}

impl ConfidenceBand {
    /// Band for a classification score in `[0,1]`.
    pub fn from_score(score: f32) -> Self {
        if score >= classification::HIGH_CONFIDENCE {
            Self::High
        } else if score >= classification::MEDIUM_CONFIDENCE {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One classifier prediction attached to a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMeta {
    /// Common species name.
    pub species: String,
    /// Classification confidence (0.0 - 1.0).
    pub score: f32,
    /// Qualitative confidence band.
    pub confidence: ConfidenceBand,
}

impl ClassificationMeta {
    /// Build a classification entry, deriving the confidence band from the
    /// score.
    pub fn new(species: impl Into<String>, score: f32) -> Self {
        Self {
            species: species.into(),
            score,
            confidence: ConfidenceBand::from_score(score),
        }
    }
}

/// Sidecar document persisted next to each photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Unique photo identifier (the filename stem).
    pub photo_id: String,
    /// Visitation the photo belongs to.
    pub visitation_id: String,
    /// Kind of photo.
    pub photo_type: PhotoType,
    /// Image dimensions.
    pub resolution: Resolution,
    /// Capture timestamp (local wall clock, ISO-8601 without offset).
    pub datetime: NaiveDateTime,
    /// Detector output at capture time.
    pub detection: DetectionMeta,
    /// Classifier predictions, best first. Empty when the photo was never
    /// classified.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<ClassificationMeta>,
    /// Clarity score computed at save time. Older sidecars lack it, in
    /// which case aggregation scores the image lazily.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity_score: Option<f64>,
}

/// Photo filename for an id and photo type.
pub fn photo_file_name(photo_id: &str, photo_type: PhotoType) -> String {
    match photo_type {
        PhotoType::Boxed => format!("{photo_id}.png"),
        PhotoType::Full => format!("{photo_id}{FULL_SUFFIX}.png"),
    }
}

/// Sidecar filename for an id and photo type.
pub fn sidecar_file_name(photo_id: &str, photo_type: PhotoType) -> String {
    match photo_type {
        PhotoType::Boxed => format!("{photo_id}.{SIDECAR_EXTENSION}"),
        PhotoType::Full => format!("{photo_id}{FULL_SUFFIX}.{SIDECAR_EXTENSION}"),
    }
}

/// Locate the metadata sidecar for a photo file, if one exists.
///
/// Tries the exact stem first, then the `_full` variant, and for a high-res
/// duplicate finally the base stem it duplicates.
pub fn find_sidecar(photo_path: &Path) -> Option<PathBuf> {
    let stem = photo_path.file_stem()?.to_str()?;
    let dir = photo_path.parent().unwrap_or_else(|| Path::new(""));

    let mut candidates = vec![format!("{stem}.{SIDECAR_EXTENSION}")];
    if !stem.ends_with(FULL_SUFFIX) {
        candidates.push(format!("{stem}{FULL_SUFFIX}.{SIDECAR_EXTENSION}"));
    }
    if let Some(base) = stem.strip_suffix(HIGH_RES_SUFFIX) {
        candidates.push(format!("{base}.{SIDECAR_EXTENSION}"));
    }

    candidates
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Load a metadata sidecar from disk.
pub fn load_metadata(path: &Path) -> Result<PhotoMetadata> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| Error::MetadataParse {
        path: path.to_path_buf(),
        source: e,
    })
}
