//! Photo records reconstructed from disk.

use std::cell::OnceCell;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::constants::storage::HIGH_RES_SUFFIX;
use crate::imaging;
use crate::photo::PhotoType;

/// Metadata describing one saved photo, reconstructed from a sidecar or a
/// legacy encoded filename.
///
/// Fields default to empty/zero when the persisted form did not carry them;
/// reconstruction never fails outright. The clarity score is computed from
/// the image on first access and cached, unless the sidecar already stored
/// one.
#[derive(Debug, Clone)]
pub struct PhotoRecord {
    /// Path to the photo file.
    pub path: PathBuf,
    /// Visitation the photo belongs to; empty when unknown.
    pub visitation_id: String,
    /// Capture timestamp (local wall clock).
    pub timestamp: NaiveDateTime,
    /// Detection confidence as an integer percentage (0-100).
    pub detection_score: u8,
    /// Classification confidence as an integer percentage (0-100).
    pub classification_score: u8,
    /// Common species name with spaces; empty when unclassified.
    pub species: String,
    /// Whether this is a boxed crop or a full frame.
    pub kind: PhotoType,
    /// Whether the file is a high-resolution duplicate.
    pub high_res: bool,
    clarity: OnceCell<f64>,
}

impl PhotoRecord {
    /// Build a record with best-effort defaults for everything the
    /// persisted form may fill in later.
    pub(crate) fn new(path: PathBuf, kind: PhotoType, timestamp: NaiveDateTime) -> Self {
        let high_res = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.ends_with(HIGH_RES_SUFFIX));

        Self {
            path,
            visitation_id: String::new(),
            timestamp,
            detection_score: 0,
            classification_score: 0,
            species: String::new(),
            kind,
            high_res,
            clarity: OnceCell::new(),
        }
    }

    /// Seed the clarity cache from a stored sidecar value. A no-op if the
    /// score was already computed.
    pub(crate) fn seed_clarity(&self, score: f64) {
        let _ = self.clarity.set(score);
    }

    /// Clarity score of the photo, computed from the image on first access.
    ///
    /// An unreadable image scores 0.0.
    pub fn clarity(&self) -> f64 {
        *self
            .clarity
            .get_or_init(|| imaging::clarity_from_path(&self.path))
    }

    /// Combined ranking score used for best-photo selection:
    /// classification + detection + clarity.
    pub fn total_score(&self) -> f64 {
        f64::from(self.classification_score) + f64::from(self.detection_score) + self.clarity()
    }
}
