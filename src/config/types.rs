//! Configuration type definitions.

use crate::constants::{aggregation, detection, storage, visitation};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Photo storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Online visitation tracking settings.
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Offline aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

/// Photo storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory of the photo tree. The report command falls back to
    /// this when `--dir` is not given.
    pub root: Option<PathBuf>,

    /// Labels file used for scientific-name resolution.
    pub labels: Option<PathBuf>,

    /// Path of the aggregated summary JSON document. Defaults to
    /// `visitations.json` under the scanned root.
    pub summary_path: Option<PathBuf>,

    /// Disk usage percentage above which photo writes are skipped.
    pub max_disk_percent: u8,

    /// Capacity of the pending photo-save queue.
    pub queue_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: None,
            labels: None,
            summary_path: None,
            max_disk_percent: storage::DEFAULT_MAX_DISK_PERCENT,
            queue_capacity: storage::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Online visitation tracking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Minimum detection score for a detection to qualify (exclusive).
    pub detection_threshold: f32,

    /// Maximum visitation window in seconds.
    pub visitation_max_seconds: u64,

    /// Grace extension in seconds when a detection is present at the
    /// timeout boundary.
    pub grace_seconds: u64,

    /// Maximum boxed photos captured per visitation.
    pub photos_per_visitation: u32,

    /// Maximum full-frame photos captured per visitation.
    pub full_photos_per_visitation: u32,

    /// Padding in pixels applied around detection boxes before cropping.
    pub crop_padding: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            detection_threshold: detection::DEFAULT_THRESHOLD,
            visitation_max_seconds: visitation::DEFAULT_MAX_SECONDS,
            grace_seconds: visitation::DEFAULT_GRACE_SECONDS,
            photos_per_visitation: visitation::DEFAULT_PHOTO_QUOTA,
            full_photos_per_visitation: visitation::DEFAULT_FULL_PHOTO_QUOTA,
            crop_padding: detection::DEFAULT_CROP_PADDING,
        }
    }
}

/// Offline aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Drop single-record visitations whose classification score falls below
    /// `poor_score_max`. Off by default.
    pub drop_poor: bool,

    /// Classification score below which a single-record visitation counts as
    /// poor.
    pub poor_score_max: u8,

    /// Maximum gap in seconds between consecutive same-species records for
    /// them to share a visitation when no visitation id is available.
    pub legacy_gap_seconds: i64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            drop_poor: false,
            poor_score_max: aggregation::DEFAULT_POOR_SCORE_MAX,
            legacy_gap_seconds: aggregation::DEFAULT_GAP_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_config_default_values() {
        let tracking = TrackingConfig::default();
        assert!((tracking.detection_threshold - 0.4).abs() < f32::EPSILON);
        assert_eq!(tracking.visitation_max_seconds, 300);
        assert_eq!(tracking.grace_seconds, 60);
        assert_eq!(tracking.photos_per_visitation, 10);
        assert_eq!(tracking.full_photos_per_visitation, 1);
    }

    #[test]
    fn test_aggregation_config_default_keeps_everything() {
        let aggregation = AggregationConfig::default();
        assert!(!aggregation.drop_poor);
        assert_eq!(aggregation.legacy_gap_seconds, 300);
    }

    #[test]
    fn test_storage_config_default_values() {
        let storage = StorageConfig::default();
        assert!(storage.root.is_none());
        assert_eq!(storage.max_disk_percent, 95);
        assert_eq!(storage.queue_capacity, 32);
    }
}
