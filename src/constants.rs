//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "perchwatch";

/// Detection thresholds and labels.
pub mod detection {
    /// Class label emitted by the detector for birds.
    pub const BIRD_LABEL: &str = "bird";

    /// Default minimum detection score for a detection to qualify.
    ///
    /// A detection starts or sustains a visitation only when its score is
    /// strictly greater than this threshold.
    pub const DEFAULT_THRESHOLD: f32 = 0.4;

    /// Default padding in pixels applied around a detection box before
    /// cropping, clamped to the frame edges.
    pub const DEFAULT_CROP_PADDING: u32 = 50;
}

/// Visitation lifecycle tuning.
pub mod visitation {
    /// Default maximum visitation window in seconds before the timeout
    /// transition is evaluated.
    pub const DEFAULT_MAX_SECONDS: u64 = 300;

    /// Default grace extension in seconds applied when a qualifying
    /// detection is still present at the timeout boundary.
    pub const DEFAULT_GRACE_SECONDS: u64 = 60;

    /// Default maximum number of boxed photos captured per visitation.
    pub const DEFAULT_PHOTO_QUOTA: u32 = 10;

    /// Default maximum number of full-frame photos captured per visitation.
    pub const DEFAULT_FULL_PHOTO_QUOTA: u32 = 1;
}

/// Classification confidence bands.
pub mod classification {
    /// Score at or above which a classification is labelled high confidence.
    pub const HIGH_CONFIDENCE: f32 = 0.8;

    /// Score at or above which a classification is labelled medium confidence.
    pub const MEDIUM_CONFIDENCE: f32 = 0.5;
}

/// Clarity (focus) scoring.
pub mod clarity {
    /// Laplacian-variance score at or above which an image counts as focused.
    pub const FOCUS_THRESHOLD: f64 = 100.0;
}

/// Photo storage layout and limits.
pub mod storage {
    /// Date directory format under the storage root.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Default disk usage percentage above which photo writes are skipped.
    pub const DEFAULT_MAX_DISK_PERCENT: u8 = 95;

    /// Default capacity of the pending photo-save queue. Submissions beyond
    /// this are dropped with a warning rather than blocking the frame loop.
    pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

    /// Filename suffix marking a full-frame photo.
    pub const FULL_SUFFIX: &str = "_full";

    /// Filename suffix marking a higher-resolution duplicate of a photo.
    pub const HIGH_RES_SUFFIX: &str = "_hires";

    /// Photo file extension.
    pub const PHOTO_EXTENSION: &str = "png";

    /// Metadata sidecar file extension.
    pub const SIDECAR_EXTENSION: &str = "json";

    /// Default filename of the aggregated visitation summary document,
    /// written at the storage root.
    pub const SUMMARY_FILENAME: &str = "visitations.json";
}

/// Legacy encoded-filename format (pre-sidecar data).
pub mod legacy {
    /// Time component format inside legacy filenames.
    pub const TIME_FORMAT: &str = "%H-%M-%S";

    /// Name fragment identifying boxed photos.
    pub const BOXED_FRAGMENT: &str = "boxed";

    /// Name fragment identifying full-frame photos.
    pub const FULL_FRAGMENT: &str = "full";

    /// Segment count of a boxed filename without an embedded visitation id.
    pub const BOXED_SEGMENTS_WITHOUT_ID: usize = 6;

    /// Segment count of a boxed filename with an embedded visitation id.
    pub const BOXED_SEGMENTS_WITH_ID: usize = 7;

    /// Segment count of a full-frame filename without an embedded
    /// visitation id.
    pub const FULL_SEGMENTS_WITHOUT_ID: usize = 4;

    /// Segment count of a full-frame filename with an embedded visitation id.
    pub const FULL_SEGMENTS_WITH_ID: usize = 5;
}

/// Offline aggregation tuning.
pub mod aggregation {
    /// Default maximum gap in seconds between consecutive same-species
    /// records for them to share a visitation when no explicit visitation id
    /// is available (legacy data).
    pub const DEFAULT_GAP_SECONDS: i64 = 300;

    /// Default classification score below which a single-record visitation
    /// counts as "poor" when poor-visitation filtering is enabled.
    pub const DEFAULT_POOR_SCORE_MAX: u8 = 40;

    /// Scientific name used when no labels file or no matching line exists.
    pub const UNKNOWN_SCIENTIFIC_NAME: &str = "Unknown";
}
