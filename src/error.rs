//! Error types for perchwatch.

/// Result type alias for perchwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for perchwatch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Photo storage root does not exist or is not a directory.
    #[error("photo storage root does not exist: {path}")]
    StorageRootNotFound {
        /// Path to the missing storage root.
        path: std::path::PathBuf,
    },

    /// Failed to read a directory while scanning the photo tree.
    #[error("failed to read photo directory '{path}'")]
    StorageScan {
        /// Path to the unreadable directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Labels file does not exist.
    #[error("labels file does not exist: {path}")]
    LabelsFileNotFound {
        /// Path to the missing labels file.
        path: std::path::PathBuf,
    },

    /// Failed to encode a photo to PNG.
    #[error("failed to encode photo '{path}'")]
    PhotoEncode {
        /// Destination path of the photo.
        path: std::path::PathBuf,
        /// Underlying encoder error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to serialize photo metadata.
    #[error("failed to serialize metadata for photo '{photo_id}'")]
    MetadataSerialize {
        /// Identifier of the photo.
        photo_id: String,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse a photo metadata sidecar.
    #[error("failed to parse metadata sidecar '{path}'")]
    MetadataParse {
        /// Path to the sidecar file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the visitation summary JSON file.
    #[error("failed to write summary file '{path}'")]
    SummaryWrite {
        /// Path to the summary file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
