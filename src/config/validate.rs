//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_tracking(config)?;
    validate_storage(config)?;
    validate_aggregation(config)?;
    Ok(())
}

/// Validate tracking settings.
fn validate_tracking(config: &Config) -> Result<()> {
    let tracking = &config.tracking;

    // Validate detection_threshold range
    if !(0.0..=1.0).contains(&tracking.detection_threshold) {
        return Err(Error::ConfigValidation {
            message: format!(
                "detection_threshold must be between 0.0 and 1.0, got {}",
                tracking.detection_threshold
            ),
        });
    }

    if tracking.visitation_max_seconds == 0 {
        return Err(Error::ConfigValidation {
            message: "visitation_max_seconds must be at least 1".to_string(),
        });
    }

    if tracking.grace_seconds == 0 {
        return Err(Error::ConfigValidation {
            message: "grace_seconds must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate storage settings and check that an explicitly configured labels
/// file exists.
fn validate_storage(config: &Config) -> Result<()> {
    let storage = &config.storage;

    if storage.max_disk_percent > 100 {
        return Err(Error::ConfigValidation {
            message: format!(
                "max_disk_percent must be at most 100, got {}",
                storage.max_disk_percent
            ),
        });
    }

    if storage.queue_capacity == 0 {
        return Err(Error::ConfigValidation {
            message: "queue_capacity must be at least 1".to_string(),
        });
    }

    // A labels path the user configured but that does not exist is a setup
    // error; lookups at aggregation time still tolerate absence.
    if let Some(labels) = &storage.labels
        && !labels.exists()
    {
        return Err(Error::LabelsFileNotFound {
            path: labels.clone(),
        });
    }

    Ok(())
}

/// Validate aggregation settings.
fn validate_aggregation(config: &Config) -> Result<()> {
    let aggregation = &config.aggregation;

    if aggregation.legacy_gap_seconds < 1 {
        return Err(Error::ConfigValidation {
            message: format!(
                "legacy_gap_seconds must be at least 1, got {}",
                aggregation.legacy_gap_seconds
            ),
        });
    }

    if aggregation.poor_score_max > 100 {
        return Err(Error::ConfigValidation {
            message: format!(
                "poor_score_max must be at most 100, got {}",
                aggregation.poor_score_max
            ),
        });
    }

    Ok(())
}
