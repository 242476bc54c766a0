//! Laplacian-variance focus scoring.
//!
//! The score ranks photo sharpness for best-photo selection: convert to
//! grayscale, apply a discrete Laplacian, take the variance of the response.
//! Higher is sharper; there is no fixed upper bound.

use crate::constants::clarity::FOCUS_THRESHOLD;
use image::GrayImage;
use std::path::Path;
use tracing::debug;

/// Compute the Laplacian-variance clarity score of a grayscale image.
///
/// Uses the 4-neighbour discrete Laplacian (`4c - up - down - left - right`)
/// over interior pixels. Images too small to have an interior score `0.0`.
/// Deterministic and side-effect-free for a given buffer.
pub fn clarity(image: &GrayImage) -> f64 {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut sum = 0.0_f64;
    let mut sum_sq = 0.0_f64;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = f64::from(image.get_pixel(x, y)[0]);
            let up = f64::from(image.get_pixel(x, y - 1)[0]);
            let down = f64::from(image.get_pixel(x, y + 1)[0]);
            let left = f64::from(image.get_pixel(x - 1, y)[0]);
            let right = f64::from(image.get_pixel(x + 1, y)[0]);

            let response = 4.0 * center - up - down - left - right;
            sum += response;
            sum_sq += response * response;
        }
    }

    let count = f64::from((width - 2) * (height - 2));
    let mean = sum / count;
    // Population variance; clamp tiny negative rounding artifacts.
    (sum_sq / count - mean * mean).max(0.0)
}

/// Compute the clarity score of an image on disk.
///
/// Returns `0.0` for a missing, unreadable, or corrupt file instead of
/// erroring; the record simply contributes no clarity to scoring.
pub fn clarity_from_path(path: &Path) -> f64 {
    match image::open(path) {
        Ok(img) => clarity(&img.to_luma8()),
        Err(e) => {
            debug!("Could not read image for clarity scoring {}: {e}", path.display());
            0.0
        }
    }
}

/// Whether an image counts as focused.
pub fn is_focused(image: &GrayImage, threshold: Option<f64>) -> bool {
    clarity(image) > threshold.unwrap_or(FOCUS_THRESHOLD)
}
