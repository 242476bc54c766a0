//! Normalized object-detection results.
//!
//! Detection engines disagree about field names and coordinate conventions,
//! so the acquisition loop adapts whatever its engine emits into this single
//! shape before handing it to the tracker. Everything downstream only ever
//! sees these types.

use crate::constants::detection;

/// Axis-aligned bounding box in normalized `[0,1]` image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub xmin: f32,
    /// Top edge.
    pub ymin: f32,
    /// Right edge.
    pub xmax: f32,
    /// Bottom edge.
    pub ymax: f32,
}

impl BoundingBox {
    /// Create a bounding box from normalized corner coordinates.
    pub const fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Convert to whole-pixel coordinates for a frame of the given size.
    ///
    /// Out-of-range coordinates are clamped to the unit square first, then
    /// scaled. Inverted or degenerate boxes come out zero-area rather than
    /// erroring; callers skip the crop in that case.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelBox {
        let clamp_unit = |v: f32| v.clamp(0.0, 1.0);
        let scale = |v: f32, dim: u32| {
            let px = clamp_unit(v) * dim as f32;
            // f32 -> u32 casts saturate, but stay explicit about the bound.
            (px as u32).min(dim)
        };

        PixelBox {
            x0: scale(self.xmin, width),
            y0: scale(self.ymin, height),
            x1: scale(self.xmax, width),
            y1: scale(self.ymax, height),
        }
    }
}

/// Bounding box in pixel coordinates, clamped to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    /// Left edge in pixels.
    pub x0: u32,
    /// Top edge in pixels.
    pub y0: u32,
    /// Right edge in pixels (exclusive).
    pub x1: u32,
    /// Bottom edge in pixels (exclusive).
    pub y1: u32,
}

impl PixelBox {
    /// Box width in pixels.
    pub const fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Box height in pixels.
    pub const fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Whether the box covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// A single object-detector output for one frame.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Class label assigned by the detector.
    pub label: String,
    /// Detection confidence (0.0 - 1.0).
    pub score: f32,
    /// Detected region in normalized coordinates.
    pub bbox: BoundingBox,
}

impl Detection {
    /// Create a normalized detection.
    pub fn new(label: impl Into<String>, score: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            score,
            bbox,
        }
    }

    /// Whether this detection starts or sustains a visitation: the label is
    /// the bird class and the score is strictly above the threshold.
    pub fn qualifies(&self, threshold: f32) -> bool {
        self.label.eq_ignore_ascii_case(detection::BIRD_LABEL) && self.score > threshold
    }
}
