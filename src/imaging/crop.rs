//! Detection-region cropping.

use crate::detect::PixelBox;
use image::RgbImage;

/// Grow a pixel box by `padding` on every side, clamped to the frame.
///
/// Detection boxes hug the subject tightly; captured crops keep some
/// surrounding context.
pub fn pad_box(bbox: PixelBox, padding: u32, width: u32, height: u32) -> PixelBox {
    PixelBox {
        x0: bbox.x0.saturating_sub(padding),
        y0: bbox.y0.saturating_sub(padding),
        x1: bbox.x1.saturating_add(padding).min(width),
        y1: bbox.y1.saturating_add(padding).min(height),
    }
}

/// Copy the boxed region out of a frame.
///
/// The result owns its pixels: annotation drawn on the frame afterwards can
/// never leak into a photo that was already submitted for saving. Returns
/// `None` for a zero-area box.
pub fn crop_region(frame: &RgbImage, bbox: PixelBox) -> Option<RgbImage> {
    if bbox.is_empty() {
        return None;
    }

    Some(image::imageops::crop_imm(frame, bbox.x0, bbox.y0, bbox.width(), bbox.height()).to_image())
}
