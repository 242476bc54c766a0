//! Image analysis and manipulation helpers.

mod clarity;
mod crop;

pub use clarity::{clarity, clarity_from_path, is_focused};
pub use crop::{crop_region, pad_box};
