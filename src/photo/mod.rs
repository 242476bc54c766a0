//! Photo persistence: metadata sidecars, disk guard, and the save queue.

pub mod disk;
pub mod metadata;
mod store;

pub use metadata::{
    BboxMeta, ClassificationMeta, ConfidenceBand, DetectionMeta, PhotoMetadata, PhotoType,
    Resolution, find_sidecar, load_metadata,
};
pub use store::{Capture, PhotoSink, PhotoStore, save_capture};
