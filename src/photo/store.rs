//! Photo persistence with fire-and-forget submission.
//!
//! The frame loop must never wait on disk: captures go into a bounded queue
//! drained by a single background worker. A full queue drops the new capture
//! with a warning; save failures are logged by the worker and are invisible
//! to the submitter. Orderly shutdown (`close`) flushes the queue.

use crate::constants::storage::DATE_FORMAT;
use crate::detect::PixelBox;
use crate::error::{Error, Result};
use crate::photo::metadata::{
    ClassificationMeta, DetectionMeta, PhotoMetadata, PhotoType, Resolution, photo_file_name,
    sidecar_file_name,
};
use crate::photo::{disk, metadata::BboxMeta};
use chrono::NaiveDateTime;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// One photo submission from the tracker.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Pixels to persist (already cropped for boxed photos).
    pub image: RgbImage,
    /// Visitation the capture belongs to.
    pub visitation_id: Uuid,
    /// Detection confidence (0.0 - 1.0) behind the capture.
    pub detection_score: f32,
    /// Kind of photo.
    pub photo_type: PhotoType,
    /// Pixel box inside the source frame, for boxed photos.
    pub bbox: Option<PixelBox>,
    /// Classifier predictions for the capture, best first. May be empty.
    pub classifications: Vec<ClassificationMeta>,
    /// Capture timestamp (local wall clock).
    pub timestamp: NaiveDateTime,
}

/// Destination for photo captures.
///
/// Submission is fire-and-forget: implementations must not block the caller
/// and must not surface save failures back through this interface.
pub trait PhotoSink {
    /// Submit a capture for persistence.
    fn submit(&self, capture: Capture);
}

/// Filesystem-backed photo store.
///
/// Photos land under `<root>/<date>/<visitation_id>/` as PNG files with JSON
/// metadata sidecars.
pub struct PhotoStore {
    tx: mpsc::Sender<Capture>,
    runtime: tokio::runtime::Runtime,
    worker: tokio::task::JoinHandle<()>,
}

impl PhotoStore {
    /// Create a store rooted at `root` and start its save worker.
    pub fn new(root: PathBuf, max_disk_percent: u8, queue_capacity: usize) -> Result<Self> {
        std::fs::create_dir_all(&root)?;

        let runtime = tokio::runtime::Runtime::new()?;
        let (tx, rx) = mpsc::channel(queue_capacity);
        let worker = runtime.spawn(run_worker(rx, root, max_disk_percent));

        Ok(Self {
            tx,
            runtime,
            worker,
        })
    }

    /// Flush pending saves and stop the worker.
    pub fn close(self) {
        drop(self.tx);
        if let Err(e) = self.runtime.block_on(self.worker) {
            warn!("Photo save worker exited abnormally: {e}");
        }
    }
}

impl PhotoSink for PhotoStore {
    fn submit(&self, capture: Capture) {
        match self.tx.try_send(capture) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(capture)) => {
                warn!(
                    "Photo save queue full, dropping {} photo for visitation {}",
                    capture.photo_type, capture.visitation_id
                );
            }
            Err(mpsc::error::TrySendError::Closed(capture)) => {
                warn!(
                    "Photo save worker stopped, dropping {} photo",
                    capture.photo_type
                );
            }
        }
    }
}

async fn run_worker(mut rx: mpsc::Receiver<Capture>, root: PathBuf, max_disk_percent: u8) {
    while let Some(capture) = rx.recv().await {
        match save_capture(&root, max_disk_percent, capture).await {
            Ok(Some(photo_id)) => debug!("Saved photo {photo_id}"),
            Ok(None) => {}
            Err(e) => warn!("Failed to save photo: {e}"),
        }
    }
}

/// Persist one capture: PNG plus metadata sidecar.
///
/// Returns `Ok(None)` when the write was skipped because the disk is above
/// the usage threshold.
pub async fn save_capture(
    root: &Path,
    max_disk_percent: u8,
    capture: Capture,
) -> Result<Option<String>> {
    if !disk::has_space(root, max_disk_percent) {
        warn!("Disk usage above {max_disk_percent}%, skipping photo write");
        return Ok(None);
    }

    let photo_id = Uuid::new_v4().to_string();
    let (width, height) = capture.image.dimensions();

    let dir = root
        .join(capture.timestamp.format(DATE_FORMAT).to_string())
        .join(capture.visitation_id.to_string());
    tokio::fs::create_dir_all(&dir).await?;

    let photo_path = dir.join(photo_file_name(&photo_id, capture.photo_type));
    let mut png = Vec::new();
    PngEncoder::new(Cursor::new(&mut png))
        .write_image(
            capture.image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| Error::PhotoEncode {
            path: photo_path.clone(),
            source: e,
        })?;
    tokio::fs::write(&photo_path, &png).await?;

    // Scored once at save time so aggregation never has to reopen the file.
    let clarity_score = crate::imaging::clarity(&image::imageops::grayscale(&capture.image));

    let meta = PhotoMetadata {
        photo_id: photo_id.clone(),
        visitation_id: capture.visitation_id.to_string(),
        photo_type: capture.photo_type,
        resolution: Resolution { width, height },
        datetime: capture.timestamp,
        detection: DetectionMeta {
            score: capture.detection_score,
            bbox: capture.bbox.map(|b| BboxMeta {
                x0: b.x0,
                y0: b.y0,
                x1: b.x1,
                y1: b.y1,
            }),
        },
        classifications: capture.classifications,
        clarity_score: Some(clarity_score),
    };
    let sidecar_path = dir.join(sidecar_file_name(&photo_id, capture.photo_type));
    let json = serde_json::to_vec_pretty(&meta).map_err(|e| Error::MetadataSerialize {
        photo_id: photo_id.clone(),
        source: e,
    })?;
    tokio::fs::write(&sidecar_path, json).await?;

    Ok(Some(photo_id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::photo::metadata::load_metadata;
    use chrono::NaiveDate;
    use image::Rgb;

    fn sample_capture(photo_type: PhotoType) -> Capture {
        Capture {
            image: RgbImage::from_pixel(8, 6, Rgb([200, 100, 50])),
            visitation_id: Uuid::new_v4(),
            detection_score: 0.72,
            photo_type,
            bbox: Some(PixelBox {
                x0: 1,
                y0: 2,
                x1: 7,
                y1: 5,
            }),
            classifications: vec![ClassificationMeta::new("house finch", 0.66)],
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 2)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_save_capture_writes_photo_and_sidecar() {
        let root = tempfile::tempdir().unwrap();
        let capture = sample_capture(PhotoType::Boxed);
        let visitation_id = capture.visitation_id;

        let photo_id = save_capture(root.path(), 100, capture).await.unwrap().unwrap();

        let dir = root.path().join("2024-03-02").join(visitation_id.to_string());
        let photo_path = dir.join(format!("{photo_id}.png"));
        let sidecar_path = dir.join(format!("{photo_id}.json"));
        assert!(photo_path.exists());
        assert!(sidecar_path.exists());

        let meta = load_metadata(&sidecar_path).unwrap();
        assert_eq!(meta.photo_id, photo_id);
        assert_eq!(meta.visitation_id, visitation_id.to_string());
        assert_eq!(meta.resolution, Resolution { width: 8, height: 6 });
        assert_eq!(meta.classifications.len(), 1);
        // Flat test image scores zero clarity but the field is recorded.
        assert!(meta.clarity_score.is_some_and(|score| score.abs() < f64::EPSILON));

        // The photo decodes back to the original pixels.
        let decoded = image::open(&photo_path).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([200, 100, 50]));
    }

    #[tokio::test]
    async fn test_save_capture_full_photo_uses_full_suffix() {
        let root = tempfile::tempdir().unwrap();
        let capture = sample_capture(PhotoType::Full);
        let visitation_id = capture.visitation_id;

        let photo_id = save_capture(root.path(), 100, capture).await.unwrap().unwrap();

        let dir = root.path().join("2024-03-02").join(visitation_id.to_string());
        assert!(dir.join(format!("{photo_id}_full.png")).exists());
        assert!(dir.join(format!("{photo_id}_full.json")).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_capture_skips_when_disk_full() {
        let root = tempfile::tempdir().unwrap();
        let result = save_capture(root.path(), 0, sample_capture(PhotoType::Boxed)).await;
        assert!(matches!(result, Ok(None)));

        // Nothing written.
        assert!(std::fs::read_dir(root.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_store_submit_and_close_flushes() {
        let root = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(root.path().to_path_buf(), 100, 8).unwrap();

        let capture = sample_capture(PhotoType::Boxed);
        let visitation_id = capture.visitation_id;
        store.submit(capture);
        store.close();

        let dir = root.path().join("2024-03-02").join(visitation_id.to_string());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);
    }

    #[test]
    fn test_close_stops_worker() {
        let root = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(root.path().to_path_buf(), 100, 2).unwrap();

        let tx = store.tx.clone();
        store.close();
        assert!(tx.is_closed());
    }
}
