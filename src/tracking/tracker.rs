//! Online visitation state machine.
//!
//! Consumes per-frame detection batches from the acquisition loop and owns
//! the visitation lifecycle: creation on the first qualifying bird
//! detection, capture quotas while active, grace extension at the timeout
//! boundary, and reset when the window expires without a detection.
//!
//! The tracker holds no I/O and never reads a clock; the loop passes the
//! frame timestamp in. Captures leave through a [`PhotoSink`] and any
//! failure behind that seam stays behind it.

use crate::config::TrackingConfig;
use crate::detect::Detection;
use crate::imaging::{crop_region, pad_box};
use crate::photo::{Capture, PhotoSink, PhotoType};
use crate::tracking::Visitation;
use chrono::{Duration, NaiveDateTime};
use image::RgbImage;
use tracing::{debug, info};

/// State machine tracking at most one active visitation.
pub struct VisitationTracker {
    config: TrackingConfig,
    sink: Box<dyn PhotoSink>,
    max_window: Duration,
    grace: Duration,
    active: Option<Active>,
}

/// The active visitation plus its re-armable timeout clock.
///
/// `started_tracking` begins at the visitation's start and is pushed forward
/// by grace extensions; `visitation.start_time` never moves.
struct Active {
    visitation: Visitation,
    started_tracking: NaiveDateTime,
}

impl VisitationTracker {
    /// Create a tracker that submits captures to `sink`.
    pub fn new(config: TrackingConfig, sink: Box<dyn PhotoSink>) -> Self {
        let max_window = seconds(config.visitation_max_seconds);
        let grace = seconds(config.grace_seconds);
        Self {
            config,
            sink,
            max_window,
            grace,
            active: None,
        }
    }

    /// The visitation currently in progress, if any.
    pub fn active_visitation(&self) -> Option<&Visitation> {
        self.active.as_ref().map(|a| &a.visitation)
    }

    /// Process one frame's detections.
    ///
    /// Returns the visitation that closed during this call, if the timeout
    /// transition fired.
    pub fn update(
        &mut self,
        detections: &[Detection],
        frame: &RgbImage,
        now: NaiveDateTime,
    ) -> Option<Visitation> {
        let threshold = self.config.detection_threshold;
        let has_qualifying = detections.iter().any(|d| d.qualifies(threshold));

        if let Some(active) = &mut self.active {
            if now.signed_duration_since(active.started_tracking) >= self.max_window {
                if has_qualifying {
                    // Still visited at the boundary: re-arm instead of closing.
                    active.started_tracking += self.grace;
                    debug!(
                        "Extended visitation {} by {}s",
                        active.visitation.id,
                        self.grace.num_seconds()
                    );
                } else {
                    return self.close_active(now);
                }
            }
        } else {
            if !has_qualifying {
                return None;
            }
            let visitation = Visitation::begin(now);
            info!("New visitation {} started", visitation.id);
            self.active = Some(Active {
                visitation,
                started_tracking: now,
            });
        }

        if has_qualifying {
            self.capture(detections, frame, now);
        }
        None
    }

    /// Close the active visitation immediately, regardless of the timeout.
    pub fn reset(&mut self, now: NaiveDateTime) -> Option<Visitation> {
        self.close_active(now)
    }

    fn close_active(&mut self, now: NaiveDateTime) -> Option<Visitation> {
        let active = self.active.take()?;
        let mut visitation = active.visitation;
        visitation.end_time = Some(now);
        info!(
            "Visitation {} ended after {}s with {} boxed and {} full photos",
            visitation.id,
            visitation.duration_seconds().unwrap_or(0),
            visitation.photo_count,
            visitation.full_photo_count
        );
        Some(visitation)
    }

    /// Submit captures for every qualifying detection in the frame, within
    /// quota.
    fn capture(&mut self, detections: &[Detection], frame: &RgbImage, now: NaiveDateTime) {
        let Some(active) = &mut self.active else {
            return;
        };
        let visitation = &mut active.visitation;
        let (width, height) = frame.dimensions();
        let threshold = self.config.detection_threshold;

        let mut best_score = 0.0_f32;
        for detection in detections.iter().filter(|d| d.qualifies(threshold)) {
            best_score = best_score.max(detection.score);

            if visitation.photo_count >= self.config.photos_per_visitation {
                continue;
            }

            let bbox = pad_box(
                detection.bbox.to_pixels(width, height),
                self.config.crop_padding,
                width,
                height,
            );
            let Some(crop) = crop_region(frame, bbox) else {
                debug!("Skipping zero-area detection box in visitation {}", visitation.id);
                continue;
            };

            self.sink.submit(Capture {
                image: crop,
                visitation_id: visitation.id,
                detection_score: detection.score,
                photo_type: PhotoType::Boxed,
                bbox: Some(bbox),
                classifications: Vec::new(),
                timestamp: now,
            });
            visitation.photo_count += 1;
        }

        if visitation.full_photo_count < self.config.full_photos_per_visitation {
            self.sink.submit(Capture {
                image: frame.clone(),
                visitation_id: visitation.id,
                detection_score: best_score,
                photo_type: PhotoType::Full,
                bbox: None,
                classifications: Vec::new(),
                timestamp: now,
            });
            visitation.full_photo_count += 1;
        }
    }
}

fn seconds(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
