//! A single visitation window.

use chrono::NaiveDateTime;
use uuid::Uuid;

/// One continuous period during which a bird is present.
///
/// The id is assigned at creation and never changes. `end_time` stays unset
/// while the visitation is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitation {
    /// Unique identifier.
    pub id: Uuid,
    /// When the visitation began.
    pub start_time: NaiveDateTime,
    /// When the visitation ended, once closed.
    pub end_time: Option<NaiveDateTime>,
    /// Boxed photos captured so far.
    pub photo_count: u32,
    /// Full-frame photos captured so far.
    pub full_photo_count: u32,
}

impl Visitation {
    /// Start a new visitation at `now` with a fresh id and zeroed counters.
    pub fn begin(now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: now,
            end_time: None,
            photo_count: 0,
            full_photo_count: 0,
        }
    }

    /// Whether the visitation has been closed.
    pub const fn is_closed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Seconds between start and end, once closed.
    pub fn duration_seconds(&self) -> Option<i64> {
        self.end_time
            .map(|end| end.signed_duration_since(self.start_time).num_seconds())
    }
}
