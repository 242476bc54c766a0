//! Online visitation tracking.

mod tracker;
mod visitation;

pub use tracker::VisitationTracker;
pub use visitation::Visitation;
