//! Offline visitation aggregation and reporting.
//!
//! This module rebuilds visitation history from the photo storage tree:
//! scanning for photo files, reconstructing records from metadata sidecars
//! or legacy filenames, grouping records into visitations, and writing the
//! summary JSON document and daily report text.

mod aggregate;
pub mod command;
mod parser;
mod record;
mod scanner;
mod species;
mod summary;

pub use aggregate::{
    VisitationSummary, build_summary, find_best_photo, group_boxed_records, is_poor,
    split_records, summarize, summarize_groups,
};
pub use parser::parse_photo;
pub use record::PhotoRecord;
pub use scanner::scan_photos;
pub use species::{
    SpeciesObservation, SpeciesStats, create_species_observations, find_all_species, find_species,
    get_scientific_name,
};
pub use summary::{daily_summary_text, format_visitation, write_summary_json};
