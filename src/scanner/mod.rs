//! Shapefile discovery and duplicate detection

pub mod file_scanner;
pub mod duplicate_detector;

pub use file_scanner::{collect_shapefiles, first_shapefile};
pub use duplicate_detector::{duplicate_indices, find_duplicate_groups, DuplicateGroup};
