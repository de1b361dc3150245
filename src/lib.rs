//! Shapefile duplicate exporter
//!
//! Finds the records of a shapefile that are duplicated on a chosen set of
//! attribute columns and writes them out as a new shapefile.

pub mod core;
pub mod scanner;
pub mod reporting;

pub use crate::core::exporter;
pub use crate::scanner::file_scanner;
pub use crate::reporting::report_writer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::error::ExportError;
    pub use crate::core::exporter::{
        discover_columns, DuplicateExporter, ExportOutcome, ExportRequest,
        DEFAULT_OUTPUT_NAME, DEFAULT_REQUIRED_FIELD,
    };
    pub use crate::core::loader::{load_collection, read_columns};
    pub use crate::core::model::{AttributeValue, ColumnInfo, GeoRecord, RecordCollection};
    pub use crate::core::progress::{ProgressSink, SilentSink};
    pub use crate::core::writer::write_shapefile;
    pub use crate::scanner::file_scanner::{collect_shapefiles, first_shapefile};
    pub use crate::scanner::duplicate_detector::{
        duplicate_indices, find_duplicate_groups, DuplicateGroup,
    };
    pub use crate::reporting::report_writer::{compute_file_hash, write_report};
}
