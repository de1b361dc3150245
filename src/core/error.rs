//! Error types for the export pipeline

use std::path::PathBuf;
use thiserror::Error;

use shapefile::dbase;

/// Every condition that aborts an export run.
///
/// None of these are fatal to the host: the caller reports the message and
/// may start another run.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("source directory does not exist: {}", .0.display())]
    MissingSourceDirectory(PathBuf),

    #[error("no shapefile found in {}", .0.display())]
    NoShapefileFound(PathBuf),

    #[error("{} has no '{field}' column", .path.display())]
    MissingRequiredField { path: PathBuf, field: String },

    #[error("no columns selected for duplicate detection")]
    EmptySelection,

    #[error("column '{column}' not found in {}", .path.display())]
    UnknownColumn { path: PathBuf, column: String },

    #[error("{} has {shapes} shapes but {records} attribute records", .path.display())]
    RecordCountMismatch {
        path: PathBuf,
        shapes: usize,
        records: usize,
    },

    #[error("failed to read shapefile {}", .path.display())]
    ReadShapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("failed to read attribute table {}", .path.display())]
    ReadTable {
        path: PathBuf,
        #[source]
        source: dbase::Error,
    },

    #[error("failed to write shapefile {}", .path.display())]
    WriteShapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("output record {index} has no geometry; null shapes cannot be written")]
    NullGeometry { index: usize },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
