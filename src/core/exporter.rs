//! The duplicate export pipeline
//!
//! locate file → load → check required field → check selection → filter → write

use std::path::{Path, PathBuf};

use log::info;

use super::error::{ExportError, Result};
use super::loader::{load_collection, read_columns};
use super::model::ColumnInfo;
use super::progress::ProgressSink;
use super::writer::write_shapefile;
use crate::scanner::duplicate_detector::{duplicate_indices, find_duplicate_groups, DuplicateGroup};
use crate::scanner::file_scanner::first_shapefile;

/// Column every input must carry.
pub const DEFAULT_REQUIRED_FIELD: &str = "RefPM";

/// Base name of the written shapefile.
pub const DEFAULT_OUTPUT_NAME: &str = "duplicates";

/// Inputs of one export run
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub source_dir: PathBuf,
    /// `None` or an empty path computes the duplicates without writing them.
    pub destination_dir: Option<PathBuf>,
    pub selected_columns: Vec<String>,
}

impl ExportRequest {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Default::default()
        }
    }

    pub fn destination(mut self, dir: impl Into<PathBuf>) -> Self {
        self.destination_dir = Some(dir.into());
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    fn destination_path(&self) -> Option<&Path> {
        self.destination_dir
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// What a successful run found and wrote
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub source_file: PathBuf,
    /// Selection after collapsing repeated names
    pub selected_columns: Vec<String>,
    pub total_records: usize,
    pub groups: Vec<DuplicateGroup>,
    /// Positions of the exported records in the source, ascending
    pub duplicate_indices: Vec<usize>,
    /// `.shp` written, if a destination was given
    pub output: Option<PathBuf>,
}

impl ExportOutcome {
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_indices.len()
    }
}

/// Finds the records of a shapefile duplicated on a set of columns and
/// writes them to a new shapefile.
///
/// Stateless between runs; every call re-reads the source.
#[derive(Debug, Clone)]
pub struct DuplicateExporter {
    required_field: String,
    output_name: String,
}

impl Default for DuplicateExporter {
    fn default() -> Self {
        Self {
            required_field: DEFAULT_REQUIRED_FIELD.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

impl DuplicateExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_field(mut self, field: impl Into<String>) -> Self {
        self.required_field = field.into();
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    pub fn required_field(&self) -> &str {
        &self.required_field
    }

    /// Run one export, reporting to `sink`.
    ///
    /// Failures are sent to the sink as a status line and returned; nothing
    /// is written to the destination unless every check passed.
    pub fn run<S: ProgressSink>(&self, request: &ExportRequest, sink: &S) -> Result<ExportOutcome> {
        match self.try_run(request, sink) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                sink.status(&describe(&e));
                Err(e)
            }
        }
    }

    fn try_run<S: ProgressSink>(&self, request: &ExportRequest, sink: &S) -> Result<ExportOutcome> {
        let source_file = first_shapefile(&request.source_dir)?;
        info!("loading {}", source_file.display());
        let collection = load_collection(&source_file)?;

        if !collection.has_column(&self.required_field) {
            return Err(ExportError::MissingRequiredField {
                path: source_file,
                field: self.required_field.clone(),
            });
        }

        let selected_columns = dedup_selection(&request.selected_columns);
        if selected_columns.is_empty() {
            return Err(ExportError::EmptySelection);
        }
        if let Some(column) = selected_columns.iter().find(|c| !collection.has_column(c)) {
            return Err(ExportError::UnknownColumn {
                path: source_file,
                column: column.clone(),
            });
        }

        let groups = find_duplicate_groups(&collection.records, &selected_columns);
        let indices = duplicate_indices(&groups);
        info!(
            "{} of {} records duplicated on [{}]",
            indices.len(),
            collection.len(),
            selected_columns.join(", ")
        );
        sink.progress(50);

        let total_records = collection.len();
        let output = match request.destination_path() {
            Some(dest) => {
                let records = &collection.records;
                let written = write_shapefile(
                    collection.table_info,
                    indices.iter().map(|&i| &records[i]),
                    &source_file,
                    dest,
                    &self.output_name,
                )?;
                sink.progress(100);
                sink.status(&format!(
                    "{} duplicate records saved to {}",
                    indices.len(),
                    written.display()
                ));
                Some(written)
            }
            None => {
                sink.status(&format!(
                    "{} duplicate records found; no destination given, nothing written",
                    indices.len()
                ));
                None
            }
        };

        Ok(ExportOutcome {
            source_file,
            selected_columns,
            total_records,
            groups,
            duplicate_indices: indices,
            output,
        })
    }
}

/// Attribute columns of the first shapefile in `source_dir`, in file order.
pub fn discover_columns(source_dir: &Path) -> Result<Vec<ColumnInfo>> {
    let source_file = first_shapefile(source_dir)?;
    read_columns(&source_file)
}

/// The error message followed by each underlying cause.
fn describe(err: &ExportError) -> String {
    use std::error::Error as _;

    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}

fn dedup_selection(columns: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(columns.len());
    for column in columns {
        if !seen.contains(column) {
            seen.push(column.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_selection_keeps_first_order() {
        let cols: Vec<String> = ["B", "A", "B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(dedup_selection(&cols), vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_empty_destination_means_no_output() {
        let request = ExportRequest::new("/src").destination("");
        assert!(request.destination_path().is_none());

        let request = ExportRequest::new("/src").destination("/out");
        assert_eq!(request.destination_path(), Some(Path::new("/out")));
    }

    #[test]
    fn test_describe_appends_underlying_cause() {
        let err = ExportError::Io {
            path: PathBuf::from("/out/duplicates.shp"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(describe(&err), "I/O error on /out/duplicates.shp: read-only");
        assert_eq!(describe(&ExportError::EmptySelection), ExportError::EmptySelection.to_string());
    }

    #[test]
    fn test_exporter_defaults() {
        let exporter = DuplicateExporter::new();
        assert_eq!(exporter.required_field(), "RefPM");
        assert_eq!(exporter.output_name, "duplicates");
    }
}
