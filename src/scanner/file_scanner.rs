//! Shapefile discovery in a source directory

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::core::error::{ExportError, Result};

/// Collect all `.shp` files directly inside a directory
///
/// # Arguments
/// * `dir` - Directory to scan (not recursed into)
///
/// # Returns
/// Shapefile paths in directory-listing order
pub fn collect_shapefiles(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ExportError::MissingSourceDirectory(dir.to_path_buf()));
    }

    let mut shapefiles = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ExportError::io(dir, e))? {
        let entry = entry.map_err(|e| ExportError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| ExportError::io(entry.path(), e))?;
        if file_type.is_file() {
            if let Some(ext) = entry.path().extension() {
                if ext.to_string_lossy().to_lowercase() == "shp" {
                    shapefiles.push(entry.path());
                }
            }
        }
    }

    Ok(shapefiles)
}

/// The shapefile an export works on: the first one listed.
///
/// Listing order is platform dependent, so when several shapefiles are
/// present the choice is logged.
pub fn first_shapefile(dir: &Path) -> Result<PathBuf> {
    let shapefiles = collect_shapefiles(dir)?;
    if shapefiles.len() > 1 {
        warn!(
            "{} shapefiles in {}, using {}",
            shapefiles.len(),
            dir.display(),
            shapefiles[0].display()
        );
    }
    shapefiles
        .into_iter()
        .next()
        .ok_or_else(|| ExportError::NoShapefileFound(dir.to_path_buf()))
}
