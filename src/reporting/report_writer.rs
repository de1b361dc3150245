//! Report writing functionality

use anyhow::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::core::exporter::ExportOutcome;

/// Output components whose digests are listed in the report
const DIGEST_EXTENSIONS: [&str; 5] = ["shp", "shx", "dbf", "prj", "cpg"];

/// Compute SHA-256 hash of a file
///
/// # Returns
/// Hex-encoded SHA-256 hash string
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Write an export outcome to a text file
///
/// # Arguments
/// * `output_path` - Path to the report file
/// * `outcome` - Result of a successful export run
pub fn write_report(output_path: &Path, outcome: &ExportOutcome) -> Result<()> {
    let mut file = File::create(output_path)?;

    writeln!(file, "Duplicate Export Report")?;
    writeln!(file, "=======================")?;
    writeln!(file, "Source: {}", outcome.source_file.display())?;
    writeln!(file, "Columns: {}", outcome.selected_columns.join(", "))?;
    writeln!(file)?;

    writeln!(file, "Summary Statistics:")?;
    writeln!(file, "-------------------")?;
    writeln!(file, "  Total records: {}", outcome.total_records)?;
    writeln!(file, "  Duplicate records: {}", outcome.duplicate_count())?;
    writeln!(file, "  Duplicate groups: {}", outcome.groups.len())?;
    writeln!(file)?;

    match &outcome.output {
        Some(shp) => {
            writeln!(file, "Output: {}", shp.display())?;
            writeln!(file, "-------")?;
            for ext in DIGEST_EXTENSIONS {
                let component = shp.with_extension(ext);
                if component.is_file() {
                    writeln!(file, "  {}  {}", compute_file_hash(&component)?, component.display())?;
                }
            }
        }
        None => writeln!(file, "Output: none (no destination)")?,
    }
    writeln!(file)?;

    if !outcome.groups.is_empty() {
        writeln!(file, "Duplicate Groups:")?;
        writeln!(file, "-----------------")?;
        for (idx, group) in outcome.groups.iter().enumerate() {
            let key: Vec<String> = outcome
                .selected_columns
                .iter()
                .zip(&group.key)
                .map(|(col, val)| format!("{col}={val}"))
                .collect();
            writeln!(file, "  Group {} ({} records): {}", idx + 1, group.indices.len(), key.join(", "))?;
            let rows: Vec<String> = group.indices.iter().map(|i| i.to_string()).collect();
            writeln!(file, "    Records: {}", rows.join(", "))?;
        }
    }

    Ok(())
}
