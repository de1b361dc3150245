//! Shapefile loading
//!
//! A shapefile is read as two halves: geometries from the `.shp` and the
//! attribute table from the sibling `.dbf`. They are zipped back together
//! by position.

use std::path::Path;

use log::debug;
use shapefile::dbase;

use super::error::{ExportError, Result};
use super::model::{ColumnInfo, GeoRecord, RecordCollection};

/// Internal dBase field some readers surface ahead of the real columns.
const DELETION_FLAG: &str = "DeletionFlag";

/// Read only the attribute schema of a shapefile.
pub fn read_columns(shp_path: &Path) -> Result<Vec<ColumnInfo>> {
    let table = open_table(shp_path)?;
    Ok(columns_of(table.fields()))
}

/// Load every record (geometry + attributes) of a shapefile, in file order.
pub fn load_collection(shp_path: &Path) -> Result<RecordCollection> {
    let dbf_path = shp_path.with_extension("dbf");
    let mut table = open_table(shp_path)?;
    let columns = columns_of(table.fields());

    let attributes = table.read().map_err(|source| ExportError::ReadTable {
        path: dbf_path.clone(),
        source,
    })?;
    let table_info = table.into_table_info();

    let shapes = shapefile::read_shapes(shp_path).map_err(|source| ExportError::ReadShapefile {
        path: shp_path.to_path_buf(),
        source,
    })?;

    if shapes.len() != attributes.len() {
        return Err(ExportError::RecordCountMismatch {
            path: shp_path.to_path_buf(),
            shapes: shapes.len(),
            records: attributes.len(),
        });
    }

    debug!(
        "loaded {} records with {} columns from {}",
        shapes.len(),
        columns.len(),
        shp_path.display()
    );

    let records = shapes
        .into_iter()
        .zip(attributes)
        .map(|(shape, record)| GeoRecord { shape, record })
        .collect();

    Ok(RecordCollection {
        path: shp_path.to_path_buf(),
        columns,
        records,
        table_info,
    })
}

fn open_table(shp_path: &Path) -> Result<dbase::Reader<std::io::BufReader<std::fs::File>>> {
    let dbf_path = shp_path.with_extension("dbf");
    dbase::Reader::from_path(&dbf_path).map_err(|source| ExportError::ReadTable {
        path: dbf_path,
        source,
    })
}

fn columns_of(fields: &[dbase::FieldInfo]) -> Vec<ColumnInfo> {
    fields
        .iter()
        .filter(|f| f.name() != DELETION_FLAG)
        .map(|f| ColumnInfo {
            name: f.name().to_string(),
            field_type: format!("{:?}", f.field_type()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_table_is_reported_with_dbf_path() {
        let temp_dir = TempDir::new().unwrap();
        let shp = temp_dir.path().join("lonely.shp");
        std::fs::write(&shp, b"").unwrap();

        match read_columns(&shp) {
            Err(ExportError::ReadTable { path, .. }) => {
                assert_eq!(path, temp_dir.path().join("lonely.dbf"));
            }
            other => panic!("expected ReadTable error, got {:?}", other.map(|c| c.len())),
        }
    }
}
