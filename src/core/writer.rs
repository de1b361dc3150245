//! Shapefile output
//!
//! The output is written into a staging directory created inside the
//! destination, then moved next to it component by component. A failure
//! while the shapefile is being written drops the staging directory before
//! anything in the destination is touched. The final renames are not a
//! single atomic step: one failing part way leaves a mix of old and new
//! components.

use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use shapefile::dbase;
use shapefile::Shape;

use super::error::{ExportError, Result};
use super::model::GeoRecord;

/// Components produced by the shapefile writer.
const WRITTEN_EXTENSIONS: [&str; 3] = ["shp", "shx", "dbf"];

/// Sidecars copied from the source when present.
const SIDECAR_EXTENSIONS: [&str; 2] = ["prj", "cpg"];

/// Write `records` as `<dest_dir>/<name>.shp` (plus `.shx`/`.dbf`), reusing
/// the source attribute table layout, and return the `.shp` path.
///
/// Any existing `<name>.*` files are replaced. Projection and code page
/// sidecars of `source` are carried over.
///
/// Records with a null geometry cannot go through the typed shapefile
/// writer; the first one aborts the write with [`ExportError::NullGeometry`]
/// and the destination is left as it was.
pub fn write_shapefile<'a, I>(
    table_info: dbase::TableInfo,
    records: I,
    source: &Path,
    dest_dir: &Path,
    name: &str,
) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a GeoRecord>,
{
    fs::create_dir_all(dest_dir).map_err(|e| ExportError::io(dest_dir, e))?;

    let staging = tempfile::Builder::new()
        .prefix(".shp_dedup-")
        .tempdir_in(dest_dir)
        .map_err(|e| ExportError::io(dest_dir, e))?;
    let staged_shp = staging.path().join(format!("{name}.shp"));

    {
        let mut writer = shapefile::Writer::from_path_with_info(&staged_shp, table_info)
            .map_err(|source| ExportError::WriteShapefile {
                path: staged_shp.clone(),
                source,
            })?;

        let mut written = 0usize;
        for (index, rec) in records.into_iter().enumerate() {
            write_record(&mut writer, rec, index).map_err(|e| match e {
                WriteFailure::Shapefile(source) => ExportError::WriteShapefile {
                    path: staged_shp.clone(),
                    source,
                },
                WriteFailure::NullGeometry(index) => ExportError::NullGeometry { index },
            })?;
            written += 1;
        }
        debug!("staged {written} records in {}", staged_shp.display());
    }

    for ext in SIDECAR_EXTENSIONS {
        let from = source.with_extension(ext);
        if from.is_file() {
            let to = staged_shp.with_extension(ext);
            fs::copy(&from, &to).map_err(|e| ExportError::io(&from, e))?;
        }
    }

    for ext in WRITTEN_EXTENSIONS {
        let staged = staged_shp.with_extension(ext);
        if !staged.is_file() {
            return Err(ExportError::io(
                &staged,
                std::io::Error::new(std::io::ErrorKind::NotFound, "writer produced no file"),
            ));
        }
    }

    let target_shp = dest_dir.join(format!("{name}.shp"));
    for ext in WRITTEN_EXTENSIONS.iter().chain(SIDECAR_EXTENSIONS.iter()) {
        let staged = staged_shp.with_extension(ext);
        let target = target_shp.with_extension(ext);
        if staged.is_file() {
            fs::rename(&staged, &target).map_err(|e| ExportError::io(&target, e))?;
        } else if target.is_file() {
            // left over from an earlier run against a source with this sidecar
            fs::remove_file(&target).map_err(|e| ExportError::io(&target, e))?;
        }
    }

    if let Err(e) = staging.close() {
        warn!("could not remove staging directory: {e}");
    }

    Ok(target_shp)
}

enum WriteFailure {
    Shapefile(shapefile::Error),
    NullGeometry(usize),
}

impl From<shapefile::Error> for WriteFailure {
    fn from(e: shapefile::Error) -> Self {
        WriteFailure::Shapefile(e)
    }
}

fn write_record<T>(
    writer: &mut shapefile::Writer<T>,
    rec: &GeoRecord,
    index: usize,
) -> std::result::Result<(), WriteFailure>
where
    T: Write + Seek,
{
    let record = &rec.record;
    match &rec.shape {
        Shape::Point(s) => writer.write_shape_and_record(s, record)?,
        Shape::PointM(s) => writer.write_shape_and_record(s, record)?,
        Shape::PointZ(s) => writer.write_shape_and_record(s, record)?,
        Shape::Polyline(s) => writer.write_shape_and_record(s, record)?,
        Shape::PolylineM(s) => writer.write_shape_and_record(s, record)?,
        Shape::PolylineZ(s) => writer.write_shape_and_record(s, record)?,
        Shape::Polygon(s) => writer.write_shape_and_record(s, record)?,
        Shape::PolygonM(s) => writer.write_shape_and_record(s, record)?,
        Shape::PolygonZ(s) => writer.write_shape_and_record(s, record)?,
        Shape::Multipoint(s) => writer.write_shape_and_record(s, record)?,
        Shape::MultipointM(s) => writer.write_shape_and_record(s, record)?,
        Shape::MultipointZ(s) => writer.write_shape_and_record(s, record)?,
        Shape::Multipatch(s) => writer.write_shape_and_record(s, record)?,
        Shape::NullShape => return Err(WriteFailure::NullGeometry(index)),
    }
    Ok(())
}
