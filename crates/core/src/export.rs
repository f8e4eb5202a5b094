//! Flat-file export of the filtered records.
//!
//! Columns are Name, Location, Image with a header row first. Quoting follows
//! RFC 4180 via the `csv` crate.
//!
//! Every row is read before anything is written, and files are replaced
//! through a temporary sibling, so a failed export leaves the previous file
//! untouched.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Record};

/// Header row of the export.
pub const CSV_HEADER: [&str; 3] = ["Name", "Location", "Image"];

/// Default destination, relative to the working directory.
pub const DEFAULT_EXPORT_PATH: &str = "characters.csv";

/// Write the header and one row per record to `writer`.
///
/// Returns the number of data rows written. Nothing reaches `writer` if any
/// record lacks a column.
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> Result<usize, Error> {
    let rows = records.iter().map(row).collect::<Result<Vec<_>, Error>>()?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(CSV_HEADER)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}

fn row(record: &Record) -> Result<[&str; 3], Error> {
    Ok([record.name()?, record.location_name()?, record.image()?])
}

/// Export to `path`, replacing any existing file once every row is written.
pub fn export_csv(records: &[Record], path: &Path) -> Result<usize, Error> {
    let export_error = |reason: String| Error::Export(format!("{}: {}", path.display(), reason));

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| export_error(e.to_string()))?;

    let rows = write_csv(records, staged.as_file_mut())?;
    staged.persist(path).map_err(|e| export_error(e.to_string()))?;

    tracing::info!(rows, path = %path.display(), "saved characters");

    Ok(rows)
}
