//! CSV adapters for the input and output tables
//!
//! Inputs are read as raw rectangular string tables; all shape checking
//! happens in the engine's validation phase, so the reader is flexible
//! about row widths and never interprets a header itself.
//!
//! The output writer falls back to an alternative file name when the
//! primary path cannot be written, which typically means the previous
//! output is still open in a spreadsheet program.

use crate::error::{CliError, Result};
use specimen_common::types::{FinalRecord, FIELD_LABELS};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Read a CSV file into a raw table of trimmed-as-read string cells.
pub fn read_table(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CliError::table_read(path.display().to_string(), e))?;

    let mut table = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CliError::table_read(path.display().to_string(), e))?;
        table.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(table)
}

/// Alternative output path used when the primary path is not writable:
/// `out.csv` becomes `out.alt.csv`.
pub fn alternative_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let alt_name = match path.extension() {
        Some(ext) => format!("{}.alt.{}", stem, ext.to_string_lossy()),
        None => format!("{}.alt", stem),
    };
    path.with_file_name(alt_name)
}

/// Write the output table: the fixed header row followed by one row per
/// record, in record order.
///
/// Returns the path actually written. When the primary path fails the
/// alternative path is tried once; failure of both is an error.
pub fn write_records(path: impl AsRef<Path>, records: &[FinalRecord]) -> Result<PathBuf> {
    let path = path.as_ref();
    match write_to(path, records) {
        Ok(()) => Ok(path.to_path_buf()),
        Err(primary_err) => {
            let alt = alternative_path(path);
            warn!(
                path = %path.display(),
                alt = %alt.display(),
                error = %primary_err,
                "Primary output path not writable, trying alternative"
            );
            write_to(&alt, records)
                .map_err(|_| CliError::OutputWrite(path.display().to_string()))?;
            Ok(alt)
        }
    }
}

fn write_to(path: &Path, records: &[FinalRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(FIELD_LABELS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;
    Ok(())
}
