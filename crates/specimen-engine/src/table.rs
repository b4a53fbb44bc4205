//! Row extraction from raw rectangular tables
//!
//! Normalizes raw tabular input (rows of string cells, as delivered by the
//! external spreadsheet adapters) into typed [`QueryRow`] and
//! [`OfflineRecord`] values. Cells are passed through as-is apart from
//! leading/trailing whitespace stripping; declared column widths are
//! enforced per row.

use specimen_common::types::{
    normalize_species_name, OfflineRecord, QueryRow, OFFLINE_COLUMNS, QUERY_COLUMNS,
};
use specimen_common::{Result, SpecimenError};
use tracing::debug;

/// Extract typed query rows from the raw query table, in source order.
///
/// Rows whose species-name column is entirely blank are skipped. A row
/// with the wrong number of columns is a fatal structural error naming
/// the source and the 1-based row.
pub fn extract_query_rows(table: &[Vec<String>], source: &str) -> Result<Vec<QueryRow>> {
    let mut rows = Vec::with_capacity(table.len());

    for (idx, raw) in table.iter().enumerate() {
        if raw.len() != QUERY_COLUMNS {
            return Err(SpecimenError::structural(
                source,
                idx + 1,
                format!(
                    "expected {} columns in query table, found {}",
                    QUERY_COLUMNS,
                    raw.len()
                ),
            ));
        }

        let cells: Vec<&str> = raw.iter().map(|c| c.trim()).collect();
        if cells[2].is_empty() {
            debug!(source = %source, row = idx + 1, "Skipping query row with blank species name");
            continue;
        }

        rows.push(QueryRow {
            collection_id_prefix: cells[0].to_string(),
            serial_number: cells[0].to_string(),
            barcode: cells[1].to_string(),
            species_name: normalize_species_name(cells[2]),
            copy_number: cells[3].to_string(),
        });
    }

    debug!(source = %source, rows = rows.len(), "Extracted query rows");
    Ok(rows)
}

/// Extract typed offline records from the raw reference table, in source
/// order.
///
/// The reference table carries one header row, which is skipped. Rows
/// whose species-code column is blank are skipped. A row with the wrong
/// number of columns is a fatal structural error.
pub fn extract_offline_records(table: &[Vec<String>], source: &str) -> Result<Vec<OfflineRecord>> {
    let mut records = Vec::with_capacity(table.len().saturating_sub(1));

    for (idx, raw) in table.iter().enumerate().skip(1) {
        if raw.len() != OFFLINE_COLUMNS {
            return Err(SpecimenError::structural(
                source,
                idx + 1,
                format!(
                    "expected {} columns in reference table, found {}",
                    OFFLINE_COLUMNS,
                    raw.len()
                ),
            ));
        }

        let cells: Vec<&str> = raw.iter().map(|c| c.trim()).collect();
        if cells[0].is_empty() {
            debug!(source = %source, row = idx + 1, "Skipping reference row with blank species code");
            continue;
        }

        records.push(OfflineRecord {
            species_code: cells[0].to_string(),
            chinese_name: cells[1].to_string(),
            latin_name: normalize_species_name(cells[2]),
            family_cn: cells[3].to_string(),
            family: cells[4].to_string(),
            province: cells[5].to_string(),
            city: cells[6].to_string(),
            place_name: cells[7].to_string(),
            latitude: cells[8].to_string(),
            longitude: cells[9].to_string(),
            altitude: cells[10].to_string(),
            collection_date: cells[11].to_string(),
            copy_count: cells[12].to_string(),
            habit: cells[13].to_string(),
            collectors: cells[14].to_string(),
            identifier: cells[15].to_string(),
            identify_date: cells[16].to_string(),
            inputer: cells[17].to_string(),
            input_date: cells[18].to_string(),
        });
    }

    debug!(source = %source, records = records.len(), "Extracted offline records");
    Ok(records)
}
