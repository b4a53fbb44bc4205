//! Record merging
//!
//! Combines one query row, its cached web extract and its offline
//! reference record into one [`FinalRecord`] under fixed precedence
//! rules:
//!
//! - genus/species prefer the web-derived value and fall back to the
//!   tokens of the query row's species name;
//! - every other web-derived field is taken as-is from the extract,
//!   blank if unavailable, never backfilled from the offline table;
//! - every offline-derived field is taken as-is from the reference
//!   record, blank if unavailable, never backfilled from the web.
//!
//! A handful of output columns are process-wide constants (library code,
//! collection country) or always-blank placeholders.

use crate::cache::EnrichmentCache;
use crate::offline::OfflineLookup;
use specimen_common::types::{
    split_species_name, FinalRecord, OfflineRecord, QueryRow, WebExtract, COLLECTION_COUNTRY,
    LIBRARY_CODE,
};
use tracing::debug;

/// Render a barcode as an 8-digit zero-padded string.
///
/// Input width varies between source spreadsheets; the output schema
/// always uses 8 digits.
pub fn format_barcode(raw: &str) -> String {
    format!("{:0>8}", raw)
}

/// Merge one query row with its web and offline data.
///
/// `web` and `offline` are the lookup results for this row; `None`
/// degrades to the documented placeholders so that every query row
/// always produces exactly one record.
pub fn merge_row(
    query: &QueryRow,
    web: Option<WebExtract>,
    offline: Option<&OfflineRecord>,
) -> FinalRecord {
    let web = web.unwrap_or_else(|| WebExtract::from_species_tokens(&query.species_name));
    let blank = OfflineRecord::default();
    let offline = offline.unwrap_or(&blank);

    // Web precedence for genus/species, query tokens as fallback; the
    // offline latin name is deliberately not consulted here.
    let (query_genus, query_species) = split_species_name(&query.species_name);
    let genus = if web.genus.is_empty() {
        query_genus
    } else {
        web.genus
    };
    let species = if web.species.is_empty() {
        query_species
    } else {
        web.species
    };

    FinalRecord {
        library_code: LIBRARY_CODE.to_string(),
        serial_number: query.serial_number.clone(),
        barcode: format_barcode(&query.barcode),
        pattern_type: String::new(),
        inventory: String::new(),
        specimen_condition: String::new(),
        collectors: offline.collectors.clone(),
        collection_id: format!("{}-{}", offline.species_code, query.copy_number),
        collection_date: offline.collection_date.clone(),
        collection_country: COLLECTION_COUNTRY.to_string(),
        province_and_city: format!("{},{}", offline.province, offline.city),
        county: String::new(),
        altitude: offline.altitude.clone(),
        negative_altitude: String::new(),
        family: offline.family.clone(),
        genus,
        species,
        namer: web.namer,
        level: String::new(),
        chinese_name: offline.chinese_name.clone(),
        identifier: offline.identifier.clone(),
        identify_date: offline.identify_date.clone(),
        remarks: String::new(),
        place_name: offline.place_name.clone(),
        habitat: web.habitat,
        longitude: offline.longitude.clone(),
        latitude: offline.latitude.clone(),
        remarks_2: String::new(),
        inputer: offline.inputer.clone(),
        input_date: offline.input_date.clone(),
        habit: offline.habit.clone(),
        body_height: web.body_height,
        dbh: web.dbh,
        stem: web.stem,
        leaf: web.leaf,
        flower: web.flower,
        fruit: web.fruit,
        host: web.host,
    }
}

/// Merge every query row against the caches, preserving input row order.
pub fn merge_all(
    rows: &[QueryRow],
    cache: &EnrichmentCache,
    offline: &OfflineLookup,
) -> Vec<FinalRecord> {
    let records: Vec<FinalRecord> = rows
        .iter()
        .map(|query| {
            let web = cache.get(&query.species_name);
            let reference = offline.lookup(&query.collection_id_prefix);
            merge_row(query, web, reference)
        })
        .collect();

    debug!(records = records.len(), "Merged final records");
    records
}
