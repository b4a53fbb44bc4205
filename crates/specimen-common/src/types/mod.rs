//! Domain row types and fixed table shapes
//!
//! The pipeline reconciles three tabular sources: the user query table,
//! the curated offline reference table and the per-species web extract.
//! All three are projected into the plain string structs below; the merge
//! phase flattens them into one [`FinalRecord`] per query row.
//!
//! Every field of every type is a plain `String` that is always populated,
//! possibly with an empty value; downstream writers never branch on field
//! presence.

use serde::{Deserialize, Serialize};

// ============================================================================
// Fixed table shapes
// ============================================================================

/// Number of columns in the query table
pub const QUERY_COLUMNS: usize = 4;

/// Number of columns in the offline reference table
pub const OFFLINE_COLUMNS: usize = 19;

/// Number of columns in the output table
pub const FINAL_COLUMNS: usize = 38;

/// Number of fields in a persisted web extract
pub const WEB_EXTRACT_FIELDS: usize = 11;

/// Herbarium library code, constant for every output row
pub const LIBRARY_CODE: &str = "FUS";

/// Collection country, constant for every output row
pub const COLLECTION_COUNTRY: &str = "中国";

/// Header labels of the output table, in output column order
pub const FIELD_LABELS: [&str; FINAL_COLUMNS] = [
    "馆代码",
    "流水号",
    "条形码",
    "模式类型",
    "库存",
    "标本状态",
    "采集人",
    "采集号",
    "采集日期",
    "国家",
    "省市",
    "区县",
    "海拔",
    "负海拔",
    "科",
    "属",
    "种",
    "定名人",
    "种下等级",
    "中文名",
    "鉴定人",
    "鉴定日期",
    "备注",
    "地名",
    "生境",
    "经度",
    "纬度",
    "备注2",
    "录入员",
    "录入日期",
    "习性",
    "体高",
    "胸径",
    "茎",
    "叶",
    "花",
    "果实",
    "寄主",
];

/// Collapse internal whitespace runs to single spaces and trim the ends.
///
/// Species names are normalized this way before any keyed use, so that
/// `"Stellaria  media "` and `"Stellaria media"` hit the same cache and
/// lookup entries.
pub fn normalize_species_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a normalized species name into its genus and species parts.
///
/// The first token is the genus; everything after it (including
/// infra-specific epithets) is the species part. A single-token name
/// yields an empty species part.
pub fn split_species_name(name: &str) -> (String, String) {
    let mut tokens = name.split_whitespace();
    let genus = tokens.next().unwrap_or_default().to_string();
    let species = tokens.collect::<Vec<_>>().join(" ");
    (genus, species)
}

// ============================================================================
// Input projections
// ============================================================================

/// One row of the query table, identifying a specimen to process
///
/// The first query column doubles as the serial number of the specimen
/// and as the collection id prefix used to join against the offline
/// reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRow {
    /// Reference-table join key (first query column)
    pub collection_id_prefix: String,

    /// Specimen serial number (same source cell as the prefix)
    pub serial_number: String,

    /// Specimen barcode; rendered zero-padded to 8 digits on output
    pub barcode: String,

    /// Whitespace-normalized latin species name
    pub species_name: String,

    /// Copy number of the specimen within its accession batch
    pub copy_number: String,
}

/// One row of the offline reference table, in its fixed column order
///
/// Immutable once loaded. Keyed by `species_code` (the collection id
/// prefix) in the offline lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineRecord {
    pub species_code: String,
    pub chinese_name: String,
    pub latin_name: String,
    pub family_cn: String,
    pub family: String,
    pub province: String,
    pub city: String,
    pub place_name: String,
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
    pub collection_date: String,
    pub copy_count: String,
    pub habit: String,
    pub collectors: String,
    pub identifier: String,
    pub identify_date: String,
    pub inputer: String,
    pub input_date: String,
}

// ============================================================================
// Web extract
// ============================================================================

/// Fields extracted from one species' taxonomic web page
///
/// Constructed at most once per distinct species name per cache lifetime
/// and treated as immutable afterwards. Persisted in the enrichment cache
/// as an 11-element ordered list of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebExtract {
    pub genus: String,
    pub species: String,
    pub namer: String,
    pub habitat: String,
    pub body_height: String,
    pub dbh: String,
    pub stem: String,
    pub leaf: String,
    pub flower: String,
    pub fruit: String,
    pub host: String,
}

impl WebExtract {
    /// Synthesize an extract from the tokens of a species name, with all
    /// web-derived fields blank.
    ///
    /// Used when a species has no cache entry and when the page fetch
    /// fails outright.
    pub fn from_species_tokens(species_name: &str) -> Self {
        let (genus, species) = split_species_name(species_name);
        Self {
            genus,
            species,
            ..Self::default()
        }
    }

    /// Flatten into the persisted field order.
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.genus.clone(),
            self.species.clone(),
            self.namer.clone(),
            self.habitat.clone(),
            self.body_height.clone(),
            self.dbh.clone(),
            self.stem.clone(),
            self.leaf.clone(),
            self.flower.clone(),
            self.fruit.clone(),
            self.host.clone(),
        ]
    }

    /// Rebuild from the persisted field order; missing trailing fields
    /// come back as empty strings.
    pub fn from_fields(fields: &[String]) -> Self {
        let get = |i: usize| fields.get(i).cloned().unwrap_or_default();
        Self {
            genus: get(0),
            species: get(1),
            namer: get(2),
            habitat: get(3),
            body_height: get(4),
            dbh: get(5),
            stem: get(6),
            leaf: get(7),
            flower: get(8),
            fruit: get(9),
            host: get(10),
        }
    }
}

// ============================================================================
// Output record
// ============================================================================

/// The fully merged 38-field output row for one specimen
///
/// Field order matches [`FIELD_LABELS`]. Constructed once per query row
/// and handed to the output writer, never mutated again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRecord {
    pub library_code: String,
    pub serial_number: String,
    pub barcode: String,
    pub pattern_type: String,
    pub inventory: String,
    pub specimen_condition: String,
    pub collectors: String,
    pub collection_id: String,
    pub collection_date: String,
    pub collection_country: String,
    pub province_and_city: String,
    pub county: String,
    pub altitude: String,
    pub negative_altitude: String,
    pub family: String,
    pub genus: String,
    pub species: String,
    pub namer: String,
    pub level: String,
    pub chinese_name: String,
    pub identifier: String,
    pub identify_date: String,
    pub remarks: String,
    pub place_name: String,
    pub habitat: String,
    pub longitude: String,
    pub latitude: String,
    pub remarks_2: String,
    pub inputer: String,
    pub input_date: String,
    pub habit: String,
    pub body_height: String,
    pub dbh: String,
    pub stem: String,
    pub leaf: String,
    pub flower: String,
    pub fruit: String,
    pub host: String,
}

impl FinalRecord {
    /// Flatten into output column order (matching [`FIELD_LABELS`]).
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.library_code.clone(),
            self.serial_number.clone(),
            self.barcode.clone(),
            self.pattern_type.clone(),
            self.inventory.clone(),
            self.specimen_condition.clone(),
            self.collectors.clone(),
            self.collection_id.clone(),
            self.collection_date.clone(),
            self.collection_country.clone(),
            self.province_and_city.clone(),
            self.county.clone(),
            self.altitude.clone(),
            self.negative_altitude.clone(),
            self.family.clone(),
            self.genus.clone(),
            self.species.clone(),
            self.namer.clone(),
            self.level.clone(),
            self.chinese_name.clone(),
            self.identifier.clone(),
            self.identify_date.clone(),
            self.remarks.clone(),
            self.place_name.clone(),
            self.habitat.clone(),
            self.longitude.clone(),
            self.latitude.clone(),
            self.remarks_2.clone(),
            self.inputer.clone(),
            self.input_date.clone(),
            self.habit.clone(),
            self.body_height.clone(),
            self.dbh.clone(),
            self.stem.clone(),
            self.leaf.clone(),
            self.flower.clone(),
            self.fruit.clone(),
            self.host.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_species_name() {
        assert_eq!(
            normalize_species_name("  Stellaria   media "),
            "Stellaria media"
        );
        assert_eq!(normalize_species_name("Pinus"), "Pinus");
        assert_eq!(normalize_species_name(""), "");
    }

    #[test]
    fn test_split_species_name() {
        let (genus, species) = split_species_name("Eupatorium coelestinum");
        assert_eq!(genus, "Eupatorium");
        assert_eq!(species, "coelestinum");

        let (genus, species) = split_species_name("Rosa multiflora var. cathayensis");
        assert_eq!(genus, "Rosa");
        assert_eq!(species, "multiflora var. cathayensis");

        let (genus, species) = split_species_name("Pinus");
        assert_eq!(genus, "Pinus");
        assert_eq!(species, "");
    }

    #[test]
    fn test_web_extract_field_round_trip() {
        let extract = WebExtract {
            genus: "Stellaria".to_string(),
            species: "media".to_string(),
            namer: "(L.) Cyr.".to_string(),
            stem: "茎俯仰或上升".to_string(),
            ..WebExtract::default()
        };

        let fields = extract.to_fields();
        assert_eq!(fields.len(), WEB_EXTRACT_FIELDS);
        assert_eq!(WebExtract::from_fields(&fields), extract);
    }

    #[test]
    fn test_web_extract_from_short_field_list() {
        let fields = vec!["Pinus".to_string(), "massoniana".to_string()];
        let extract = WebExtract::from_fields(&fields);
        assert_eq!(extract.genus, "Pinus");
        assert_eq!(extract.species, "massoniana");
        assert_eq!(extract.host, "");
    }

    #[test]
    fn test_from_species_tokens() {
        let extract = WebExtract::from_species_tokens("Eupatorium coelestinum");
        assert_eq!(extract.genus, "Eupatorium");
        assert_eq!(extract.species, "coelestinum");
        assert_eq!(extract.namer, "");

        let extract = WebExtract::from_species_tokens("Pinus");
        assert_eq!(extract.genus, "Pinus");
        assert_eq!(extract.species, "");
    }

    #[test]
    fn test_final_record_row_width() {
        let record = FinalRecord::default();
        assert_eq!(record.to_row().len(), FINAL_COLUMNS);
        assert_eq!(FIELD_LABELS.len(), FINAL_COLUMNS);
    }
}
