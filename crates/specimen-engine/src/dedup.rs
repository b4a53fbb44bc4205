//! Distinct-species set derivation
//!
//! The set of unique normalized species names bounds the number of web
//! fetches: a species appearing in N query rows is fetched at most once.

use specimen_common::types::QueryRow;
use std::collections::BTreeSet;

/// Compute the set of distinct normalized species names in the query rows.
///
/// The result is ordered (BTreeSet) so downstream iteration and logging
/// are deterministic.
pub fn distinct_species(rows: &[QueryRow]) -> BTreeSet<String> {
    rows.iter().map(|row| row.species_name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(species: &str) -> QueryRow {
        QueryRow {
            collection_id_prefix: "113678".to_string(),
            serial_number: "113678".to_string(),
            barcode: "98484".to_string(),
            species_name: species.to_string(),
            copy_number: "1".to_string(),
        }
    }

    #[test]
    fn test_distinct_species_bounds_row_count() {
        let rows = vec![
            row("Stellaria media"),
            row("Stellaria media"),
            row("Eupatorium coelestinum"),
            row("Stellaria media"),
        ];

        let species = distinct_species(&rows);
        assert!(species.len() <= rows.len());
        assert_eq!(species.len(), 2);
        assert!(species.contains("Stellaria media"));
        assert!(species.contains("Eupatorium coelestinum"));
    }

    #[test]
    fn test_distinct_species_empty() {
        assert!(distinct_species(&[]).is_empty());
    }
}
