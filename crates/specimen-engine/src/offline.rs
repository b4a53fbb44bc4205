//! Offline reference lookup
//!
//! Identifier-keyed index over the curated reference table. Built once
//! per run; misses are expected and fall back to an all-blank placeholder
//! at the merge stage, never an error.

use specimen_common::types::OfflineRecord;
use std::collections::HashMap;
use tracing::debug;

/// Index from collection id prefix (species code) to its reference record
pub struct OfflineLookup {
    records: HashMap<String, OfflineRecord>,
}

impl OfflineLookup {
    /// Build the index by scanning the records once.
    ///
    /// Records with a blank key are skipped silently; a duplicate key
    /// keeps the last occurrence, matching source row order.
    pub fn build(records: Vec<OfflineRecord>) -> Self {
        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            if record.species_code.is_empty() {
                continue;
            }
            map.insert(record.species_code.clone(), record);
        }
        debug!(keys = map.len(), "Built offline lookup");
        Self { records: map }
    }

    /// Look up the record for a collection id prefix.
    pub fn lookup(&self, key: &str) -> Option<&OfflineRecord> {
        self.records.get(key)
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
