//! Persistent enrichment cache
//!
//! Species-name-keyed store of web extracts, persisted as a JSON file
//! across runs so a species is never fetched twice within one cache
//! lifetime. The in-memory map sits behind a mutex: during the fetch
//! phase pool workers insert disjoint keys concurrently, and the merge
//! phase reads single-threaded afterwards.
//!
//! The persistence file maps each species name to an 11-element ordered
//! list of strings and is fully rewritten on every flush, in sorted key
//! order for reproducibility.

use specimen_common::types::WebExtract;
use specimen_common::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Persistent species → [`WebExtract`] mapping
pub struct EnrichmentCache {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, WebExtract>>,
}

impl EnrichmentCache {
    /// Load the cache from `path`.
    ///
    /// An absent file means an empty cache, not an error; a present but
    /// unreadable or malformed file is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.is_file() {
            let raw = std::fs::read_to_string(&path)?;
            let wire: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)?;
            let entries: BTreeMap<String, WebExtract> = wire
                .into_iter()
                .map(|(name, fields)| (name, WebExtract::from_fields(&fields)))
                .collect();
            info!(path = %path.display(), species = entries.len(), "Loaded enrichment cache");
            entries
        } else {
            debug!(path = %path.display(), "No enrichment cache file, starting empty");
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Create an empty cache that will flush to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Path of the persistence file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up the cached extract for a normalized species name.
    pub fn get(&self, species_name: &str) -> Option<WebExtract> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(species_name)
            .cloned()
    }

    /// Return the subset of `names` not already present, in order.
    pub fn get_missing<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        names
            .into_iter()
            .filter(|name| !entries.contains_key(name.as_str()))
            .cloned()
            .collect()
    }

    /// Insert one entry. Safe to call from concurrent fetch workers; no
    /// two workers ever write the same key within one run.
    pub fn put(&self, species_name: String, extract: WebExtract) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(species_name, extract);
    }

    /// Merge many entries into the mapping.
    pub fn put_many<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, WebExtract)>,
    {
        let mut map = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (name, extract) in entries {
            map.insert(name, extract);
        }
    }

    /// Number of cached species.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached species names in sorted order.
    pub fn species_names(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    /// Write the complete mapping back to the persistence file.
    ///
    /// The file is fully overwritten, never appended, and keys are
    /// serialized in sorted order so repeated flushes of the same state
    /// produce identical bytes.
    pub fn flush(&self) -> Result<()> {
        let wire: BTreeMap<String, Vec<String>> = {
            let entries = self
                .entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            entries
                .iter()
                .map(|(name, extract)| (name.clone(), extract.to_fields()))
                .collect()
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&wire)?;
        std::fs::write(&self.path, json)?;

        info!(path = %self.path.display(), species = wire.len(), "Flushed enrichment cache");
        Ok(())
    }
}
