//! End-to-end enrichment pipeline
//!
//! Wires the phases together: validate, extract typed rows, derive the
//! distinct-species set, fetch the cache misses concurrently, flush the
//! cache, then merge one final record per query row. A full barrier sits
//! between the concurrent fetch phase and the single-threaded merge
//! phase; merge never observes a partially fetched species.

use crate::cache::EnrichmentCache;
use crate::dedup::distinct_species;
use crate::merge::merge_all;
use crate::offline::OfflineLookup;
use crate::table::{extract_offline_records, extract_query_rows};
use crate::validate::Validator;
use crate::web::{Fetcher, FetcherConfig, DEFAULT_BASE_URL};
use futures::stream::{self, StreamExt};
use specimen_common::types::FinalRecord;
use specimen_common::Result;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Default fetch concurrency
pub const DEFAULT_POOL_SIZE: usize = 30;

/// Accepted fetch concurrency range; anything outside falls back to the
/// default
pub const MIN_POOL_SIZE: usize = 2;
pub const MAX_POOL_SIZE: usize = 50;

/// Default cache file name, resolved in the working directory
pub const DEFAULT_CACHE_FILE: &str = "web_cache.json";

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL of the taxonomic lookup site
    pub base_url: String,

    /// Path of the persistent enrichment cache file
    pub cache_path: PathBuf,

    /// Requested fetch concurrency; out-of-range values fall back to
    /// [`DEFAULT_POOL_SIZE`]
    pub pool_size: usize,

    /// Source label for the query table, used in validation findings
    pub query_source: String,

    /// Source label for the reference table, used in validation findings
    pub reference_source: String,

    /// Skip the pre-flight validation phase entirely
    pub skip_validation: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            pool_size: DEFAULT_POOL_SIZE,
            query_source: "query".to_string(),
            reference_source: "reference".to_string(),
            skip_validation: false,
        }
    }
}

impl PipelineConfig {
    /// Concurrency actually used: the requested size when it lies within
    /// the accepted range, the default otherwise.
    pub fn effective_pool_size(&self) -> usize {
        if (MIN_POOL_SIZE..MAX_POOL_SIZE).contains(&self.pool_size) {
            self.pool_size
        } else {
            warn!(
                requested = self.pool_size,
                default = DEFAULT_POOL_SIZE,
                "Requested pool size out of range, using default"
            );
            DEFAULT_POOL_SIZE
        }
    }
}

/// The enrichment pipeline
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Fetcher,
}

impl Pipeline {
    /// Build the pipeline, constructing the HTTP client and compiling
    /// the extraction rules up front.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let fetcher = Fetcher::new(FetcherConfig {
            base_url: config.base_url.clone(),
            ..FetcherConfig::default()
        })?;
        Ok(Self { config, fetcher })
    }

    /// Run the full pipeline over the two raw input tables.
    ///
    /// Returns one final record per non-blank query row, in query row
    /// order. Fatal validation findings abort before any network work.
    pub async fn run(
        &self,
        query_table: &[Vec<String>],
        offline_table: &[Vec<String>],
    ) -> Result<Vec<FinalRecord>> {
        let started = Instant::now();

        if self.config.skip_validation {
            warn!("Pre-flight validation skipped");
        } else {
            let validator =
                Validator::new(&self.config.query_source, &self.config.reference_source);
            validator.validate(query_table, offline_table).into_result()?;
        }

        let rows = extract_query_rows(query_table, &self.config.query_source)?;
        let records = extract_offline_records(offline_table, &self.config.reference_source)?;

        let species = distinct_species(&rows);
        info!(
            rows = rows.len(),
            species = species.len(),
            "Input accepted"
        );

        let cache = EnrichmentCache::load(&self.config.cache_path)?;
        let missing = cache.get_missing(species.iter());
        info!(
            cached = species.len() - missing.len(),
            to_fetch = missing.len(),
            "Resolved cache misses"
        );

        if !missing.is_empty() {
            self.fetch_missing(&cache, missing).await;
            cache.flush()?;
        }

        let offline = OfflineLookup::build(records);
        let merged = merge_all(&rows, &cache, &offline);

        info!(
            records = merged.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline complete"
        );
        Ok(merged)
    }

    /// Fetch every missing species concurrently, inserting each result
    /// into the cache as it completes. Returns only after every fetch
    /// has finished.
    async fn fetch_missing(&self, cache: &EnrichmentCache, missing: Vec<String>) {
        let pool = self.config.effective_pool_size();
        let started = Instant::now();
        let count = missing.len();

        stream::iter(missing)
            .map(|name| async move {
                let extract = self.fetcher.fetch(&name).await;
                cache.put(name, extract);
            })
            .buffer_unordered(pool)
            .collect::<Vec<()>>()
            .await;

        info!(
            fetched = count,
            pool = pool,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetch phase complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_pool(pool_size: usize) -> PipelineConfig {
        PipelineConfig {
            pool_size,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_pool_size_in_range_is_kept() {
        assert_eq!(config_with_pool(2).effective_pool_size(), 2);
        assert_eq!(config_with_pool(30).effective_pool_size(), 30);
        assert_eq!(config_with_pool(49).effective_pool_size(), 49);
    }

    #[test]
    fn test_pool_size_out_of_range_falls_back() {
        assert_eq!(config_with_pool(0).effective_pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(config_with_pool(1).effective_pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(config_with_pool(50).effective_pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(
            config_with_pool(500).effective_pool_size(),
            DEFAULT_POOL_SIZE
        );
    }

    #[tokio::test]
    async fn test_fatal_validation_aborts_before_fetch() {
        // Single-token latin name in the query table is fatal; the
        // pipeline must error out without touching the network or the
        // cache file.
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("web_cache.json");
        let config = PipelineConfig {
            cache_path: cache_path.clone(),
            base_url: "http://127.0.0.1:1/frps/".to_string(),
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(config).unwrap();

        let query = vec![vec![
            "113678".to_string(),
            "98484".to_string(),
            "Pinus".to_string(),
            "1".to_string(),
        ]];
        let reference: Vec<Vec<String>> = vec![(0..19).map(|i| format!("h{}", i)).collect()];

        let err = pipeline.run(&query, &reference).await.unwrap_err();
        assert!(err.to_string().contains("Validation failed"));
        assert!(!cache_path.exists());
    }

    #[tokio::test]
    async fn test_skip_validation_processes_anyway() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            cache_path: dir.path().join("web_cache.json"),
            base_url: "http://127.0.0.1:1/frps/".to_string(),
            skip_validation: true,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(config).unwrap();

        // Single-token name would be fatal under validation; with the
        // phase skipped the row flows through and the dead port degrades
        // the web fields to blank.
        let query = vec![vec![
            "113678".to_string(),
            "98484".to_string(),
            "Pinus".to_string(),
            "1".to_string(),
        ]];
        let reference: Vec<Vec<String>> = vec![(0..19).map(|i| format!("h{}", i)).collect()];

        let records = pipeline.run(&query, &reference).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].genus, "Pinus");
        assert_eq!(records[0].species, "");
    }
}
