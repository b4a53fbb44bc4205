//! Specimen Engine Library
//!
//! The reconciliation and web-enrichment core of the specimen pipeline.
//! It deduplicates species names, fetches and caches web-derived
//! attributes concurrently, merges three heterogeneous row sources under
//! defined precedence rules, and validates cross-source consistency
//! before any output is produced.
//!
//! # Phases
//!
//! 1. [`validate`]: pre-flight structural and cross-referential checks
//! 2. [`table`]: typed query rows and offline records from raw tables
//! 3. [`dedup`]: the distinct-species set that bounds network fetches
//! 4. [`web`] + [`cache`]: concurrent per-species page lookups behind a
//!    persistent species-keyed cache
//! 5. [`offline`]: the collection-id-keyed reference index
//! 6. [`merge`]: one final 38-field record per query row
//!
//! [`pipeline`] wires the phases together with a full barrier between the
//! concurrent fetch phase and the single-threaded merge phase.
//!
//! # Example
//!
//! ```no_run
//! use specimen_engine::pipeline::{Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> specimen_common::Result<()> {
//!     let query_table: Vec<Vec<String>> = vec![];
//!     let offline_table: Vec<Vec<String>> = vec![];
//!     let pipeline = Pipeline::new(PipelineConfig::default())?;
//!     let _records = pipeline.run(&query_table, &offline_table).await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod dedup;
pub mod merge;
pub mod offline;
pub mod pipeline;
pub mod table;
pub mod validate;
pub mod web;

// Re-export commonly used types
pub use cache::EnrichmentCache;
pub use pipeline::{Pipeline, PipelineConfig};
pub use validate::{ValidationReport, Validator};
