//! Web enrichment: per-species page lookup and heuristic text extraction
//!
//! One HTTP GET per distinct species name against the taxonomic site,
//! followed by keyword-heuristic extraction of the morphological
//! description. Network failures degrade to a blank extract for that
//! species; they never abort the run.

pub mod extract;
pub mod fetcher;

pub use extract::Extractor;
pub use fetcher::{Fetcher, FetcherConfig, DEFAULT_BASE_URL};
