//! `specimen cache` command implementations
//!
//! Inspect or drop the persistent per-species web cache.

use crate::error::Result;
use colored::Colorize;
use specimen_engine::cache::EnrichmentCache;
use std::path::Path;

/// Show cached species names
pub async fn show(cache_file: String) -> Result<()> {
    let cache = EnrichmentCache::load(&cache_file)?;

    if cache.is_empty() {
        println!("Cache is empty: {}", cache_file);
        return Ok(());
    }

    println!(
        "{} {} species cached in {}",
        "✓".green(),
        cache.len(),
        cache_file
    );
    for name in cache.species_names() {
        println!("  {}", name);
    }
    Ok(())
}

/// Delete the cache file; every species is re-fetched on the next run
pub async fn clear(cache_file: String) -> Result<()> {
    let path = Path::new(&cache_file);
    if path.is_file() {
        std::fs::remove_file(path)?;
        println!("{} Cache cleared: {}", "✓".green(), cache_file);
    } else {
        println!("No cache file at {}", cache_file);
    }
    Ok(())
}
