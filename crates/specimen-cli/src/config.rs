//! CLI settings
//!
//! Bridges the parsed command line (flags and environment variables, both
//! handled by clap) to the engine's pipeline configuration.

use crate::Cli;
use specimen_engine::pipeline::{PipelineConfig, DEFAULT_POOL_SIZE};
use std::path::PathBuf;

/// Resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub cache_path: PathBuf,
    pub pool_size: usize,
    pub skip_validation: bool,
}

impl Settings {
    /// Resolve settings from the parsed global CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            cache_path: PathBuf::from(&cli.cache_file),
            pool_size: DEFAULT_POOL_SIZE,
            skip_validation: false,
        }
    }

    /// Override the fetch pool size.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Skip the pre-flight validation phase.
    pub fn with_skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    /// Build the engine pipeline configuration, labelling validation
    /// findings with the actual input file names.
    pub fn pipeline_config(&self, query_source: &str, reference_source: &str) -> PipelineConfig {
        PipelineConfig {
            base_url: self.base_url.clone(),
            cache_path: self.cache_path.clone(),
            pool_size: self.pool_size,
            query_source: query_source.to_string(),
            reference_source: reference_source.to_string(),
            skip_validation: self.skip_validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_settings_from_cli() {
        let cli = Cli::try_parse_from([
            "specimen",
            "--base-url",
            "http://example.test/frps/",
            "--cache-file",
            "/tmp/cache.json",
            "validate",
            "-i",
            "query.csv",
            "-d",
            "data.csv",
        ])
        .unwrap();

        let settings = Settings::from_cli(&cli).with_pool_size(7);
        assert_eq!(settings.base_url, "http://example.test/frps/");
        assert_eq!(settings.cache_path, PathBuf::from("/tmp/cache.json"));
        assert_eq!(settings.pool_size, 7);

        let config = settings.pipeline_config("query.csv", "data.csv");
        assert_eq!(config.query_source, "query.csv");
        assert_eq!(config.reference_source, "data.csv");
        assert_eq!(config.pool_size, 7);
        assert!(!config.skip_validation);
    }
}
