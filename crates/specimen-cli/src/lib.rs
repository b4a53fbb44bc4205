//! Specimen CLI Library
//!
//! Command-line interface for the herbarium specimen enrichment pipeline.
//!
//! # Overview
//!
//! - **Enrichment**: merge the query and reference tables with web-derived
//!   attributes into the 38-column output table (`specimen run`)
//! - **Validation**: pre-flight checks over the input tables without any
//!   network work (`specimen validate`)
//! - **Cache Management**: inspect or drop the persistent per-species web
//!   cache (`specimen cache show/clear`)

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod tabular;

// Re-export commonly used types
pub use config::Settings;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};

/// Specimen - Herbarium Specimen Enrichment Pipeline
#[derive(Parser, Debug)]
#[command(name = "specimen")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the taxonomic lookup site
    #[arg(
        long,
        env = "SPECIMEN_BASE_URL",
        default_value = specimen_engine::web::DEFAULT_BASE_URL,
        global = true
    )]
    pub base_url: String,

    /// Path of the persistent web cache file
    #[arg(
        long,
        env = "SPECIMEN_CACHE_FILE",
        default_value = specimen_engine::pipeline::DEFAULT_CACHE_FILE,
        global = true
    )]
    pub cache_file: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full enrichment pipeline and write the output table
    Run {
        /// Query table CSV (4 columns, no header)
        #[arg(short = 'i', long)]
        query: String,

        /// Offline reference table CSV (19 columns, one header row)
        #[arg(short = 'd', long)]
        data: String,

        /// Output CSV path
        #[arg(short, long, default_value = "specimen_out.csv")]
        output: String,

        /// Concurrent fetch pool size (accepted range 2-49)
        #[arg(
            short,
            long,
            env = "SPECIMEN_POOL_SIZE",
            default_value_t = specimen_engine::pipeline::DEFAULT_POOL_SIZE
        )]
        pool_size: usize,

        /// Skip the pre-flight validation phase
        #[arg(long)]
        skip_validation: bool,
    },

    /// Validate the input tables without fetching or writing anything
    Validate {
        /// Query table CSV (4 columns, no header)
        #[arg(short = 'i', long)]
        query: String,

        /// Offline reference table CSV (19 columns, one header row)
        #[arg(short = 'd', long)]
        data: String,
    },

    /// Manage the persistent web cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

/// Web cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show cached species
    Show,

    /// Delete the cache file
    Clear,
}
