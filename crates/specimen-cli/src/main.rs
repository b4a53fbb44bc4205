//! Specimen CLI - Main entry point

use clap::Parser;
use specimen_cli::{CacheCommand, Cli, Commands, Settings};
use specimen_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Verbose mode logs debug to console; otherwise only warnings reach
    // the terminal and the pipeline stays quiet behind its status lines.
    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Console)
            .log_file_prefix("specimen".to_string())
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::Console)
            .log_file_prefix("specimen".to_string())
            .build()
    };

    // Environment variables override individual fields; the verbose or
    // quiet level stays in effect when they are unset.
    let log_config = log_config
        .clone()
        .with_env_overrides()
        .unwrap_or(log_config);

    // The CLI still works when logging cannot initialize
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: Cli) -> specimen_cli::Result<()> {
    let settings = Settings::from_cli(&cli);

    match cli.command {
        Commands::Run {
            query,
            data,
            output,
            pool_size,
            skip_validation,
        } => {
            specimen_cli::commands::run::run(
                query,
                data,
                output,
                settings
                    .with_pool_size(pool_size)
                    .with_skip_validation(skip_validation),
            )
            .await
        }

        Commands::Validate { query, data } => {
            specimen_cli::commands::validate::run(query, data).await
        }

        Commands::Cache { command } => match command {
            CacheCommand::Show => specimen_cli::commands::cache::show(cli.cache_file).await,
            CacheCommand::Clear => specimen_cli::commands::cache::clear(cli.cache_file).await,
        },
    }
}
