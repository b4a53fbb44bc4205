//! `specimen run` command implementation
//!
//! Reads both input tables, runs the full enrichment pipeline and writes
//! the 38-column output table.

use crate::config::Settings;
use crate::error::Result;
use crate::{progress, tabular};
use colored::Colorize;
use specimen_engine::pipeline::Pipeline;

/// Run the enrichment pipeline end to end
pub async fn run(query: String, data: String, output: String, settings: Settings) -> Result<()> {
    println!("{} Reading input tables...", "→".cyan());
    let query_table = tabular::read_table(&query)?;
    let offline_table = tabular::read_table(&data)?;
    println!(
        "{} {} query row(s), {} reference row(s)",
        "✓".green(),
        query_table.len(),
        offline_table.len()
    );

    let pipeline = Pipeline::new(settings.pipeline_config(&query, &data))?;

    let spinner = progress::create_spinner("Enriching specimens...");
    let result = pipeline.run(&query_table, &offline_table).await;
    spinner.finish_and_clear();
    let records = result?;

    println!("{} {} record(s) merged", "✓".green(), records.len());

    let written = tabular::write_records(&output, &records)?;
    if written == std::path::Path::new(&output) {
        println!("{} Output written: {}", "✓".green().bold(), written.display());
    } else {
        println!(
            "{} '{}' was not writable, output written to: {}",
            "!".yellow().bold(),
            output,
            written.display()
        );
    }

    Ok(())
}
