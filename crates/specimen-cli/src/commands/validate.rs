//! `specimen validate` command implementation
//!
//! Runs the pre-flight checks over both input tables and prints every
//! finding with its location. No network or output work happens here.

use crate::error::Result;
use crate::tabular;
use colored::Colorize;
use specimen_engine::validate::Validator;

/// Validate the input tables
pub async fn run(query: String, data: String) -> Result<()> {
    let query_table = tabular::read_table(&query)?;
    let offline_table = tabular::read_table(&data)?;

    let report = Validator::new(&query, &data).validate(&query_table, &offline_table);

    if report.problems.is_empty() {
        println!("{} Both tables look good", "✓".green().bold());
        return Ok(());
    }

    println!("{}", report.render());
    if report.is_fatal() {
        println!("{} Validation failed", "✗".red().bold());
        report.into_result()?;
        Ok(())
    } else {
        println!("{} Warnings only, a run would proceed", "!".yellow().bold());
        Ok(())
    }
}
