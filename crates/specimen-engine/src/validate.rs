//! Pre-flight input validation
//!
//! Structural and cross-referential checks over the two input tables,
//! run before any network or merge work. Each problem is reported
//! independently with its file/row/column location; accumulation stops
//! at a fixed cap so a thoroughly broken file reports a truncated list
//! plus a summary instead of thousands of lines.
//!
//! Fatal classes (wrong column width, blank or single-token latin name)
//! abort the run; everything else is advisory.

use specimen_common::types::{normalize_species_name, OFFLINE_COLUMNS, QUERY_COLUMNS};
use specimen_common::{Result, SpecimenError};
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

/// Maximum number of problems reported before validation gives up
pub const MAX_PROBLEMS: usize = 50;

/// How bad a validation problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Aborts the run before the fetch/merge phases
    Fatal,
    /// Reported, but the run continues
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// One validation finding with its location
#[derive(Debug, Clone)]
pub struct Problem {
    pub severity: Severity,
    pub file: String,
    /// 1-based source row, if the problem is row-scoped
    pub row: Option<usize>,
    /// 1-based source column, if the problem is cell-scoped
    pub column: Option<usize>,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.file)?;
        if let Some(row) = self.row {
            write!(f, " (row {}", row)?;
            if let Some(column) = self.column {
                write!(f, ", column {}", column)?;
            }
            write!(f, ")")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Outcome of a validation pass
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub problems: Vec<Problem>,
    /// True when the problem cap was hit and checks stopped early
    pub truncated: bool,
}

impl ValidationReport {
    /// Number of fatal problems found.
    pub fn fatal_count(&self) -> usize {
        self.problems
            .iter()
            .filter(|p| p.severity == Severity::Fatal)
            .count()
    }

    /// Whether the run must abort.
    pub fn is_fatal(&self) -> bool {
        self.fatal_count() > 0
    }

    /// Convert into a pipeline result: `Err` when fatal problems exist.
    pub fn into_result(self) -> Result<ValidationReport> {
        if self.is_fatal() {
            Err(SpecimenError::ValidationFailed(self.fatal_count()))
        } else {
            Ok(self)
        }
    }

    /// Human-readable rendering, one line per problem plus a summary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for problem in &self.problems {
            out.push_str(&problem.to_string());
            out.push('\n');
        }
        if self.truncated {
            out.push_str(&format!(
                "Too many problems: stopped after {} findings. Fix the inputs and validate again.\n",
                self.problems.len()
            ));
        }
        out.push_str(&format!(
            "{} problem(s), {} fatal",
            self.problems.len(),
            self.fatal_count()
        ));
        out
    }
}

/// Pre-flight validator over the raw query and reference tables
pub struct Validator {
    query_source: String,
    reference_source: String,
}

impl Validator {
    /// Create a validator; the source names are used in problem locations.
    pub fn new(query_source: impl Into<String>, reference_source: impl Into<String>) -> Self {
        Self {
            query_source: query_source.into(),
            reference_source: reference_source.into(),
        }
    }

    /// Run every check over both tables.
    ///
    /// Checks are independent and do not short-circuit each other unless
    /// the problem cap is reached, in which case the report is marked
    /// truncated and returned as-is.
    pub fn validate(
        &self,
        query_table: &[Vec<String>],
        reference_table: &[Vec<String>],
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        info!(
            query = %self.query_source,
            reference = %self.reference_source,
            "Validating input tables"
        );

        if self.check_widths(query_table, reference_table, &mut report)
            && self.check_latin_names(query_table, reference_table, &mut report)
            && self.check_blank_cells(query_table, reference_table, &mut report)
        {
            self.check_cross_reference(query_table, reference_table, &mut report);
        }

        for problem in &report.problems {
            warn!(problem = %problem, "Validation finding");
        }
        report
    }

    /// Push a problem; returns false when the cap is hit.
    fn push(report: &mut ValidationReport, problem: Problem) -> bool {
        report.problems.push(problem);
        if report.problems.len() >= MAX_PROBLEMS {
            report.truncated = true;
            return false;
        }
        true
    }

    fn check_widths(
        &self,
        query_table: &[Vec<String>],
        reference_table: &[Vec<String>],
        report: &mut ValidationReport,
    ) -> bool {
        let cases = [
            (&self.reference_source, reference_table, OFFLINE_COLUMNS),
            (&self.query_source, query_table, QUERY_COLUMNS),
        ];
        for (source, table, expected) in cases {
            if let Some(first) = table.first() {
                if first.len() != expected {
                    let keep = Self::push(
                        report,
                        Problem {
                            severity: Severity::Fatal,
                            file: source.clone(),
                            row: Some(1),
                            column: None,
                            message: format!(
                                "number of columns should be {} (now: {})",
                                expected,
                                first.len()
                            ),
                        },
                    );
                    if !keep {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn check_latin_names(
        &self,
        query_table: &[Vec<String>],
        reference_table: &[Vec<String>],
        report: &mut ValidationReport,
    ) -> bool {
        // The reference table has a header row; the query table does not.
        let cases = [
            (&self.reference_source, reference_table, 1usize),
            (&self.query_source, query_table, 0usize),
        ];
        for (source, table, skip) in cases {
            for (idx, row) in table.iter().enumerate().skip(skip) {
                let name = row.get(2).map(|c| c.trim()).unwrap_or_default();
                let token_count = name.split_whitespace().count();
                if token_count >= 2 {
                    continue;
                }
                let message = if name.is_empty() {
                    "missing latin name".to_string()
                } else {
                    format!("single-token latin name: '{}'", name)
                };
                let keep = Self::push(
                    report,
                    Problem {
                        severity: Severity::Fatal,
                        file: source.clone(),
                        row: Some(idx + 1),
                        column: Some(3),
                        message,
                    },
                );
                if !keep {
                    return false;
                }
            }
        }
        true
    }

    fn check_blank_cells(
        &self,
        query_table: &[Vec<String>],
        reference_table: &[Vec<String>],
        report: &mut ValidationReport,
    ) -> bool {
        let cases = [
            (&self.reference_source, reference_table),
            (&self.query_source, query_table),
        ];
        for (source, table) in cases {
            for (row_idx, row) in table.iter().enumerate() {
                for (col_idx, cell) in row.iter().enumerate() {
                    if !cell.trim().is_empty() {
                        continue;
                    }
                    let keep = Self::push(
                        report,
                        Problem {
                            severity: Severity::Warning,
                            file: source.clone(),
                            row: Some(row_idx + 1),
                            column: Some(col_idx + 1),
                            message: "blank cell".to_string(),
                        },
                    );
                    if !keep {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn check_cross_reference(
        &self,
        query_table: &[Vec<String>],
        reference_table: &[Vec<String>],
        report: &mut ValidationReport,
    ) -> bool {
        let reference_names: HashSet<String> = reference_table
            .iter()
            .skip(1)
            .filter_map(|row| row.get(2))
            .map(|cell| normalize_species_name(cell))
            .filter(|name| !name.is_empty())
            .collect();

        let mut already_reported: HashSet<String> = HashSet::new();
        for (idx, row) in query_table.iter().enumerate() {
            let name = row
                .get(2)
                .map(|cell| normalize_species_name(cell))
                .unwrap_or_default();
            if name.is_empty()
                || reference_names.contains(&name)
                || !already_reported.insert(name.clone())
            {
                continue;
            }
            let keep = Self::push(
                report,
                Problem {
                    severity: Severity::Warning,
                    file: self.query_source.clone(),
                    row: Some(idx + 1),
                    column: Some(3),
                    message: format!("species not found in reference table: '{}'", name),
                },
            );
            if !keep {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_row(serial: &str, barcode: &str, species: &str, copies: &str) -> Vec<String> {
        vec![serial, barcode, species, copies]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn reference_row(code: &str, latin: &str) -> Vec<String> {
        let mut row: Vec<String> = (0..OFFLINE_COLUMNS).map(|i| format!("v{}", i)).collect();
        row[0] = code.to_string();
        row[2] = latin.to_string();
        row
    }

    fn reference_header() -> Vec<String> {
        (0..OFFLINE_COLUMNS).map(|i| format!("h{}", i)).collect()
    }

    #[test]
    fn test_clean_tables_pass() {
        let query = vec![query_row("113678", "98484", "Stellaria media", "1")];
        let reference = vec![reference_header(), reference_row("113678", "Stellaria media")];

        let report = Validator::new("query.csv", "data.csv").validate(&query, &reference);
        assert!(!report.is_fatal());
        assert!(report.problems.is_empty());
    }

    #[test]
    fn test_short_reference_table_is_fatal() {
        // 18 columns, one short of the expected 19
        let mut short_header = reference_header();
        short_header.pop();
        let query = vec![query_row("113678", "98484", "Stellaria media", "1")];
        let reference = vec![short_header];

        let report = Validator::new("query.csv", "data.csv").validate(&query, &reference);
        assert!(report.is_fatal());
        let rendered = report.render();
        assert!(rendered.contains("should be 19"));
        assert!(rendered.contains("data.csv"));
    }

    #[test]
    fn test_single_token_latin_name_is_fatal() {
        let query = vec![query_row("113678", "98484", "Pinus", "1")];
        let reference = vec![reference_header(), reference_row("113678", "Pinus massoniana")];

        let report = Validator::new("query.csv", "data.csv").validate(&query, &reference);
        assert!(report.is_fatal());
        assert!(report.render().contains("single-token latin name"));
    }

    #[test]
    fn test_blank_cell_is_warning_only() {
        let query = vec![query_row("113678", "", "Stellaria media", "1")];
        let reference = vec![reference_header(), reference_row("113678", "Stellaria media")];

        let report = Validator::new("query.csv", "data.csv").validate(&query, &reference);
        assert!(!report.is_fatal());
        assert_eq!(report.problems.len(), 1);
        assert_eq!(report.problems[0].severity, Severity::Warning);
        assert_eq!(report.problems[0].column, Some(2));
    }

    #[test]
    fn test_unknown_query_species_is_warning_and_deduplicated() {
        let query = vec![
            query_row("113678", "98484", "Eupatorium coelestinum", "1"),
            query_row("113679", "98485", "Eupatorium coelestinum", "2"),
        ];
        let reference = vec![reference_header(), reference_row("113678", "Stellaria media")];

        let report = Validator::new("query.csv", "data.csv").validate(&query, &reference);
        assert!(!report.is_fatal());
        let cross_refs: Vec<_> = report
            .problems
            .iter()
            .filter(|p| p.message.contains("not found in reference table"))
            .collect();
        assert_eq!(cross_refs.len(), 1);
    }

    #[test]
    fn test_problem_cap_truncates() {
        // 60 query rows with a missing latin name each
        let query: Vec<Vec<String>> = (0..60)
            .map(|i| query_row(&format!("{}", i), "98484", "", "1"))
            .collect();
        let reference = vec![reference_header()];

        let report = Validator::new("query.csv", "data.csv").validate(&query, &reference);
        assert!(report.truncated);
        assert_eq!(report.problems.len(), MAX_PROBLEMS);
        assert!(report.render().contains("Too many problems"));
    }

    #[test]
    fn test_into_result() {
        let query = vec![query_row("113678", "98484", "Pinus", "1")];
        let reference = vec![reference_header(), reference_row("113678", "Pinus massoniana")];

        let report = Validator::new("query.csv", "data.csv").validate(&query, &reference);
        assert!(report.into_result().is_err());
    }
}
