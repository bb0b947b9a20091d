//! Operator report and run summary
//!
//! This module records which operators the model applied to each file, writes
//! them as CSV, and prints the end-of-run summary.

use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{MutatorError, Result};
use crate::runner::{FileOutcome, FileResult};

const CSV_HEADER: &str = "Java File Name,Mutation Comments";

/// Operator comments per mutated file, keyed by relative output path
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OperatorLog {
    entries: BTreeMap<String, String>,
}

impl OperatorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the comments found in one mutant, replacing any earlier entry
    pub fn record(&mut self, relative_path: impl Into<String>, comments: impl Into<String>) {
        self.entries.insert(relative_path.into(), comments.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, relative_path: &str) -> Option<&str> {
        self.entries.get(relative_path).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Render as CSV: a header row, then one row per file with the comments
    /// quoted and inner quotes doubled
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str(CSV_HEADER);
        csv.push('\n');
        for (file, comments) in &self.entries {
            csv.push_str(&format!(
                "{},\"{}\"\n",
                file,
                comments.replace('"', "\"\"")
            ));
        }
        csv
    }

    /// Write the CSV report to `path`
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_csv()).map_err(|e| MutatorError::Report {
            file: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}

/// Outcome of a whole run
#[derive(Debug)]
pub struct RunSummary {
    pub results: Vec<FileResult>,
    pub output_dir: PathBuf,
    pub report_path: Option<PathBuf>,
    pub total_cost: f64,
}

impl RunSummary {
    /// Files that produced a mutant
    pub fn mutated(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Mutated { .. }))
            .count()
    }

    /// Files that were skipped
    pub fn skipped(&self) -> usize {
        self.total() - self.mutated()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Print the summary to stdout
    pub fn print(&self) {
        println!();
        println!("{}", "LLM Mutation Summary".bold());
        println!("{}", "=".repeat(60));

        for result in &self.results {
            match &result.outcome {
                FileOutcome::Mutated { output_path } => {
                    println!(
                        "{} {} -> {}",
                        "[MUTATED]".green().bold(),
                        result.file.relative.display(),
                        output_path.display().to_string().dimmed()
                    );
                }
                FileOutcome::Skipped(reason) => {
                    println!(
                        "{} {} ({})",
                        "[SKIPPED]".yellow().bold(),
                        result.file.relative.display(),
                        reason
                    );
                }
            }
        }

        println!();
        println!("Total files:       {}", self.total());
        println!("Mutated:           {}", self.mutated());
        if self.skipped() > 0 {
            println!("Skipped:           {}", self.skipped().to_string().yellow());
        }
        println!("Estimated cost:    ${:.6}", self.total_cost);
        println!("Output directory:  {}", self.output_dir.display());
        if let Some(report) = &self.report_path {
            println!("Operator report:   {}", report.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_csv_quotes_comments() {
        let mut log = OperatorLog::new();
        log.record("src/A.java", "Math: \"+\" to \"-\"\nNegate Conditionals\n");

        assert_eq!(
            log.to_csv(),
            "Java File Name,Mutation Comments\n\
             src/A.java,\"Math: \"\"+\"\" to \"\"-\"\"\nNegate Conditionals\n\"\n"
        );
    }

    #[test]
    fn test_csv_one_row_per_file() {
        let mut log = OperatorLog::new();
        log.record("src/B.java", "");
        log.record("src/A.java", "Increments\n");
        log.record("src/A.java", "Math\n");

        assert_eq!(log.len(), 2);
        assert_eq!(log.get("src/A.java"), Some("Math\n"));
        assert_eq!(
            log.to_csv(),
            "Java File Name,Mutation Comments\nsrc/A.java,\"Math\n\"\nsrc/B.java,\"\"\n"
        );
    }

    #[test]
    fn test_write_csv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("MutationOperators.csv");
        let mut log = OperatorLog::new();
        log.record("A.java", "Math");

        log.write_csv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), log.to_csv());
    }

    #[test]
    fn test_write_csv_into_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("MutationOperators.csv");
        let log = OperatorLog::new();

        assert!(matches!(log.write_csv(&path), Err(MutatorError::Report { .. })));
    }
}
