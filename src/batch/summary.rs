//! Result of a rename batch and its human-readable report

use std::path::{Path, PathBuf};

use super::processor::FileOutcome;

/// Outcome for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Overall result of a rename run.
#[derive(Debug, Clone, Default)]
pub struct RenameSummary {
    /// Root the documents were discovered under
    pub report_dir: PathBuf,
    /// Number of table renames applied
    pub table_renames: usize,
    /// Number of column renames applied
    pub column_renames: usize,
    /// Per-document outcomes, in discovery order
    pub files: Vec<FileReport>,
    /// Documents were rewritten in memory only
    pub dry_run: bool,
}

impl RenameSummary {
    pub fn updated(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.outcome.is_updated())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.outcome.is_failed())
    }

    pub fn updated_count(&self) -> usize {
        self.updated().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    pub fn unchanged_count(&self) -> usize {
        self.files.len() - self.updated_count() - self.failed_count()
    }

    /// Returns true if any document was skipped because of an error.
    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.report_dir).unwrap_or(path).display()
    }
}

/// Print the rename report to stdout.
pub fn print_summary(summary: &RenameSummary) {
    println!("=== Rename Report ===");
    println!(
        "Report directory: {} ({} table renames, {} column renames){}",
        summary.report_dir.display(),
        summary.table_renames,
        summary.column_renames,
        if summary.dry_run { " [dry run]" } else { "" }
    );
    println!();

    println!("Updated ({}):", summary.updated_count());
    if summary.updated_count() == 0 {
        println!("  (none)");
    }
    for file in summary.updated() {
        if let FileOutcome::Updated(outcome) = &file.outcome {
            let mut passes = Vec::new();
            if outcome.entities {
                passes.push("entity");
            }
            if outcome.properties {
                passes.push("property");
            }
            println!(
                "  {} [{}]",
                summary.display_path(&file.path),
                passes.join(", ")
            );
        }
    }
    println!();

    if summary.has_failures() {
        println!("Skipped ({}):", summary.failed_count());
        for file in summary.failed() {
            if let FileOutcome::Failed(message) = &file.outcome {
                println!("  {}: {}", summary.display_path(&file.path), message);
            }
        }
        println!();
    }

    println!(
        "Summary: {} documents, {} updated, {} unchanged, {} skipped",
        summary.files.len(),
        summary.updated_count(),
        summary.unchanged_count(),
        summary.failed_count()
    );
}
