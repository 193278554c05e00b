//! rust-pbir: bulk table and column renames for Power BI report definitions
//!
//! This library applies a CSV of table/column renames to every JSON
//! document of a PBIR report folder, rewriting structured field references
//! and DAX expression text, and can export an inventory of the attributes
//! a report uses.

pub mod batch;
pub mod document;
pub mod error;
pub mod expression;
pub mod mapping;
pub mod metadata;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, warn};

pub use error::PbirError;

use batch::{compile_exclude_patterns, discover_documents, process_documents, RenameSummary};
use mapping::{load_rename_rules, RenameMaps};

/// Options for a rename run
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    /// Root directory of the report definition
    pub report_dir: PathBuf,
    /// CSV file with columns old_tbl, old_col, new_tbl, new_col
    pub mapping_path: PathBuf,
    /// Glob patterns of documents to leave alone, relative to `report_dir`
    pub exclude: Vec<String>,
    /// Rewrite and report without writing any file
    pub dry_run: bool,
}

/// Apply the renames in `options.mapping_path` to every document under
/// `options.report_dir`.
///
/// Documents that cannot be processed are reported in the summary and do
/// not stop the run.
pub fn rename_report_attributes(options: RenameOptions) -> Result<RenameSummary> {
    if !options.report_dir.is_dir() {
        return Err(PbirError::ReportDirNotFound {
            path: options.report_dir,
        }
        .into());
    }

    // Step 1: Load and resolve the rename rules
    let rules = load_rename_rules(&options.mapping_path)?;
    let maps = RenameMaps::resolve(&rules);
    debug!(
        rules = rules.len(),
        tables = maps.tables.len(),
        columns = maps.columns.len(),
        "Resolved rename maps"
    );

    let mut summary = RenameSummary {
        table_renames: maps.tables.len(),
        column_renames: maps.columns.len(),
        dry_run: options.dry_run,
        ..Default::default()
    };

    if maps.is_empty() {
        warn!(
            mapping = %options.mapping_path.display(),
            "Mapping file contains no renames; no documents were touched"
        );
        summary.report_dir = options.report_dir;
        return Ok(summary);
    }

    // Step 2: Find the documents
    let exclude = compile_exclude_patterns(&options.exclude)?;
    let files = discover_documents(&options.report_dir, &exclude);
    debug!(documents = files.len(), "Discovered documents");

    // Step 3: Rewrite them
    summary.files = process_documents(&files, &maps, options.dry_run);
    summary.report_dir = options.report_dir;

    info!(
        updated = summary.updated_count(),
        skipped = summary.failed_count(),
        "Rename finished"
    );

    Ok(summary)
}

/// Options for a metadata export
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    /// Directory containing one or more report definitions
    pub report_dir: PathBuf,
    /// CSV file to write
    pub output_path: PathBuf,
}

/// Write an inventory of the tables, columns and measures used under
/// `options.report_dir`. Returns the number of rows written.
pub fn export_metadata(options: MetadataOptions) -> Result<usize> {
    let rows = metadata::collect_metadata(&options.report_dir)?;
    let rows = metadata::consolidate_rows(rows);

    metadata::write_metadata_csv(&options.output_path, &rows)?;
    info!(
        rows = rows.len(),
        output = %options.output_path.display(),
        "Metadata exported"
    );

    Ok(rows.len())
}
