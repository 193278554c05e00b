//! Metadata rows, consolidation and CSV output

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use super::location::{report_name, PageNames};
use super::walker::collect_usages;
use crate::batch::discover_documents;
use crate::error::PbirError;

/// Header row of the metadata CSV.
pub const METADATA_HEADERS: [&str; 6] = [
    "Report",
    "Page",
    "Table",
    "Column or Measure",
    "Expression",
    "Used In",
];

/// One line of the metadata inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MetadataRow {
    pub report: String,
    pub page: String,
    pub table: Option<String>,
    pub column: Option<String>,
    pub expression: Option<String>,
    pub used_in: Option<String>,
}

impl MetadataRow {
    fn same_attribute(&self, other: &MetadataRow) -> bool {
        self.report == other.report && self.table == other.table && self.column == other.column
    }
}

/// Collect raw rows from every document under `report_dir`.
///
/// Documents that cannot be read or parsed are logged and skipped.
pub fn collect_metadata(report_dir: &Path) -> Result<Vec<MetadataRow>, PbirError> {
    if !report_dir.is_dir() {
        return Err(PbirError::ReportDirNotFound {
            path: report_dir.to_path_buf(),
        });
    }

    let mut pages = PageNames::new();
    let mut rows = Vec::new();

    for path in discover_documents(report_dir, &[]) {
        let tree = match read_document(&path) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unable to process document");
                continue;
            }
        };

        let report = report_name(&path);
        let page = pages.page_name(&path, &tree);
        let usages = collect_usages(&tree);
        debug!(path = %path.display(), usages = usages.len(), "Collected attribute usages");

        rows.extend(usages.into_iter().map(|usage| MetadataRow {
            report: report.clone(),
            page: page.clone(),
            table: usage.table,
            column: usage.column,
            expression: usage.expression,
            used_in: usage.context,
        }));
    }

    Ok(rows)
}

fn read_document(path: &Path) -> Result<serde_json::Value, PbirError> {
    let content = std::fs::read_to_string(path).map_err(|e| PbirError::DocumentReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let json = content.strip_prefix('\u{FEFF}').unwrap_or(&content);
    serde_json::from_str(json).map_err(|e| PbirError::DocumentParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Merge raw rows into the final inventory.
///
/// Usage rows pick up the expression of the measure definition with the
/// same report, table and name. Definitions that no usage refers to are
/// appended. Exact duplicates are dropped, keeping the first occurrence.
pub fn consolidate_rows(rows: Vec<MetadataRow>) -> Vec<MetadataRow> {
    let (definitions, mut usages): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|row| row.expression.is_some());

    for usage in &mut usages {
        if let Some(definition) = definitions.iter().find(|d| d.same_attribute(usage)) {
            usage.expression = definition.expression.clone();
        }
    }

    let unused: Vec<MetadataRow> = definitions
        .into_iter()
        .filter(|definition| !usages.iter().any(|u| u.same_attribute(definition)))
        .collect();
    usages.extend(unused);

    let mut seen = HashSet::new();
    usages.retain(|row| seen.insert(row.clone()));
    usages
}

/// Write the inventory as CSV, header row first.
pub fn write_metadata_csv(path: &Path, rows: &[MetadataRow]) -> Result<(), PbirError> {
    let write_error = |source: csv::Error| PbirError::MetadataWriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_error)?;

    writer.write_record(METADATA_HEADERS).map_err(write_error)?;
    for row in rows {
        writer.serialize(row).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|e| write_error(csv::Error::from(e)))
}
