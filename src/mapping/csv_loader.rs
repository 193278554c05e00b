//! Loader for the rename-rule CSV file
//!
//! The file carries exactly four named columns: `old_tbl`, `old_col`,
//! `new_tbl`, `new_col`. Spreadsheet tools like to prepend a byte-order mark
//! or save in a legacy code page, so the raw bytes are decoded before the
//! CSV reader sees them.

use std::path::Path;

use anyhow::Result;
use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::debug;

use crate::error::PbirError;

/// Column names the mapping file must provide, in canonical order.
pub const EXPECTED_COLUMNS: [&str; 4] = ["old_tbl", "old_col", "new_tbl", "new_col"];

/// A single rename instruction read from the mapping file.
///
/// Empty cells are represented as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameRule {
    pub old_table: String,
    pub old_column: Option<String>,
    pub new_table: Option<String>,
    pub new_column: Option<String>,
}

impl RenameRule {
    /// Build a rule from raw cell values, treating empty cells as absent.
    pub fn from_cells(
        old_table: &str,
        old_column: &str,
        new_table: &str,
        new_column: &str,
    ) -> Self {
        Self {
            old_table: old_table.to_string(),
            old_column: non_empty(old_column),
            new_table: non_empty(new_table),
            new_column: non_empty(new_column),
        }
    }

    /// A rule is usable when it names a source table and either a target
    /// table or a complete column pair.
    pub fn is_valid(&self) -> bool {
        !self.old_table.is_empty()
            && (self.new_table.is_some() || self.column_rename().is_some())
    }

    /// The new table name, if this rule actually changes the table.
    pub fn table_rename(&self) -> Option<&str> {
        self.new_table
            .as_deref()
            .filter(|new_table| *new_table != self.old_table)
    }

    /// The `(old_column, new_column)` pair, if both are present.
    pub fn column_rename(&self) -> Option<(&str, &str)> {
        match (self.old_column.as_deref(), self.new_column.as_deref()) {
            (Some(old), Some(new)) => Some((old, new)),
            _ => None,
        }
    }
}

fn non_empty(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Load and validate rename rules from a CSV file.
///
/// Invalid rows are dropped silently. A missing column header is fatal.
pub fn load_rename_rules(path: &Path) -> Result<Vec<RenameRule>> {
    let bytes = std::fs::read(path).map_err(|e| PbirError::MappingReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let content = decode_mapping_bytes(&bytes).ok_or_else(|| PbirError::MappingDecodeError {
        path: path.to_path_buf(),
    })?;

    Ok(parse_rename_rules(&content, path)?)
}

/// Decode mapping bytes: BOM-sniffed encoding first, then UTF-8, then Windows-1252.
fn decode_mapping_bytes(bytes: &[u8]) -> Option<String> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        let (decoded, had_errors) = encoding.decode_with_bom_removal(bytes);
        return if had_errors {
            None
        } else {
            Some(decoded.into_owned())
        };
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => Some(s.to_string()),
        Err(_) => {
            // Fall back to Windows-1252 (Excel "CSV" exports on Windows)
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                None
            } else {
                Some(decoded.into_owned())
            }
        }
    }
}

/// Parse rename rules from already-decoded CSV text.
///
/// `source` is only used to label errors.
pub fn parse_rename_rules(content: &str, source: &Path) -> Result<Vec<RenameRule>, PbirError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| PbirError::MappingParseError {
            path: source.to_path_buf(),
            source: e,
        })?
        .clone();

    // Strip BOM from the first header if the decoder left it in place
    let position_of = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}') == name)
    };

    let mut indices = [0usize; 4];
    let mut missing = Vec::new();
    for (slot, name) in EXPECTED_COLUMNS.iter().enumerate() {
        match position_of(name) {
            Some(idx) => indices[slot] = idx,
            None => missing.push(*name),
        }
    }
    if !missing.is_empty() {
        return Err(PbirError::MappingSchemaError {
            path: source.to_path_buf(),
            missing: missing.join(", "),
        });
    }

    let mut rules = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| PbirError::MappingParseError {
            path: source.to_path_buf(),
            source: e,
        })?;
        let cell = |slot: usize| record.get(indices[slot]).unwrap_or("");

        let rule = RenameRule::from_cells(cell(0), cell(1), cell(2), cell(3));
        if rule.is_valid() {
            rules.push(rule);
        } else {
            debug!(
                line = record.position().map(|p| p.line()),
                "Skipping incomplete mapping row"
            );
        }
    }

    Ok(rules)
}
