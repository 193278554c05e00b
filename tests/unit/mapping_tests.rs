//! Rename rule loading and map resolution

use std::path::Path;

use rust_pbir::mapping::{load_rename_rules, parse_rename_rules, RenameMaps, RenameRule};
use tempfile::TempDir;

fn parse(content: &str) -> Vec<RenameRule> {
    parse_rename_rules(content, Path::new("mapping.csv")).expect("Mapping should parse")
}

// ============================================================================
// Loader Tests
// ============================================================================

#[test]
fn test_load_windows_1252_mapping() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapping.csv");
    // "Café" encoded as Windows-1252
    let mut bytes = b"old_tbl,old_col,new_tbl,new_col\nSales,,Caf".to_vec();
    bytes.push(0xE9);
    bytes.push(b'\n');
    std::fs::write(&path, bytes).unwrap();

    let rules = load_rename_rules(&path).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].new_table.as_deref(), Some("Café"));
}

#[test]
fn test_load_utf16_mapping_with_bom() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapping.csv");
    let text = "old_tbl,old_col,new_tbl,new_col\r\nDate,Year,,Calendar Year\r\n";
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    std::fs::write(&path, bytes).unwrap();

    let rules = load_rename_rules(&path).unwrap();
    assert_eq!(rules, vec![RenameRule::from_cells("Date", "Year", "", "Calendar Year")]);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = load_rename_rules(&dir.path().join("nope.csv")).unwrap_err();
    assert!(err.to_string().contains("Failed to read mapping file"));
}

#[test]
fn test_columns_in_any_order() {
    let rules = parse("new_col,old_tbl,new_tbl,old_col\nTotal,Sales,,Amount\n");
    assert_eq!(rules, vec![RenameRule::from_cells("Sales", "Amount", "", "Total")]);
}

#[test]
fn test_invalid_rows_dropped_in_order() {
    let rules = parse(
        "old_tbl,old_col,new_tbl,new_col\n\
         ,Amount,,Total\n\
         Sales,,Revenue,\n\
         Budget,Plan,,\n\
         Revenue,Qty\n\
         Date,Year,,Calendar Year\n",
    );
    let tables: Vec<&str> = rules.iter().map(|r| r.old_table.as_str()).collect();
    assert_eq!(tables, vec!["Sales", "Date"]);
}

// ============================================================================
// Resolution Tests
// ============================================================================

#[test]
fn test_column_rule_follows_earlier_table_rename() {
    let maps = RenameMaps::resolve(&parse(
        "old_tbl,old_col,new_tbl,new_col\n\
         Sales,,Revenue,\n\
         Sales,Amount,,Total\n",
    ));

    assert_eq!(maps.tables.get("Sales"), Some("Revenue"));
    let target = maps.columns.get("Revenue", "Amount").unwrap();
    assert_eq!(target.table, "Revenue");
    assert_eq!(target.column, "Total");
    assert!(maps.columns.get("Sales", "Amount").is_none());
}

#[test]
fn test_column_rule_before_table_rename_keeps_old_key() {
    let maps = RenameMaps::resolve(&parse(
        "old_tbl,old_col,new_tbl,new_col\n\
         Sales,Amount,,Total\n\
         Sales,,Revenue,\n",
    ));

    assert!(maps.columns.contains("Sales", "Amount"));
    assert!(!maps.columns.contains("Revenue", "Amount"));
}

#[test]
fn test_identity_table_rename_is_ignored() {
    let maps = RenameMaps::resolve(&parse("old_tbl,old_col,new_tbl,new_col\nSales,,Sales,\n"));
    assert!(maps.is_empty());
}
