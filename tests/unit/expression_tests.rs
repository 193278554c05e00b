//! DAX formula rewriting through the public API

use rust_pbir::expression::{rewrite_expression, tokenize, TokenKind};
use rust_pbir::mapping::{ColumnMap, ColumnTarget, TableMap};

fn tables(pairs: &[(&str, &str)]) -> TableMap {
    pairs.iter().copied().collect()
}

fn columns(entries: &[(&str, &str, &str, &str)]) -> ColumnMap {
    let mut map = ColumnMap::new();
    for (table, column, new_table, new_column) in entries {
        map.insert(
            *table,
            *column,
            ColumnTarget {
                table: new_table.to_string(),
                column: new_column.to_string(),
            },
        );
    }
    map
}

// ============================================================================
// Table Rename Tests
// ============================================================================

#[test]
fn test_measure_formula_table_rename() {
    let tables = tables(&[("Sales", "Sales History")]);
    let rewritten = rewrite_expression(
        "CALCULATE(SUM(Sales[Amount]), FILTER(ALL('Sales'), 'Sales'[Qty] > 0))",
        Some(&tables),
        None,
    );
    assert_eq!(
        rewritten,
        "CALCULATE(SUM('Sales History'[Amount]), FILTER(ALL('Sales History'), 'Sales History'[Qty] > 0))"
    );
}

#[test]
fn test_prefix_names_are_not_matched() {
    let tables = tables(&[("Sales", "Revenue")]);
    let expression = "SalesTarget[Amount] + Sales_2024[Amount] + [Sales]";
    assert_eq!(rewrite_expression(expression, Some(&tables), None), expression);
}

#[test]
fn test_text_inside_literals_is_kept() {
    let tables = tables(&[("Sales", "Revenue")]);
    let rewritten = rewrite_expression(
        "IF(Sales[Qty] > 0, \"Sales up\", \"Sales\") // Sales total",
        Some(&tables),
        None,
    );
    assert_eq!(
        rewritten,
        "IF(Revenue[Qty] > 0, \"Sales up\", \"Sales\") // Sales total"
    );
}

// ============================================================================
// Column Rename Tests
// ============================================================================

#[test]
fn test_column_rename_needs_matching_qualifier() {
    let columns = columns(&[("Sales", "Amount", "Sales", "Net Amount")]);
    let rewritten = rewrite_expression(
        "Sales[Amount] - Budget[Amount] + [Amount]",
        None,
        Some(&columns),
    );
    assert_eq!(rewritten, "Sales[Net Amount] - Budget[Amount] + [Amount]");
}

#[test]
fn test_column_rename_keeps_quoted_qualifier() {
    let columns = columns(&[("Sales History", "Qty", "Sales History", "Units")]);
    let rewritten = rewrite_expression("SUM('Sales History'[Qty])", None, Some(&columns));
    assert_eq!(rewritten, "SUM('Sales History'[Units])");
}

#[test]
fn test_both_maps_apply_in_sequence() {
    let tables = tables(&[("Sales", "Revenue")]);
    let columns = columns(&[("Revenue", "Amount", "Revenue", "Total")]);
    let rewritten = rewrite_expression(
        "DIVIDE(SUM(Sales[Amount]), COUNTROWS(Sales))",
        Some(&tables),
        Some(&columns),
    );
    assert_eq!(rewritten, "DIVIDE(SUM(Revenue[Total]), COUNTROWS(Revenue))");
}

#[test]
fn test_empty_maps_leave_text_alone() {
    let expression = "SUM(Sales[Amount])";
    assert_eq!(
        rewrite_expression(expression, Some(&TableMap::new()), Some(&ColumnMap::new())),
        expression
    );
}

// ============================================================================
// Scanner Tests
// ============================================================================

#[test]
fn test_tokens_cover_the_whole_formula() {
    let expression = "'Sales'[Amount] * 1.1 /* uplift */";
    let tokens = tokenize(expression);

    let rebuilt: String = tokens.iter().map(|t| t.text).collect();
    assert_eq!(rebuilt, expression);

    let kinds: Vec<TokenKind> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .map(|t| t.kind)
        .take(3)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::QuotedIdentifier,
            TokenKind::BracketedReference,
            TokenKind::Other
        ]
    );
}
