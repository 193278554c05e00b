//! Table and column renaming inside DAX formula text.

use super::identifier_utils::{format_column_reference, format_table_name};
use super::scanner::{tokenize, Token, TokenKind};
use crate::mapping::{ColumnMap, TableMap};

/// Rewrite table and/or column identifiers in a formula.
///
/// The table pass runs first (when `tables` is given) and the column pass
/// runs on its output (when `columns` is given), so column lookups see the
/// renamed table qualifier. Text that matches nothing is returned unchanged;
/// this never fails.
pub fn rewrite_expression(
    expression: &str,
    tables: Option<&TableMap>,
    columns: Option<&ColumnMap>,
) -> String {
    let mut text = expression.to_string();

    if let Some(tables) = tables.filter(|t| !t.is_empty()) {
        if let Some(rewritten) = rewrite_table_references(&text, tables) {
            text = rewritten;
        }
    }

    if let Some(columns) = columns.filter(|c| !c.is_empty()) {
        if let Some(rewritten) = rewrite_column_references(&text, columns) {
            text = rewritten;
        }
    }

    text
}

/// Replace table-name tokens found in `tables`.
///
/// Bracketed references, string literals and comments are never touched.
/// A quoted name stays quoted; a bare name becomes quoted only when the new
/// name cannot be written bare. Returns `None` when nothing changed.
pub fn rewrite_table_references(expression: &str, tables: &TableMap) -> Option<String> {
    let tokens = tokenize(expression);
    let mut out = String::with_capacity(expression.len());
    let mut changed = false;

    for (idx, token) in tokens.iter().enumerate() {
        let replacement = match token.kind {
            TokenKind::Word if !is_function_call(&tokens, idx) => tables
                .get(token.text)
                .map(|new_table| format_table_name(new_table, false)),
            TokenKind::QuotedIdentifier => token.identifier().and_then(|name| {
                tables
                    .get(&name)
                    .map(|new_table| format_table_name(new_table, true))
            }),
            _ => None,
        };

        match replacement {
            Some(text) if text != token.text => {
                out.push_str(&text);
                changed = true;
            }
            _ => out.push_str(token.text),
        }
    }

    changed.then_some(out)
}

/// Replace `<table>[<column>]` pairs found in `columns`.
///
/// The qualifier must be immediately followed by the bracketed reference.
/// The new qualifier is quoted if the original was quoted or the new table
/// name cannot be written bare. Returns `None` when nothing changed.
pub fn rewrite_column_references(expression: &str, columns: &ColumnMap) -> Option<String> {
    let tokens = tokenize(expression);
    let mut out = String::with_capacity(expression.len());
    let mut changed = false;
    let mut idx = 0;

    while idx < tokens.len() {
        let token = &tokens[idx];
        if let Some((rewritten, reference)) = tokens.get(idx + 1).and_then(|next| {
            rewrite_qualified_column(token, next, columns).map(|text| (text, next))
        }) {
            let original = &expression[token.offset..span_end(reference)];
            changed |= rewritten != original;
            out.push_str(&rewritten);
            idx += 2;
            continue;
        }

        out.push_str(token.text);
        idx += 1;
    }

    changed.then_some(out)
}

fn rewrite_qualified_column(
    qualifier: &Token<'_>,
    reference: &Token<'_>,
    columns: &ColumnMap,
) -> Option<String> {
    if !qualifier.is_table_candidate() || reference.kind != TokenKind::BracketedReference {
        return None;
    }

    let table = qualifier.identifier()?;
    let column = reference.identifier()?;
    let target = columns.get(&table, &column)?;

    Some(format!(
        "{}{}",
        format_table_name(&target.table, qualifier.is_quoted()),
        format_column_reference(&target.column)
    ))
}

#[inline]
fn span_end(token: &Token<'_>) -> usize {
    token.offset + token.text.len()
}

/// A bare word followed by `(` is a function name, never a table.
fn is_function_call(tokens: &[Token<'_>], idx: usize) -> bool {
    tokens[idx + 1..]
        .iter()
        .find(|t| t.kind != TokenKind::Whitespace)
        .is_some_and(|t| t.text == "(")
}
