//! Identifier quoting helpers for DAX formula text.
//!
//! DAX spells a table either bare (`Sales`) or single-quoted (`'Sales History'`,
//! with `''` standing for a literal quote) and a column always bracketed
//! (`[Amount]`, with `]]` standing for a literal bracket).
//!
//! # Examples
//!
//! ```
//! use rust_pbir::expression::{format_table_name, unquote_table_name};
//!
//! assert_eq!(format_table_name("Sales", false), "Sales");
//! assert_eq!(format_table_name("Sales History", false), "'Sales History'");
//! assert_eq!(format_table_name("Sales", true), "'Sales'");
//! assert_eq!(unquote_table_name("'O''Brien'"), "O'Brien");
//! ```

use std::borrow::Cow;

/// Characters that may appear in a bare (unquoted) identifier.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `name` cannot be written bare and must be single-quoted.
///
/// Any whitespace forces quoting, and so does any other non-word character
/// since the bare form would read as an operator.
pub fn needs_quoting(name: &str) -> bool {
    name.is_empty() || !name.chars().all(is_word_char)
}

/// Wrap a table name in single quotes, doubling embedded quotes.
pub fn quote_table_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Render a table name for formula text.
///
/// Quoted when `force_quotes` is set (the original spelling was quoted) or
/// when the name cannot be written bare.
pub fn format_table_name(name: &str, force_quotes: bool) -> String {
    if force_quotes || needs_quoting(name) {
        quote_table_name(name)
    } else {
        name.to_string()
    }
}

/// Strip the surrounding single quotes of a quoted table name and undo `''` escaping.
///
/// Input without surrounding quotes is returned as-is.
pub fn unquote_table_name(raw: &str) -> Cow<'_, str> {
    match raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(inner) if inner.contains("''") => Cow::Owned(inner.replace("''", "'")),
        Some(inner) => Cow::Borrowed(inner),
        None => Cow::Borrowed(raw),
    }
}

/// Wrap a column name in brackets, doubling embedded closing brackets.
pub fn format_column_reference(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Strip the surrounding brackets of a column reference and undo `]]` escaping.
///
/// Input without surrounding brackets is returned as-is.
pub fn unbracket_column(raw: &str) -> Cow<'_, str> {
    match raw.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        Some(inner) if inner.contains("]]") => Cow::Owned(inner.replace("]]", "]")),
        Some(inner) => Cow::Borrowed(inner),
        None => Cow::Borrowed(raw),
    }
}
