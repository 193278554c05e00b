//! Resolution of rename rules into table and column lookup maps

use std::collections::HashMap;

use super::csv_loader::RenameRule;

/// Maps an original table name to its new name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableMap {
    renames: HashMap<String, String>,
}

impl TableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a rename for `old`.
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.renames.insert(old.into(), new.into());
    }

    /// The new name for `table`, if it is renamed.
    #[inline]
    pub fn get(&self, table: &str) -> Option<&str> {
        self.renames.get(table).map(String::as_str)
    }

    /// The new name for `table`, or `table` itself when it is not renamed.
    #[inline]
    pub fn resolve<'a>(&'a self, table: &'a str) -> &'a str {
        self.get(table).unwrap_or(table)
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TableMap::new();
        for (old, new) in iter {
            map.insert(old, new);
        }
        map
    }
}

/// Target of a column rename: the (already resolved) table and the new column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTarget {
    pub table: String,
    pub column: String,
}

/// Maps `(resolved_table, old_column)` to a [`ColumnTarget`].
///
/// Keys always use the table name *after* table renames have been applied,
/// so callers look up with whatever table name the document carries once
/// the entity pass has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    // table -> column -> target, so lookups need no owned key
    renames: HashMap<String, HashMap<String, ColumnTarget>>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the rename of `column` on `table`.
    pub fn insert(
        &mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        target: ColumnTarget,
    ) {
        self.renames
            .entry(table.into())
            .or_default()
            .insert(column.into(), target);
    }

    /// Look up the rename target for `(table, column)`.
    #[inline]
    pub fn get(&self, table: &str, column: &str) -> Option<&ColumnTarget> {
        self.renames.get(table)?.get(column)
    }

    pub fn contains(&self, table: &str, column: &str) -> bool {
        self.get(table, column).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.renames.values().map(HashMap::len).sum()
    }
}

/// The pair of lookup maps built once per batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMaps {
    pub tables: TableMap,
    pub columns: ColumnMap,
}

impl RenameMaps {
    /// Resolve rules in input order.
    ///
    /// A table rename is visible to column rules that follow it (and to the
    /// column part of the same rule), so the column map is keyed by the
    /// table name as it will read after the entity pass.
    pub fn resolve(rules: &[RenameRule]) -> Self {
        let mut tables = TableMap::new();
        let mut columns = ColumnMap::new();

        for rule in rules.iter().filter(|r| r.is_valid()) {
            if let Some(new_table) = rule.table_rename() {
                tables.insert(rule.old_table.as_str(), new_table);
            }
            if let Some((old_column, new_column)) = rule.column_rename() {
                let effective_table = tables.resolve(&rule.old_table).to_string();
                columns.insert(
                    effective_table.clone(),
                    old_column,
                    ColumnTarget {
                        table: effective_table,
                        column: new_column.to_string(),
                    },
                );
            }
        }

        Self { tables, columns }
    }

    /// True when neither map has anything to apply.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.columns.is_empty()
    }
}
