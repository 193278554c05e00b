//! Column renames: `Column`/`Measure` property nodes, filter `Where` clauses
//! and `<table>[<column>]` references in `expression` text.
//!
//! Normally runs after the entity pass, so every table name it reads is
//! already the renamed one and column lookups go straight to the column map.
//! Run on its own, it resolves `filter` sources through the table map.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::schema::{
    COLUMN, ENTITY, EXPRESSION, FILTER, FROM, FROM_ALIAS, MEASURE, PROPERTY, SOURCE_ALIAS_PTR,
    SOURCE_ENTITY_PTR, WHERE,
};
use crate::expression::rewrite_expression;
use crate::mapping::{ColumnMap, TableMap};

pub(super) struct PropertyPass<'m> {
    // `None` when the entity pass already renamed every `From` entry
    tables: Option<&'m TableMap>,
    columns: &'m ColumnMap,
    pub(super) changed: bool,
}

/// Table context of one `filter` node: `From` aliases and the first source.
struct FilterSources {
    aliases: HashMap<String, String>,
    primary: Option<String>,
}

impl FilterSources {
    /// Table for a column node inside `Where`: its alias if known, its own
    /// entity if it names one, otherwise the first `From` entry.
    fn table_for<'a>(&'a self, column: &'a Value) -> Option<&'a str> {
        if let Some(alias) = column.pointer(SOURCE_ALIAS_PTR).and_then(Value::as_str) {
            if let Some(table) = self.aliases.get(alias) {
                return Some(table.as_str());
            }
        }
        column
            .pointer(SOURCE_ENTITY_PTR)
            .and_then(Value::as_str)
            .or(self.primary.as_deref())
    }
}

impl<'m> PropertyPass<'m> {
    pub(super) fn new(tables: Option<&'m TableMap>, columns: &'m ColumnMap) -> Self {
        Self {
            tables,
            columns,
            changed: false,
        }
    }

    pub(super) fn visit(&mut self, value: &mut Value) {
        match value {
            Value::Object(fields) => {
                for (key, child) in fields.iter_mut() {
                    self.visit_field(key, child);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.visit(item);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    fn visit_field(&mut self, key: &str, value: &mut Value) {
        match (key, value) {
            (COLUMN | MEASURE, node @ Value::Object(_)) => self.rename_property(node),
            (EXPRESSION, Value::String(expression)) => {
                let rewritten = rewrite_expression(expression, None, Some(self.columns));
                if rewritten != *expression {
                    *expression = rewritten;
                    self.changed = true;
                }
            }
            (FILTER, Value::Object(filter))
                if filter.contains_key(FROM) && filter.contains_key(WHERE) =>
            {
                self.rewrite_filter(filter)
            }
            (_, value) => self.visit(value),
        }
    }

    /// Rename a `Column`/`Measure` node keyed by its own `SourceRef.Entity`.
    fn rename_property(&mut self, node: &mut Value) {
        let columns = self.columns;
        let Some(entity) = node.pointer(SOURCE_ENTITY_PTR).and_then(Value::as_str) else {
            return;
        };
        let Some(property) = node.get(PROPERTY).and_then(Value::as_str) else {
            return;
        };
        let Some(target) = columns.get(entity, property) else {
            return;
        };

        let entity_changed = set_string(node.pointer_mut(SOURCE_ENTITY_PTR), &target.table);
        let property_changed = set_string(node.get_mut(PROPERTY), &target.column);
        self.changed |= entity_changed || property_changed;
    }

    fn rewrite_filter(&mut self, filter: &mut Map<String, Value>) {
        let sources = match filter.get_mut(FROM) {
            Some(Value::Array(from)) => self.resolve_from(from),
            _ => return,
        };
        if sources.primary.is_none() {
            return;
        }

        if let Some(Value::Array(conditions)) = filter.get_mut(WHERE) {
            for condition in conditions {
                self.rename_where_columns(condition, &sources);
            }
        }
    }

    /// Collect `From` aliases, resolving each `From[i].Entity` through the
    /// table map when this pass owns table resolution.
    fn resolve_from(&mut self, from: &mut [Value]) -> FilterSources {
        let tables = self.tables;
        let mut sources = FilterSources {
            aliases: HashMap::new(),
            primary: None,
        };

        for (idx, source) in from.iter_mut().enumerate() {
            let resolved = match source.get_mut(ENTITY) {
                Some(Value::String(entity)) => {
                    if let Some(new_table) = tables.and_then(|tables| tables.get(entity)) {
                        *entity = new_table.to_string();
                        self.changed = true;
                    }
                    entity.clone()
                }
                _ => continue,
            };

            if let Some(alias) = source.get(FROM_ALIAS).and_then(Value::as_str) {
                sources.aliases.insert(alias.to_string(), resolved.clone());
            }
            if idx == 0 {
                sources.primary = Some(resolved);
            }
        }

        sources
    }

    fn rename_where_columns(&mut self, value: &mut Value, sources: &FilterSources) {
        match value {
            Value::Object(fields) => {
                for (key, child) in fields.iter_mut() {
                    match (key.as_str(), child) {
                        (COLUMN | MEASURE, node @ Value::Object(_)) => {
                            self.rename_filter_property(node, sources)
                        }
                        (_, child) => self.rename_where_columns(child, sources),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.rename_where_columns(item, sources);
                }
            }
            _ => {}
        }
    }

    fn rename_filter_property(&mut self, node: &mut Value, sources: &FilterSources) {
        let columns = self.columns;
        let Some(table) = sources.table_for(node) else {
            return;
        };
        let Some(property) = node.get(PROPERTY).and_then(Value::as_str) else {
            return;
        };
        let Some(target) = columns.get(table, property) else {
            return;
        };

        self.changed |= set_string(node.get_mut(PROPERTY), &target.column);
    }
}

/// Overwrite a string slot, reporting whether the stored text changed.
fn set_string(slot: Option<&mut Value>, text: &str) -> bool {
    match slot {
        Some(Value::String(current)) if current != text => {
            *current = text.to_string();
            true
        }
        _ => false,
    }
}
