//! Table renames: `Entity` fields, `entities[].name` and table qualifiers in
//! `expression` text.

use serde_json::Value;

use super::schema::{ENTITIES, ENTITY, EXPRESSION, NAME};
use crate::expression::rewrite_expression;
use crate::mapping::TableMap;

pub(super) struct EntityPass<'m> {
    tables: &'m TableMap,
    pub(super) changed: bool,
}

impl<'m> EntityPass<'m> {
    pub(super) fn new(tables: &'m TableMap) -> Self {
        Self {
            tables,
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
            (ENTITY, Value::String(entity)) => self.rename_table(entity),
            (ENTITIES, Value::Array(entities)) => {
                for entity in entities {
                    if let Some(Value::String(name)) = entity.get_mut(NAME) {
                        self.rename_table(name);
                    }
                    self.visit(entity);
                }
            }
            (EXPRESSION, Value::String(expression)) => {
                let rewritten = rewrite_expression(expression, Some(self.tables), None);
                if rewritten != *expression {
                    *expression = rewritten;
                    self.changed = true;
                }
            }
            (_, value) => self.visit(value),
        }
    }

    fn rename_table(&mut self, table: &mut String) {
        let tables = self.tables;
        if let Some(new_table) = tables.get(table) {
            *table = new_table.to_string();
            self.changed = true;
        }
    }
}
