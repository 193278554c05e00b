//! Collects attribute references from one document tree.

use std::collections::HashMap;

use serde_json::Value;

use crate::document::schema::{
    COLUMN, ENTITIES, ENTITY, EXPLORATION_STATE, EXPRESSION, FILTER_CONFIG, FROM, FROM_ALIAS,
    MEASURE, MEASURES, NAME, PAGE_BINDING, PAGE_BINDING_TYPE, PROPERTY, SOURCE_ALIAS_PTR,
    SOURCE_ENTITY_PTR, VISUAL, VISUAL_TYPE,
};

/// A table/column (or measure) reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeUsage {
    pub table: Option<String>,
    pub column: Option<String>,
    /// Where the reference sits: a visual type, `Drillthrough`, `Filters`, `Bookmarks`
    pub context: Option<String>,
    /// DAX text, for measure definitions
    pub expression: Option<String>,
}

/// Walk `tree` and return every attribute reference in document order.
pub fn collect_usages(tree: &Value) -> Vec<AttributeUsage> {
    let mut walker = UsageWalker::default();
    walker.walk(tree, None);
    walker.usages
}

#[derive(Default)]
struct UsageWalker {
    usages: Vec<AttributeUsage>,
    // One frame per enclosing object that declares a `From` list
    alias_scopes: Vec<HashMap<String, String>>,
}

impl UsageWalker {
    fn walk(&mut self, value: &Value, context: Option<&str>) {
        match value {
            Value::Object(fields) => {
                let scoped = match fields.get(FROM) {
                    Some(Value::Array(from)) => {
                        self.alias_scopes.push(aliases(from));
                        true
                    }
                    _ => false,
                };

                for (key, child) in fields {
                    self.walk_field(key, child, context);
                }

                if scoped {
                    self.alias_scopes.pop();
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, context);
                }
            }
            _ => {}
        }
    }

    fn walk_field(&mut self, key: &str, value: &Value, context: Option<&str>) {
        match key {
            COLUMN | MEASURE if value.is_object() => self.record_reference(value, context),
            VISUAL => {
                let visual_type = string_field(value, VISUAL_TYPE).unwrap_or("visual");
                self.walk(value, Some(visual_type));
            }
            PAGE_BINDING => {
                let binding = string_field(value, PAGE_BINDING_TYPE).unwrap_or("Drillthrough");
                self.walk(value, Some(binding));
            }
            FILTER_CONFIG => self.walk(value, Some("Filters")),
            EXPLORATION_STATE => self.walk(value, Some("Bookmarks")),
            ENTITIES => self.record_definitions(value, context),
            _ => self.walk(value, context),
        }
    }

    fn record_reference(&mut self, node: &Value, context: Option<&str>) {
        let table = node
            .pointer(SOURCE_ENTITY_PTR)
            .and_then(Value::as_str)
            .or_else(|| {
                node.pointer(SOURCE_ALIAS_PTR)
                    .and_then(Value::as_str)
                    .and_then(|alias| self.lookup_alias(alias))
            })
            .map(str::to_string);
        let column = string_field(node, PROPERTY).map(str::to_string);

        if table.is_none() && column.is_none() {
            return;
        }
        self.usages.push(AttributeUsage {
            table,
            column,
            context: context.map(str::to_string),
            expression: None,
        });
    }

    fn record_definitions(&mut self, entities: &Value, context: Option<&str>) {
        let Value::Array(entities) = entities else {
            return;
        };

        for entity in entities {
            let table = string_field(entity, NAME);
            let Some(Value::Array(measures)) = entity.get(MEASURES) else {
                continue;
            };
            for measure in measures {
                self.usages.push(AttributeUsage {
                    table: table.map(str::to_string),
                    column: string_field(measure, NAME).map(str::to_string),
                    context: context.map(str::to_string),
                    expression: string_field(measure, EXPRESSION).map(str::to_string),
                });
            }
        }
    }

    fn lookup_alias(&self, alias: &str) -> Option<&str> {
        self.alias_scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(alias))
            .map(String::as_str)
    }
}

fn aliases(from: &[Value]) -> HashMap<String, String> {
    from.iter()
        .filter_map(|source| {
            Some((
                string_field(source, FROM_ALIAS)?.to_string(),
                string_field(source, ENTITY)?.to_string(),
            ))
        })
        .collect()
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
