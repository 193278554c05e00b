//! Document-level rewrite driver and change tracking.

use serde_json::Value;

use super::entity_pass::EntityPass;
use super::property_pass::PropertyPass;
use crate::mapping::{RenameMaps, TableMap};

/// One parsed report document. Mutated in place by the rewriter.
pub type DocumentTree = Value;

/// Which passes changed a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Table names were rewritten (`Entity`, `entities[].name`, expression qualifiers)
    pub entities: bool,
    /// Column names were rewritten (`Property`, filter columns, expression references)
    pub properties: bool,
}

impl RewriteOutcome {
    /// True when the document must be written back.
    pub fn changed(&self) -> bool {
        self.entities || self.properties
    }
}

/// Applies a batch's rename maps to documents.
///
/// The maps are borrowed read-only, so one rewriter can be shared across
/// threads while each document is owned by the thread rewriting it.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRewriter<'m> {
    maps: &'m RenameMaps,
}

impl<'m> DocumentRewriter<'m> {
    pub fn new(maps: &'m RenameMaps) -> Self {
        Self { maps }
    }

    /// Run the entity pass, then the property pass, skipping a pass whose
    /// map is empty.
    ///
    /// Each table name is resolved exactly once, by the entity pass.
    pub fn rewrite(&self, tree: &mut DocumentTree) -> RewriteOutcome {
        let entities = !self.maps.tables.is_empty() && self.rewrite_entities(tree);
        let properties = !self.maps.columns.is_empty() && self.property_pass(tree, None);
        RewriteOutcome {
            entities,
            properties,
        }
    }

    /// Apply table renames only. Returns true if anything changed.
    pub fn rewrite_entities(&self, tree: &mut DocumentTree) -> bool {
        let mut pass = EntityPass::new(&self.maps.tables);
        pass.visit(tree);
        pass.changed
    }

    /// Apply column renames only. Returns true if anything changed.
    ///
    /// For a document whose tables are not renamed yet: `filter` sources are
    /// resolved through the table map here, other `Entity` fields are not.
    pub fn rewrite_properties(&self, tree: &mut DocumentTree) -> bool {
        self.property_pass(tree, Some(&self.maps.tables))
    }

    fn property_pass(&self, tree: &mut DocumentTree, tables: Option<&TableMap>) -> bool {
        let mut pass = PropertyPass::new(tables, &self.maps.columns);
        pass.visit(tree);
        pass.changed
    }
}

/// Rewrite `tree` in place with both passes. Returns true if anything changed.
pub fn rewrite_document(tree: &mut DocumentTree, maps: &RenameMaps) -> bool {
    DocumentRewriter::new(maps).rewrite(tree).changed()
}
