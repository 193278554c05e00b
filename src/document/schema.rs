//! Field names of the PBIR document schema that the rewriter and the
//! metadata walker recognize.

/// Table name on a `SourceRef` or `From` entry.
pub const ENTITY: &str = "Entity";
/// Table definitions carried by report extensions.
pub const ENTITIES: &str = "entities";
pub const NAME: &str = "name";
pub const COLUMN: &str = "Column";
pub const MEASURE: &str = "Measure";
pub const PROPERTY: &str = "Property";
/// DAX text of a report-level measure.
pub const EXPRESSION: &str = "expression";
pub const MEASURES: &str = "measures";
pub const FILTER: &str = "filter";
pub const FROM: &str = "From";
/// Alias a `From` entry introduces for use in `SourceRef.Source`.
pub const FROM_ALIAS: &str = "Name";
pub const WHERE: &str = "Where";

pub const VISUAL: &str = "visual";
pub const VISUAL_TYPE: &str = "visualType";
pub const PAGE_BINDING: &str = "pageBinding";
pub const PAGE_BINDING_TYPE: &str = "type";
pub const FILTER_CONFIG: &str = "filterConfig";
pub const EXPLORATION_STATE: &str = "explorationState";
pub const ACTIVE_SECTION: &str = "activeSection";
pub const DISPLAY_NAME: &str = "displayName";

/// JSON pointer from a `Column`/`Measure` node to its table name.
pub const SOURCE_ENTITY_PTR: &str = "/Expression/SourceRef/Entity";
/// JSON pointer from a `Column`/`Measure` node to its `From` alias.
pub const SOURCE_ALIAS_PTR: &str = "/Expression/SourceRef/Source";
