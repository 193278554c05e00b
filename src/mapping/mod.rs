//! Rename rules and the lookup maps resolved from them

mod csv_loader;
mod resolver;

pub use csv_loader::{load_rename_rules, parse_rename_rules, RenameRule, EXPECTED_COLUMNS};
pub use resolver::{ColumnMap, ColumnTarget, RenameMaps, TableMap};
