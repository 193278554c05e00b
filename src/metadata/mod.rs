//! Read-only inventory of the tables, columns and measures a report uses

mod export;
mod location;
mod walker;

pub use export::{
    collect_metadata, consolidate_rows, write_metadata_csv, MetadataRow, METADATA_HEADERS,
};
pub use location::{active_section, report_name, PageNames, NOT_AVAILABLE};
pub use walker::{collect_usages, AttributeUsage};
