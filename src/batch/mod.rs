//! Batch processing of report documents: discovery, rewrite and write-back

mod discovery;
mod processor;
mod summary;

pub use discovery::{compile_exclude_patterns, discover_documents, DOCUMENT_EXTENSION};
pub use processor::{process_documents, rewrite_file, FileOutcome, PARALLEL_THRESHOLD};
pub use summary::{print_summary, FileReport, RenameSummary};
