//! Error types for rust-pbir

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading rename rules or processing report documents
#[derive(Error, Debug)]
pub enum PbirError {
    #[error("Failed to read mapping file: {path}")]
    MappingReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mapping file is not valid UTF-8, UTF-16 or Windows-1252 text: {path}")]
    MappingDecodeError { path: PathBuf },

    #[error("Failed to parse mapping file: {path}")]
    MappingParseError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Mapping file {path} must contain the columns old_tbl, old_col, new_tbl, new_col (missing: {missing})")]
    MappingSchemaError { path: PathBuf, missing: String },

    #[error("Report directory not found: {path}")]
    ReportDirNotFound { path: PathBuf },

    #[error("Invalid exclude pattern: {pattern}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to read document: {path}")]
    DocumentReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse JSON in document: {path}")]
    DocumentParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {path}")]
    DocumentSerializeError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write document: {path}")]
    DocumentWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write metadata to {path}")]
    MetadataWriteError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
