//! Per-document read, rewrite and conditional write-back

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info};

use super::summary::FileReport;
use crate::document::{DocumentRewriter, DocumentTree, RewriteOutcome};
use crate::error::PbirError;
use crate::mapping::RenameMaps;

/// Minimum number of documents to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
pub const PARALLEL_THRESHOLD: usize = 8;

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Nothing matched; the file was not written
    Unchanged,
    /// At least one pass changed the document (written back unless dry run)
    Updated(RewriteOutcome),
    /// The document could not be read, parsed or written; it was skipped
    Failed(String),
}

impl FileOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, FileOutcome::Updated(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed(_))
    }
}

/// Rewrite a single document file.
///
/// The file is only written when a pass changed something and `dry_run` is
/// off. Key order and number spelling are kept; output uses 2-space
/// indentation and keeps a trailing newline if the original had one.
pub fn rewrite_file(
    path: &Path,
    rewriter: &DocumentRewriter<'_>,
    dry_run: bool,
) -> Result<RewriteOutcome, PbirError> {
    let content = std::fs::read_to_string(path).map_err(|e| PbirError::DocumentReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Strip UTF-8 BOM if present
    let json = content.strip_prefix('\u{FEFF}').unwrap_or(&content);

    let mut tree: DocumentTree =
        serde_json::from_str(json).map_err(|e| PbirError::DocumentParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let outcome = rewriter.rewrite(&mut tree);
    if outcome.entities {
        info!(path = %path.display(), "Entity updated in file");
    }
    if outcome.properties {
        info!(path = %path.display(), "Property updated in file");
    }

    if outcome.changed() && !dry_run {
        write_document(path, &tree, content.ends_with('\n'))?;
    }

    Ok(outcome)
}

fn write_document(
    path: &Path,
    tree: &DocumentTree,
    trailing_newline: bool,
) -> Result<(), PbirError> {
    let mut text =
        serde_json::to_string_pretty(tree).map_err(|e| PbirError::DocumentSerializeError {
            path: path.to_path_buf(),
            source: e,
        })?;
    if trailing_newline {
        text.push('\n');
    }

    std::fs::write(path, text).map_err(|e| PbirError::DocumentWriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn process_document(path: &Path, rewriter: &DocumentRewriter<'_>, dry_run: bool) -> FileReport {
    let outcome = match rewrite_file(path, rewriter, dry_run) {
        Ok(outcome) if outcome.changed() => FileOutcome::Updated(outcome),
        Ok(_) => FileOutcome::Unchanged,
        Err(e) => {
            let message = format!("{:#}", anyhow::Error::from(e));
            error!(path = %path.display(), error = %message, "Skipping document");
            FileOutcome::Failed(message)
        }
    };

    FileReport {
        path: path.to_path_buf(),
        outcome,
    }
}

/// Rewrite many documents, using parallel processing for larger sets.
///
/// Failures are captured per document; one bad file never stops the batch.
/// Reports come back in the same order as `files`.
pub fn process_documents(files: &[PathBuf], maps: &RenameMaps, dry_run: bool) -> Vec<FileReport> {
    let rewriter = DocumentRewriter::new(maps);

    if files.len() >= PARALLEL_THRESHOLD {
        files
            .par_iter()
            .map(|file| process_document(file, &rewriter, dry_run))
            .collect()
    } else {
        files
            .iter()
            .map(|file| process_document(file, &rewriter, dry_run))
            .collect()
    }
}
