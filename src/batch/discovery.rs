//! Recursive discovery of report documents

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::PbirError;

/// Extension of the structured documents that make up a report definition.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Compile `--exclude` glob patterns.
pub fn compile_exclude_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, PbirError> {
    patterns
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|e| PbirError::InvalidExcludePattern {
                pattern: pattern.clone(),
                source: e,
            })
        })
        .collect()
}

/// Find every document under `root`, in a stable order.
///
/// Exclude patterns are matched against the path relative to `root`.
/// Entries that cannot be read are logged and skipped.
pub fn discover_documents(root: &Path, exclude: &[glob::Pattern]) -> Vec<PathBuf> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file()
            || !path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION)
        {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclude.iter().any(|pattern| pattern.matches_path(relative)) {
            debug!(path = %path.display(), "Excluded document");
            continue;
        }

        documents.push(path.to_path_buf());
    }

    documents
}
