//! Report and page names derived from a document's location

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::document::schema::{ACTIVE_SECTION, DISPLAY_NAME, EXPLORATION_STATE};

/// Placeholder for a report or page that cannot be determined.
pub const NOT_AVAILABLE: &str = "NA";

const REPORT_SUFFIX: &str = ".Report";
const DEFINITION_DIR: &str = "definition";
const PAGES_DIR: &str = "pages";
const BOOKMARKS_MARKER: &str = "bookmarks";
const PAGE_DOCUMENT: &str = "page.json";

fn normal_components(path: &Path) -> impl DoubleEndedIterator<Item = &str> {
    path.components().filter_map(|component| match component {
        Component::Normal(name) => name.to_str(),
        _ => None,
    })
}

/// Name of the report a document belongs to: the innermost path component
/// ending in `.Report`, without the suffix.
pub fn report_name(path: &Path) -> String {
    normal_components(path)
        .rev()
        .find_map(|component| component.strip_suffix(REPORT_SUFFIX))
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Page section a document belongs to.
///
/// Bookmark documents name their page in `explorationState.activeSection`;
/// everything else is located by the directory following `pages`.
pub fn active_section(path: &Path, tree: &Value) -> Option<String> {
    let section = if path.to_string_lossy().contains(BOOKMARKS_MARKER) {
        tree.get(EXPLORATION_STATE)
            .and_then(|state| state.get(ACTIVE_SECTION))
            .and_then(Value::as_str)
    } else {
        normal_components(path)
            .skip_while(|component| *component != PAGES_DIR)
            .nth(1)
    };

    section
        .filter(|section| !section.is_empty())
        .map(str::to_string)
}

/// Directory holding a document's `definition` folder.
fn definition_root(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|ancestor| ancestor.file_name().is_some_and(|name| name == DEFINITION_DIR))
        .and_then(Path::parent)
        .map(Path::to_path_buf)
}

/// Caches page display names by report root and section.
#[derive(Debug, Default)]
pub struct PageNames {
    cache: HashMap<(PathBuf, String), String>,
}

impl PageNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name of the page `document` belongs to, or `NA`.
    pub fn page_name(&mut self, document: &Path, tree: &Value) -> String {
        let Some(section) = active_section(document, tree) else {
            return NOT_AVAILABLE.to_string();
        };
        let root = definition_root(document).unwrap_or_default();

        self.cache
            .entry((root, section))
            .or_insert_with_key(|(root, section)| read_display_name(root, section))
            .clone()
    }
}

fn read_display_name(root: &Path, section: &str) -> String {
    let page = root
        .join(DEFINITION_DIR)
        .join(PAGES_DIR)
        .join(section)
        .join(PAGE_DOCUMENT);

    let display_name = std::fs::read_to_string(&page)
        .ok()
        .and_then(|content| {
            let json = content.strip_prefix('\u{FEFF}').unwrap_or(&content);
            serde_json::from_str::<Value>(json).ok()
        })
        .and_then(|tree| tree.get(DISPLAY_NAME)?.as_str().map(str::to_string));

    match display_name {
        Some(name) => name,
        None => {
            debug!(page = %page.display(), "Page display name not available");
            NOT_AVAILABLE.to_string()
        }
    }
}
