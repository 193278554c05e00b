//! Common test utilities for rust-pbir tests

use std::fs;
use std::path::{Path, PathBuf};

use rust_pbir::batch::RenameSummary;
use rust_pbir::{MetadataOptions, RenameOptions};
use serde_json::Value;
use tempfile::TempDir;

/// Name of the report folder inside each fixture
pub const REPORT_FOLDER: &str = "Sales.Report";

/// Test context with temporary directory for isolated test execution
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub root_dir: PathBuf,
    /// Stored for debugging purposes
    _fixture_name: String,
}

impl TestContext {
    /// Create a new test context by copying a fixture to a temp directory
    pub fn with_fixture(fixture_name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(fixture_name);

        let root_dir = temp_dir.path().to_path_buf();

        // Copy fixture to temp directory
        copy_dir_recursive(&fixture_path, &root_dir).expect("Failed to copy fixture");

        Self {
            _temp_dir: temp_dir,
            root_dir,
            _fixture_name: fixture_name.to_string(),
        }
    }

    /// Root folder of the report definition
    pub fn report_dir(&self) -> PathBuf {
        self.root_dir.join(REPORT_FOLDER)
    }

    /// Path to the fixture's rename CSV
    pub fn mapping_path(&self) -> PathBuf {
        self.root_dir.join("mapping.csv")
    }

    /// Path of a document relative to the report's `definition` folder
    pub fn document_path(&self, relative: &str) -> PathBuf {
        self.report_dir().join("definition").join(relative)
    }

    pub fn read_text(&self, relative: &str) -> String {
        fs::read_to_string(self.document_path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn read_document(&self, relative: &str) -> Value {
        serde_json::from_str(&self.read_text(relative))
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", relative, e))
    }

    /// Snapshot every file under the report folder
    pub fn snapshot(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files = Vec::new();
        collect_files(&self.report_dir(), &mut files);
        files.sort();
        files
    }

    /// Rename options pointing at this fixture
    pub fn rename_options(&self) -> RenameOptions {
        RenameOptions {
            report_dir: self.report_dir(),
            mapping_path: self.mapping_path(),
            exclude: Vec::new(),
            dry_run: false,
        }
    }

    /// Run a rename with the fixture's mapping, panicking on failure
    pub fn rename(&self) -> RenameSummary {
        rust_pbir::rename_report_attributes(self.rename_options()).expect("Rename should succeed")
    }

    /// Export metadata for the whole fixture and read the CSV back
    pub fn export_metadata(&self) -> Vec<Vec<String>> {
        let output_path = self.root_dir.join("metadata.csv");
        rust_pbir::export_metadata(MetadataOptions {
            report_dir: self.root_dir.clone(),
            output_path: output_path.clone(),
        })
        .expect("Metadata export should succeed");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&output_path)
            .expect("Failed to open metadata CSV");
        reader
            .records()
            .map(|record| {
                record
                    .expect("Invalid metadata CSV record")
                    .iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }
}

fn collect_files(dir: &Path, files: &mut Vec<(PathBuf, Vec<u8>)>) {
    for entry in fs::read_dir(dir).expect("Failed to read directory") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            collect_files(&path, files);
        } else {
            let content = fs::read(&path).expect("Failed to read file");
            files.push((path, content));
        }
    }
}

/// Write a mapping CSV next to the fixture and return its path
pub fn write_mapping(ctx: &TestContext, name: &str, content: &str) -> PathBuf {
    let path = ctx.root_dir.join(name);
    fs::write(&path, content).expect("Failed to write mapping");
    path
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    if !dst.exists() {
        fs::create_dir_all(dst)?;
    }

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}
