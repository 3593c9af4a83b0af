//! Shared test harness utilities for cerebro crates.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Document with a title and two sections, used across suites.
pub const SAMPLE_DOCUMENT: &str =
    "# Agent Guide\n\n## Python\n\nUse black.\n\n## JavaScript\n\nUse prettier.\n";

/// Temporary directory holding a template library and target documents.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the template library lives in. Not created until a template
    /// is written.
    pub fn templates_dir(&self) -> PathBuf {
        self.dir.path().join("templates")
    }

    pub fn with_template(self, name: &str, body: &str) -> Self {
        let dir = self.templates_dir();
        fs::create_dir_all(&dir).expect("create templates dir");
        fs::write(dir.join(format!("{name}.md")), body).expect("write template");
        self
    }

    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        self.write_file(relative, contents);
        self
    }

    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("read file")
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
