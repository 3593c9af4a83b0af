//! Keyed storage for reusable section bodies.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::document::write_atomic;
use crate::error::{CoreError, CoreResult};

/// Suffix of every body file in a template directory.
pub const TEMPLATE_EXTENSION: &str = "md";

/// Name → body mapping used by the section commands.
pub trait TemplateStore {
    /// Names of every stored template. Order is backend-defined.
    fn list(&self) -> CoreResult<Vec<String>>;

    fn fetch(&self, name: &str) -> CoreResult<String>;

    /// Stores `body` verbatim, replacing any previous body.
    fn save(&mut self, name: &str, body: &str) -> CoreResult<()>;

    /// Presence check; never reads the body.
    fn exists(&self, name: &str) -> bool;
}

/// Template store backed by one `<name>.md` file per template.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }

    /// Creates the template directory (and parents) when missing.
    pub fn ensure_directory(&self) -> CoreResult<()> {
        if self.root.is_dir() {
            return Ok(());
        }

        debug!(path = %self.root.display(), "creating template directory");
        fs::create_dir_all(&self.root).map_err(|source| CoreError::DirectoryCreate {
            path: self.root.clone(),
            source,
        })
    }

    fn checked_path(&self, name: &str) -> CoreResult<PathBuf> {
        validate_template_name(name)?;
        Ok(self.template_path(name))
    }
}

impl TemplateStore for FsTemplateStore {
    fn list(&self) -> CoreResult<Vec<String>> {
        self.ensure_directory()?;

        let entries =
            fs::read_dir(&self.root).map_err(|source| CoreError::TemplateList { source })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CoreError::TemplateList { source })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => names.push(stem.to_string()),
                None => trace!(path = %path.display(), "skipping non utf-8 template name"),
            }
        }

        debug!(count = names.len(), "listed templates");
        Ok(names)
    }

    fn fetch(&self, name: &str) -> CoreResult<String> {
        let path = self.checked_path(name)?;
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => CoreError::TemplateNotFound {
                name: name.to_string(),
            },
            _ => CoreError::TemplateRead {
                name: name.to_string(),
                source,
            },
        })
    }

    fn save(&mut self, name: &str, body: &str) -> CoreResult<()> {
        let path = self.checked_path(name)?;
        self.ensure_directory()?;

        write_atomic(&path, body).map_err(|source| CoreError::TemplateWrite {
            name: name.to_string(),
            source,
        })?;

        debug!(template = name, path = %path.display(), "saved template");
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        match self.checked_path(name) {
            Ok(path) => fs::metadata(path).is_ok(),
            Err(_) => false,
        }
    }
}

/// In-memory template store; `list` returns names in sorted order.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: BTreeMap<String, String>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.templates.insert(name.into(), body.into());
        self
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn list(&self) -> CoreResult<Vec<String>> {
        Ok(self.templates.keys().cloned().collect())
    }

    fn fetch(&self, name: &str) -> CoreResult<String> {
        validate_template_name(name)?;
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::TemplateNotFound {
                name: name.to_string(),
            })
    }

    fn save(&mut self, name: &str, body: &str) -> CoreResult<()> {
        validate_template_name(name)?;
        self.templates.insert(name.to_string(), body.to_string());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

/// Rejects names that cannot be used as a single file stem inside the
/// template directory.
pub fn validate_template_name(name: &str) -> CoreResult<()> {
    let invalid = name.trim().is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0', '\n', '\r']);

    if invalid {
        return Err(CoreError::InvalidTemplateName {
            name: name.to_string(),
        });
    }
    Ok(())
}
