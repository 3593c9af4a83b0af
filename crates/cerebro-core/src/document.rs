use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::debug;

use crate::diff::unified_diff;
use crate::error::{CoreError, CoreResult};

/// Result of running a transformation over a document on disk.
#[derive(Debug, Clone)]
pub struct DocumentChange {
    pub original: String,
    pub updated: String,
    pub diff: Option<String>,
    pub written: bool,
}

impl DocumentChange {
    pub fn changed(&self) -> bool {
        self.original != self.updated
    }
}

/// Reads a document, treating a missing file as an empty document.
pub fn read_document(path: &Path) -> CoreResult<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "document missing, starting empty");
            Ok(String::new())
        }
        Err(source) => Err(CoreError::DocumentRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replaces the document at `path` via a temporary file and rename, so
/// readers see either the old or the new content.
pub fn write_document(path: &Path, content: &str) -> CoreResult<()> {
    write_atomic(path, content).map_err(|source| CoreError::DocumentWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads `path`, applies `transform`, and writes the result back unless
/// `dry_run` is set.
pub fn process_document<F>(path: &Path, dry_run: bool, transform: F) -> CoreResult<DocumentChange>
where
    F: FnOnce(&str) -> CoreResult<String>,
{
    let original = read_document(path)?;
    let updated = transform(&original)?;
    let diff = unified_diff(&original, &updated, path);

    let written = !dry_run;
    if written {
        write_document(path, &updated)?;
        debug!(path = %path.display(), bytes = updated.len(), "document written");
    }

    Ok(DocumentChange {
        original,
        updated,
        diff,
        written,
    })
}

pub(crate) fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    let mut tmp = Builder::new().prefix(".cerebro").tempfile_in(&parent)?;
    tmp.as_file_mut().write_all(content.as_bytes())?;
    tmp.as_file_mut().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let perm = metadata.permissions().mode();
            let _ = fs::set_permissions(tmp.path(), fs::Permissions::from_mode(perm));
        }
    }

    tmp.persist(path).map(|_| ()).map_err(|err| err.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_document_reads_as_empty() {
        let dir = tempdir().unwrap();
        let content = read_document(&dir.path().join("AGENT.md")).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn directory_path_is_a_read_error() {
        let dir = tempdir().unwrap();
        let err = read_document(dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::DocumentRead { .. }));
    }

    #[test]
    fn writes_replace_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "hello").unwrap();

        write_document(&path, "updated").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "# T\n").unwrap();

        let change = process_document(&path, true, |content| Ok(format!("{content}more\n")))
            .unwrap();

        assert!(change.changed());
        assert!(!change.written);
        assert!(change.diff.unwrap().contains("+more"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# T\n");
    }

    #[test]
    fn failed_transform_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");

        let err = process_document(&path, false, |_| {
            Err(CoreError::SectionNotFound { name: "A".into() })
        })
        .unwrap_err();

        assert!(matches!(err, CoreError::SectionNotFound { .. }));
        assert!(!path.exists());
    }
}
