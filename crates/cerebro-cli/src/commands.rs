use std::path::{Path, PathBuf};

use cerebro_core::{
    delete, extract, insert, process_document, read_document, CoreError, DocumentChange, ExitCode,
    TemplateStore,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Source file is empty or does not exist")]
    EmptySource { path: PathBuf },
}

impl CommandError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Core(err) => err.exit_code(),
            Self::EmptySource { .. } => ExitCode::NotFound,
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    Updated,
}

/// Section commands over a template store.
#[derive(Debug)]
pub struct Commands<S> {
    store: S,
}

impl<S: TemplateStore> Commands<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends the template named `section` to `file` as a new section.
    pub fn add(&self, section: &str, file: &Path, dry_run: bool) -> CommandResult<DocumentChange> {
        let body = self.store.fetch(section)?;
        let change = process_document(file, dry_run, |content| insert(content, section, &body))?;
        info!(section, file = %file.display(), dry_run, "added section");
        Ok(change)
    }

    pub fn remove(
        &self,
        section: &str,
        file: &Path,
        dry_run: bool,
    ) -> CommandResult<DocumentChange> {
        let change = process_document(file, dry_run, |content| delete(content, section))?;
        info!(section, file = %file.display(), dry_run, "removed section");
        Ok(change)
    }

    /// Template names, sorted.
    pub fn list(&self) -> CommandResult<Vec<String>> {
        let mut names = self.store.list()?;
        names.sort();
        Ok(names)
    }

    /// Copies the body of `section` in `source` into the template library.
    pub fn import(&mut self, section: &str, source: &Path) -> CommandResult<ImportOutcome> {
        let content = read_document(source)?;
        if content.trim().is_empty() {
            return Err(CommandError::EmptySource {
                path: source.to_path_buf(),
            });
        }

        let body = extract(&content, section)?;
        let existed = self.store.exists(section);
        self.store.save(section, &body)?;
        info!(section, source = %source.display(), existed, "imported template");

        Ok(if existed {
            ImportOutcome::Updated
        } else {
            ImportOutcome::Imported
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerebro_core::MemoryTemplateStore;
    use cerebro_test_support::{Workspace, SAMPLE_DOCUMENT};
    use pretty_assertions::assert_eq;

    fn commands() -> Commands<MemoryTemplateStore> {
        Commands::new(MemoryTemplateStore::new().with_template("Rust", "Run clippy.\n"))
    }

    #[test]
    fn add_creates_missing_document() {
        let workspace = Workspace::new();
        let file = workspace.path().join("AGENT.md");

        commands().add("Rust", &file, false).unwrap();

        assert_eq!(workspace.read_file("AGENT.md"), "## Rust\n\nRun clippy.\n");
    }

    #[test]
    fn add_unknown_template_leaves_document_alone() {
        let workspace = Workspace::new().with_file("AGENT.md", SAMPLE_DOCUMENT);
        let file = workspace.path().join("AGENT.md");

        let err = commands().add("Go", &file, false).unwrap_err();

        assert!(matches!(
            err,
            CommandError::Core(CoreError::TemplateNotFound { .. })
        ));
        assert_eq!(workspace.read_file("AGENT.md"), SAMPLE_DOCUMENT);
    }

    #[test]
    fn remove_rewrites_document() {
        let workspace = Workspace::new().with_file("AGENT.md", SAMPLE_DOCUMENT);
        let file = workspace.path().join("AGENT.md");

        let change = commands().remove("Python", &file, false).unwrap();

        assert!(change.written);
        assert_eq!(
            workspace.read_file("AGENT.md"),
            "# Agent Guide\n\n## JavaScript\n\nUse prettier."
        );
    }

    #[test]
    fn import_reports_update_on_second_run() {
        let workspace = Workspace::new().with_file("source.md", SAMPLE_DOCUMENT);
        let source = workspace.path().join("source.md");
        let mut commands = commands();

        assert_eq!(
            commands.import("Python", &source).unwrap(),
            ImportOutcome::Imported
        );
        assert_eq!(
            commands.import("Python", &source).unwrap(),
            ImportOutcome::Updated
        );
        assert_eq!(commands.store().fetch("Python").unwrap(), "Use black.");
    }

    #[test]
    fn import_from_missing_file_is_empty_source() {
        let workspace = Workspace::new();
        let err = commands()
            .import("Python", &workspace.path().join("nope.md"))
            .unwrap_err();
        assert!(matches!(err, CommandError::EmptySource { .. }));
        assert_eq!(err.exit_code(), ExitCode::NotFound);
    }

    #[test]
    fn list_is_sorted() {
        let commands = Commands::new(
            MemoryTemplateStore::new()
                .with_template("python", "")
                .with_template("go", ""),
        );
        assert_eq!(commands.list().unwrap(), vec!["go", "python"]);
    }
}
