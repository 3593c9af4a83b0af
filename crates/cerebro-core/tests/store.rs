use std::collections::HashSet;
use std::fs;

use cerebro_core::error::CoreError;
use cerebro_core::{FsTemplateStore, TemplateStore};
use cerebro_test_support::Workspace;

#[test]
fn list_returns_saved_names() {
    let workspace = Workspace::new();
    let mut store = FsTemplateStore::new(workspace.templates_dir());

    store.save("a", "body a").unwrap();
    store.save("b", "body b").unwrap();

    let names: HashSet<String> = store.list().unwrap().into_iter().collect();
    let expected: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names, expected);
}

#[test]
fn list_of_missing_directory_is_empty_and_creates_it() {
    let workspace = Workspace::new();
    let root = workspace.path().join("nested").join("templates");
    let store = FsTemplateStore::new(&root);

    assert!(store.list().unwrap().is_empty());
    assert!(root.is_dir());
}

#[test]
fn list_filters_to_markdown_files() {
    let workspace = Workspace::new()
        .with_template("python", "py")
        .with_template("README", "readme")
        .with_file("templates/config.txt", "ignored");
    fs::create_dir_all(workspace.templates_dir().join("folder.md")).unwrap();

    let store = FsTemplateStore::new(workspace.templates_dir());
    let mut names = store.list().unwrap();
    names.sort();
    assert_eq!(names, vec!["README", "python"]);
}

#[test]
fn exists_flips_after_save() {
    let workspace = Workspace::new();
    let mut store = FsTemplateStore::new(workspace.templates_dir());

    assert!(!store.exists("python"));
    store.save("python", "Use black.").unwrap();
    assert!(store.exists("python"));
}

#[test]
fn exists_does_not_create_directory() {
    let workspace = Workspace::new();
    let store = FsTemplateStore::new(workspace.templates_dir());
    assert!(!store.exists("python"));
    assert!(!workspace.templates_dir().exists());
}

#[test]
fn fetch_returns_body_verbatim() {
    let workspace = Workspace::new().with_template("python", "  Use black.\n\n");
    let store = FsTemplateStore::new(workspace.templates_dir());
    assert_eq!(store.fetch("python").unwrap(), "  Use black.\n\n");
}

#[test]
fn fetch_missing_is_not_found_even_without_directory() {
    let workspace = Workspace::new();
    let store = FsTemplateStore::new(workspace.templates_dir());

    let err = store.fetch("python").unwrap_err();
    assert!(matches!(err, CoreError::TemplateNotFound { ref name } if name == "python"));
    assert_eq!(err.to_string(), "Template 'python' not found");
    assert!(!workspace.templates_dir().exists());
}

#[test]
fn fetch_unreadable_entry_is_read_error() {
    let workspace = Workspace::new();
    fs::create_dir_all(workspace.templates_dir().join("python.md")).unwrap();
    let store = FsTemplateStore::new(workspace.templates_dir());

    let err = store.fetch("python").unwrap_err();
    assert!(matches!(err, CoreError::TemplateRead { .. }));
}

#[test]
fn save_overwrites_existing_body() {
    let workspace = Workspace::new().with_template("python", "old");
    let mut store = FsTemplateStore::new(workspace.templates_dir());

    store.save("python", "new").unwrap();

    assert_eq!(workspace.read_file("templates/python.md"), "new");
}

#[test]
fn save_fails_when_directory_cannot_be_created() {
    let workspace = Workspace::new().with_file("blocker", "not a directory");
    let mut store = FsTemplateStore::new(workspace.path().join("blocker").join("templates"));

    let err = store.save("python", "body").unwrap_err();
    assert!(matches!(err, CoreError::DirectoryCreate { .. }));
}

#[test]
fn path_like_names_are_rejected() {
    let workspace = Workspace::new();
    let mut store = FsTemplateStore::new(workspace.templates_dir());

    let err = store.save("../escape", "body").unwrap_err();
    assert!(matches!(err, CoreError::InvalidTemplateName { .. }));
    assert!(!store.exists("../escape"));
    assert!(!workspace.path().join("escape.md").exists());
}
