//! Runs the lint over source trees on disk.

use std::fs;
use std::path::{Path, PathBuf};

use architecture_lint::{ArchitectureLintError, lint_backend_sources};
use rstest::rstest;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join("src").join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create source dir");
    }
    fs::write(path, contents).expect("write source");
}

#[rstest]
fn the_yatube_backend_keeps_its_layers() {
    let backend = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../backend");
    let result = lint_backend_sources(&backend);
    assert!(result.is_ok(), "{}", result.err().map(|e| e.to_string()).unwrap_or_default());
}

#[rstest]
fn leaks_are_reported_per_file_and_the_composition_root_is_skipped() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "domain/post.rs", "pub struct Post;");
    write(
        dir.path(),
        "inbound/http/posts.rs",
        "use crate::domain::PostCommandService;",
    );
    write(dir.path(), "inbound/http/pages.rs", "use askama::Template;");
    write(
        dir.path(),
        "outbound/memory/mod.rs",
        "use crate::inbound::http::state::HttpState;",
    );
    write(
        dir.path(),
        "server/state_builders.rs",
        "use crate::outbound::memory::InMemoryBlogStore; use crate::domain::PostCommandService;",
    );
    write(dir.path(), "inbound/http/notes.txt", "use diesel::prelude::*;");

    let result = lint_backend_sources(dir.path());

    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected violations, got {result:?}");
    };
    let files: Vec<&Path> = violations.iter().map(|v| v.file.as_path()).collect();
    assert_eq!(
        files,
        [Path::new("inbound/http/posts.rs"), Path::new("outbound/memory/mod.rs")]
    );
}
