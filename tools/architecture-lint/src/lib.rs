//! Layering lint for the Yatube backend.
//!
//! Parses every file under `backend/src/{domain,inbound,outbound}` with `syn`
//! and checks the paths it mentions against the rules in `rules.rs`:
//!
//! - the domain stays free of web, template and storage crates and never
//!   reaches into an adapter
//! - the HTTP adapter calls use cases through the driving ports only, never
//!   names a service or a storage port, and keeps askama templates inside
//!   `inbound/http/pages`
//! - the storage adapters implement driven ports and never name a service,
//!   a driving port or a web crate
//!
//! `server`, `main` and the binaries are the composition root and are not
//! linted. Run it with `cargo run -p architecture-lint`.

mod paths;
mod rules;

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rules::Layer;

/// Library name of the linted crate, as used in absolute paths.
pub(crate) const CRATE_NAME: &str = "yatube";

/// A source file to lint, addressed relative to `backend/src`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    pub file: PathBuf,
    pub contents: String,
}

/// One broken rule in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    /// What the file did, prefixed by its layer.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Why a lint run did not pass.
#[derive(Debug, thiserror::Error)]
pub enum ArchitectureLintError {
    /// Walking or reading the source tree failed.
    #[error("failed to read backend sources: {0}")]
    Io(#[from] io::Error),
    /// A file sits outside the linted layers.
    #[error("{}: not inside domain/, inbound/ or outbound/", .file.display())]
    UnknownLayer { file: PathBuf },
    /// A file is not valid Rust.
    #[error("{}: failed to parse: {message}", .file.display())]
    Parse { file: PathBuf, message: String },
    /// The tree breaks one or more layering rules.
    #[error("layering violations:{}", bullet_list(.0))]
    Violations(Vec<Violation>),
}

fn bullet_list(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("\n- {violation}"))
        .collect()
}

/// Lint the sources of the backend crate rooted at `backend_dir`.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let sources = read_layer_sources(&backend_dir.join("src"))?;
    lint_sources(&sources)
}

/// Lint in-memory sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        violations.extend(lint_source(source)?);
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

fn lint_source(source: &LintSource) -> Result<Vec<Violation>, ArchitectureLintError> {
    let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::UnknownLayer {
        file: source.file.clone(),
    })?;
    let parsed = syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
        file: source.file.clone(),
        message: err.to_string(),
    })?;

    let messages: BTreeSet<String> = paths::referenced_paths(&parsed)
        .iter()
        .flat_map(|path| {
            layer
                .rules()
                .iter()
                .filter_map(move |rule| rule.check(&source.file, path))
        })
        .collect();
    Ok(messages
        .into_iter()
        .map(|message| Violation {
            file: source.file.clone(),
            message: format!("{} code {message}", layer.dir()),
        })
        .collect())
}

fn read_layer_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut pending: Vec<PathBuf> = Layer::ALL
        .iter()
        .map(|layer| src_dir.join(layer.dir()))
        .filter(|dir| dir.is_dir())
        .collect();
    let mut sources = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let file = path
                    .strip_prefix(src_dir)
                    .map(Path::to_path_buf)
                    .map_err(|_| ArchitectureLintError::UnknownLayer { file: path.clone() })?;
                let contents = fs::read_to_string(&path)?;
                sources.push(LintSource { file, contents });
            }
        }
    }
    sources.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(sources)
}

#[cfg(test)]
mod tests;
