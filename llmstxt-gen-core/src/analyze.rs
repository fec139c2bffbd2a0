//! Project analysis: ecosystem classification, documentation discovery and readme capture.
//!
//! [`analyze`] never fails. Unreadable entries are skipped, a missing readme
//! yields an empty excerpt, and a root that does not exist produces an empty
//! `Unknown` analysis.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::contract::{ProjectAnalysis, ProjectType};

/// Maximum number of documentation paths kept, applied after sorting.
pub const MAX_DOC_FILES: usize = 50;

/// Maximum readme excerpt length, in characters.
pub const README_EXCERPT_CHARS: usize = 500;

/// More markdown files than this, with no marker file, classifies as a documentation site.
pub const DOC_SITE_MARKDOWN_THRESHOLD: usize = 5;

/// Directory names whose contents are never treated as documentation.
pub const IGNORED_DIRS: &[&str] = &["node_modules", ".git", "build", "dist", ".next", "venv"];

/// Extensions considered documentation.
pub const DOC_EXTENSIONS: &[&str] = &["md", "html", "rst"];

/// Readme candidates, probed in order.
pub const README_CANDIDATES: &[&str] = &["README.md", "readme.md", "README.rst"];

/// Marker files in precedence order; the first present wins.
const MARKERS: &[(&[&str], ProjectType)] = &[
    (&["package.json"], ProjectType::Node),
    (&["pyproject.toml", "setup.py"], ProjectType::Python),
    (&["Cargo.toml"], ProjectType::Rust),
    (&["Package.swift"], ProjectType::Swift),
    (&["go.mod"], ProjectType::Go),
];

/// Scan the project at `root` and build its [`ProjectAnalysis`].
pub fn analyze(root: &Path) -> ProjectAnalysis {
    let root_path = resolve_root(root);
    info!(root = %root_path.display(), "Analyzing project structure");

    let project_type = detect_project_type(&root_path);
    let doc_files = find_documentation(&root_path);
    let readme_excerpt = read_readme(&root_path);
    let file_count = doc_files.len();

    info!(
        project_type = %project_type,
        doc_files = file_count,
        readme_chars = readme_excerpt.chars().count(),
        "Project analysis complete"
    );

    ProjectAnalysis {
        project_type,
        root_path,
        doc_files,
        readme_excerpt,
        file_count,
    }
}

fn resolve_root(root: &Path) -> PathBuf {
    match fs::canonicalize(root) {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, root = %root.display(), "Cannot canonicalize project root");
            std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
        }
    }
}

/// Classify by marker files anywhere in the tree, then by markdown density.
///
/// The whole tree is walked, ignored directories included.
pub fn detect_project_type(root: &Path) -> ProjectType {
    let mut names: HashSet<String> = HashSet::new();
    let mut markdown_count = 0usize;

    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !is_regular_file(&entry) {
            continue;
        }
        if has_extension(entry.path(), "md") {
            markdown_count += 1;
        }
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }

    for (markers, project_type) in MARKERS {
        if markers.iter().any(|m| names.contains(*m)) {
            debug!(project_type = %project_type, "Marker file found");
            return *project_type;
        }
    }

    if markdown_count > DOC_SITE_MARKDOWN_THRESHOLD {
        debug!(markdown_count, "No marker file; markdown density suggests a docs site");
        return ProjectType::DocumentationSite;
    }
    ProjectType::Unknown
}

/// Documentation files under `root`, as sorted `/`-separated relative paths, capped at
/// [`MAX_DOC_FILES`].
pub fn find_documentation(root: &Path) -> Vec<String> {
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e));

    let mut found: BTreeSet<String> = BTreeSet::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !is_regular_file(&entry) {
            continue;
        }
        if !DOC_EXTENSIONS.iter().any(|ext| has_extension(entry.path(), ext)) {
            continue;
        }
        if let Some(relative) = relative_path(root, entry.path()) {
            found.insert(relative);
        }
    }

    let total = found.len();
    let doc_files: Vec<String> = found.into_iter().take(MAX_DOC_FILES).collect();
    if total > doc_files.len() {
        debug!(total, kept = doc_files.len(), "Documentation list truncated");
    }
    doc_files
}

/// Excerpt of the first readable readme candidate, or an empty string.
pub fn read_readme(root: &Path) -> String {
    for candidate in README_CANDIDATES {
        let path = root.join(candidate);
        if !path.exists() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "Read readme");
                return normalize_newlines(&content)
                    .chars()
                    .take(README_EXCERPT_CHARS)
                    .collect();
            }
            Err(e) => {
                debug!(error = %e, path = %path.display(), "Readme unreadable, trying next candidate");
            }
        }
    }
    String::new()
}

/// Regular files, and symlinks that resolve to one. Links are never walked into.
fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn is_excluded(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && IGNORED_DIRS.contains(&&*name))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
