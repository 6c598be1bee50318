// src/discovery.rs
//! Finds the Python files a batch should touch.

use crate::config::ProcessingConfig;
use crate::error::{DocError, Result};
use crate::lang;
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const PRUNE_DIRS: &[&str] = &[".git", ".hg", ".svn", "__pycache__"];

#[must_use]
pub fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name)
}

/// Compiled include/exclude globs, matched against root-relative paths.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PathFilter {
    /// # Errors
    /// Returns `ConfigInvalid` if a pattern does not compile.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let compile = |patterns: &[String]| -> Result<Vec<Pattern>> {
            patterns
                .iter()
                .map(|p| Pattern::new(p).map_err(DocError::from))
                .collect()
        };
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// # Errors
    /// Returns `ConfigInvalid` if a pattern does not compile.
    pub fn from_config(processing: &ProcessingConfig) -> Result<Self> {
        Self::new(&processing.include_patterns, &processing.exclude_patterns)
    }

    /// Kept iff some include pattern matches and no exclude pattern does.
    #[must_use]
    pub fn is_match(&self, relative: &Path) -> bool {
        let rel = normalize_path(relative);
        let dotted = format!("./{rel}");
        let hit = |p: &Pattern| p.matches(&rel) || p.matches(&dotted);
        self.include.iter().any(hit) && !self.exclude.iter().any(hit)
    }
}

/// Normalizes a path to forward slashes for pattern matching.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Walks `root` and returns the Python files `filter` keeps, sorted by path.
///
/// # Errors
/// Returns `Io` if `root` does not exist, `NotADirectory` if it is a file.
pub fn discover(root: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>> {
    let meta = std::fs::metadata(root).map_err(|e| DocError::io(e, root))?;
    if !meta.is_dir() {
        return Err(DocError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && should_prune(&e.file_name().to_string_lossy())));

    let mut files = Vec::new();
    let mut errors = 0usize;
    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                errors += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() || !lang::is_python(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if filter.is_match(relative) {
            files.push(entry.into_path());
        } else {
            tracing::debug!(path = %relative.display(), "excluded by pattern");
        }
    }
    if errors > 0 {
        tracing::warn!("encountered {errors} errors during file walk");
    }
    Ok(files)
}
