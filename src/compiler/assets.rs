//! Glob-selected files: extra stylesheets and fonts.
//!
//! A pattern's literal leading directories form its base; matched files keep
//! their path relative to that base when copied, so `fonts/*` flattens and
//! `fonts/**/*` preserves subdirectories.

use super::CompileError;
use crate::log;
use crate::utils::fs::publish_copy;
use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// A file matched by a glob, with the directory its relative path starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobMatch {
    pub base: PathBuf,
    pub path: PathBuf,
}

impl GlobMatch {
    pub fn relative(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }
}

/// Split a pattern into its literal base directory and the full matcher.
fn compile_pattern(root: &Path, pattern: &str) -> Result<(PathBuf, GlobMatcher)> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    let rel = Path::new(pattern);
    let is_glob = pattern.contains(GLOB_META);

    let literal: PathBuf = rel
        .components()
        .take_while(|c| !c.as_os_str().to_string_lossy().contains(GLOB_META))
        .collect();
    let mut base = root.join(literal);

    let glob = if is_glob {
        // the root itself may contain metacharacters
        let source = if rel.is_absolute() {
            pattern.to_owned()
        } else {
            let root = globset::escape(&root.to_string_lossy());
            format!("{}/{pattern}", root.trim_end_matches('/'))
        };
        GlobBuilder::new(&source).literal_separator(true).build()
    } else {
        // A plain path names one file; its base is the parent directory.
        base.pop();
        Glob::new(&globset::escape(&root.join(rel).to_string_lossy()))
    }
    .with_context(|| format!("invalid glob `{pattern}`"))?;

    Ok((base, glob.compile_matcher()))
}

/// Expand patterns relative to `root` into matched files, sorted per pattern.
///
/// Patterns matching nothing are reported but not an error; an unreadable
/// directory under a pattern's base is.
pub fn expand_globs(root: &Path, patterns: &[String]) -> Result<Vec<GlobMatch>> {
    let mut matches = Vec::new();

    for pattern in patterns {
        let (base, matcher) = compile_pattern(root, pattern)?;

        let mut found = Vec::new();
        if base.exists() {
            for entry in WalkDir::new(&base) {
                let entry = entry.map_err(|err| {
                    let path = err.path().unwrap_or(&base).to_path_buf();
                    CompileError::io(path, err.into())
                })?;
                let name = entry.file_name().to_str().unwrap_or_default();
                if !entry.file_type().is_file() || IGNORED_FILES.contains(&name) {
                    continue;
                }
                if matcher.is_match(entry.path()) {
                    found.push(GlobMatch {
                        base: base.clone(),
                        path: entry.into_path(),
                    });
                }
            }
        }

        if found.is_empty() {
            log!("warn"; "`{}` matched no files", pattern);
        }
        found.sort_by(|a, b| a.path.cmp(&b.path));
        matches.append(&mut found);
    }

    Ok(matches)
}

/// Copy every match into `dest`, keeping paths relative to each base.
pub fn copy_matches(matches: &[GlobMatch], dest: &Path) -> Result<usize, CompileError> {
    for item in matches {
        publish_copy(&item.path, &dest.join(item.relative()))?;
    }
    Ok(matches.len())
}
