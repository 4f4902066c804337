//! Script pipeline steps backed by external tools.
//!
//! ```text
//! app/js ──transpile──► tmp/transpiled ──bundle──► tmp/bundle/bundle.js ──minify──► scripts.js
//!    └── **/package.json ──copy──┘
//! ```
//!
//! Every tool writes into the staging directory; only the final step
//! publishes into the output location.

use super::CompileError;
use crate::exec;
use crate::utils::exec::FilterRule;
use crate::utils::fs::publish_copy;
use std::path::Path;
use walkdir::WalkDir;

/// Skip babel's per-file progress lines.
const TRANSPILE_FILTER: FilterRule = FilterRule::new(&["Successfully compiled"]);

/// Module manifests the bundler needs next to transpiled sources.
const MANIFEST_NAME: &str = "package.json";

/// Transpile the whole source tree into `out_dir`.
pub fn transpile(
    root: &Path,
    command: &[String],
    source: &Path,
    out_dir: &Path,
) -> Result<(), CompileError> {
    exec!(filter=&TRANSPILE_FILTER; root; command; source, "--out-dir", out_dir)
        .map_err(|err| CompileError::tool("transpile", format!("{err:#}")))?;
    Ok(())
}

/// Copy every `package.json` below `source` into `out_dir`, keeping layout.
pub fn copy_manifests(source: &Path, out_dir: &Path) -> Result<usize, CompileError> {
    let mut copied = 0;
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(source).to_path_buf();
            CompileError::io(path, err.into())
        })?;
        if !entry.file_type().is_file() || entry.file_name() != MANIFEST_NAME {
            continue;
        }
        let rel = entry.path().strip_prefix(source).unwrap_or(entry.path());
        publish_copy(entry.path(), &out_dir.join(rel))?;
        copied += 1;
    }
    Ok(copied)
}

/// Bundle the module graph rooted at `entry` into `out_file`.
pub fn bundle(
    root: &Path,
    command: &[String],
    entry: &Path,
    out_file: &Path,
) -> Result<(), CompileError> {
    if !entry.is_file() {
        return Err(CompileError::io(
            entry,
            std::io::Error::new(std::io::ErrorKind::NotFound, "bundle entry not found"),
        ));
    }
    if let Some(parent) = out_file.parent() {
        std::fs::create_dir_all(parent).map_err(|err| CompileError::io(parent, err))?;
    }
    exec!(root; command; entry, "-o", out_file)
        .map_err(|err| CompileError::tool("bundle", format!("{err:#}")))?;
    Ok(())
}

/// Minify `input` into `out_file`.
pub fn minify_script(
    root: &Path,
    command: &[String],
    input: &Path,
    out_file: &Path,
) -> Result<(), CompileError> {
    exec!(root; command; input, "-o", out_file)
        .map_err(|err| CompileError::tool("script minifier", format!("{err:#}")))?;
    Ok(())
}
