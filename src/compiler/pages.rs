//! Page fragments: reading them from disk and assembling them into one blob.
//!
//! Every `<name>.html` file in the pages directory becomes a hidden container
//! the client-side router can reveal:
//!
//! ```text
//! pages/about.html ─┐
//! pages/home.html  ─┼──► <div data-page="about" hidden>…</div><div data-page="home" hidden>…</div>
//! pages/notes.txt   │    (skipped)
//! ```

use super::CompileError;
use std::{fs, path::Path};

/// Element wrapping each fragment.
const CONTAINER_TAG: &str = "div";
const FRAGMENT_EXT: &str = ".html";

/// One page fragment, named after its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub content: String,
}

impl Fragment {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Fragment name for a file name shaped like `<name>.html`.
fn fragment_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(FRAGMENT_EXT)
        .filter(|stem| !stem.is_empty())
}

/// Read every `<name>.html` file directly inside `dir`, sorted by file name.
///
/// Sorting makes page order independent of the filesystem's listing order.
/// A missing directory is an error; an empty one is not.
pub fn read_fragments(dir: &Path) -> Result<Vec<Fragment>, CompileError> {
    let entries = fs::read_dir(dir).map_err(|err| CompileError::io(dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| CompileError::io(dir, err))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(fragment_name) else {
            continue;
        };
        if entry.path().is_file() {
            files.push((file_name.clone(), name.to_owned()));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    files
        .into_iter()
        .map(|(file_name, name)| {
            let path = dir.join(&file_name);
            let content = fs::read_to_string(&path).map_err(|err| CompileError::io(&path, err))?;
            Ok(Fragment::new(name, content))
        })
        .collect()
}

/// Concatenate fragments, each wrapped in a hidden container named after it.
pub fn assemble(fragments: &[Fragment]) -> String {
    let mut blob = String::with_capacity(
        fragments
            .iter()
            .map(|f| f.name.len() + f.content.len() + 40)
            .sum(),
    );
    for fragment in fragments {
        blob.push_str(&format!(
            r#"<{CONTAINER_TAG} data-page="{}" hidden>"#,
            fragment.name
        ));
        blob.push_str(&fragment.content);
        blob.push_str(&format!("</{CONTAINER_TAG}>"));
    }
    blob
}
