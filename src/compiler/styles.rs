//! Stylesheet pipeline steps: SASS compilation, concatenation, patching.
//!
//! ```text
//! main.scss ──grass──► tmp/css/main.css ─┐
//! extra globs ───copy──► tmp/css/*.css ──┴──► concat ──► patch_css ──► minify
//! ```

use super::CompileError;
use crate::config::ReplacementRule;
use std::{fs, path::Path};

/// Apply each rule to the first occurrence of its `before` literal.
///
/// Rules run in order and each sees the output of the previous one. Later
/// occurrences of the same literal are left untouched.
pub fn patch_css(text: &str, rules: &[ReplacementRule]) -> String {
    rules.iter().fold(text.to_owned(), |text, rule| {
        text.replacen(&rule.before, &rule.after, 1)
    })
}

/// Compile a SASS/SCSS entry file; imports resolve relative to it.
pub fn compile_sass(entry: &Path) -> Result<String, CompileError> {
    if !entry.is_file() {
        return Err(CompileError::io(
            entry,
            std::io::Error::new(std::io::ErrorKind::NotFound, "style entry not found"),
        ));
    }
    grass::from_path(entry, &grass::Options::default()).map_err(|err| CompileError::tool("sass", err))
}

/// Top-level statements that must precede every other rule.
const HOISTED_AT_RULES: &[&str] = &["@charset", "@import"];

/// Concatenate every `*.css` file directly inside `dir`, sorted by name.
///
/// `@import` statements move to the top of the result in file order, after
/// the first `@charset`; later `@charset` statements are dropped.
pub fn concat_css(dir: &Path) -> Result<String, CompileError> {
    let entries = fs::read_dir(dir).map_err(|err| CompileError::io(dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| CompileError::io(dir, err))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "css") {
            files.push(path);
        }
    }
    files.sort();

    let mut charset = None;
    let mut imports = Vec::new();
    let mut bodies = String::new();
    for path in files {
        let css = fs::read_to_string(&path).map_err(|err| CompileError::io(&path, err))?;
        let (hoisted, body) = split_hoisted(&css);

        for statement in hoisted {
            if statement.get(..8).is_some_and(|p| p.eq_ignore_ascii_case("@charset")) {
                charset.get_or_insert_with(|| statement.to_owned());
            } else {
                imports.push(statement.to_owned());
            }
        }

        let body = body.trim_start();
        if body.is_empty() {
            continue;
        }
        if !bodies.is_empty() && !bodies.ends_with('\n') {
            bodies.push('\n');
        }
        bodies.push_str(body);
    }

    let mut merged = String::with_capacity(bodies.len());
    for statement in charset.iter().chain(&imports) {
        merged.push_str(statement);
        merged.push('\n');
    }
    merged.push_str(&bodies);
    Ok(merged)
}

/// Split `css` into its top-level hoisted statements and everything else.
///
/// Comments, strings and rule blocks are skipped over, so an `@import`
/// mentioned inside them stays where it is.
fn split_hoisted(css: &str) -> (Vec<&str>, String) {
    let bytes = css.as_bytes();
    let mut hoisted = Vec::new();
    let mut body = String::with_capacity(css.len());
    let mut depth = 0usize;
    let mut flushed = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = css[i + 2..].find("*/").map_or(bytes.len(), |end| i + end + 4);
                continue;
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'@' if depth == 0 && is_hoisted(&css[i..]) => {
                let end = statement_end(bytes, i);
                body.push_str(&css[flushed..i]);
                hoisted.push(css[i..end].trim());
                flushed = end;
                i = end;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    body.push_str(&css[flushed..]);
    (hoisted, body)
}

fn is_hoisted(rest: &str) -> bool {
    HOISTED_AT_RULES.iter().any(|rule| {
        rest.get(..rule.len())
            .is_some_and(|keyword| keyword.eq_ignore_ascii_case(rule))
            && rest
                .as_bytes()
                .get(rule.len())
                .is_none_or(|b| !(b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_'))
    })
}

/// Index just past the `;` ending the statement at `start`.
fn statement_end(bytes: &[u8], start: usize) -> usize {
    let mut parens = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b';' if parens == 0 => return i + 1,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Index just past the string literal opening at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
