//! Host document substitution.
//!
//! The host document carries three placeholder tokens. Each is replaced at
//! its first occurrence, scripts first, then styles, then pages.

use super::CompileError;
use crate::config::{HtmlConfig, MissingPlaceholder};
use crate::log;

/// The three insertion points of a host document.
#[derive(Debug, Clone, Copy)]
pub struct Placeholders<'a> {
    pub pages: &'a str,
    pub scripts: &'a str,
    pub styles: &'a str,
}

impl<'a> Placeholders<'a> {
    pub fn from_config(html: &'a HtmlConfig) -> Self {
        Self {
            pages: &html.pages_tag,
            scripts: &html.scripts_tag,
            styles: &html.styles_tag,
        }
    }
}

/// Values inserted at the placeholders.
#[derive(Debug, Clone, Copy)]
pub struct Substitutions<'a> {
    pub pages: &'a str,
    pub scripts: &'a str,
    pub styles: &'a str,
}

/// Include tag for a script bundle, relative to the document.
pub fn script_tag(bundle: &str) -> String {
    format!(r#"<script type="text/javascript" src="{bundle}"></script>"#)
}

/// Include tag for a stylesheet, relative to the document.
pub fn style_tag(stylesheet: &str) -> String {
    format!(r#"<link rel="stylesheet" href="{stylesheet}">"#)
}

/// Replace each placeholder once, applying `policy` to absent ones.
pub fn substitute(
    document: &str,
    tokens: Placeholders<'_>,
    values: Substitutions<'_>,
    policy: MissingPlaceholder,
) -> Result<String, CompileError> {
    let steps = [
        (tokens.scripts, values.scripts),
        (tokens.styles, values.styles),
        (tokens.pages, values.pages),
    ];

    let mut output = document.to_owned();
    for (token, value) in steps {
        if output.contains(token) {
            output = output.replacen(token, value, 1);
            continue;
        }
        match policy {
            MissingPlaceholder::Ignore => {}
            MissingPlaceholder::Warn => {
                log!("warn"; "placeholder `{}` not found in host document", token);
            }
            MissingPlaceholder::Error => {
                return Err(CompileError::Template {
                    token: token.to_owned(),
                });
            }
        }
    }
    Ok(output)
}
