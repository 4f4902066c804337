//! Minification of HTML documents and stylesheets.
//!
//! `minify` is a no-op for development plans, so callers never branch on the
//! variant themselves.

use crate::compiler::CompileError;
use crate::log;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use std::{
    borrow::Cow,
    sync::{Arc, RwLock},
};

/// Content type for minification.
pub enum MinifyType<'a> {
    Html(&'a str),
    Css(&'a str),
}

/// Minify content when `enabled`, otherwise borrow it unchanged.
pub fn minify(content: MinifyType<'_>, enabled: bool) -> Result<Cow<'_, str>, CompileError> {
    match (content, enabled) {
        (MinifyType::Html(html), false) | (MinifyType::Css(html), false) => Ok(Cow::Borrowed(html)),
        (MinifyType::Html(html), true) => Ok(Cow::Owned(minify_html_inner(html))),
        (MinifyType::Css(css), true) => minify_css_inner(css).map(Cow::Owned),
    }
}

/// Collapse whitespace and drop comments with `minify_html`.
fn minify_html_inner(html: &str) -> String {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    let bytes = minify_html::minify(html.as_bytes(), &cfg);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Parse, minify and reprint a stylesheet with `lightningcss`.
///
/// Vendor stylesheets carry legacy IE hacks (`*zoom`, `filter:progid:...`);
/// declarations the parser cannot read are dropped with a warning instead
/// of failing the build.
fn minify_css_inner(css: &str) -> Result<String, CompileError> {
    let warnings = Arc::new(RwLock::new(Vec::new()));
    let options = ParserOptions {
        error_recovery: true,
        warnings: Some(Arc::clone(&warnings)),
        ..ParserOptions::default()
    };
    let mut sheet =
        StyleSheet::parse(css, options).map_err(|err| CompileError::tool("css minifier", err))?;

    if let Ok(warnings) = warnings.read()
        && !warnings.is_empty()
    {
        log!("warn"; "css minifier skipped {} declaration(s), first: {}", warnings.len(), warnings[0]);
    }

    sheet
        .minify(MinifyOptions::default())
        .map_err(|err| CompileError::tool("css minifier", err))?;
    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| CompileError::tool("css minifier", err))?;
    Ok(printed.code)
}
