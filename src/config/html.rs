//! `[html]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do when the host document lacks a placeholder token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPlaceholder {
    /// Leave the document unchanged for that token.
    Ignore,
    /// Log a warning and continue (default).
    #[default]
    Warn,
    /// Fail the html task.
    Error,
}

/// `[html]` section in pagewright.toml.
///
/// # Example
/// ```toml
/// [html]
/// source = "app/html"
/// host = "index.html"
/// pages = "pages"
/// missing_placeholder = "error"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    /// HTML source directory.
    #[serde(default = "defaults::html::source")]
    #[educe(Default = defaults::html::source())]
    pub source: PathBuf,

    /// Host document, relative to `source`.
    #[serde(default = "defaults::html::host")]
    #[educe(Default = defaults::html::host())]
    pub host: PathBuf,

    /// Fragment directory, relative to `source`.
    #[serde(default = "defaults::html::pages")]
    #[educe(Default = defaults::html::pages())]
    pub pages: PathBuf,

    #[serde(default = "defaults::html::missing_placeholder")]
    #[educe(Default = defaults::html::missing_placeholder())]
    pub missing_placeholder: MissingPlaceholder,

    /// Placeholder replaced by the assembled pages.
    #[serde(default = "defaults::html::pages_tag")]
    #[educe(Default = defaults::html::pages_tag())]
    pub pages_tag: String,

    /// Placeholder replaced by the script include.
    #[serde(default = "defaults::html::scripts_tag")]
    #[educe(Default = defaults::html::scripts_tag())]
    pub scripts_tag: String,

    /// Placeholder replaced by the stylesheet include.
    #[serde(default = "defaults::html::styles_tag")]
    #[educe(Default = defaults::html::styles_tag())]
    pub styles_tag: String,
}

impl HtmlConfig {
    /// Placeholder tokens as `(field, token)` pairs, for validation.
    pub fn tags(&self) -> [(&'static str, &str); 3] {
        [
            ("[html.pages_tag]", &self.pages_tag),
            ("[html.scripts_tag]", &self.scripts_tag),
            ("[html.styles_tag]", &self.styles_tag),
        ]
    }
}
