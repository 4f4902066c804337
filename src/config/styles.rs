//! `[styles]` and `[fonts]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A literal find/replace pair applied to the concatenated stylesheet.
///
/// Only the first occurrence of `before` is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplacementRule {
    pub before: String,
    pub after: String,
}

impl ReplacementRule {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// `[styles]` section in pagewright.toml.
///
/// # Example
/// ```toml
/// [styles]
/// entry = "app/scss/main.scss"
/// extra = ["node_modules/bootstrap/dist/css/bootstrap.css"]
///
/// # compiled css lands one level above the fonts folder
/// [[styles.replacements]]
/// before = "../fonts"
/// after = "./fonts"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct StylesConfig {
    /// SASS entry file; partials resolve relative to it.
    #[serde(default = "defaults::styles::entry")]
    #[educe(Default = defaults::styles::entry())]
    pub entry: PathBuf,

    /// Globs of extra stylesheets merged after the compiled entry.
    #[serde(default)]
    pub extra: Vec<String>,

    /// Ordered rewrite rules for the merged stylesheet.
    #[serde(default)]
    pub replacements: Vec<ReplacementRule>,
}

/// `[fonts]` section in pagewright.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Globs of font files copied into the variant's fonts directory.
    pub sources: Vec<String>,
}
