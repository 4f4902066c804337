//! Build variants and their resolved output plans.
//!
//! Both variants run the same pipeline; everything that differs between them
//! lives in a [`VariantPlan`].
//!
//! ```text
//!                 production            development
//! scripts         build/scripts.js      app/_devbundle.js
//! styles          build/styles.css      app/_devstyles.css
//! html            build/index.html      app/_devindex.html
//! fonts           build/fonts/          app/_devfonts/
//! minify          yes                   no
//! ```

use super::{ProjectConfig, ReplacementRule};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Fonts path rewrite appended to the CSS rules of development builds.
const DEV_FONTS_REWRITE: (&str, &str) = ("/fonts/", "/_devfonts/");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVariant {
    Production,
    Development,
}

impl BuildVariant {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Production => "build",
            Self::Development => "dev",
        }
    }

    /// Resolve output locations, filenames and CSS rules for this variant.
    pub fn plan(self, config: &ProjectConfig) -> VariantPlan {
        let mut css_rules = config.styles.replacements.clone();

        match self {
            Self::Production => VariantPlan {
                minify: true,
                output_dir: config.paths.output.clone(),
                fonts_dir: config.paths.output.join("fonts"),
                scripts_file: "scripts.js",
                styles_file: "styles.css",
                html_file: "index.html",
                css_rules,
            },
            Self::Development => {
                let (before, after) = DEV_FONTS_REWRITE;
                css_rules.push(ReplacementRule::new(before, after));
                VariantPlan {
                        minify: false,
                    output_dir: config.paths.dev_output.clone(),
                    fonts_dir: config.paths.dev_output.join("_devfonts"),
                    scripts_file: "_devbundle.js",
                    styles_file: "_devstyles.css",
                    html_file: "_devindex.html",
                    css_rules,
                }
            }
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the pipeline needs to know about where and how to write.
#[derive(Debug, Clone)]
pub struct VariantPlan {
    pub minify: bool,
    pub output_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub scripts_file: &'static str,
    pub styles_file: &'static str,
    pub html_file: &'static str,
    /// Configured rules, plus the fonts rewrite in development.
    pub css_rules: Vec<ReplacementRule>,
}

impl VariantPlan {
    pub fn scripts_path(&self) -> PathBuf {
        self.output_dir.join(self.scripts_file)
    }

    pub fn styles_path(&self) -> PathBuf {
        self.output_dir.join(self.styles_file)
    }

    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(self.html_file)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
