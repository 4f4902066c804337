//! Project configuration for `pagewright.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `[paths]`   | Staging and output directories                    |
//! | `[scripts]` | Script sources and the transpile/bundle/minify tools |
//! | `[styles]`  | SASS entry, extra stylesheets, rewrite rules      |
//! | `[html]`    | Host document, fragments, placeholder tokens      |
//! | `[fonts]`   | Font files copied next to the stylesheet          |
//!
//! The file is optional: without it the defaults describe the usual
//! `app/{js,scss,html}` layout building into `build/`.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! extra = ["node_modules/materialize-css/dist/css/materialize.css"]
//!
//! [[styles.replacements]]
//! before = "../fonts"
//! after = "./fonts"
//!
//! [fonts]
//! sources = ["node_modules/materialize-css/dist/fonts/**/*"]
//! ```

pub mod defaults;
mod error;
mod html;
mod paths;
mod scripts;
mod styles;
mod variant;

pub use error::ConfigError;
pub use html::{HtmlConfig, MissingPlaceholder};
pub use styles::ReplacementRule;
pub use variant::{BuildVariant, VariantPlan};

use paths::PathsConfig;
use scripts::ScriptsConfig;
use styles::{FontsConfig, StylesConfig};

use crate::{cli::Cli, log};
use anyhow::{Context, Result, bail};
use educe::Educe;
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing pagewright.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default)]
    pub styles: StylesConfig,

    #[serde(default)]
    pub html: HtmlConfig,

    #[serde(default)]
    pub fonts: FontsConfig,
}

impl ProjectConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: ProjectConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in `{}`", path.display()))
    }

    /// Load from the CLI-selected root, falling back to defaults when the
    /// config file does not exist.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.resolve(root, &cli.config);
        if !config.config_path.exists() {
            log!("warn"; "`{}` not found, using defaults", config.config_path.display());
        }
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.paths.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Make every configured path absolute against `root`.
    pub fn resolve(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(root);
        self.paths.root = Some(root.clone());
        self.config_path = Self::normalize_path(&root.join(config_file));

        let abs = |path: &Path| Self::normalize_path(&root.join(path));

        self.paths.temp = abs(&self.paths.temp);
        self.paths.output = abs(&self.paths.output);
        self.paths.dev_output = abs(&self.paths.dev_output);

        self.scripts.source = abs(&self.scripts.source);
        self.styles.entry = abs(&self.styles.entry);

        // host and pages stay relative to the html source directory
        self.html.source = abs(&self.html.source);
    }

    /// Absolute path of the host document.
    pub fn host_path(&self) -> PathBuf {
        self.html.source.join(&self.html.host)
    }

    /// Absolute path of the fragment directory.
    pub fn pages_dir(&self) -> PathBuf {
        self.html.source.join(&self.html.pages)
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before any task runs.
    ///
    /// Missing sources and uninstalled tools are fatal for the whole build.
    pub fn validate(&self) -> Result<()> {
        Self::check_file("[html.host]", &self.host_path())?;
        Self::check_dir("[html.pages]", &self.pages_dir())?;
        Self::check_file("[styles.entry]", &self.styles.entry)?;
        Self::check_placeholders(&self.html)?;
        self.check_temp_dir()?;

        for pattern in self.styles.extra.iter().chain(&self.fonts.sources) {
            Glob::new(pattern).map_err(|err| {
                ConfigError::Validation(format!("invalid glob `{pattern}`: {err}"))
            })?;
        }

        if self.scripts.enable {
            Self::check_dir("[scripts.source]", &self.scripts.source)?;
            if self.scripts.entry.is_absolute() {
                bail!(ConfigError::Validation(
                    "[scripts.entry] must be relative to [scripts.source]".into()
                ));
            }
            Self::check_command_installed("[scripts.transpile]", &self.scripts.transpile)?;
            Self::check_command_installed("[scripts.bundle]", &self.scripts.bundle)?;
            Self::check_command_installed("[scripts.minify]", &self.scripts.minify)?;
        }

        Ok(())
    }

    fn check_file(field: &str, path: &Path) -> Result<()> {
        if !path.is_file() {
            bail!(ConfigError::Validation(format!(
                "{field} `{}` not found or not a file",
                path.display()
            )));
        }
        Ok(())
    }

    fn check_dir(field: &str, path: &Path) -> Result<()> {
        if !path.is_dir() {
            bail!(ConfigError::Validation(format!(
                "{field} `{}` not found or not a directory",
                path.display()
            )));
        }
        Ok(())
    }

    /// Tokens must be non-empty and none may contain another, otherwise
    /// substitution order would change the result.
    fn check_placeholders(html: &HtmlConfig) -> Result<()> {
        let tags = html.tags();
        for (field, tag) in &tags {
            if tag.is_empty() {
                bail!(ConfigError::Validation(format!("{field} must not be empty")));
            }
        }
        for (i, (field_a, a)) in tags.iter().enumerate() {
            for (field_b, b) in tags.iter().skip(i + 1) {
                if a.contains(*b) || b.contains(*a) {
                    bail!(ConfigError::Validation(format!(
                        "{field_a} and {field_b} overlap"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The temp directory is wiped on every build, so it must not hold or
    /// sit inside anything the user owns.
    fn check_temp_dir(&self) -> Result<()> {
        let temp = Self::lexical_path(&self.paths.temp);
        let style_dir = self.styles.entry.parent().unwrap_or(self.get_root());

        let mut sources = vec![
            ("[html.source]", self.html.source.as_path()),
            ("[styles.entry]", style_dir),
        ];
        if self.scripts.enable {
            sources.push(("[scripts.source]", self.scripts.source.as_path()));
        }

        let mut protected = vec![
            ("project root", self.get_root()),
            ("[paths.output]", self.paths.output.as_path()),
            ("[paths.dev_output]", self.paths.dev_output.as_path()),
        ];
        protected.extend(sources.iter().copied());

        for (field, path) in protected {
            if Self::lexical_path(path).starts_with(&temp) {
                bail!(ConfigError::Validation(format!(
                    "[paths.temp] `{}` would delete {field} `{}`",
                    temp.display(),
                    path.display()
                )));
            }
        }
        for (field, path) in sources {
            if temp.starts_with(Self::lexical_path(path)) {
                bail!(ConfigError::Validation(format!(
                    "[paths.temp] `{}` must not be inside {field} `{}`",
                    temp.display(),
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Resolve `.` and `..` components without touching the filesystem.
    fn lexical_path(path: &Path) -> PathBuf {
        let mut out = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    out.pop();
                }
                other => out.push(other),
            }
        }
        out
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        let Some(cmd) = command.first() else {
            bail!(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        };

        which::which(cmd)
            .with_context(|| format!("`{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
