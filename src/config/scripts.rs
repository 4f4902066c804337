//! `[scripts]` section configuration.
//!
//! The script pipeline is three external commands run in sequence. Each
//! command is a program plus leading arguments; the pipeline appends the
//! input and output paths.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[scripts]` section in pagewright.toml.
///
/// # Example
/// ```toml
/// [scripts]
/// source = "app/js"
/// entry = "main.js"
/// transpile = ["babel", "--presets", "es2015"]   # + <src> --out-dir <dir>
/// bundle = ["browserify", "--debug"]             # + <entry> -o <file>
/// minify = ["uglifyjs"]                          # + <file> -o <file>
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptsConfig {
    /// Run the script tasks at all.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Script source tree.
    #[serde(default = "defaults::scripts::source")]
    #[educe(Default = defaults::scripts::source())]
    pub source: PathBuf,

    /// Bundle entry, relative to the transpiled tree.
    #[serde(default = "defaults::scripts::entry")]
    #[educe(Default = defaults::scripts::entry())]
    pub entry: PathBuf,

    /// Transpiler command.
    #[serde(default = "defaults::scripts::transpile")]
    #[educe(Default = defaults::scripts::transpile())]
    pub transpile: Vec<String>,

    /// Module bundler command.
    #[serde(default = "defaults::scripts::bundle")]
    #[educe(Default = defaults::scripts::bundle())]
    pub bundle: Vec<String>,

    /// Script minifier command (production only).
    #[serde(default = "defaults::scripts::minify")]
    #[educe(Default = defaults::scripts::minify())]
    pub minify: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::super::ProjectConfig;
    use std::path::PathBuf;

    #[test]
    fn test_scripts_defaults() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert!(config.scripts.enable);
        assert_eq!(config.scripts.source, PathBuf::from("app/js"));
        assert_eq!(config.scripts.entry, PathBuf::from("main.js"));
        assert_eq!(config.scripts.transpile, vec!["babel", "--presets", "es2015"]);
        assert_eq!(config.scripts.bundle, vec!["browserify", "--debug"]);
        assert_eq!(config.scripts.minify, vec!["uglifyjs"]);
    }

    #[test]
    fn test_scripts_custom_commands() {
        let config: ProjectConfig = toml::from_str(
            r#"
            [scripts]
            enable = false
            bundle = ["esbuild", "--bundle"]
            "#,
        )
        .unwrap();
        assert!(!config.scripts.enable);
        assert_eq!(config.scripts.bundle, vec!["esbuild", "--bundle"]);
        assert_eq!(config.scripts.minify, vec!["uglifyjs"]);
    }
}
