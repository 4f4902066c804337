//! `[paths]` section configuration.
//!
//! Directories shared by every pipeline: the staging area for intermediate
//! tool output and the two variant output locations.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[paths]` section in pagewright.toml.
///
/// # Example
/// ```toml
/// [paths]
/// temp = "tmp"          # intermediate files, cleared on every build
/// output = "build"      # production artifacts
/// dev_output = "app"    # development artifacts, next to the sources
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Project root directory (set from CLI `--root`).
    #[serde(default = "defaults::paths::root")]
    #[educe(Default = defaults::paths::root())]
    pub root: Option<PathBuf>,

    /// Staging directory for transpiled, bundled and compiled intermediates.
    #[serde(default = "defaults::paths::temp")]
    #[educe(Default = defaults::paths::temp())]
    pub temp: PathBuf,

    /// Production output directory.
    #[serde(default = "defaults::paths::output")]
    #[educe(Default = defaults::paths::output())]
    pub output: PathBuf,

    /// Development output directory.
    #[serde(default = "defaults::paths::dev_output")]
    #[educe(Default = defaults::paths::dev_output())]
    pub dev_output: PathBuf,
}
