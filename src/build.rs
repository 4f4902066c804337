//! Build orchestration for one variant.
//!
//! ```text
//! build_project()
//!     │
//!     ├── clear_staging() ──► empty temp directory
//!     │
//!     ├── Pipeline::run() ──► every task graph wave, in parallel
//!     │
//!     └── log_build_result()
//! ```

use crate::{
    config::{BuildVariant, ProjectConfig},
    log,
    pipeline::{GraphReport, Pipeline},
};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Build every entry target of `variant`.
///
/// Fails when any task failed; artifacts of the tasks that succeeded are
/// still published.
pub fn build_project(config: &ProjectConfig, variant: BuildVariant) -> Result<()> {
    clear_staging(&config.paths.temp)?;

    let pipeline = Pipeline::new(config, variant);
    let targets = pipeline.targets();
    log!(variant.name(); "building into {}", pipeline.plan().output_dir().display());

    let report = pipeline.run(&targets)?;
    log_build_result(variant, &report);
    report.into_result()
}

/// Remove intermediates of the previous build.
fn clear_staging(temp: &Path) -> Result<()> {
    if temp.exists() {
        fs::remove_dir_all(temp).with_context(|| {
            format!("Failed to clear temp directory: {}", temp.display())
        })?;
    }
    fs::create_dir_all(temp)
        .with_context(|| format!("Failed to create temp directory: {}", temp.display()))
}

fn log_build_result(variant: BuildVariant, report: &GraphReport) {
    let failed = report.failed().len();
    if failed == 0 {
        log!(variant.name(); "done");
        return;
    }
    log!("error"; "{} of {} task(s) failed", failed, report.outcomes.len());

    let skipped = report.skipped();
    if !skipped.is_empty() {
        log!("warn"; "not built: {}", skipped.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn project(root: &Path) -> ProjectConfig {
        fs::create_dir_all(root.join("app/html/pages")).unwrap();
        fs::create_dir_all(root.join("app/scss")).unwrap();
        fs::write(root.join("app/html/index.html"), "<head><styles /></head><pages /><scripts />").unwrap();
        fs::write(root.join("app/html/pages/home.html"), "<p>Home</p>").unwrap();
        fs::write(root.join("app/scss/main.scss"), "p { margin: 0 }").unwrap();

        let mut config = ProjectConfig::default();
        config.scripts.enable = false;
        config.resolve(root, Path::new("pagewright.toml"));
        config
    }

    #[test]
    fn test_build_clears_stale_staging() {
        let dir = tempdir().unwrap();
        let config = project(dir.path());
        let stale = config.paths.temp.join("css/stale.css");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, ".stale { color: red }").unwrap();

        build_project(&config, BuildVariant::Production).unwrap();

        assert!(!stale.exists());
        let css = fs::read_to_string(config.paths.output.join("styles.css")).unwrap();
        assert!(!css.contains("stale"));
        assert!(config.paths.output.join("index.html").exists());
    }

    #[test]
    fn test_build_dev_writes_next_to_sources() {
        let dir = tempdir().unwrap();
        let config = project(dir.path());

        build_project(&config, BuildVariant::Development).unwrap();

        let html = fs::read_to_string(config.paths.dev_output.join("_devindex.html")).unwrap();
        assert_eq!(
            html,
            "<head><link rel=\"stylesheet\" href=\"_devstyles.css\"></head>\
             <div data-page=\"home\" hidden><p>Home</p></div>\
             <script type=\"text/javascript\" src=\"_devbundle.js\"></script>"
        );
    }

    #[test]
    fn test_build_reports_failed_tasks() {
        let dir = tempdir().unwrap();
        let config = project(dir.path());
        fs::write(&config.styles.entry, "p { margin: $nope }").unwrap();

        let err = build_project(&config, BuildVariant::Production).unwrap_err();
        assert!(err.to_string().contains("sass"));
        assert!(config.paths.output.join("index.html").exists());
    }
}
