//! The build pipeline: one task graph, parameterized by [`VariantPlan`].
//!
//! ```text
//! transpile ──┐
//!             ├──► bundle ──► scripts ──► scripts.js | _devbundle.js
//! copy-manifests
//!
//! sass ───────┐
//!             ├──► styles ──► styles.css | _devstyles.css
//! extra-css ──┘
//!
//! html ─────────────────────► index.html | _devindex.html
//! fonts ────────────────────► fonts/     | _devfonts/
//! ```
//!
//! Intermediates go to the staging directory; only the entry targets
//! publish into the variant's output location.

mod graph;

pub use graph::{GraphReport, TaskGraph};

use crate::{
    compiler::{assets, html, scripts, styles},
    config::{BuildVariant, ProjectConfig, VariantPlan},
    log,
    logger::ProgressBars,
    utils::{
        fs::{publish, publish_copy},
        minify::{MinifyType, minify},
    },
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Artifacts a build can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Scripts,
    Styles,
    Html,
    Fonts,
}

impl Target {
    pub const ALL: [Self; 4] = [Self::Scripts, Self::Styles, Self::Html, Self::Fonts];
}

/// Intermediate locations under the temp directory.
#[derive(Debug, Clone)]
struct Staging {
    transpiled: PathBuf,
    bundle: PathBuf,
    minified: PathBuf,
    css: PathBuf,
}

impl Staging {
    fn new(temp: &Path) -> Self {
        Self {
            transpiled: temp.join("transpiled"),
            bundle: temp.join("bundle").join("bundle.js"),
            minified: temp.join("scripts.min.js"),
            css: temp.join("css"),
        }
    }
}

pub struct Pipeline<'a> {
    config: &'a ProjectConfig,
    plan: VariantPlan,
    staging: Staging,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ProjectConfig, variant: BuildVariant) -> Self {
        Self {
            config,
            plan: variant.plan(config),
            staging: Staging::new(&config.paths.temp),
        }
    }

    pub fn plan(&self) -> &VariantPlan {
        &self.plan
    }

    /// Entry targets for this project; scripts only when enabled.
    pub fn targets(&self) -> Vec<Target> {
        Target::ALL
            .into_iter()
            .filter(|target| *target != Target::Scripts || self.config.scripts.enable)
            .collect()
    }

    /// Task graph producing `targets`.
    pub fn graph(&self, targets: &[Target]) -> TaskGraph<'_> {
        let mut graph = TaskGraph::new();

        for target in targets {
            match target {
                Target::Scripts => {
                    graph
                        .task("transpile", &[], move || self.transpile())
                        .task("copy-manifests", &[], move || self.copy_manifests())
                        .task("bundle", &["transpile", "copy-manifests"], move || self.bundle())
                        .task("scripts", &["bundle"], move || self.scripts());
                }
                Target::Styles => {
                    graph
                        .task("sass", &[], move || self.sass())
                        .task("extra-css", &[], move || self.extra_css())
                        .task("styles", &["sass", "extra-css"], move || self.styles());
                }
                Target::Html => {
                    graph.task("html", &[], move || self.html());
                }
                Target::Fonts => {
                    graph.task("fonts", &[], move || self.fonts());
                }
            }
        }

        graph
    }

    /// Run the graph for `targets`, with a progress bar over its tasks.
    ///
    /// Fails when any task failed; the other branches still complete.
    pub fn run(&self, targets: &[Target]) -> Result<GraphReport> {
        let graph = self.graph(targets);
        if graph.is_empty() {
            log!("warn"; "no targets selected, nothing to build");
        }
        let progress = ProgressBars::new(&[("tasks", graph.len())]);
        let report = graph.run(|_| progress.inc(0));
        progress.finish();
        report
    }

    // ========================================================================
    // Scripts
    // ========================================================================

    fn transpile(&self) -> Result<()> {
        let scripts = &self.config.scripts;
        scripts::transpile(
            self.config.get_root(),
            &scripts.transpile,
            &scripts.source,
            &self.staging.transpiled,
        )?;
        log!("transpile"; "{}", scripts.source.display());
        Ok(())
    }

    fn copy_manifests(&self) -> Result<()> {
        let count = scripts::copy_manifests(&self.config.scripts.source, &self.staging.transpiled)?;
        log!("copy-manifests"; "copied {} manifest(s)", count);
        Ok(())
    }

    fn bundle(&self) -> Result<()> {
        let scripts = &self.config.scripts;
        let entry = self.staging.transpiled.join(&scripts.entry);
        scripts::bundle(self.config.get_root(), &scripts.bundle, &entry, &self.staging.bundle)?;
        log!("bundle"; "{}", scripts.entry.display());
        Ok(())
    }

    fn scripts(&self) -> Result<()> {
        let dest = self.plan.scripts_path();
        if self.plan.minify {
            scripts::minify_script(
                self.config.get_root(),
                &self.config.scripts.minify,
                &self.staging.bundle,
                &self.staging.minified,
            )?;
            publish_copy(&self.staging.minified, &dest)?;
        } else {
            publish_copy(&self.staging.bundle, &dest)?;
        }
        log!("scripts"; "{}", dest.display());
        Ok(())
    }

    // ========================================================================
    // Styles
    // ========================================================================

    fn sass(&self) -> Result<()> {
        let css = styles::compile_sass(&self.config.styles.entry)?;
        publish(&self.staging.css.join("main.css"), css.as_bytes())?;
        log!("sass"; "{}", self.config.styles.entry.display());
        Ok(())
    }

    fn extra_css(&self) -> Result<()> {
        let matches = assets::expand_globs(self.config.get_root(), &self.config.styles.extra)?;
        let count = assets::copy_matches(&matches, &self.staging.css)?;
        log!("extra-css"; "copied {} stylesheet(s)", count);
        Ok(())
    }

    fn styles(&self) -> Result<()> {
        let merged = styles::concat_css(&self.staging.css)?;
        let patched = styles::patch_css(&merged, &self.plan.css_rules);
        let output = minify(MinifyType::Css(&patched), self.plan.minify)?;

        let dest = self.plan.styles_path();
        publish(&dest, output.as_bytes())?;
        log!("styles"; "{}", dest.display());
        Ok(())
    }

    // ========================================================================
    // Html & Fonts
    // ========================================================================

    fn html(&self) -> Result<()> {
        let (document, count) = html::render_document(
            &self.config.html,
            &self.config.host_path(),
            &self.config.pages_dir(),
            &self.plan,
        )?;

        let dest = self.plan.html_path();
        publish(&dest, document.as_bytes())?;
        log!("html"; "{} page(s) into {}", count, dest.display());
        Ok(())
    }

    fn fonts(&self) -> Result<()> {
        let matches = assets::expand_globs(self.config.get_root(), &self.config.fonts.sources)?;
        let count = assets::copy_matches(&matches, &self.plan.fonts_dir)?;
        log!("fonts"; "copied {} file(s) into {}", count, self.plan.fonts_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::graph::TaskOutcome;
    use super::*;
    use crate::config::ReplacementRule;
    use std::fs;
    use tempfile::tempdir;

    const HOST: &str = "<html>\n<head>\n  <styles />\n</head>\n<body>\n  <pages />\n  <scripts />\n</body>\n</html>\n";

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn project(root: &Path) -> ProjectConfig {
        write(root, "app/html/index.html", HOST);
        write(root, "app/html/pages/home.html", "<section>\n  <h1>Home</h1>\n</section>");
        write(root, "app/html/pages/about.html", "<section>\n  <h1>About</h1>\n</section>");
        write(
            root,
            "app/scss/main.scss",
            "$fg: #333;\n@font-face { font-family: Icons; src: url(../fonts/icons.woff); }\nbody { color: $fg; }\n",
        );
        write(root, "vendor/grid.css", ".row { display: flex; }\n");
        write(root, "vendor/fonts/icons.woff", "woff");
        write(root, "vendor/fonts/sub/extra.woff", "woff2");

        let mut config = ProjectConfig::default();
        config.scripts.enable = false;
        config.styles.extra = vec!["vendor/*.css".into()];
        config.styles.replacements = vec![ReplacementRule::new("../fonts", "./fonts")];
        config.fonts.sources = vec!["vendor/fonts/*".into()];
        config.resolve(root, Path::new("pagewright.toml"));
        config
    }

    fn read(path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_targets_without_scripts() {
        let dir = tempdir().unwrap();
        let config = project(dir.path());
        let pipeline = Pipeline::new(&config, BuildVariant::Production);

        assert_eq!(
            pipeline.targets(),
            vec![Target::Styles, Target::Html, Target::Fonts]
        );
        assert_eq!(pipeline.graph(&pipeline.targets()).len(), 5);
    }

    #[test]
    fn test_no_targets_builds_nothing() {
        let dir = tempdir().unwrap();
        let config = project(dir.path());
        let pipeline = Pipeline::new(&config, BuildVariant::Production);

        assert!(pipeline.graph(&[]).is_empty());
        let report = pipeline.run(&[]).unwrap();
        assert!(report.outcomes.is_empty());
        assert!(!config.paths.output.exists());
    }

    #[test]
    fn test_development_build() {
        let dir = tempdir().unwrap();
        let config = project(dir.path());
        let pipeline = Pipeline::new(&config, BuildVariant::Development);

        pipeline.run(&pipeline.targets()).unwrap().into_result().unwrap();

        let app = &config.paths.dev_output;
        let html = read(app.join("_devindex.html"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"_devstyles.css\">"));
        assert!(html.contains("src=\"_devbundle.js\""));
        assert!(html.find("data-page=\"about\"").unwrap() < html.find("data-page=\"home\"").unwrap());

        let css = read(app.join("_devstyles.css"));
        assert!(css.contains("url(./_devfonts/icons.woff)"));
        assert!(css.contains(".row"));

        assert_eq!(read(app.join("_devfonts/icons.woff")), "woff");
        assert!(!app.join("_devfonts/sub").exists());
        assert!(!config.paths.output.exists());
    }

    #[test]
    fn test_production_matches_development_modulo_variant() {
        let dir = tempdir().unwrap();
        let config = project(dir.path());

        let dev = Pipeline::new(&config, BuildVariant::Development);
        dev.run(&[Target::Html, Target::Styles]).unwrap().into_result().unwrap();
        let prod = Pipeline::new(&config, BuildVariant::Production);
        prod.run(&[Target::Html, Target::Styles]).unwrap().into_result().unwrap();

        let dev_html = read(dev.plan().html_path())
            .replace("_devbundle.js", "scripts.js")
            .replace("_devstyles.css", "styles.css");
        let expected = minify(MinifyType::Html(&dev_html), true).unwrap();
        assert_eq!(read(prod.plan().html_path()), expected);

        let dev_css = read(dev.plan().styles_path()).replacen("/_devfonts/", "/fonts/", 1);
        let expected = minify(MinifyType::Css(&dev_css), true).unwrap();
        assert_eq!(read(prod.plan().styles_path()), expected);
    }

    #[test]
    fn test_sass_failure_keeps_other_targets() {
        let dir = tempdir().unwrap();
        let config = project(dir.path());
        fs::write(&config.styles.entry, "body { color: $missing; }").unwrap();

        let pipeline = Pipeline::new(&config, BuildVariant::Production);
        let report = pipeline.run(&pipeline.targets()).unwrap();

        assert_eq!(report.failed(), vec!["sass"]);
        assert_eq!(
            report.outcome("styles"),
            Some(&TaskOutcome::Skipped { blocked_by: "sass" })
        );
        assert!(!pipeline.plan().styles_path().exists());
        assert!(pipeline.plan().html_path().exists());
        assert!(config.paths.output.join("fonts/icons.woff").exists());
    }

    #[cfg(unix)]
    fn enable_scripts(config: &mut ProjectConfig, root: &Path) {
        write(root, "app/js/main.js", "const greet = () => 'hi';\n");
        write(root, "app/js/lib/package.json", r#"{"main":"index.js"}"#);
        config.scripts.enable = true;
        config.scripts.source = root.canonicalize().unwrap().join("app/js");

        let sh = |script: &str| -> Vec<String> { vec!["sh".into(), "-c".into(), script.into(), "tool".into()] };
        // <source> --out-dir <dir>
        config.scripts.transpile = sh(r#"mkdir -p "$3" && cp "$1"/*.js "$3"/"#);
        // <entry> -o <file>
        config.scripts.bundle = sh(r#"cat "$1" > "$3""#);
        config.scripts.minify = sh(r#"tr -d ' ' < "$1" > "$3""#);
    }

    #[cfg(unix)]
    #[test]
    fn test_scripts_production() {
        let dir = tempdir().unwrap();
        let mut config = project(dir.path());
        enable_scripts(&mut config, dir.path());

        let pipeline = Pipeline::new(&config, BuildVariant::Production);
        pipeline.run(&[Target::Scripts]).unwrap().into_result().unwrap();

        assert_eq!(
            read(config.paths.output.join("scripts.js")),
            "constgreet=()=>'hi';\n"
        );
        assert!(config.paths.temp.join("transpiled/lib/package.json").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_scripts_development_skips_minifier() {
        let dir = tempdir().unwrap();
        let mut config = project(dir.path());
        enable_scripts(&mut config, dir.path());
        config.scripts.minify = vec!["false".into()];

        let pipeline = Pipeline::new(&config, BuildVariant::Development);
        pipeline.run(&[Target::Scripts]).unwrap().into_result().unwrap();

        assert_eq!(
            read(config.paths.dev_output.join("_devbundle.js")),
            "const greet = () => 'hi';\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_transpile_failure_skips_bundle() {
        let dir = tempdir().unwrap();
        let mut config = project(dir.path());
        enable_scripts(&mut config, dir.path());
        config.scripts.transpile = vec!["false".into()];

        let pipeline = Pipeline::new(&config, BuildVariant::Production);
        let report = pipeline.run(&pipeline.targets()).unwrap();

        assert_eq!(report.failed(), vec!["transpile"]);
        assert_eq!(
            report.outcome("scripts"),
            Some(&TaskOutcome::Skipped { blocked_by: "bundle" })
        );
        assert_eq!(report.outcome("styles"), Some(&TaskOutcome::Succeeded));
        assert!(!config.paths.output.join("scripts.js").exists());
        assert!(report.into_result().is_err());
    }
}
