//! The html task body: host document + fragments → final document.

use super::pages::{assemble, read_fragments};
use super::template::{Placeholders, Substitutions, script_tag, style_tag, substitute};
use super::CompileError;
use crate::config::{HtmlConfig, VariantPlan};
use crate::utils::minify::{MinifyType, minify};
use std::{fs, path::Path};

/// Render the host document for `plan`, minified when the plan asks for it.
///
/// Returns the document and the number of fragments it contains.
pub fn render_document(
    html: &HtmlConfig,
    host: &Path,
    pages_dir: &Path,
    plan: &VariantPlan,
) -> Result<(String, usize), CompileError> {
    let document = fs::read_to_string(host).map_err(|err| CompileError::io(host, err))?;
    let fragments = read_fragments(pages_dir)?;

    let pages = assemble(&fragments);
    let scripts = script_tag(plan.scripts_file);
    let styles = style_tag(plan.styles_file);

    let rendered = substitute(
        &document,
        Placeholders::from_config(html),
        Substitutions {
            pages: &pages,
            scripts: &scripts,
            styles: &styles,
        },
        html.missing_placeholder,
    )?;

    let output = minify(MinifyType::Html(&rendered), plan.minify)?.into_owned();
    Ok((output, fragments.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildVariant, MissingPlaceholder, ProjectConfig};
    use tempfile::tempdir;

    const HOST: &str = "<html>\n  <head>\n    <styles />\n  </head>\n  <body>\n    <pages />\n    <scripts />\n  </body>\n</html>\n";

    fn setup(root: &Path) -> ProjectConfig {
        fs::create_dir_all(root.join("app/html/pages")).unwrap();
        fs::write(root.join("app/html/index.html"), HOST).unwrap();
        fs::write(root.join("app/html/pages/home.html"), "<p>Hi</p>").unwrap();
        fs::write(root.join("app/html/pages/about.html"), "<p>About</p>").unwrap();

        let mut config = ProjectConfig::default();
        config.resolve(root, Path::new("pagewright.toml"));
        config
    }

    fn render(config: &ProjectConfig, variant: BuildVariant) -> Result<(String, usize), CompileError> {
        let plan = variant.plan(config);
        render_document(&config.html, &config.host_path(), &config.pages_dir(), &plan)
    }

    #[test]
    fn test_render_development_is_verbatim() {
        let dir = tempdir().unwrap();
        let config = setup(dir.path());

        let (doc, count) = render(&config, BuildVariant::Development).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            doc,
            "<html>\n  <head>\n    <link rel=\"stylesheet\" href=\"_devstyles.css\">\n  </head>\n  <body>\n    \
             <div data-page=\"about\" hidden><p>About</p></div><div data-page=\"home\" hidden><p>Hi</p></div>\n    \
             <script type=\"text/javascript\" src=\"_devbundle.js\"></script>\n  </body>\n</html>\n"
        );
    }

    #[test]
    fn test_render_production_is_minified() {
        let dir = tempdir().unwrap();
        let config = setup(dir.path());

        let (doc, _) = render(&config, BuildVariant::Production).unwrap();
        assert!(!doc.contains("\n    "));
        assert!(doc.contains("scripts.js"));
        assert!(doc.contains("styles.css"));
        assert!(doc.contains("<p>About</p>"));
        assert!(!doc.contains("_dev"));
    }

    #[test]
    fn test_render_missing_placeholder_error_policy() {
        let dir = tempdir().unwrap();
        let mut config = setup(dir.path());
        fs::write(config.host_path(), "<html><pages /></html>").unwrap();
        config.html.missing_placeholder = MissingPlaceholder::Error;

        let err = render(&config, BuildVariant::Development).unwrap_err();
        assert!(matches!(err, CompileError::Template { .. }));
    }

    #[test]
    fn test_render_missing_pages_dir() {
        let dir = tempdir().unwrap();
        let config = setup(dir.path());
        fs::remove_dir_all(config.pages_dir()).unwrap();

        let err = render(&config, BuildVariant::Production).unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
    }
}
