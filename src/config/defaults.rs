//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization. The values
//! reproduce the conventional `app/` + `build/` project layout.

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn temp() -> PathBuf {
        "tmp".into()
    }

    pub fn output() -> PathBuf {
        "build".into()
    }

    pub fn dev_output() -> PathBuf {
        "app".into()
    }
}

// ============================================================================
// [scripts] Section Defaults
// ============================================================================

pub mod scripts {
    use std::path::PathBuf;

    pub fn source() -> PathBuf {
        "app/js".into()
    }

    pub fn entry() -> PathBuf {
        "main.js".into()
    }

    pub fn transpile() -> Vec<String> {
        vec!["babel".into(), "--presets".into(), "es2015".into()]
    }

    pub fn bundle() -> Vec<String> {
        vec!["browserify".into(), "--debug".into()]
    }

    pub fn minify() -> Vec<String> {
        vec!["uglifyjs".into()]
    }
}

// ============================================================================
// [styles] Section Defaults
// ============================================================================

pub mod styles {
    use std::path::PathBuf;

    pub fn entry() -> PathBuf {
        "app/scss/main.scss".into()
    }
}

// ============================================================================
// [html] Section Defaults
// ============================================================================

pub mod html {
    use super::super::MissingPlaceholder;
    use std::path::PathBuf;

    pub fn source() -> PathBuf {
        "app/html".into()
    }

    pub fn host() -> PathBuf {
        "index.html".into()
    }

    pub fn pages() -> PathBuf {
        "pages".into()
    }

    pub fn missing_placeholder() -> MissingPlaceholder {
        MissingPlaceholder::default()
    }

    pub fn pages_tag() -> String {
        "<pages />".into()
    }

    pub fn scripts_tag() -> String {
        "<scripts />".into()
    }

    pub fn styles_tag() -> String {
        "<styles />".into()
    }
}
