//! Artifact production: the steps each pipeline task runs.
//!
//! - **pages**: read fragments, assemble the page blob
//! - **template**: placeholder substitution in the host document
//! - **html**: host document → final document
//! - **styles**: SASS, concatenation, literal CSS patching
//! - **scripts**: transpile / bundle / minify through external tools
//! - **assets**: glob-selected extra stylesheets and fonts
//!
//! # Data Flow
//!
//! ```text
//! pages/*.html ──► assemble() ──► substitute() ──► minify ──► index.html
//! main.scss ──► compile_sass() ──► concat_css() ──► patch_css() ──► minify ──► styles.css
//! ```

pub mod assets;
mod error;
pub mod html;
pub mod pages;
pub mod scripts;
pub mod styles;
pub mod template;

pub use error::CompileError;
