//! Errors raised while producing artifacts.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    /// A declared source path is missing or unreadable.
    #[error("cannot read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external transform rejected its input.
    #[error("{tool} failed:\n{detail}")]
    Tool { tool: &'static str, detail: String },

    /// The host document lacks a placeholder and the policy is `error`.
    #[error("placeholder `{token}` not found in host document")]
    Template { token: String },
}

impl CompileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn tool(tool: &'static str, detail: impl ToString) -> Self {
        Self::Tool {
            tool,
            detail: detail.to_string(),
        }
    }
}
