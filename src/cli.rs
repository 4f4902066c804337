//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build pipeline for pages, styles and script bundles
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the root (optional on disk)
    #[arg(short = 'C', long, default_value = "pagewright.toml")]
    pub config: PathBuf,

    /// Build task to run (defaults to `build`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Entry tasks
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Production build: minified artifacts in the output directory
    Build,

    /// Development build: unminified `_dev*` artifacts next to the sources
    Dev,
}

impl Cli {
    /// The selected task; no subcommand is an alias for `build`.
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Build)
    }
}
