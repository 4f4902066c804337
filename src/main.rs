//! Pagewright - builds a single-page web application from scripts,
//! stylesheets and HTML page fragments.

mod build;
mod cli;
mod compiler;
mod config;
mod logger;
mod pipeline;
mod utils;

use anyhow::Result;
use build::build_project;
use clap::Parser;
use cli::{Cli, Commands};
use config::{BuildVariant, ProjectConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let variant = match cli.command() {
        Commands::Build => BuildVariant::Production,
        Commands::Dev => BuildVariant::Development,
    };
    build_project(&config, variant)
}

/// Load configuration and check it before any task runs.
fn load_config(cli: &Cli) -> Result<ProjectConfig> {
    let config = ProjectConfig::load(cli)?;
    config.validate()?;
    Ok(config)
}
