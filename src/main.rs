//! vm-forge CLI
//!
//! Entry point for the `vm-forge` command-line tool. All parsing and
//! validation returns typed results; this is the single place that prints
//! a diagnosis and terminates the process.

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vm_forge::config::{self, EffectiveConfig};
use vm_forge::packer::SystemLocator;
use vm_forge::persist::TomlPersister;
use vm_forge::{validate, Cli};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("{0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Resolve(#[from] config::ResolveError),

    #[error("{0}")]
    Validation(#[from] validate::ValidationError),

    #[error("Failed to determine working directory: {0}")]
    WorkingDir(std::io::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<EffectiveConfig, AppError> {
    let cwd = std::env::current_dir().map_err(AppError::WorkingDir)?;

    let sources = gather_sources(cli, &cwd)?;
    let effective = config::resolve(sources)?;

    let locator = SystemLocator;
    let persister = TomlPersister::new(&cwd);
    let validated = validate::validate(effective, &cwd, &locator, &persister)?;

    // VM orchestration would consume `validated` here.
    Ok(validated)
}

/// Collect one record per source that actually has something to say.
fn gather_sources(
    cli: &Cli,
    cwd: &Path,
) -> Result<Vec<vm_forge::PartialConfig>, config::ConfigError> {
    let mut sources = vec![cli.to_partial()];

    if let Some(path) = &cli.config_file {
        sources.push(config::load_named(path)?);
    }
    if let Some(record) = config::load_default(cwd)? {
        sources.push(record);
    }

    Ok(sources)
}
