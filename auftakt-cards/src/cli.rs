//! Argument helpers shared by the command-line tools

use anyhow::Context;
use auftakt_common::{AuftaktConfig, ConfigResolver};
use std::path::PathBuf;

/// clap value parser: the argument must name an existing directory
pub fn existing_dir(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg);
    if path.is_dir() {
        Ok(path)
    } else if path.exists() {
        Err(format!("not a directory: {}", arg))
    } else {
        Err(format!("folder does not exist: {}", arg))
    }
}

/// Resolve and validate configuration (`--config`, env var, user file, defaults)
pub fn load_config(cli_path: Option<PathBuf>) -> anyhow::Result<AuftaktConfig> {
    let config = ConfigResolver::new(cli_path)
        .resolve()
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Print run warnings to stderr after the summary
pub fn print_warnings(warnings: &[crate::PipelineWarning]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("{} warning(s):", warnings.len());
    for warning in warnings {
        eprintln!("  - {}", warning);
    }
}
