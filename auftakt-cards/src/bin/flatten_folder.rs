//! flatten-folder - Copy a nested session tree into one flat folder
//!
//! Usage: `flatten-folder <SOURCE> [DESTINATION]`
//!
//! Files are renamed `<parent dir>_<file name>` with every number padded to
//! four digits. The destination defaults to `<SOURCE>-flat`.

use anyhow::{Context, Result};
use auftakt_cards::cli::{existing_dir, load_config, print_warnings};
use auftakt_cards::logging::{init_tracing, log_banner};
use auftakt_cards::services::Flattener;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for flatten-folder
#[derive(Parser, Debug)]
#[command(name = "flatten-folder")]
#[command(about = "Flatten a nested folder of takes into one folder")]
#[command(version)]
struct Args {
    /// Session folder to flatten
    #[arg(value_parser = existing_dir)]
    source: PathBuf,

    /// Output folder (default: <SOURCE>-flat)
    destination: Option<PathBuf>,

    /// Configuration file (overrides AUFTAKT_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config)?;

    init_tracing(&config.logging.level, args.verbose);
    log_banner("flatten-folder");

    let flattener = Flattener::from_config(&config);
    let report = match &args.destination {
        Some(destination) => flattener.flatten_into(&args.source, destination),
        None => flattener.flatten(&args.source),
    }
    .with_context(|| format!("Failed to flatten {}", args.source.display()))?;

    println!(
        "Flattened {} file(s) into {}",
        report.files.len(),
        report.destination.display()
    );
    if !report.collisions.is_empty() {
        eprintln!(
            "{} name collision(s), later copies overwrote earlier ones:",
            report.collisions.len()
        );
        for path in &report.collisions {
            eprintln!("  - {}", path.display());
        }
    }
    print_warnings(&report.warnings);

    Ok(())
}
