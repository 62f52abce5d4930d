//! concatenate-audio - Render a whole session as one track
//!
//! Usage: `concatenate-audio <SOURCE> [OUTPUT]`
//!
//! Subfolders are played in natural order, takes inside each by their
//! `(n)` number. OUTPUT defaults to `final_audio.m4a` in the working directory.

use anyhow::{Context, Result};
use auftakt_cards::cli::{existing_dir, load_config, print_warnings};
use auftakt_cards::logging::{init_tracing, log_banner};
use auftakt_cards::services::concatenator::{self, DEFAULT_OUTPUT};
use auftakt_cards::services::FfmpegTrackRenderer;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for concatenate-audio
#[derive(Parser, Debug)]
#[command(name = "concatenate-audio")]
#[command(about = "Concatenate every take of a session into one audio file")]
#[command(version)]
struct Args {
    /// Session folder
    #[arg(value_parser = existing_dir)]
    source: PathBuf,

    /// Output file
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

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
    log_banner("concatenate-audio");

    let renderer = FfmpegTrackRenderer::from_config(&config);
    let report = concatenator::concatenate(&args.source, &args.output, &config, &renderer)
        .with_context(|| format!("Failed to concatenate {}", args.source.display()))?;

    println!(
        "Final concatenated audio ({} segment(s)) saved at: {}",
        report.segments,
        report.output.display()
    );
    print_warnings(&report.warnings);

    Ok(())
}
