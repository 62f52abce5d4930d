//! convert-audio - Copy a session and convert its takes to MP3
//!
//! Usage: `convert-audio <SOURCE> <DESTINATION>`
//!
//! The source is never modified. Needs `ffmpeg` (or `ffmpeg_path` from the
//! configuration file).

use anyhow::{Context, Result};
use auftakt_cards::cli::{existing_dir, load_config, print_warnings};
use auftakt_cards::logging::{init_tracing, log_banner};
use auftakt_cards::services::{AudioConverter, FfmpegTranscoder};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for convert-audio
#[derive(Parser, Debug)]
#[command(name = "convert-audio")]
#[command(about = "Copy a folder of takes and convert them to MP3")]
#[command(version)]
struct Args {
    /// Session folder to copy
    #[arg(value_parser = existing_dir)]
    source: PathBuf,

    /// New folder for the converted copy (must not exist)
    destination: PathBuf,

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
    log_banner("convert-audio");

    let transcoder = FfmpegTranscoder::from_config(&config);
    let converter = AudioConverter::new(config, transcoder);
    let report = converter
        .convert(&args.source, &args.destination)
        .with_context(|| format!("Failed to convert {}", args.source.display()))?;

    println!(
        "Copied {} file(s), converted {} take(s) in {}",
        report.copied,
        report.converted.len(),
        report.destination.display()
    );
    print_warnings(&report.warnings);

    Ok(())
}
