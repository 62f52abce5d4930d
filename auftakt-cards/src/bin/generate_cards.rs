//! generate-cards - Materialize a recorded session as a card deck
//!
//! Usage: `generate-cards <SOURCE> <DESTINATION> [--no-zip]`
//!
//! Creates `<DESTINATION>/<uuid>-*` holding one collection per source
//! directory and one card per pair of takes, then archives it as
//! `<DESTINATION>/<uuid>-*.zip` unless `--no-zip` is given.

use anyhow::{Context, Result};
use auftakt_cards::cli::{existing_dir, load_config, print_warnings};
use auftakt_cards::logging::{init_tracing, log_banner};
use auftakt_cards::services::DeckMaterializer;
use auftakt_common::time;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for generate-cards
#[derive(Parser, Debug)]
#[command(name = "generate-cards")]
#[command(about = "Turn a folder of recorded takes into a card deck")]
#[command(version)]
struct Args {
    /// Session folder (subfolders become collections)
    #[arg(value_parser = existing_dir)]
    source: PathBuf,

    /// Folder that receives the deck (created if absent)
    destination: PathBuf,

    /// Keep only the uncompressed deck
    #[arg(long)]
    no_zip: bool,

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
    log_banner("generate-cards");
    info!("Source: {}", args.source.display());
    info!("Destination: {}", args.destination.display());

    // One clock reading per run; every card timestamp derives from it
    let base_timestamp = time::now_millis();
    let mut materializer = DeckMaterializer::new(config);
    let run = auftakt_cards::generate_cards(
        &mut materializer,
        &args.source,
        &args.destination,
        base_timestamp,
        !args.no_zip,
    )
    .with_context(|| format!("Failed to generate cards from {}", args.source.display()))?;

    println!("Deck created at: {}", run.deck.root.display());
    println!(
        "{} collection(s), {} card(s), {} asset(s)",
        run.deck.index.collections().len(),
        run.card_count(),
        run.asset_count()
    );
    if let Some(archive) = &run.archive {
        println!("Archive: {}", archive.display());
    }
    print_warnings(&run.warnings);

    Ok(())
}
