//! Card generation run: materialize a deck, then optionally archive it

use crate::error::{DeckResult, PipelineWarning};
use crate::services::archiver;
use crate::services::deck_materializer::{DeckHandle, DeckMaterializer};
use auftakt_common::IdSource;
use std::path::{Path, PathBuf};

/// Everything a `generate-cards` run produced
#[derive(Debug)]
pub struct CardRun {
    pub deck: DeckHandle,
    /// `None` when archiving was skipped or failed
    pub archive: Option<PathBuf>,
    /// Materializer warnings followed by an archive failure, if any
    pub warnings: Vec<PipelineWarning>,
}

impl CardRun {
    pub fn card_count(&self) -> usize {
        self.deck.index.card_count()
    }

    pub fn asset_count(&self) -> usize {
        self.deck.index.asset_count()
    }
}

/// Materialize `source` under `destination` and archive the deck when `zip` is set
///
/// An archive failure is a warning: the uncompressed deck stays usable.
pub fn generate_cards<I: IdSource>(
    materializer: &mut DeckMaterializer<I>,
    source: &Path,
    destination: &Path,
    base_timestamp: i64,
    zip: bool,
) -> DeckResult<CardRun> {
    let mut deck = materializer.materialize(source, destination, base_timestamp)?;
    // Moved here so the run has one warning list
    let mut warnings = std::mem::take(&mut deck.warnings);

    let archive = if zip {
        match archiver::archive(&deck.root) {
            Ok(path) => Some(path),
            Err(e) => {
                warnings.push(PipelineWarning::record(e));
                None
            }
        }
    } else {
        tracing::debug!("Archiving skipped");
        None
    };

    Ok(CardRun {
        deck,
        archive,
        warnings,
    })
}
