//! Deck materialization
//!
//! Turns a session directory into an identifier-tagged deck:
//!
//! ```text
//! <deck-id>-*/                    directory.meta  {name: <session>, id: "<deck-id>-*"}
//! ├── deck.index                  structured tree (kinds, ids, names)
//! ├── <collection-id>-_/          directory.meta  {name: <source dir>, ...}
//! │   ├── <card-id>-[]/           card.meta       {name: "C-0001", id, created, order}
//! │   │   ├── <asset-id>.m4a
//! │   │   └── <asset-id>.m4a
//! │   └── <card-id>-[]/ ...
//! └── <collection-id>-_/ ...
//! ```
//!
//! **Algorithm:**
//! 1. Check the source exists before creating anything
//! 2. List top-level takes, then every immediate subdirectory in natural order
//! 3. Create the deck root and its metadata
//! 4. Per source directory: create a collection, group takes into pairs and
//!    write one card per pair, copying takes under fresh asset ids
//!
//! Card timestamps derive from one `base_timestamp` passed in by the caller:
//! `created = base_timestamp - (pairs - index) * card_spacing_ms`.
//!
//! A destination inside the source tree is never read back as a collection,
//! and neither is any deck root left there by an earlier run.
//!
//! **Failure handling:** an unreadable subdirectory or a collection whose
//! timestamps overflow skips that collection; a failed copy or metadata write
//! skips that card (its partial directory is removed). All are returned as
//! warnings and the run continues.

use crate::error::{DeckError, DeckResult, PipelineWarning};
use crate::models::audio_file::base_name;
use crate::models::deck::{card_timestamp, CARD_META, DECK_INDEX, DIRECTORY_META};
use crate::models::{
    AssetEntry, AudioFile, Card, CollectionNode, DeckIndex, DeckNode, NodeKind, SourceDirectory,
};
use crate::services::flattener::canonical_source;
use crate::services::pair_grouper::{self, Pair};
use auftakt_common::{AuftaktConfig, IdSource, RandomIds};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of a materialization run
#[derive(Debug)]
pub struct DeckHandle {
    /// Deck root directory (`<destination>/<id>-*`)
    pub root: PathBuf,
    pub index: DeckIndex,
    pub warnings: Vec<PipelineWarning>,
}

/// Deck materializer
pub struct DeckMaterializer<I: IdSource = RandomIds> {
    config: AuftaktConfig,
    ids: I,
}

impl DeckMaterializer<RandomIds> {
    /// Materializer drawing random UUIDv4 identifiers
    pub fn new(config: AuftaktConfig) -> Self {
        Self::with_ids(config, RandomIds)
    }
}

impl<I: IdSource> DeckMaterializer<I> {
    pub fn with_ids(config: AuftaktConfig, ids: I) -> Self {
        Self { config, ids }
    }

    /// Materialize `source_root` as a new deck under `destination_parent`
    ///
    /// Every run produces a new deck with fresh identifiers; existing decks are
    /// never updated.
    pub fn materialize(
        &mut self,
        source_root: &Path,
        destination_parent: &Path,
        base_timestamp: i64,
    ) -> DeckResult<DeckHandle> {
        let source_root = canonical_source(source_root)?;
        let deck_name = base_name(&source_root);
        let mut warnings = Vec::new();

        let sources = self.collect_sources(&source_root, destination_parent, &mut warnings)?;
        tracing::info!(
            source = %source_root.display(),
            collections = sources.len(),
            takes = sources.iter().map(|s| s.children.len()).sum::<usize>(),
            "Source scanned"
        );

        let deck = CollectionNode::new(self.ids.new_id(), deck_name, NodeKind::Deck);
        let root = destination_parent.join(deck.dir_name());
        fs::create_dir_all(&root)?;
        write_json(&root.join(DIRECTORY_META), &deck.to_meta())?;
        tracing::info!(deck = %root.display(), "Deck root created");

        let mut deck_node = DeckNode::collection(&deck);
        for source in &sources {
            match self.materialize_collection(source, &root, base_timestamp, &mut warnings) {
                Ok(node) => push_child(&mut deck_node, node),
                Err(e) => warnings.push(PipelineWarning::record(e)),
            }
        }

        let index = DeckIndex {
            base_timestamp,
            deck: deck_node,
        };
        if let Err(e) = write_json_pretty(&root.join(DECK_INDEX), &index) {
            warnings.push(PipelineWarning::record(e));
        }

        tracing::info!(
            cards = index.card_count(),
            assets = index.asset_count(),
            warnings = warnings.len(),
            "Deck materialized"
        );

        Ok(DeckHandle {
            root,
            index,
            warnings,
        })
    }

    /// Top-level takes first (as a collection named after the session), then
    /// each immediate subdirectory in natural order
    fn collect_sources(
        &self,
        source_root: &Path,
        destination_parent: &Path,
        warnings: &mut Vec<PipelineWarning>,
    ) -> DeckResult<Vec<SourceDirectory>> {
        // The root itself must be listable; nothing has been created yet
        let (top_level, subdirs) = self.list_dir(source_root)?;
        let destination = destination_parent.canonicalize().ok();

        let mut collections = Vec::with_capacity(subdirs.len());
        for subdir in subdirs {
            if destination.as_deref() == Some(subdir.as_path()) || is_deck_root(&subdir) {
                tracing::debug!(path = %subdir.display(), "Skipping deck output inside source");
                continue;
            }
            match self.list_dir(&subdir) {
                Ok((takes, nested)) => {
                    for dir in &nested {
                        tracing::debug!(
                            path = %dir.display(),
                            "Nested directory not materialized (flatten the session first)"
                        );
                    }
                    collections.push(SourceDirectory::new(&subdir, takes));
                }
                Err(e) => warnings.push(PipelineWarning::record(e)),
            }
        }
        collections.sort_by_cached_key(SourceDirectory::order_key);

        let mut sources = Vec::with_capacity(collections.len() + 1);
        if !top_level.is_empty() {
            sources.push(SourceDirectory::new(source_root, top_level));
        }
        sources.extend(collections);
        Ok(sources)
    }

    /// Audio takes and subdirectories directly inside `dir`
    fn list_dir(&self, dir: &Path) -> DeckResult<(Vec<AudioFile>, Vec<PathBuf>)> {
        let mut takes = Vec::new();
        let mut subdirs = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
            let entry = entry
                .map_err(|e| DeckError::UnreadableSubtree(dir.to_path_buf(), e.to_string()))?;
            let name = entry.file_name().to_string_lossy();
            if self.config.is_ignored(&name) {
                continue;
            }

            if entry.file_type().is_dir() {
                subdirs.push(entry.into_path());
            } else if entry.file_type().is_file() && self.config.is_audio_file(entry.path()) {
                takes.push(AudioFile::new(entry.into_path()));
            } else {
                tracing::debug!(path = %entry.path().display(), "Skipping non-audio entry");
            }
        }

        Ok((takes, subdirs))
    }

    fn materialize_collection(
        &mut self,
        source: &SourceDirectory,
        deck_root: &Path,
        base_timestamp: i64,
        warnings: &mut Vec<PipelineWarning>,
    ) -> DeckResult<DeckNode> {
        let pairs = pair_grouper::group(source.children.clone());
        let total = pairs.len();
        let spacing_ms = self.config.card_spacing_ms;
        // The first card is the earliest; if it fits, every card does
        card_timestamp(0, total, base_timestamp, spacing_ms)?;

        let collection =
            CollectionNode::new(self.ids.new_id(), source.name.clone(), NodeKind::Collection);
        let collection_dir = deck_root.join(collection.dir_name());
        fs::create_dir_all(&collection_dir)?;
        write_json(&collection_dir.join(DIRECTORY_META), &collection.to_meta())?;

        tracing::debug!(
            collection = %source.name,
            takes = source.children.len(),
            cards = total,
            "Materializing collection"
        );

        let mut node = DeckNode::collection(&collection);
        for (index, pair) in pairs.iter().enumerate() {
            let card_id = self.ids.new_id();
            let asset_ids: Vec<_> = pair.files().map(|_| self.ids.new_id()).collect();
            let card = Card::new(card_id, index, total, base_timestamp, spacing_ms, asset_ids)?;

            let card_dir = collection_dir.join(card.dir_name());
            match write_card(&card, pair, &card_dir) {
                Ok(assets) => push_child(&mut node, DeckNode::card(&card, assets)),
                Err(e) => {
                    if card_dir.exists() {
                        if let Err(cleanup) = fs::remove_dir_all(&card_dir) {
                            tracing::warn!(
                                path = %card_dir.display(),
                                "Could not remove partial card: {}",
                                cleanup
                            );
                        }
                    }
                    warnings.push(PipelineWarning::record(e));
                }
            }
        }

        Ok(node)
    }
}

/// Copy the pair's takes under their asset ids, then write `card.meta`
fn write_card(card: &Card, pair: &Pair, card_dir: &Path) -> DeckResult<Vec<AssetEntry>> {
    fs::create_dir_all(card_dir)?;

    let mut assets = Vec::with_capacity(pair.arity());
    for (take, asset_id) in pair.files().zip(&card.asset_order) {
        let ext = take.extension();
        let file = if ext.is_empty() {
            asset_id.to_string()
        } else {
            format!("{}.{}", asset_id, ext)
        };
        let target = card_dir.join(&file);
        fs::copy(&take.source_path, &target).map_err(|e| DeckError::CopyFailure {
            from: take.source_path.clone(),
            to: target.clone(),
            reason: e.to_string(),
        })?;
        assets.push(AssetEntry {
            id: *asset_id,
            file,
            source_name: take.raw_name.clone(),
        });
    }

    write_json(&card_dir.join(CARD_META), &card.to_meta())?;
    Ok(assets)
}

/// A deck root written by an earlier run: `<id>-*` holding `directory.meta`
fn is_deck_root(dir: &Path) -> bool {
    let suffix = format!("-{}", NodeKind::Deck.tag());
    base_name(dir).ends_with(&suffix) && dir.join(DIRECTORY_META).is_file()
}

fn push_child(parent: &mut DeckNode, child: DeckNode) {
    if let DeckNode::Collection(entry) = parent {
        entry.children.push(child);
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> DeckResult<()> {
    fs::write(path, serde_json::to_vec(value)?)?;
    Ok(())
}

fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> DeckResult<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}
