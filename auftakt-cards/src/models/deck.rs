//! Deck entities, metadata records and the structured deck index
//!
//! On disk a deck is a tree of `<uuid>-<tag>` directories. The tag keeps the
//! layout readable by existing players, but consumers should read the kind of a
//! node from [`DeckIndex`] instead of parsing directory names.

use crate::error::{DeckError, DeckResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata file written into every collection directory
pub const DIRECTORY_META: &str = "directory.meta";

/// Metadata file written into every card directory
pub const CARD_META: &str = "card.meta";

/// Structured index written into the deck root
pub const DECK_INDEX: &str = "deck.index";

/// Kind of a generated directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Root collection of a run
    Deck,
    /// Per-source-directory collection
    Collection,
    Card,
}

impl NodeKind {
    /// Directory-name suffix for this kind
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Deck => "*",
            NodeKind::Collection => "_",
            NodeKind::Card => "[]",
        }
    }

    /// `<id>-<tag>`
    pub fn dir_name(self, id: Uuid) -> String {
        format!("{}-{}", id, self.tag())
    }
}

/// `directory.meta` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMeta {
    pub name: String,
    pub id: String,
}

/// `card.meta` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMeta {
    pub name: String,
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub created: i64,
    /// Asset identifiers in playback order (1 or 2 entries)
    pub order: Vec<String>,
}

/// Metadata of a directory level (deck root or per-source-directory grouping)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNode {
    pub id: Uuid,
    pub name: String,
    pub kind: NodeKind,
}

impl CollectionNode {
    pub fn new(id: Uuid, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    pub fn dir_name(&self) -> String {
        self.kind.dir_name(self.id)
    }

    /// The record's `id` is the directory name, tag included
    pub fn to_meta(&self) -> DirectoryMeta {
        DirectoryMeta {
            name: self.name.clone(),
            id: self.dir_name(),
        }
    }
}

/// A paired (or singleton) unit of audio assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: i64,
    pub asset_order: Vec<Uuid>,
}

impl Card {
    /// Build the card at pairing `index` out of `total` pairs in one collection
    ///
    /// Fails with [`DeckError::TimestampOverflow`] when the timestamp does not
    /// fit in an `i64`.
    pub fn new(
        id: Uuid,
        index: usize,
        total: usize,
        base_timestamp: i64,
        spacing_ms: i64,
        asset_order: Vec<Uuid>,
    ) -> DeckResult<Self> {
        Ok(Self {
            id,
            display_name: display_name(index),
            created_at: card_timestamp(index, total, base_timestamp, spacing_ms)?,
            asset_order,
        })
    }

    pub fn dir_name(&self) -> String {
        NodeKind::Card.dir_name(self.id)
    }

    pub fn to_meta(&self) -> CardMeta {
        CardMeta {
            name: self.display_name.clone(),
            id: self.id.to_string(),
            created: self.created_at,
            order: self.asset_order.iter().map(Uuid::to_string).collect(),
        }
    }
}

/// `base_timestamp - (total - index) * spacing_ms`
///
/// Strictly increases with `index` and stays below `base_timestamp`, so
/// `index = 0` gives the earliest card of a collection.
pub fn card_timestamp(
    index: usize,
    total: usize,
    base_timestamp: i64,
    spacing_ms: i64,
) -> DeckResult<i64> {
    i64::try_from(total.saturating_sub(index))
        .ok()
        .and_then(|distance| distance.checked_mul(spacing_ms))
        .and_then(|offset| base_timestamp.checked_sub(offset))
        .ok_or(DeckError::TimestampOverflow {
            total,
            spacing_ms,
            base_timestamp,
        })
}

/// `"C-0001"` for pairing index 0
pub fn display_name(index: usize) -> String {
    format!("C-{:04}", index + 1)
}

/// One asset file inside a card directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub id: Uuid,
    /// File name inside the card directory
    pub file: String,
    /// Name of the take it was copied from
    pub source_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: Uuid,
    pub name: String,
    pub dir: String,
    pub children: Vec<DeckNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub id: Uuid,
    pub name: String,
    pub dir: String,
    pub created: i64,
    pub assets: Vec<AssetEntry>,
}

/// Node of the structured deck index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeckNode {
    Collection(CollectionEntry),
    Card(CardEntry),
}

impl DeckNode {
    pub fn collection(node: &CollectionNode) -> Self {
        DeckNode::Collection(CollectionEntry {
            id: node.id,
            name: node.name.clone(),
            dir: node.dir_name(),
            children: Vec::new(),
        })
    }

    pub fn card(card: &Card, assets: Vec<AssetEntry>) -> Self {
        DeckNode::Card(CardEntry {
            id: card.id,
            name: card.display_name.clone(),
            dir: card.dir_name(),
            created: card.created_at,
            assets,
        })
    }

    fn collect_cards<'a>(&'a self, out: &mut Vec<&'a CardEntry>) {
        match self {
            DeckNode::Card(card) => out.push(card),
            DeckNode::Collection(collection) => {
                for child in &collection.children {
                    child.collect_cards(out);
                }
            }
        }
    }
}

/// Structured description of a materialized deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckIndex {
    /// Base timestamp captured once for the run
    pub base_timestamp: i64,
    /// Root collection
    pub deck: DeckNode,
}

impl DeckIndex {
    /// Every card in tree order
    pub fn cards(&self) -> Vec<&CardEntry> {
        let mut out = Vec::new();
        self.deck.collect_cards(&mut out);
        out
    }

    /// Direct child collections of the root
    pub fn collections(&self) -> Vec<&CollectionEntry> {
        match &self.deck {
            DeckNode::Collection(root) => root
                .children
                .iter()
                .filter_map(|child| match child {
                    DeckNode::Collection(c) => Some(c),
                    DeckNode::Card(_) => None,
                })
                .collect(),
            DeckNode::Card(_) => Vec::new(),
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards().len()
    }

    pub fn asset_count(&self) -> usize {
        self.cards().iter().map(|c| c.assets.len()).sum()
    }
}
