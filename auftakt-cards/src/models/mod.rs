//! Data models for the card pipeline

pub mod audio_file;
pub mod deck;

pub use audio_file::{AudioFile, SourceDirectory};
pub use deck::{
    AssetEntry, Card, CardEntry, CardMeta, CollectionEntry, CollectionNode, DeckIndex, DeckNode,
    DirectoryMeta, NodeKind,
};
