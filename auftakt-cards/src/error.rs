//! Error types for auftakt-cards
//!
//! Only a missing or non-directory source aborts a run. Everything else is
//! caught at the smallest unit that can safely continue (subtree, card, file)
//! and surfaced as a [`PipelineWarning`].

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum DeckError {
    /// Source root does not exist (fatal, checked before any output is created)
    #[error("Source folder does not exist: {0}")]
    MissingSource(PathBuf),

    /// Source root exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Destination must not exist yet (tree copies never merge)
    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// Nothing to process under the source root
    #[error("No audio takes found under {0}")]
    NoAudio(PathBuf),

    /// A subdirectory could not be listed or walked
    #[error("Unreadable subtree {0}: {1}")]
    UnreadableSubtree(PathBuf, String),

    /// Copying one file failed
    #[error("Copy failed {from} -> {to}: {reason}")]
    CopyFailure {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// Writing the deck archive failed
    #[error("Archive failed {0}: {1}")]
    ArchiveFailure(PathBuf, String),

    /// Card creation times for a collection do not fit in an `i64`
    #[error("Card timestamps overflow: {total} cards spaced {spacing_ms} ms before {base_timestamp}")]
    TimestampOverflow {
        total: usize,
        spacing_ms: i64,
        base_timestamp: i64,
    },

    /// Metadata record could not be serialized
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// External tool (encoder) failed
    #[error("{tool} failed on {path}: {reason}")]
    Collaborator {
        tool: String,
        path: PathBuf,
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// auftakt-common error
    #[error("Common error: {0}")]
    Common(#[from] auftakt_common::Error),
}

/// Result type for pipeline operations
pub type DeckResult<T> = Result<T, DeckError>;

/// Non-fatal problem recorded during a run
#[derive(Debug)]
pub struct PipelineWarning {
    pub error: DeckError,
}

impl PipelineWarning {
    /// Log the error at warn level and wrap it
    pub fn record(error: DeckError) -> Self {
        tracing::warn!("{}", error);
        Self { error }
    }
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}
