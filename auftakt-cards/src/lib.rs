//! auftakt-cards library interface
//!
//! Turns recorded audio sessions into identifier-tagged card decks. The
//! binaries under `src/bin/` are thin wrappers around these modules.

pub mod cli;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod services;

pub use crate::error::{DeckError, DeckResult, PipelineWarning};
pub use crate::pipeline::{generate_cards, CardRun};
