//! Pipeline services
//!
//! Core stages: order keys, flattening, pair grouping, deck materialization and
//! archiving. The transcoder and concatenator are collaborator tools built on
//! the same ordering rules.

pub mod archiver;
pub mod concatenator;
pub mod deck_materializer;
pub mod flattener;
pub mod order_key;
pub mod pair_grouper;
pub mod transcoder;

pub use concatenator::{ConcatPlan, ConcatReport, FfmpegTrackRenderer, TrackRenderer};
pub use deck_materializer::{DeckHandle, DeckMaterializer};
pub use flattener::{FlattenReport, FlattenedFile, Flattener};
pub use order_key::{DualKey, OrderKey, OrderPolicy, PaddedKey, SortKey};
pub use pair_grouper::Pair;
pub use transcoder::{AudioConverter, ConvertReport, FfmpegTranscoder, Transcoder};
