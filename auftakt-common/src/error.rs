//! Common error types for Auftakt tools

use thiserror::Error;

/// Common result type for Auftakt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Auftakt tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invariant broken inside a tool (e.g. a walked path outside its root)
    #[error("Internal error: {0}")]
    Internal(String),
}
