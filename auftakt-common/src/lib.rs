//! # Auftakt Common Library
//!
//! Shared code for the Auftakt session tools including:
//! - Error and result types
//! - Configuration loading and resolution
//! - Identifier generation
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use config::{AuftaktConfig, ConfigResolver, LoggingConfig};
pub use error::{Error, Result};
pub use uuid_utils::{IdSource, RandomIds, SequentialIds};
