//! Test Helper Utilities
//!
//! Shared utilities for auftakt-cards integration tests

#![allow(dead_code)]

pub mod log_capture;
pub mod session_tree;

pub use log_capture::{capture_logs, LogCapture};
pub use session_tree::SessionTree;
