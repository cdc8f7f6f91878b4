//! Error types for codecity

use thiserror::Error;

/// Main error type for the crate.
///
/// Only the I/O boundary (snapshot and config loading) can fail; everything
/// derived from a loaded snapshot is infallible.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Config error: {0}")]
    Config(String),
}
