//! Error types for chatsift-core

use thiserror::Error;

/// Main error type for the chatsift-core library
///
/// Only fatal conditions live here. A malformed conversation inside an
/// otherwise valid archive is skipped by every analysis and never becomes an
/// `Error`; lookups that find nothing return `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Archive decoded but has the wrong top-level shape
    #[error("archive load error: {0}")]
    Load(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for chatsift-core
pub type Result<T> = std::result::Result<T, Error>;
