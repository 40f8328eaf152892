//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
///
/// Rule editing never fails; these cover persistence and parsing of
/// user-supplied tags only.
#[derive(Debug, Error)]
pub enum Error {
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persona tag not in the known set.
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    /// Language code not in the known set.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// No platform data directory could be determined.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
