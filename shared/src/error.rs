//! Error types for the intent-handler Lambda.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fulfilling a Lex intent event.
#[derive(Error, Debug)]
pub enum Error {
    /// Intent name the dispatcher has no handler for
    #[error("Intent with name {0} not supported")]
    UnsupportedIntent(String),

    /// Inbound event is missing a field the handlers rely on
    #[error("Malformed intent event: {0}")]
    MalformedEvent(String),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Recommendation artifact could not be decoded
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Inference endpoint returned an unusable response
    #[error("Inference error: {0}")]
    Inference(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
