//! Error types for the frame transport.

use thiserror::Error;

/// Result type for frame transport operations.
pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors that can occur while mounting or talking to the rich media frame.
#[derive(Error, Debug)]
pub enum FrameError {
    /// Configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Base URL has no tuple origin to compare message origins against.
    #[error("base URL has an opaque origin: {0}")]
    OpaqueOrigin(String),

    /// The iframe element has no content window to verify sources against.
    #[error("frame element is not attached to a document")]
    Detached,

    /// Outgoing message could not be serialized.
    #[error("failed to serialize outgoing message: {0}")]
    Serialize(#[from] serde_json::Error),
}
