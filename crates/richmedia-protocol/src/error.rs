//! Rejection reasons for inbound payloads.

use thiserror::Error;

/// Why an inbound payload could not be read as an [`crate::IncomingMessage`].
///
/// These never escape the validator as failures; they only feed the warning
/// emitted when a malformed payload is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Payload is not a JSON object (includes `null`).
    #[error("payload is not an object")]
    NotAnObject,

    /// `type` is missing or not a string.
    #[error("missing or non-string `type` field")]
    MissingType,

    /// `type` is a string outside the known message set.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// `richMediaEvent` carried a value outside the event table.
    #[error("invalid ad event value: {0}")]
    InvalidAdEvent(String),

    /// A query message carried a missing or falsy value.
    #[error("missing or empty `value` for {0}")]
    MissingValue(&'static str),
}
