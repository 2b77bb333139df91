//! Client Errors

use crate::models::FailureReason;

/// A move gesture that does not match the local state; nothing was mutated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    #[error("Unknown scope {0}")]
    UnknownScope(String),
    #[error("Source index {index} out of range for a scope of {len}")]
    SourceOutOfRange { index: usize, len: usize },
    #[error("Destination index {index} out of range for a scope of {len}")]
    DestinationOutOfRange { index: usize, len: usize },
    #[error("Expected {expected} at the source index, found {found}")]
    ItemMismatch { expected: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Gesture(#[from] GestureError),
    /// The backend answered `{ ok: false }`
    #[error("Rejected by backend: {0:?}")]
    Rejected(FailureReason),
    #[error("Backend did not answer in time")]
    Timeout,
    #[error("Transport error: {0}")]
    Transport(String),
    /// A gesture is still awaiting its outcome
    #[error("A reorder is already in flight")]
    Busy,
}
