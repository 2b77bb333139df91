//! Domain Layer - Core Entity Trait and Errors
//!
//! Every entity has an opaque, immutable string ID (UUID v4).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// Returns the entity's unique identifier
    fn id(&self) -> &str;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
///
/// Each variant maps to one wire-level failure reason, see [`DomainError::reason`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    /// Malformed input, rejected before any write
    #[error("Invalid input: {0}")]
    Validation(String),
    /// Missing principal, or the principal does not own the scope chain
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Backing store failure; the surrounding transaction was rolled back
    #[error("Store error: {0}")]
    Store(String),
}

/// Failure reason reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Unauthorized,
    NotFound,
    Validation,
    Internal,
}

impl DomainError {
    pub fn reason(&self) -> FailureReason {
        match self {
            DomainError::Validation(_) => FailureReason::Validation,
            DomainError::Unauthorized(_) => FailureReason::Unauthorized,
            DomainError::NotFound(_) => FailureReason::NotFound,
            DomainError::Conflict(_) | DomainError::Store(_) => FailureReason::Internal,
        }
    }

    /// Whether resubmitting the same request unchanged may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Store(_))
    }
}

/// Generate a fresh entity ID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Validate an incoming ID and return it in canonical form
pub fn parse_id(raw: &str, what: &str) -> DomainResult<String> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| DomainError::Validation(format!("Invalid {} ID: {:?}", what, raw)))
}

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
