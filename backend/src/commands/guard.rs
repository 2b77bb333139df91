//! Ownership Guard
//!
//! Every mutation is preceded by these two checks.

use crate::domain::{DomainError, DomainResult};
use crate::repository::OwnershipGuard;

/// The acting principal, or `Unauthorized` when the identity provider gave none
///
/// IDs are used exactly as issued; blank or padded IDs are refused.
pub fn require_principal(principal: Option<&str>) -> DomainResult<&str> {
    match principal {
        Some(user_id) if !user_id.is_empty() && user_id.trim() == user_id => Ok(user_id),
        Some(_) => Err(DomainError::Unauthorized("Malformed principal".to_string())),
        None => Err(DomainError::Unauthorized("No authenticated principal".to_string())),
    }
}

/// `Unauthorized` unless `user_id` owns `board_id`
///
/// A board that does not exist is reported the same way as a foreign one.
pub async fn authorize_board(guard: &dyn OwnershipGuard, user_id: &str, board_id: &str) -> DomainResult<()> {
    if guard.owns_board(user_id, board_id).await? {
        Ok(())
    } else {
        log::warn!("Principal {} denied access to board {}", user_id, board_id);
        Err(DomainError::Unauthorized(format!("Board {} is not accessible", board_id)))
    }
}
