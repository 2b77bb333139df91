//! Reorder Commands

use std::time::Duration;

use super::BoardBackend;
use crate::error::ClientError;
use crate::models::{FailureReason, ReorderRequest, ScopeKind};

/// Send an update set and wait at most `limit` for the verdict
pub async fn submit_reorder<B>(
    backend: &B,
    kind: ScopeKind,
    request: &ReorderRequest,
    limit: Duration,
) -> Result<(), ClientError>
where
    B: BoardBackend + ?Sized,
{
    let call = async {
        match kind {
            ScopeKind::Columns => backend.update_column_order(request).await,
            ScopeKind::Tasks => backend.update_task_order(request).await,
        }
    };

    let response = match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(ClientError::Transport)?,
        Err(_) => return Err(ClientError::Timeout),
    };

    if response.ok {
        Ok(())
    } else {
        // A refusal without a reason is treated as a server fault
        Err(ClientError::Rejected(response.reason.unwrap_or(FailureReason::Internal)))
    }
}
