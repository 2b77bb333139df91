//! Commands Layer
//!
//! Command handlers that bridge the client to the repositories. Every handler
//! takes the acting principal as handed over by the identity provider.

use std::future::Future;

use crate::domain::DomainResult;

mod guard;
mod board_cmd;
mod column_cmd;
mod task_cmd;
mod subtask_cmd;
mod order_cmd;

pub use guard::{authorize_board, require_principal};
pub use board_cmd::*;
pub use column_cmd::*;
pub use task_cmd::*;
pub use subtask_cmd::*;
pub use order_cmd::*;

/// Run a command body and flatten its error to a message for the caller
pub(crate) async fn respond<T, F>(command: &str, body: F) -> Result<T, String>
where
    F: Future<Output = DomainResult<T>>,
{
    body.await.map_err(|e| {
        log::warn!("{} failed: {}", command, e);
        e.to_string()
    })
}
