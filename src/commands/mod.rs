//! Backend Command Wrappers
//!
//! Client bindings to backend commands. The transport is abstracted behind
//! [`BoardBackend`]; each wrapper bounds the call with a timeout and turns
//! the answer into a [`ClientError`](crate::error::ClientError).

mod board;
mod order;

use async_trait::async_trait;

use crate::models::{BoardDetail, ReorderRequest, ReorderResponse};

pub use board::fetch_board;
pub use order::submit_reorder;

/// Backend commands the client depends on
///
/// Errors are plain messages, as returned over IPC.
#[async_trait]
pub trait BoardBackend: Send + Sync {
    async fn get_board(&self, board_id: &str) -> Result<BoardDetail, String>;

    async fn update_column_order(&self, request: &ReorderRequest) -> Result<ReorderResponse, String>;

    async fn update_task_order(&self, request: &ReorderRequest) -> Result<ReorderResponse, String>;
}
