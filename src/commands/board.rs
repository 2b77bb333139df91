//! Board Commands

use std::time::Duration;

use super::BoardBackend;
use crate::error::ClientError;
use crate::models::BoardDetail;

pub async fn fetch_board<B>(backend: &B, board_id: &str, limit: Duration) -> Result<BoardDetail, ClientError>
where
    B: BoardBackend + ?Sized,
{
    match tokio::time::timeout(limit, backend.get_board(board_id)).await {
        Ok(result) => result.map_err(ClientError::Transport),
        Err(_) => Err(ClientError::Timeout),
    }
}
