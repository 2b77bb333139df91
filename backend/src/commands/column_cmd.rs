//! Commands for Column CRUD

use super::guard::{authorize_board, require_principal};
use super::respond;
use crate::domain::{parse_id, Column, DomainError, DomainResult};
use crate::repository::{ColumnPositioningOperations, Repository};
use crate::AppState;

/// Append a column to the end of a board
pub async fn create_column(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    title: &str,
) -> Result<Column, String> {
    respond("create_column", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        let column = Column::new(&board_id, title, 0)?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        let column = state.columns.append(&column).await?;
        state.events.board_changed(&board_id);
        Ok(column)
    })
    .await
}

/// Rename a column
pub async fn update_column_title(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    column_id: &str,
    title: &str,
) -> Result<Column, String> {
    respond("update_column_title", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        let column_id = parse_id(column_id, "column")?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        let mut column = owned_column(state, &column_id, &board_id).await?;
        column.rename(title)?;
        let column = state.columns.update(&column).await?;
        state.events.board_changed(&board_id);
        Ok(column)
    })
    .await
}

/// Delete a column and its tasks; sibling positions are left as they are
pub async fn delete_column(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    column_id: &str,
) -> Result<(), String> {
    respond("delete_column", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        let column_id = parse_id(column_id, "column")?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        owned_column(state, &column_id, &board_id).await?;
        state.columns.delete(&column_id).await?;
        state.events.board_changed(&board_id);
        Ok(())
    })
    .await
}

async fn owned_column(state: &AppState, column_id: &str, board_id: &str) -> DomainResult<Column> {
    state
        .columns
        .find_in_board(column_id, board_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Column {} not found on board {}", column_id, board_id)))
}
