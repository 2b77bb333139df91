//! Commands for Board CRUD
//!
//! Boards are always listed and loaded for their owner only.

use super::guard::{authorize_board, require_principal};
use super::respond;
use crate::domain::{parse_id, Board, BoardDetail};
use crate::repository::Repository;
use crate::AppState;

/// Create a new board owned by the principal
pub async fn create_board(state: &AppState, principal: Option<&str>, title: &str) -> Result<Board, String> {
    respond("create_board", async {
        let user_id = require_principal(principal)?;
        let board = state.boards.create(&Board::new(user_id, title)?).await?;

        log::info!("Board {} created by {}", board.id, user_id);
        state.events.boards_list_changed(user_id);
        Ok(board)
    })
    .await
}

/// List the principal's boards, newest first
pub async fn list_boards(state: &AppState, principal: Option<&str>) -> Result<Vec<Board>, String> {
    respond("list_boards", async {
        let user_id = require_principal(principal)?;
        state.boards.list_by_user(user_id).await
    })
    .await
}

/// Board with its columns, tasks and subtasks in rendering order
pub async fn get_board(state: &AppState, principal: Option<&str>, board_id: &str) -> Result<BoardDetail, String> {
    respond("get_board", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        authorize_board(&state.boards, user_id, &board_id).await?;
        state.boards.load_detail(&board_id).await
    })
    .await
}

/// Delete a board and everything under it
pub async fn delete_board(state: &AppState, principal: Option<&str>, board_id: &str) -> Result<(), String> {
    respond("delete_board", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        authorize_board(&state.boards, user_id, &board_id).await?;
        state.boards.delete(&board_id).await?;

        log::info!("Board {} deleted by {}", board_id, user_id);
        state.events.board_changed(&board_id);
        state.events.boards_list_changed(user_id);
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{state, INTRUDER, OWNER};
    use crate::events::BoardEvent;

    #[tokio::test]
    async fn test_board_lifecycle() {
        let state = state().await;
        let mut events = state.events.subscribe();

        let board = create_board(&state, Some(OWNER), "  Roadmap ").await.unwrap();
        assert_eq!(board.title, "Roadmap");
        assert_eq!(board.user_id, OWNER);
        assert_eq!(
            events.recv().await.unwrap(),
            BoardEvent::BoardsListChanged { user_id: OWNER.to_string() }
        );

        let listed = list_boards(&state, Some(OWNER)).await.unwrap();
        assert_eq!(listed, vec![board.clone()]);
        assert!(list_boards(&state, Some(INTRUDER)).await.unwrap().is_empty());

        let detail = get_board(&state, Some(OWNER), &board.id).await.unwrap();
        assert_eq!(detail.board, board);
        assert!(detail.columns.is_empty());

        delete_board(&state, Some(OWNER), &board.id).await.unwrap();
        assert!(list_boards(&state, Some(OWNER)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_board_requires_principal_and_title() {
        let state = state().await;

        let err = create_board(&state, None, "Roadmap").await.unwrap_err();
        assert!(err.contains("Unauthorized"));

        let err = create_board(&state, Some(OWNER), "ab").await.unwrap_err();
        assert!(err.contains("Invalid input"));
    }

    #[tokio::test]
    async fn test_foreign_board_is_hidden() {
        let state = state().await;
        let board = create_board(&state, Some(OWNER), "Roadmap").await.unwrap();

        let err = get_board(&state, Some(INTRUDER), &board.id).await.unwrap_err();
        assert!(err.contains("Unauthorized"));

        let err = delete_board(&state, Some(INTRUDER), &board.id).await.unwrap_err();
        assert!(err.contains("Unauthorized"));
        assert!(get_board(&state, Some(OWNER), &board.id).await.is_ok());

        let err = get_board(&state, Some(OWNER), "not-a-uuid").await.unwrap_err();
        assert!(err.contains("Invalid input"));
    }
}
