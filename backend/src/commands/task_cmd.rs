//! Commands for Task CRUD

use super::guard::{authorize_board, require_principal};
use super::respond;
use crate::domain::{parse_id, DomainError, DomainResult, Task, TaskPatch};
use crate::repository::{Repository, TaskPositioningOperations};
use crate::AppState;

/// Append a task to the end of a column
pub async fn create_task(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    column_id: &str,
    title: &str,
) -> Result<Task, String> {
    respond("create_task", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        let column_id = parse_id(column_id, "column")?;
        let task = Task::new(&column_id, title, 0)?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        if state.columns.find_in_board(&column_id, &board_id).await?.is_none() {
            return Err(DomainError::NotFound(format!(
                "Column {} not found on board {}",
                column_id, board_id
            )));
        }

        let task = state.tasks.append(&task).await?;
        state.events.board_changed(&board_id);
        Ok(task)
    })
    .await
}

/// Edit title, description or due date; an empty patch changes nothing
pub async fn update_task(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    task_id: &str,
    patch: TaskPatch,
) -> Result<Task, String> {
    respond("update_task", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        let task_id = parse_id(task_id, "task")?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        let mut task = owned_task(state, &task_id, &board_id).await?;
        if patch.is_empty() {
            return Ok(task);
        }

        patch.apply(&mut task)?;
        let task = state.tasks.update(&task).await?;
        state.events.board_changed(&board_id);
        Ok(task)
    })
    .await
}

/// Delete a task and its subtasks
pub async fn delete_task(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    task_id: &str,
) -> Result<(), String> {
    respond("delete_task", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        let task_id = parse_id(task_id, "task")?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        owned_task(state, &task_id, &board_id).await?;
        state.tasks.delete(&task_id).await?;
        state.events.board_changed(&board_id);
        Ok(())
    })
    .await
}

pub(crate) async fn owned_task(state: &AppState, task_id: &str, board_id: &str) -> DomainResult<Task> {
    state
        .tasks
        .find_in_board(task_id, board_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Task {} not found on board {}", task_id, board_id)))
}
