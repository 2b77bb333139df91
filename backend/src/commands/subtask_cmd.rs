//! Commands for Subtask CRUD

use super::guard::{authorize_board, require_principal};
use super::respond;
use super::task_cmd::owned_task;
use crate::domain::{parse_id, DomainError, DomainResult, Subtask};
use crate::repository::Repository;
use crate::AppState;

/// Add a checklist entry to a task
pub async fn create_subtask(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    task_id: &str,
    title: &str,
) -> Result<Subtask, String> {
    respond("create_subtask", async {
        let user_id = require_principal(principal)?;
        let board_id = parse_id(board_id, "board")?;
        let task_id = parse_id(task_id, "task")?;
        let subtask = Subtask::new(&task_id, title)?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        owned_task(state, &task_id, &board_id).await?;
        let subtask = state.subtasks.create(&subtask).await?;
        state.events.board_changed(&board_id);
        Ok(subtask)
    })
    .await
}

/// Set a subtask's completion status
pub async fn toggle_subtask(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    task_id: &str,
    subtask_id: &str,
    done: bool,
) -> Result<Subtask, String> {
    respond("toggle_subtask", async {
        let user_id = require_principal(principal)?;
        let (board_id, task_id, subtask_id) = parse_chain(board_id, task_id, subtask_id)?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        let mut subtask = owned_subtask(state, &subtask_id, &task_id, &board_id).await?;
        if subtask.done != done {
            state.subtasks.set_done(&subtask_id, done).await?;
            subtask.done = done;
            state.events.board_changed(&board_id);
        }
        Ok(subtask)
    })
    .await
}

/// Remove a checklist entry
pub async fn delete_subtask(
    state: &AppState,
    principal: Option<&str>,
    board_id: &str,
    task_id: &str,
    subtask_id: &str,
) -> Result<(), String> {
    respond("delete_subtask", async {
        let user_id = require_principal(principal)?;
        let (board_id, task_id, subtask_id) = parse_chain(board_id, task_id, subtask_id)?;
        authorize_board(&state.boards, user_id, &board_id).await?;

        owned_subtask(state, &subtask_id, &task_id, &board_id).await?;
        state.subtasks.delete(&subtask_id).await?;
        state.events.board_changed(&board_id);
        Ok(())
    })
    .await
}

fn parse_chain(board_id: &str, task_id: &str, subtask_id: &str) -> DomainResult<(String, String, String)> {
    Ok((
        parse_id(board_id, "board")?,
        parse_id(task_id, "task")?,
        parse_id(subtask_id, "subtask")?,
    ))
}

async fn owned_subtask(state: &AppState, subtask_id: &str, task_id: &str, board_id: &str) -> DomainResult<Subtask> {
    state
        .subtasks
        .find_in_chain(subtask_id, task_id, board_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Subtask {} not found on task {}", subtask_id, task_id)))
}
