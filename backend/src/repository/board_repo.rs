//! Board Repository
//!
//! SQLite-backed boards, the ownership check, and the nested board view.

use std::collections::HashMap;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use super::column::row_to_column;
use super::db::{not_initialized, SharedConnection};
use super::subtask_repo::row_to_subtask;
use super::task::row_to_task;
use super::traits::{OwnershipGuard, Repository};
use crate::domain::{Board, BoardDetail, ColumnDetail, DomainError, DomainResult, TaskDetail};

const BOARD_FIELDS: &str = "id, user_id, title, created_at, updated_at";

/// SQLite implementation of Board repository
pub struct BoardRepository {
    pub(super) conn: SharedConnection,
}

impl BoardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Boards owned by a user, newest first
    pub async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM boards WHERE user_id = ? ORDER BY created_at DESC, id",
            BOARD_FIELDS
        ))?;
        let mut rows = stmt.query(params![user_id])?;

        let mut boards = Vec::new();
        while let Some(row) = rows.next()? {
            boards.push(row_to_board(row)?);
        }
        Ok(boards)
    }

    /// Board with columns, tasks and subtasks, each level in rendering order
    pub async fn load_detail(&self, board_id: &str) -> DomainResult<BoardDetail> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let board = conn
            .query_row(
                &format!("SELECT {} FROM boards WHERE id = ?", BOARD_FIELDS),
                params![board_id],
                |row| Ok(row_to_board(row)),
            )
            .optional()?
            .transpose()?
            .ok_or_else(|| DomainError::NotFound(format!("Board {} not found", board_id)))?;

        // Subtasks grouped by task, oldest first
        let mut subtasks_by_task: HashMap<String, Vec<_>> = HashMap::new();
        {
            let mut stmt = conn.prepare(
                "SELECT s.id, s.task_id, s.title, s.done, s.created_at
                 FROM subtasks s
                 JOIN tasks t ON t.id = s.task_id
                 JOIN board_columns c ON c.id = t.column_id
                 WHERE c.board_id = ?
                 ORDER BY s.created_at, s.id",
            )?;
            let mut rows = stmt.query(params![board_id])?;
            while let Some(row) = rows.next()? {
                let subtask = row_to_subtask(row)?;
                subtasks_by_task.entry(subtask.task_id.clone()).or_default().push(subtask);
            }
        }

        // Tasks grouped by column, in order
        let mut tasks_by_column: HashMap<String, Vec<TaskDetail>> = HashMap::new();
        {
            let mut stmt = conn.prepare(
                "SELECT t.id, t.column_id, t.title, t.description, t.due_date, t.position, t.created_at, t.updated_at
                 FROM tasks t
                 JOIN board_columns c ON c.id = t.column_id
                 WHERE c.board_id = ?
                 ORDER BY t.position, t.created_at, t.id",
            )?;
            let mut rows = stmt.query(params![board_id])?;
            while let Some(row) = rows.next()? {
                let task = row_to_task(row)?;
                let subtasks = subtasks_by_task.remove(&task.id).unwrap_or_default();
                tasks_by_column
                    .entry(task.column_id.clone())
                    .or_default()
                    .push(TaskDetail { task, subtasks });
            }
        }

        let mut columns = Vec::new();
        {
            let mut stmt = conn.prepare(
                "SELECT id, board_id, title, position, created_at, updated_at
                 FROM board_columns WHERE board_id = ?
                 ORDER BY position, created_at, id",
            )?;
            let mut rows = stmt.query(params![board_id])?;
            while let Some(row) = rows.next()? {
                let column = row_to_column(row)?;
                let tasks = tasks_by_column.remove(&column.id).unwrap_or_default();
                columns.push(ColumnDetail { column, tasks });
            }
        }

        Ok(BoardDetail { board, columns })
    }
}

#[async_trait]
impl Repository<Board> for BoardRepository {
    async fn create(&self, entity: &Board) -> DomainResult<Board> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO boards (id, user_id, title, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![entity.id, entity.user_id, entity.title, entity.created_at, entity.updated_at],
        )
        .map_err(|e| conflict_or_store(e, &entity.id))?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!("SELECT {} FROM boards WHERE id = ?", BOARD_FIELDS),
            params![id],
            |row| Ok(row_to_board(row)),
        )
        .optional()?
        .transpose()
    }

    async fn update(&self, entity: &Board) -> DomainResult<Board> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE boards SET title = ?, updated_at = ? WHERE id = ?",
            params![entity.title, entity.updated_at, entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Board {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Columns, tasks and subtasks cascade
        let changed = conn.execute("DELETE FROM boards WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Board {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl OwnershipGuard for BoardRepository {
    async fn owns_board(&self, user_id: &str, board_id: &str) -> DomainResult<bool> {
        let board = self.find_by_id(board_id).await?;
        Ok(board.map(|b| b.is_owned_by(user_id)).unwrap_or(false))
    }
}

/// Primary-key clashes surface as `Conflict`, everything else as a store error
pub(crate) fn conflict_or_store(e: rusqlite::Error, id: &str) -> DomainError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            DomainError::Conflict(format!("Record {} already exists", id))
        }
        _ => DomainError::from(e),
    }
}

/// Convert a database row to Board
pub(crate) fn row_to_board(row: &Row) -> DomainResult<Board> {
    Ok(Board {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
