//! Subtask Repository
//!
//! SQLite-backed task checklists.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use super::board_repo::conflict_or_store;
use super::db::{not_initialized, SharedConnection};
use super::traits::Repository;
use crate::domain::{DomainError, DomainResult, Subtask};

/// SQLite implementation of Subtask repository
pub struct SubtaskRepository {
    conn: SharedConnection,
}

impl SubtaskRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Subtasks of a task, oldest first
    pub async fn list_by_task(&self, task_id: &str) -> DomainResult<Vec<Subtask>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(
            "SELECT id, task_id, title, done, created_at FROM subtasks WHERE task_id = ? ORDER BY created_at, id",
        )?;
        let mut rows = stmt.query(params![task_id])?;

        let mut subtasks = Vec::new();
        while let Some(row) = rows.next()? {
            subtasks.push(row_to_subtask(row)?);
        }
        Ok(subtasks)
    }

    /// Subtask only if the whole chain subtask -> task -> column -> board matches
    pub async fn find_in_chain(&self, subtask_id: &str, task_id: &str, board_id: &str) -> DomainResult<Option<Subtask>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            "SELECT s.id, s.task_id, s.title, s.done, s.created_at
             FROM subtasks s
             JOIN tasks t ON t.id = s.task_id
             JOIN board_columns c ON c.id = t.column_id
             WHERE s.id = ? AND s.task_id = ? AND c.board_id = ?",
            params![subtask_id, task_id, board_id],
            |row| Ok(row_to_subtask(row)),
        )
        .optional()?
        .transpose()
    }

    /// Set completion status
    pub async fn set_done(&self, id: &str, done: bool) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE subtasks SET done = ? WHERE id = ?",
            params![done, id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Subtask {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Subtask> for SubtaskRepository {
    async fn create(&self, entity: &Subtask) -> DomainResult<Subtask> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO subtasks (id, task_id, title, done, created_at) VALUES (?, ?, ?, ?, ?)",
            params![entity.id, entity.task_id, entity.title, entity.done, entity.created_at],
        )
        .map_err(|e| conflict_or_store(e, &entity.id))?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Subtask>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            "SELECT id, task_id, title, done, created_at FROM subtasks WHERE id = ?",
            params![id],
            |row| Ok(row_to_subtask(row)),
        )
        .optional()?
        .transpose()
    }

    async fn update(&self, entity: &Subtask) -> DomainResult<Subtask> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE subtasks SET title = ?, done = ? WHERE id = ?",
            params![entity.title, entity.done, entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Subtask {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute("DELETE FROM subtasks WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Subtask {} not found", id)));
        }
        Ok(())
    }
}

/// Convert a database row to Subtask
pub(crate) fn row_to_subtask(row: &Row) -> DomainResult<Subtask> {
    Ok(Subtask {
        id: row.get(0)?,
        task_id: row.get(1)?,
        title: row.get(2)?,
        done: row.get(3)?,
        created_at: row.get(4)?,
    })
}
