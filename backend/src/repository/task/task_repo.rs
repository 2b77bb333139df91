//! Task Repository - Core CRUD Operations

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::super::db::{not_initialized, SharedConnection};
use super::super::traits::Repository;
use super::task_positioning::TaskPositioningOperations;
use crate::domain::{DomainError, DomainResult, Task};

const TASK_FIELDS: &str = "t.id, t.column_id, t.title, t.description, t.due_date, t.position, t.created_at, t.updated_at";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite implementation of Task repository
pub struct TaskRepository {
    pub(super) conn: SharedConnection,
}

impl TaskRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Tasks of a column in rendering order
    pub async fn list_by_column(&self, column_id: &str) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        tasks_of(conn, column_id)
    }

    /// Task only if its column is on the given board
    pub async fn find_in_board(&self, task_id: &str, board_id: &str) -> DomainResult<Option<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!(
                "SELECT {} FROM tasks t JOIN board_columns c ON c.id = t.column_id WHERE t.id = ? AND c.board_id = ?",
                TASK_FIELDS
            ),
            params![task_id, board_id],
            |row| Ok(row_to_task(row)),
        )
        .optional()?
        .transpose()
    }
}

#[async_trait]
impl Repository<Task> for TaskRepository {
    /// Always appends; the caller's `order` is ignored
    async fn create(&self, entity: &Task) -> DomainResult<Task> {
        self.append(entity).await
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!("SELECT {} FROM tasks t WHERE t.id = ?", TASK_FIELDS),
            params![id],
            |row| Ok(row_to_task(row)),
        )
        .optional()?
        .transpose()
    }

    /// Updates details only; column and position go through the positioning operations
    async fn update(&self, entity: &Task) -> DomainResult<Task> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE tasks SET title = ?, description = ?, due_date = ?, updated_at = ? WHERE id = ?",
            params![
                entity.title,
                entity.description,
                format_date(entity.due_date),
                entity.updated_at,
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Task {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    /// Subtasks cascade; sibling positions are left as they are
    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute("DELETE FROM tasks WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Task {} not found", id)));
        }
        Ok(())
    }
}

/// Tasks of a column in rendering order
pub(super) fn tasks_of(conn: &Connection, column_id: &str) -> DomainResult<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM tasks t WHERE t.column_id = ? ORDER BY t.position, t.created_at, t.id",
        TASK_FIELDS
    ))?;
    let mut rows = stmt.query(params![column_id])?;

    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(row_to_task(row)?);
    }
    Ok(tasks)
}

pub(super) fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Convert a database row to Task
pub(crate) fn row_to_task(row: &Row) -> DomainResult<Task> {
    let due_date = match row.get::<_, Option<String>>(4)? {
        Some(raw) => Some(
            NaiveDate::parse_from_str(&raw, DATE_FORMAT)
                .map_err(|e| DomainError::Store(format!("Bad due date {:?}: {}", raw, e)))?,
        ),
        None => None,
    };

    Ok(Task {
        id: row.get(0)?,
        column_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        due_date,
        order: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
