//! Column Repository - Core CRUD Operations

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::super::db::{not_initialized, SharedConnection};
use super::super::traits::Repository;
use super::column_positioning::ColumnPositioningOperations;
use crate::domain::{Column, DomainError, DomainResult};

const COLUMN_FIELDS: &str = "id, board_id, title, position, created_at, updated_at";

/// SQLite implementation of Column repository
pub struct ColumnRepository {
    pub(super) conn: SharedConnection,
}

impl ColumnRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Columns of a board in rendering order
    pub async fn list_by_board(&self, board_id: &str) -> DomainResult<Vec<Column>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        columns_of(conn, board_id)
    }

    /// Column only if it belongs to the given board
    pub async fn find_in_board(&self, column_id: &str, board_id: &str) -> DomainResult<Option<Column>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!("SELECT {} FROM board_columns WHERE id = ? AND board_id = ?", COLUMN_FIELDS),
            params![column_id, board_id],
            |row| Ok(row_to_column(row)),
        )
        .optional()?
        .transpose()
    }
}

#[async_trait]
impl Repository<Column> for ColumnRepository {
    /// Always appends; the caller's `order` is ignored
    async fn create(&self, entity: &Column) -> DomainResult<Column> {
        self.append(entity).await
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Column>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!("SELECT {} FROM board_columns WHERE id = ?", COLUMN_FIELDS),
            params![id],
            |row| Ok(row_to_column(row)),
        )
        .optional()?
        .transpose()
    }

    /// Updates the title only; ordering goes through the positioning operations
    async fn update(&self, entity: &Column) -> DomainResult<Column> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE board_columns SET title = ?, updated_at = ? WHERE id = ?",
            params![entity.title, entity.updated_at, entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Column {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    /// Siblings keep their positions; the gap closes on the next reorder
    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute("DELETE FROM board_columns WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Column {} not found", id)));
        }
        Ok(())
    }
}

/// Columns of a board in rendering order
pub(super) fn columns_of(conn: &Connection, board_id: &str) -> DomainResult<Vec<Column>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM board_columns WHERE board_id = ? ORDER BY position, created_at, id",
        COLUMN_FIELDS
    ))?;
    let mut rows = stmt.query(params![board_id])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row_to_column(row)?);
    }
    Ok(columns)
}

/// Board a column belongs to, `None` if the column does not exist
pub(crate) fn column_board_id(conn: &Connection, column_id: &str) -> DomainResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT board_id FROM board_columns WHERE id = ?",
            params![column_id],
            |row| row.get(0),
        )
        .optional()?)
}

/// Convert a database row to Column
pub(crate) fn row_to_column(row: &Row) -> DomainResult<Column> {
    Ok(Column {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        order: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
