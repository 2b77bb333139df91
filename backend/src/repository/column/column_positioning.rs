//! Column Positioning Operations
//!
//! Positions of columns within their board.

use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::super::board_repo::conflict_or_store;
use super::super::db::not_initialized;
use super::column_repo::{column_board_id, columns_of};
use crate::domain::{next_order, now_millis, repack, Column, DomainError, DomainResult, OrderUpdate};

/// Trait for column positioning operations
#[async_trait]
pub trait ColumnPositioningOperations {
    /// Insert a column at the end of its board
    async fn append(&self, column: &Column) -> DomainResult<Column>;

    /// Apply a validated update set in one transaction, then repack the board
    ///
    /// Every column must already belong to `board_id`.
    async fn apply_column_order(&self, board_id: &str, updates: &[OrderUpdate]) -> DomainResult<()>;
}

#[async_trait]
impl ColumnPositioningOperations for super::column_repo::ColumnRepository {
    async fn append(&self, column: &Column) -> DomainResult<Column> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let mut created = column.clone();
        created.order = next_position_in(&tx, &column.board_id)?;
        tx.execute(
            "INSERT INTO board_columns (id, board_id, title, position, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                created.id,
                created.board_id,
                created.title,
                created.order,
                created.created_at,
                created.updated_at
            ],
        )
        .map_err(|e| conflict_or_store(e, &created.id))?;

        tx.commit()?;
        Ok(created)
    }

    async fn apply_column_order(&self, board_id: &str, updates: &[OrderUpdate]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        // Scope checks first, so a bad tuple fails before any write
        for update in updates {
            match column_board_id(&tx, &update.id)? {
                None => return Err(DomainError::NotFound(format!("Column {} not found", update.id))),
                Some(owner) if owner != board_id => {
                    return Err(DomainError::Unauthorized(format!(
                        "Column {} does not belong to board {}",
                        update.id, board_id
                    )))
                }
                Some(_) => {}
            }
        }

        let now = now_millis();
        for update in updates {
            tx.execute(
                "UPDATE board_columns SET position = ?, updated_at = ? WHERE id = ? AND board_id = ?",
                params![update.order, now, update.id, board_id],
            )?;
        }

        reindex_columns_in(&tx, board_id)?;
        tx.commit()?;
        Ok(())
    }
}

/// Next free position on a board (`max + 1`, or 0)
fn next_position_in(conn: &Connection, board_id: &str) -> DomainResult<i32> {
    Ok(next_order(&columns_of(conn, board_id)?))
}

/// Renumber a board's columns to `0..n` in rendering order
///
/// Returns the number of rows whose position changed.
pub(crate) fn reindex_columns_in(conn: &Connection, board_id: &str) -> DomainResult<usize> {
    let mut columns = columns_of(conn, board_id)?;
    let changed = repack(&mut columns);

    let now = now_millis();
    for idx in &changed {
        let column = &columns[*idx];
        conn.execute(
            "UPDATE board_columns SET position = ?, updated_at = ? WHERE id = ?",
            params![column.order, now, column.id],
        )?;
    }
    Ok(changed.len())
}
