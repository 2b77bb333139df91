//! Task Positioning Operations
//!
//! Positions of tasks within their column, including moves between columns.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::super::board_repo::conflict_or_store;
use super::super::column::column_board_id;
use super::super::db::not_initialized;
use super::task_repo::{format_date, tasks_of};
use crate::domain::{next_order, now_millis, repack, DomainError, DomainResult, OrderUpdate, Task};

/// Trait for task positioning operations
#[async_trait]
pub trait TaskPositioningOperations {
    /// Insert a task at the end of its column
    async fn append(&self, task: &Task) -> DomainResult<Task>;

    /// Apply a validated update set in one transaction
    ///
    /// Every task and every target column must be on `board_id`. A tuple
    /// without `parent_id` keeps the task's current column. Both the source
    /// and destination columns of every tuple are repacked before commit.
    /// Returns the touched column IDs.
    async fn apply_task_order(&self, board_id: &str, updates: &[OrderUpdate]) -> DomainResult<Vec<String>>;
}

#[async_trait]
impl TaskPositioningOperations for super::task_repo::TaskRepository {
    async fn append(&self, task: &Task) -> DomainResult<Task> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let mut created = task.clone();
        created.order = next_position_in(&tx, &task.column_id)?;
        tx.execute(
            "INSERT INTO tasks (id, column_id, title, description, due_date, position, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                created.id,
                created.column_id,
                created.title,
                created.description,
                format_date(created.due_date),
                created.order,
                created.created_at,
                created.updated_at
            ],
        )
        .map_err(|e| conflict_or_store(e, &created.id))?;

        tx.commit()?;
        Ok(created)
    }

    async fn apply_task_order(&self, board_id: &str, updates: &[OrderUpdate]) -> DomainResult<Vec<String>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let mut touched = BTreeSet::new();
        let mut resolved = Vec::with_capacity(updates.len());

        // Resolve and check the scope chain of every tuple before writing
        for update in updates {
            let current = tx
                .query_row(
                    "SELECT t.column_id, c.board_id FROM tasks t JOIN board_columns c ON c.id = t.column_id WHERE t.id = ?",
                    params![update.id],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;

            let (current_column, current_board) =
                current.ok_or_else(|| DomainError::NotFound(format!("Task {} not found", update.id)))?;
            if current_board != board_id {
                return Err(DomainError::Unauthorized(format!(
                    "Task {} does not belong to board {}",
                    update.id, board_id
                )));
            }

            let target_column = update.parent_id.clone().unwrap_or_else(|| current_column.clone());
            if target_column != current_column {
                match column_board_id(&tx, &target_column)? {
                    None => {
                        return Err(DomainError::NotFound(format!("Column {} not found", target_column)))
                    }
                    Some(owner) if owner != board_id => {
                        return Err(DomainError::Unauthorized(format!(
                            "Column {} does not belong to board {}",
                            target_column, board_id
                        )))
                    }
                    Some(_) => {}
                }
            }

            touched.insert(current_column);
            touched.insert(target_column.clone());
            resolved.push((update.id.clone(), update.order, target_column));
        }

        ensure_unique_orders(&resolved)?;

        let now = now_millis();
        for (id, order, column_id) in &resolved {
            tx.execute(
                "UPDATE tasks SET column_id = ?, position = ?, updated_at = ? WHERE id = ?",
                params![column_id, order, now, id],
            )?;
        }

        for column_id in &touched {
            reindex_tasks_in(&tx, column_id)?;
        }

        tx.commit()?;
        Ok(touched.into_iter().collect())
    }
}

/// Two tuples may not claim the same order in the same destination column
fn ensure_unique_orders(resolved: &[(String, i64, String)]) -> DomainResult<()> {
    let mut seen: HashMap<&str, HashSet<i64>> = HashMap::new();
    for (_, order, column_id) in resolved {
        if !seen.entry(column_id.as_str()).or_default().insert(*order) {
            return Err(DomainError::Validation(format!(
                "Duplicate order {} in column {}",
                order, column_id
            )));
        }
    }
    Ok(())
}

/// Next free position in a column (`max + 1`, or 0)
fn next_position_in(conn: &Connection, column_id: &str) -> DomainResult<i32> {
    Ok(next_order(&tasks_of(conn, column_id)?))
}

/// Renumber a column's tasks to `0..n` in rendering order
///
/// Returns the number of rows whose position changed.
pub(crate) fn reindex_tasks_in(conn: &Connection, column_id: &str) -> DomainResult<usize> {
    let mut tasks = tasks_of(conn, column_id)?;
    let changed = repack(&mut tasks);

    let now = now_millis();
    for idx in &changed {
        let task = &tasks[*idx];
        conn.execute(
            "UPDATE tasks SET position = ?, updated_at = ? WHERE id = ?",
            params![task.order, now, task.id],
        )?;
    }
    Ok(changed.len())
}
