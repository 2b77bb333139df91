//! Board Store
//!
//! The client's local copy of one board. Every mutation bumps `version`, which
//! lets a late reconciliation outcome tell whether the state it would restore
//! is still the state it replaced.

use crate::models::{Board, BoardDetail, ColumnDetail, Task, TaskDetail};
use crate::ordering::sort_scope;

#[derive(Debug, Clone, PartialEq)]
pub struct BoardStore {
    board: Board,
    columns: Vec<ColumnDetail>,
    version: u64,
    needs_refresh: bool,
}

/// Pre-gesture copy of the scopes a move touches
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeSnapshot {
    /// Column sequence of the board, as `(id, order)`
    Columns(Vec<(String, i32)>),
    /// Task lists of the touched columns
    Tasks(Vec<(String, Vec<TaskDetail>)>),
}

/// Result of rolling back a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    /// The snapshot was put back
    Restored,
    /// The store changed after the gesture; the snapshot was dropped and the
    /// store flagged for refresh
    Superseded,
}

impl BoardStore {
    /// Build from a backend view, sorting every level into rendering order
    pub fn from_detail(detail: BoardDetail) -> Self {
        let mut store = Self {
            board: detail.board,
            columns: detail.columns,
            version: 0,
            needs_refresh: false,
        };
        store.normalize();
        store
    }

    /// Replace the whole state with a fresh backend view
    pub fn replace(&mut self, detail: BoardDetail) {
        self.board = detail.board;
        self.columns = detail.columns;
        self.normalize();
        self.needs_refresh = false;
        self.bump();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_id(&self) -> &str {
        &self.board.id
    }

    pub fn columns(&self) -> &[ColumnDetail] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnDetail> {
        self.columns.iter().find(|c| c.column.id == column_id)
    }

    pub fn tasks(&self, column_id: &str) -> Option<&[TaskDetail]> {
        self.column(column_id).map(|c| c.tasks.as_slice())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Local state may differ from the backend; reload before trusting it
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<ColumnDetail> {
        &mut self.columns
    }

    pub(crate) fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column.id == column_id)
    }

    pub(crate) fn bump(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    fn normalize(&mut self) {
        sort_scope(&mut self.columns);
        for column in &mut self.columns {
            sort_scope(&mut column.tasks);
            for task in &mut column.tasks {
                task.subtasks
                    .sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
            }
        }
    }

    // ========================
    // Snapshot / Rollback
    // ========================

    pub(crate) fn snapshot_columns(&self) -> ScopeSnapshot {
        ScopeSnapshot::Columns(
            self.columns
                .iter()
                .map(|c| (c.column.id.clone(), c.column.order))
                .collect(),
        )
    }

    /// Unknown column IDs are skipped
    pub(crate) fn snapshot_tasks(&self, column_ids: &[&str]) -> ScopeSnapshot {
        let mut scopes: Vec<(String, Vec<TaskDetail>)> = Vec::new();
        for id in column_ids {
            if scopes.iter().any(|(seen, _)| seen == id) {
                continue;
            }
            if let Some(column) = self.column(id) {
                scopes.push((column.column.id.clone(), column.tasks.clone()));
            }
        }
        ScopeSnapshot::Tasks(scopes)
    }

    /// Put `snapshot` back if the store is still at `expected_version`
    pub(crate) fn roll_back(&mut self, snapshot: ScopeSnapshot, expected_version: u64) -> Restored {
        if self.version != expected_version {
            self.needs_refresh = true;
            return Restored::Superseded;
        }

        match snapshot {
            ScopeSnapshot::Columns(sequence) => {
                let mut remaining = std::mem::take(&mut self.columns);
                for (id, order) in sequence {
                    if let Some(pos) = remaining.iter().position(|c| c.column.id == id) {
                        let mut column = remaining.remove(pos);
                        column.column.order = order;
                        self.columns.push(column);
                    }
                }
                self.columns.extend(remaining);
            }
            ScopeSnapshot::Tasks(scopes) => {
                for (column_id, tasks) in scopes {
                    if let Some(column) = self.columns.iter_mut().find(|c| c.column.id == column_id) {
                        column.tasks = tasks;
                    }
                }
            }
        }
        self.bump();
        Restored::Restored
    }

    // ========================
    // Store Helper Functions
    // ========================

    /// Remove a column by ID; siblings keep their orders
    pub fn store_remove_column(&mut self, column_id: &str) {
        self.columns.retain(|c| c.column.id != column_id);
        self.bump();
    }

    /// Add a task created by the backend to its column
    pub fn store_add_task(&mut self, task: Task) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.column.id == task.column_id) {
            column.tasks.push(TaskDetail {
                task,
                subtasks: Vec::new(),
            });
            sort_scope(&mut column.tasks);
            self.bump();
        }
    }

    /// Update a task's details in place; its position is not touched
    pub fn store_update_task(&mut self, updated: Task) {
        let found = self
            .columns
            .iter_mut()
            .flat_map(|c| c.tasks.iter_mut())
            .find(|t| t.task.id == updated.id);
        if let Some(detail) = found {
            detail.task.title = updated.title;
            detail.task.description = updated.description;
            detail.task.due_date = updated.due_date;
            detail.task.updated_at = updated.updated_at;
            self.bump();
        }
    }

    /// Remove a task by ID; siblings keep their orders
    pub fn store_remove_task(&mut self, task_id: &str) {
        for column in &mut self.columns {
            column.tasks.retain(|t| t.task.id != task_id);
        }
        self.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{board, task};

    fn task_ids(store: &BoardStore, column_id: &str) -> Vec<String> {
        store.tasks(column_id).unwrap().iter().map(|t| t.task.id.clone()).collect()
    }

    #[test]
    fn test_from_detail_sorts_every_level() {
        let mut detail = board(&[("C1", &["T1", "T2"]), ("C2", &[])]);
        detail.columns.reverse();
        detail.columns[1].tasks.reverse();

        let store = BoardStore::from_detail(detail);
        let columns: Vec<&str> = store.columns().iter().map(|c| c.column.id.as_str()).collect();
        assert_eq!(columns, vec!["C1", "C2"]);
        assert_eq!(task_ids(&store, "C1"), vec!["T1", "T2"]);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_roll_back_restores_task_scopes() {
        let mut store = BoardStore::from_detail(board(&[("C1", &["T1", "T2"]), ("C2", &["T4"])]));
        let snapshot = store.snapshot_tasks(&["C1", "C2", "C1"]);

        store.columns_mut()[0].tasks.clear();
        let version = store.bump();

        assert_eq!(store.roll_back(snapshot, version), Restored::Restored);
        assert_eq!(task_ids(&store, "C1"), vec!["T1", "T2"]);
        assert_eq!(store.version(), version + 1);
    }

    #[test]
    fn test_roll_back_restores_column_sequence() {
        let mut store = BoardStore::from_detail(board(&[("C1", &[]), ("C2", &[]), ("C3", &[])]));
        let snapshot = store.snapshot_columns();

        let moved = store.columns_mut().remove(0);
        store.columns_mut().push(moved);
        let version = store.bump();

        store.roll_back(snapshot, version);
        let sequence: Vec<(&str, i32)> = store
            .columns()
            .iter()
            .map(|c| (c.column.id.as_str(), c.column.order))
            .collect();
        assert_eq!(sequence, vec![("C1", 0), ("C2", 1), ("C3", 2)]);
    }

    #[test]
    fn test_stale_roll_back_flags_refresh() {
        let mut store = BoardStore::from_detail(board(&[("C1", &["T1"])]));
        let snapshot = store.snapshot_tasks(&["C1"]);
        let version = store.bump();

        // A newer local change lands before the outcome
        store.store_add_task(task("T9", "C1", 1, 0).task);

        assert_eq!(store.roll_back(snapshot, version), Restored::Superseded);
        assert!(store.needs_refresh());
        assert_eq!(task_ids(&store, "C1"), vec!["T1", "T9"]);

        store.replace(board(&[("C1", &["T1"])]));
        assert!(!store.needs_refresh());
    }

    #[test]
    fn test_store_helpers() {
        let mut store = BoardStore::from_detail(board(&[("C1", &["T1", "T2"])]));

        let mut renamed = store.tasks("C1").unwrap()[1].task.clone();
        renamed.title = "Renamed".to_string();
        renamed.order = 99;
        store.store_update_task(renamed);
        let t2 = &store.tasks("C1").unwrap()[1].task;
        assert_eq!((t2.title.as_str(), t2.order), ("Renamed", 1));

        store.store_remove_task("T1");
        assert_eq!(task_ids(&store, "C1"), vec!["T2"]);
        // Gap is kept
        assert_eq!(store.tasks("C1").unwrap()[0].task.order, 1);

        store.store_remove_column("C1");
        assert!(store.columns().is_empty());
    }
}
