//! Optimistic Reorder Engine
//!
//! Applies a drag-and-drop move to the local store right away and derives the
//! update set the backend must persist for the move to stick.

use crate::error::GestureError;
use crate::models::{OrderUpdate, ScopeKind};
use crate::ordering::{repack, Ordered};
use crate::store::{BoardStore, ScopeSnapshot};

/// A drop of `item_id` from one position to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveGesture {
    pub item_id: String,
    pub source_scope_id: String,
    pub source_index: usize,
    pub dest_scope_id: String,
    pub dest_index: usize,
}

impl MoveGesture {
    /// Dropped back where it was picked up
    pub fn is_noop(&self) -> bool {
        self.source_scope_id == self.dest_scope_id && self.source_index == self.dest_index
    }

    fn is_within_scope(&self) -> bool {
        self.source_scope_id == self.dest_scope_id
    }
}

/// A mutation already applied to the store, with what is needed to confirm or undo it
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMove {
    pub kind: ScopeKind,
    pub updates: Vec<OrderUpdate>,
    pub(crate) snapshot: ScopeSnapshot,
    /// Store version right after the mutation
    pub(crate) version: u64,
}

/// Move an entry within one list
pub fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Move an entry from one list into another
pub fn move_across<T>(source: &mut Vec<T>, from: usize, dest: &mut Vec<T>, to: usize) {
    let item = source.remove(from);
    dest.insert(to, item);
}

/// Reorder the board's columns; the board is the only column scope
pub fn apply_column_move(store: &mut BoardStore, gesture: &MoveGesture) -> Result<Option<AppliedMove>, GestureError> {
    let board_id = store.board_id().to_string();
    for scope in [&gesture.source_scope_id, &gesture.dest_scope_id] {
        if *scope != board_id {
            return Err(GestureError::UnknownScope(scope.clone()));
        }
    }

    check_source(store.columns(), gesture)?;
    check_destination(store.columns().len() - 1, gesture.dest_index)?;
    if gesture.is_noop() {
        return Ok(None);
    }

    let snapshot = store.snapshot_columns();
    let columns = store.columns_mut();
    move_within(columns, gesture.source_index, gesture.dest_index);
    repack(columns);

    let updates = columns
        .iter()
        .map(|c| OrderUpdate {
            id: c.column.id.clone(),
            order: c.column.order as i64,
            parent_id: Some(board_id.clone()),
        })
        .collect();
    let version = store.bump();

    Ok(Some(AppliedMove {
        kind: ScopeKind::Columns,
        updates,
        snapshot,
        version,
    }))
}

/// Reorder tasks within a column or move one into another column
pub fn apply_task_move(store: &mut BoardStore, gesture: &MoveGesture) -> Result<Option<AppliedMove>, GestureError> {
    let source = store
        .column_index(&gesture.source_scope_id)
        .ok_or_else(|| GestureError::UnknownScope(gesture.source_scope_id.clone()))?;
    let dest = store
        .column_index(&gesture.dest_scope_id)
        .ok_or_else(|| GestureError::UnknownScope(gesture.dest_scope_id.clone()))?;

    let source_tasks = &store.columns()[source].tasks;
    check_source(source_tasks, gesture)?;
    let dest_len = store.columns()[dest].tasks.len();
    let max_index = if gesture.is_within_scope() { dest_len - 1 } else { dest_len };
    check_destination(max_index, gesture.dest_index)?;
    if gesture.is_noop() {
        return Ok(None);
    }

    let snapshot = store.snapshot_tasks(&[gesture.source_scope_id.as_str(), gesture.dest_scope_id.as_str()]);
    let columns = store.columns_mut();

    let mut updates = Vec::new();
    if source == dest {
        let tasks = &mut columns[source].tasks;
        move_within(tasks, gesture.source_index, gesture.dest_index);
        repack(tasks);
    } else {
        let mut moved = columns[source].tasks.remove(gesture.source_index);
        repack(&mut columns[source].tasks);
        updates.extend(task_updates(&columns[source].tasks, &gesture.source_scope_id));

        moved.task.column_id = gesture.dest_scope_id.clone();
        let tasks = &mut columns[dest].tasks;
        tasks.insert(gesture.dest_index, moved);
        repack(tasks);
    }
    updates.extend(task_updates(&columns[dest].tasks, &gesture.dest_scope_id));
    let version = store.bump();

    Ok(Some(AppliedMove {
        kind: ScopeKind::Tasks,
        updates,
        snapshot,
        version,
    }))
}

fn task_updates<T: Ordered>(tasks: &[T], column_id: &str) -> Vec<OrderUpdate> {
    tasks
        .iter()
        .map(|t| OrderUpdate {
            id: t.id().to_string(),
            order: t.order() as i64,
            parent_id: Some(column_id.to_string()),
        })
        .collect()
}

fn check_source<T: Ordered>(items: &[T], gesture: &MoveGesture) -> Result<(), GestureError> {
    let item = items.get(gesture.source_index).ok_or(GestureError::SourceOutOfRange {
        index: gesture.source_index,
        len: items.len(),
    })?;
    if item.id() != gesture.item_id {
        return Err(GestureError::ItemMismatch {
            expected: gesture.item_id.clone(),
            found: item.id().to_string(),
        });
    }
    Ok(())
}

fn check_destination(max_index: usize, index: usize) -> Result<(), GestureError> {
    if index > max_index {
        return Err(GestureError::DestinationOutOfRange {
            index,
            len: max_index + 1,
        });
    }
    Ok(())
}
