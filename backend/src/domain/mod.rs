//! Domain Layer
//!
//! Board entities, the ordering model and the error taxonomy.
//! No storage concerns here; only serde, uuid and chrono.

mod entity;
mod board;
mod column;
mod task;
mod subtask;
mod ordering;

pub use entity::{new_id, now_millis, parse_id, DomainError, DomainResult, Entity, FailureReason};
pub use board::{Board, BoardDetail, ColumnDetail, TaskDetail};
pub use column::Column;
pub use task::{Task, TaskPatch};
pub use subtask::Subtask;
pub use ordering::{
    is_dense, next_order, repack, sort_scope, validate_update_set, OrderUpdate, OrderedItem, ScopeKind,
};
