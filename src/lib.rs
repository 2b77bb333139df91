//! Board Client
//!
//! Local copy of a kanban board with optimistic drag-and-drop reordering:
//! - models: Data structures matching backend entities
//! - store: The ordered local state and its snapshots
//! - reorder: Gesture application and update-set derivation
//! - reconcile: The per-gesture state machine and the backend-bound client
//! - commands: Backend command wrappers

pub mod commands;
pub mod error;
pub mod models;
pub mod ordering;
pub mod reconcile;
pub mod reorder;
pub mod store;

#[cfg(test)]
mod test_support;

pub use commands::BoardBackend;
pub use error::{ClientError, GestureError};
pub use models::{
    Board, BoardDetail, Column, ColumnDetail, FailureReason, OrderUpdate, ReorderRequest, ReorderResponse, ScopeKind,
    Subtask, Task, TaskDetail,
};
pub use reconcile::{BoardClient, ClientConfig, ReorderOutcome, ReorderPhase, ReorderSession};
pub use reorder::{AppliedMove, MoveGesture};
pub use store::{BoardStore, Restored};
