//! Repository Layer
//!
//! Data access abstractions and their SQLite implementations.

mod traits;
mod db;
mod board_repo;
mod column;
mod task;
mod subtask_repo;


pub use traits::{OwnershipGuard, Repository};
pub use db::{init_db, DbState, SharedConnection};
pub use board_repo::BoardRepository;
pub use column::{ColumnPositioningOperations, ColumnRepository};
pub use task::{TaskPositioningOperations, TaskRepository};
pub use subtask_repo::SubtaskRepository;
