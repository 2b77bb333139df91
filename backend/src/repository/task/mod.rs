//! Task Repository Module
//!
//! - task_repo: Core CRUD operations and scope lookups
//! - task_positioning: Position management and atomic cross-column reorder

mod task_repo;
mod task_positioning;

pub use task_repo::TaskRepository;
pub use task_positioning::TaskPositioningOperations;

pub(crate) use task_repo::row_to_task;
