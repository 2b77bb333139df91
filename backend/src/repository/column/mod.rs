//! Column Repository Module
//!
//! - column_repo: Core CRUD operations and scope lookups
//! - column_positioning: Position management and atomic reorder

mod column_repo;
mod column_positioning;

pub use column_repo::ColumnRepository;
pub use column_positioning::ColumnPositioningOperations;

pub(crate) use column_repo::{column_board_id, row_to_column};
