//! Repository Layer - Core Traits
//!
//! Abstract interfaces for data access. The SQLite repositories implement them.

use async_trait::async_trait;

use crate::domain::{DomainResult, Entity};

/// Core repository trait for CRUD operations
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert a new entity
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<T>>;

    /// Update an existing entity; `NotFound` if it no longer exists
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID (children cascade); `NotFound` if it no longer exists
    async fn delete(&self, id: &str) -> DomainResult<()>;
}

/// Confirms that a principal owns a board before anything under it is touched
#[async_trait]
pub trait OwnershipGuard: Send + Sync {
    async fn owns_board(&self, user_id: &str, board_id: &str) -> DomainResult<bool>;
}
