//! Column Entity
//!
//! Ordered within its board.

use serde::{Deserialize, Serialize};

use super::entity::{new_id, now_millis, DomainError, DomainResult, Entity};
use super::ordering::OrderedItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub board_id: String,
    pub title: String,
    /// Position among the board's columns
    pub order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Column {
    pub fn new(board_id: &str, title: &str, order: i32) -> DomainResult<Self> {
        let now = now_millis();
        Ok(Self {
            id: new_id(),
            board_id: board_id.to_string(),
            title: validate_title(title)?,
            order,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn rename(&mut self, title: &str) -> DomainResult<()> {
        self.title = validate_title(title)?;
        self.updated_at = now_millis();
        Ok(())
    }
}

/// Trimmed, non-empty title (shared by columns, tasks and subtasks)
pub(crate) fn validate_title(title: &str) -> DomainResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("Title cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

impl Entity for Column {
    fn id(&self) -> &str {
        &self.id
    }
}

impl OrderedItem for Column {
    fn item_id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}
