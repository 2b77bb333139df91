//! Subtask Entity
//!
//! Checklist entry of a task. Not reorderable; rendered by creation time.

use serde::{Deserialize, Serialize};

use super::column::validate_title;
use super::entity::{new_id, now_millis, DomainResult, Entity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub done: bool,
    pub created_at: i64,
}

impl Subtask {
    pub fn new(task_id: &str, title: &str) -> DomainResult<Self> {
        Ok(Self {
            id: new_id(),
            task_id: task_id.to_string(),
            title: validate_title(title)?,
            done: false,
            created_at: now_millis(),
        })
    }
}

impl Entity for Subtask {
    fn id(&self) -> &str {
        &self.id
    }
}
