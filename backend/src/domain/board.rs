//! Board Entity
//!
//! The root aggregate. Ownership of a board grants access to everything under it.

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::entity::{new_id, now_millis, DomainError, DomainResult, Entity};
use super::subtask::Subtask;
use super::task::Task;

const MIN_TITLE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    /// Owning principal
    pub user_id: String,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Board {
    pub fn new(user_id: &str, title: &str) -> DomainResult<Self> {
        let now = now_millis();
        Ok(Self {
            id: new_id(),
            user_id: user_id.to_string(),
            title: Self::validate_title(title)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Trimmed title, at least three characters
    pub fn validate_title(title: &str) -> DomainResult<String> {
        let trimmed = title.trim();
        if trimmed.chars().count() < MIN_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "Board title must be at least {} characters",
                MIN_TITLE_LEN
            )));
        }
        Ok(trimmed.to_string())
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl Entity for Board {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A board with its columns, tasks and subtasks, each level in rendering order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<ColumnDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDetail {
    #[serde(flatten)]
    pub column: Column,
    pub tasks: Vec<TaskDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub subtasks: Vec<Subtask>,
}
