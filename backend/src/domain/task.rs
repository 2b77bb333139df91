//! Task Entity
//!
//! Ordered within its column. Moving a task to another column changes
//! `column_id` and `order` together.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::column::validate_title;
use super::entity::{new_id, now_millis, DomainResult, Entity};
use super::ordering::OrderedItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Position within the column
    pub order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Task {
    pub fn new(column_id: &str, title: &str, order: i32) -> DomainResult<Self> {
        let now = now_millis();
        Ok(Self {
            id: new_id(),
            column_id: column_id.to_string(),
            title: validate_title(title)?,
            description: None,
            due_date: None,
            order,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Entity for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl OrderedItem for Task {
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

/// Partial task edit
///
/// `None` leaves a field unchanged. For the nullable fields, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }

    /// Apply the patch, validating the new title
    pub fn apply(&self, task: &mut Task) -> DomainResult<()> {
        if let Some(title) = &self.title {
            task.title = validate_title(title)?;
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        task.updated_at = now_millis();
        Ok(())
    }
}
