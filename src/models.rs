//! Client Models
//!
//! Data structures matching backend entities and the reorder wire format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Board data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Column data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub done: bool,
    pub created_at: i64,
}

/// Nested board as returned by `get_board`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    #[serde(default)]
    pub columns: Vec<ColumnDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDetail {
    #[serde(flatten)]
    pub column: Column,
    #[serde(default)]
    pub tasks: Vec<TaskDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Which sibling ordering a gesture or update set addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// Columns of a board
    Columns,
    /// Tasks of a column
    Tasks,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Columns => "columns",
            ScopeKind::Tasks => "tasks",
        }
    }
}

// ========================
// Reorder Wire Format
// ========================

/// One `{id, order, parentId}` tuple of an update set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub id: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub root_aggregate_id: String,
    pub updates: Vec<OrderUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderResponse {
    pub ok: bool,
    #[serde(default)]
    pub reason: Option<FailureReason>,
}

/// Why the backend refused an update set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Unauthorized,
    NotFound,
    Validation,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_board_detail_from_backend_json() {
        let raw = json!({
            "id": "b1", "userId": "u1", "title": "Roadmap", "createdAt": 1, "updatedAt": 2,
            "columns": [{
                "id": "c1", "boardId": "b1", "title": "Todo", "order": 0, "createdAt": 1, "updatedAt": 1,
                "tasks": [{
                    "id": "t1", "columnId": "c1", "title": "Ship", "description": null,
                    "dueDate": "2025-01-31", "order": 0, "createdAt": 1, "updatedAt": 1,
                    "subtasks": []
                }]
            }]
        });

        let detail: BoardDetail = serde_json::from_value(raw).unwrap();
        assert_eq!(detail.board.user_id, "u1");
        let task = &detail.columns[0].tasks[0].task;
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_reorder_wire_format() {
        let request = ReorderRequest {
            root_aggregate_id: "b1".to_string(),
            updates: vec![
                OrderUpdate { id: "t1".to_string(), order: 1, parent_id: Some("c2".to_string()) },
                OrderUpdate { id: "c1".to_string(), order: 0, parent_id: None },
            ],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "rootAggregateId": "b1",
                "updates": [
                    { "id": "t1", "order": 1, "parentId": "c2" },
                    { "id": "c1", "order": 0 }
                ]
            })
        );

        let failure: ReorderResponse = serde_json::from_value(json!({ "ok": false, "reason": "not_found" })).unwrap();
        assert_eq!(failure.reason, Some(FailureReason::NotFound));
        let success: ReorderResponse = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert!(success.ok && success.reason.is_none());
    }
}
