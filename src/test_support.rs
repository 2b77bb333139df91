//! Fixtures for unit tests

use crate::models::{Board, BoardDetail, Column, ColumnDetail, Task, TaskDetail};

pub const BOARD_ID: &str = "B1";

pub fn task(id: &str, column_id: &str, order: i32, created_at: i64) -> TaskDetail {
    TaskDetail {
        task: Task {
            id: id.to_string(),
            column_id: column_id.to_string(),
            title: id.to_string(),
            description: None,
            due_date: None,
            order,
            created_at,
            updated_at: created_at,
        },
        subtasks: Vec::new(),
    }
}

pub fn column(id: &str, order: i32, task_ids: &[&str]) -> ColumnDetail {
    ColumnDetail {
        column: Column {
            id: id.to_string(),
            board_id: BOARD_ID.to_string(),
            title: id.to_string(),
            order,
            created_at: 0,
            updated_at: 0,
        },
        tasks: task_ids
            .iter()
            .enumerate()
            .map(|(i, t)| task(t, id, i as i32, 0))
            .collect(),
    }
}

/// Board `B1` with densely ordered columns and tasks, IDs doubling as titles
pub fn board(layout: &[(&str, &[&str])]) -> BoardDetail {
    BoardDetail {
        board: Board {
            id: BOARD_ID.to_string(),
            user_id: "user_1".to_string(),
            title: "Roadmap".to_string(),
            created_at: 0,
            updated_at: 0,
        },
        columns: layout
            .iter()
            .enumerate()
            .map(|(i, (id, tasks))| column(id, i as i32, tasks))
            .collect(),
    }
}
