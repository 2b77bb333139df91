//! Kanban Backend
//!
//! Layered architecture:
//! - domain: Core entities, the ordering model and business rules
//! - repository: Data access abstractions and SQLite implementations
//! - commands: Command handlers, including reorder reconciliation

use std::path::Path;

pub mod domain;
pub mod repository;
pub mod commands;
pub mod events;
pub mod config;

use config::AppConfig;
use domain::DomainResult;
use events::BoardEvents;
use repository::{init_db, BoardRepository, ColumnRepository, DbState, SubtaskRepository, TaskRepository};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub boards: BoardRepository,
    pub columns: ColumnRepository,
    pub tasks: TaskRepository,
    pub subtasks: SubtaskRepository,
    pub events: BoardEvents,
}

impl AppState {
    /// Repositories over the state's connection
    pub fn new(db_state: DbState) -> Self {
        Self {
            boards: BoardRepository::new(db_state.shared()),
            columns: ColumnRepository::new(db_state.shared()),
            tasks: TaskRepository::new(db_state.shared()),
            subtasks: SubtaskRepository::new(db_state.shared()),
            events: BoardEvents::new(),
            db_state,
        }
    }
}

/// Open the database and build the state, without touching logging
pub async fn open_state(db_path: &Path) -> DomainResult<AppState> {
    let db_state = init_db(db_path).await?;
    Ok(AppState::new(db_state))
}

/// Initialize logging, then the database
///
/// A logger that cannot be installed is reported and otherwise ignored.
pub async fn bootstrap(config: &AppConfig) -> DomainResult<AppState> {
    if let Err(e) = rolling_logger::init_logger(config.log_dir.clone(), &config.app_name) {
        eprintln!("Failed to init rolling logger: {}", e);
    }

    match open_state(&config.db_path).await {
        Ok(state) => {
            let _ = rolling_logger::info(&format!("Database ready at {}", config.db_path.display()));
            Ok(state)
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("DB init failed: {}", e));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_bootstrap_with_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("kanban.db"),
            log_dir: dir.path().join("logs"),
            app_name: "KanbanTest".to_string(),
        };

        let state = bootstrap(&config).await.unwrap();
        assert!(state.db_state.is_initialized().await);
        assert!(config.db_path.exists());
    }

    #[tokio::test]
    async fn test_open_state_in_memory() {
        let state = open_state(&PathBuf::from(":memory:")).await.unwrap();
        assert!(state.boards.list_by_user("nobody").await.unwrap().is_empty());

        state.db_state.close().await;
        assert!(!state.db_state.is_initialized().await);
    }
}
