//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Connection shared by all repositories; `None` until initialized or after close
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Store(e.to_string())
    }
}

pub(crate) fn not_initialized() -> DomainError {
    DomainError::Store("Database not initialized".to_string())
}

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub db_path: PathBuf,
}

impl DbState {
    /// Empty state; the connection is installed by [`init_db`]
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            db_path,
        }
    }

    /// Handle for repositories
    pub fn shared(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; repositories fail with a store error afterwards
    pub async fn close(&self) {
        let mut guard = self.conn.lock().await;
        if guard.take().is_some() {
            log::info!("Database connection closed: {}", self.db_path.display());
        }
    }
}

/// Open (or create) the database at `db_path` and run migrations
///
/// `":memory:"` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path == Path::new(":memory:") {
        Connection::open_in_memory()?
    } else {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DomainError::Store(format!("Failed to create db dir: {}", e)))?;
            }
        }
        Connection::open(db_path)?
    };

    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    run_migrations(&conn)?;

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);

    log::info!("Database initialized: {}", db_path.display());
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS boards (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS board_columns (
            id TEXT PRIMARY KEY,
            board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            column_id TEXT NOT NULL REFERENCES board_columns(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS subtasks (
            id TEXT PRIMARY KEY,
            task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            done INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );",
    )?;

    // Task details were added after the first schema
    if !column_exists(conn, "tasks", "description")? {
        conn.execute("ALTER TABLE tasks ADD COLUMN description TEXT", [])?;
    }
    if !column_exists(conn, "tasks", "due_date")? {
        conn.execute("ALTER TABLE tasks ADD COLUMN due_date TEXT", [])?;
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_boards_user ON boards(user_id);
        CREATE INDEX IF NOT EXISTS idx_columns_board ON board_columns(board_id, position);
        CREATE INDEX IF NOT EXISTS idx_tasks_column ON tasks(column_id, position);
        CREATE INDEX IF NOT EXISTS idx_subtasks_task ON subtasks(task_id);",
    )?;

    Ok(())
}
