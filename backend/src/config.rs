//! Application Configuration
//!
//! Paths for the database and log files, overridable from the environment.

use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "KANBAN_DB_PATH";
pub const ENV_LOG_DIR: &str = "KANBAN_LOG_DIR";
pub const ENV_APP_NAME: &str = "KANBAN_APP_NAME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file, or `:memory:`
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    /// Prefix of log file names
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            db_path: data_dir.join("kanban.db"),
            log_dir: data_dir.join("logs"),
            app_name: "Kanban".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `KANBAN_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns; blank values are ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::default();
        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(name) = get(ENV_APP_NAME) {
            config.app_name = name;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.db_path, PathBuf::from("data").join("kanban.db"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DB_PATH, ":memory:"),
            (ENV_LOG_DIR, "/tmp/kanban-logs"),
            (ENV_APP_NAME, "  "),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from(":memory:"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/kanban-logs"));
        assert_eq!(config.app_name, "Kanban");
    }
}
