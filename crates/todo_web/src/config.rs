//! Configuration management for the todo web service
//!
//! Supports loading configuration from environment variables with fallback to defaults.

use std::path::PathBuf;

use todo_session::DEFAULT_SESSION_CAPACITY;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4567;
pub const DEFAULT_WORKER_COUNT: usize = 4;
pub const DEFAULT_SESSION_COOKIE: &str = "todo_session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Directory for file-backed sessions; `None` keeps sessions in memory
    pub session_dir: Option<PathBuf>,
    /// Most sessions kept in memory when `session_dir` is unset
    pub session_capacity: usize,
    /// Name of the cookie carrying the session id
    pub session_cookie: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKER_COUNT,
            session_dir: None,
            session_capacity: DEFAULT_SESSION_CAPACITY,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load ServerConfig from environment variables
    ///
    /// Environment variables:
    /// - `TODO_HOST`: Bind address (default: 127.0.0.1)
    /// - `TODO_PORT`: Bind port (default: 4567)
    /// - `TODO_WORKERS`: actix worker threads (default: 4)
    /// - `TODO_SESSION_DIR`: Store sessions as JSON files in this directory (default: in memory)
    /// - `TODO_SESSION_CAPACITY`: In-memory session limit, least recently used evicted first (default: 10000)
    /// - `TODO_SESSION_COOKIE`: Session cookie name (default: todo_session)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("TODO_HOST")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.host),
            port: lookup("TODO_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            workers: lookup("TODO_WORKERS")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.workers),
            session_dir: lookup("TODO_SESSION_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            session_capacity: lookup("TODO_SESSION_CAPACITY")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.session_capacity),
            session_cookie: lookup("TODO_SESSION_COOKIE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.session_cookie),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_server_config_has_sensible_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:4567");
        assert!(config.workers > 0);
        assert!(config.session_dir.is_none());
    }

    #[test]
    fn test_server_config_reads_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TODO_HOST", "0.0.0.0"),
            ("TODO_PORT", "8080"),
            ("TODO_WORKERS", "2"),
            ("TODO_SESSION_DIR", "/tmp/todo-sessions"),
            ("TODO_SESSION_COOKIE", "sid"),
            ("TODO_SESSION_CAPACITY", "250"),
        ]);
        let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.workers, 2);
        assert_eq!(config.session_dir, Some(PathBuf::from("/tmp/todo-sessions")));
        assert_eq!(config.session_cookie, "sid");
        assert_eq!(config.session_capacity, 250);
    }

    #[test]
    fn test_server_config_ignores_bad_values() {
        let config = ServerConfig::from_lookup(|key| match key {
            "TODO_PORT" => Some("not-a-port".to_string()),
            "TODO_WORKERS" => Some("0".to_string()),
            "TODO_SESSION_CAPACITY" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.workers, DEFAULT_WORKER_COUNT);
        assert_eq!(config.session_capacity, DEFAULT_SESSION_CAPACITY);
    }
}
