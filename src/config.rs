//! Application configuration.
//!
//! Values resolve with priority: config.toml > environment (.env) > defaults
//! from [`crate::paths`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paths;

// ==================== Deck Limits ====================

/// Reserved id of the "no questions available" placeholder
pub const PLACEHOLDER_QUESTION_ID: i64 = 0;

/// Text shown by the placeholder question
pub const PLACEHOLDER_TEXT: &str = "No questions available";

/// Session names are trimmed then truncated to this many characters
pub const SESSION_NAME_MAX_CHARS: usize = 20;

/// Maximum note length accepted at the UI edge
pub const NOTE_MAX_CHARS: usize = 350;

// ==================== Server Defaults ====================

/// Server address to bind to (local UI binding only)
pub const SERVER_ADDR: &str = "127.0.0.1";

/// Server port
pub const SERVER_PORT: u16 = 3000;

// ==================== Config File ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    database: Option<DatabaseSection>,
    server: Option<ServerSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    corpus_path: Option<String>,
    user_path: Option<String>,
    user_seed_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub corpus_db_path: PathBuf,
    pub user_db_path: PathBuf,
    pub user_seed_path: PathBuf,
    pub server_addr: String,
    pub server_port: u16,
}

impl AppConfig {
    /// Load from `config.toml` in the working directory, `.env` and process environment.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let file = match std::fs::read_to_string("config.toml") {
            Ok(contents) => parse_config_file(&contents),
            Err(_) => ConfigFile::default(),
        };

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    fn resolve(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let db = file.database.unwrap_or_default();
        let server = file.server.unwrap_or_default();

        let corpus_db_path = pick_path("corpus database", db.corpus_path, env("CORPUS_DB_PATH"), paths::corpus_db_path());
        let user_db_path = pick_path("user database", db.user_path, env("USER_DB_PATH"), paths::user_db_path());
        let user_seed_path = pick_path("user seed", db.user_seed_path, env("USER_SEED_PATH"), paths::user_seed_path());

        let server_port = server
            .port
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(SERVER_PORT);

        Self {
            corpus_db_path,
            user_db_path,
            user_seed_path,
            server_addr: server.addr.unwrap_or_else(|| SERVER_ADDR.to_string()),
            server_port,
        }
    }

    /// Full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

fn parse_config_file(contents: &str) -> ConfigFile {
    match toml::from_str::<ConfigFile>(contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring malformed config.toml: {}", e);
            ConfigFile::default()
        }
    }
}

fn pick_path(label: &str, from_file: Option<String>, from_env: Option<String>, default: String) -> PathBuf {
    if let Some(path) = from_file {
        tracing::info!("Using {} from config.toml: {}", label, path);
        return PathBuf::from(path);
    }
    if let Some(path) = from_env {
        tracing::info!("Using {} from environment: {}", label, path);
        return PathBuf::from(path);
    }
    tracing::debug!("Using default {} path: {}", label, Path::new(&default).display());
    PathBuf::from(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_when_nothing_configured() {
        let config = AppConfig::resolve(ConfigFile::default(), no_env);
        assert!(config.corpus_db_path.ends_with("corpus.db"));
        assert!(config.user_db_path.ends_with("user.db"));
        assert!(config.user_seed_path.ends_with("user_seed.db"));
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_config_file_beats_environment() {
        let file = parse_config_file(
            r#"
            [database]
            corpus_path = "/srv/deck/corpus.db"

            [server]
            port = 4100
            "#,
        );
        let env = |key: &str| match key {
            "CORPUS_DB_PATH" => Some("/env/corpus.db".to_string()),
            "USER_DB_PATH" => Some("/env/user.db".to_string()),
            "PORT" => Some("5000".to_string()),
            _ => None,
        };

        let config = AppConfig::resolve(file, env);
        assert_eq!(config.corpus_db_path, PathBuf::from("/srv/deck/corpus.db"));
        assert_eq!(config.user_db_path, PathBuf::from("/env/user.db"));
        assert_eq!(config.server_port, 4100);
    }

    #[test]
    fn test_bad_port_falls_back_to_default() {
        let env = |key: &str| (key == "PORT").then(|| "not-a-port".to_string());
        let config = AppConfig::resolve(ConfigFile::default(), env);
        assert_eq!(config.server_port, SERVER_PORT);
    }

    #[test]
    fn test_malformed_config_file_is_ignored() {
        let file = parse_config_file("[database\ncorpus_path = 3");
        assert!(file.database.is_none());
    }
}
