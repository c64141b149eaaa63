//! Default data file locations.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! Explicit per-file overrides live in [`crate::config`].

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// Read-only question corpus
pub fn corpus_db_path() -> String {
    format!("{}/corpus.db", data_dir())
}

/// Writable user datastore (preferences, sessions, progress, notes)
pub fn user_db_path() -> String {
    format!("{}/user.db", data_dir())
}

/// Bundled seed copied to the user datastore location on first run
pub fn user_seed_path() -> String {
    format!("{}/user_seed.db", data_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    // DATA_DIR is read once through OnceLock, so only the default layout is checked.

    #[test]
    fn test_data_dir_default() {
        assert!(!data_dir().is_empty());
    }

    #[test]
    fn test_paths_share_data_dir() {
        for path in [corpus_db_path(), user_db_path(), user_seed_path()] {
            assert!(path.starts_with(data_dir()));
        }
    }

    #[test]
    fn test_file_names() {
        assert!(corpus_db_path().ends_with("/corpus.db"));
        assert!(user_db_path().ends_with("/user.db"));
        assert!(user_seed_path().ends_with("/user_seed.db"));
    }
}
