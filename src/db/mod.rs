pub mod notes;
pub mod preferences;
pub mod progress;
pub mod questions;
pub mod schema;
pub mod sessions;
pub mod stores;

use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;

pub use schema::run_migrations;
pub use stores::{
    PreferenceStore, ProgressStore, QuestionStore, SqlitePreferenceStore, SqliteProgressStore,
    SqliteQuestionStore, Stores, UnavailableQuestionStore,
};

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, StoreError> {
    pool.lock().map_err(|_: PoisonError<_>| {
        tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
        StoreError::Unavailable
    })
}

/// Open the question corpus read-only.
pub fn open_corpus(path: &Path) -> Result<DbPool, StoreError> {
    if !path.exists() {
        tracing::error!("Corpus database not found at {}", path.display());
        return Err(StoreError::Unavailable);
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    schema::verify_corpus(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Provision the user datastore and open it.
///
/// On first run (no file at `path`) the bundled seed at `seed` is copied into
/// place, if one exists. Migrations then bring either file up to date.
pub fn provision_user_db(path: &Path, seed: Option<&Path>) -> Result<DbPool, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        match seed {
            Some(seed) if seed.exists() => {
                tracing::info!("Copying user seed {} to {}", seed.display(), path.display());
                std::fs::copy(seed, path)?;
            }
            _ => tracing::info!("No user seed found, creating empty user database"),
        }
    }

    let conn = Connection::open(path)?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Provision the user datastore, falling back to an in-memory one when the
/// file cannot be created or opened. Data written to the fallback is lost on exit.
pub fn provision_user_db_or_in_memory(path: &Path, seed: Option<&Path>) -> Result<DbPool, StoreError> {
    match provision_user_db(path, seed) {
        Ok(pool) => Ok(pool),
        Err(e) => {
            tracing::error!(
                "User database unavailable at {} ({}), using an in-memory store",
                path.display(),
                e
            );
            let conn = Connection::open_in_memory()?;
            run_migrations(&conn)?;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }
}
