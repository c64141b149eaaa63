//! Schemas for the corpus and user datastores.
//!
//! ## Migration System
//!
//! The user datastore uses version-gated migrations. Each migration:
//! 1. Checks if the current schema version is less than the target version
//! 2. Runs its SQL inside a transaction
//! 3. Records the new version in the `db_version` table
//!
//! Existing user data is never dropped; new columns or tables arrive as new
//! migrations.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

/// Current schema version for the user datastore
/// Increment this when adding a new migration
pub const USER_DB_VERSION: i32 = 2;

/// Initialize the user datastore schema with version-gated migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS db_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL,
            description TEXT
        );
        "#,
    )?;

    let current_version = get_schema_version(conn)?;
    tracing::debug!("user db schema version: {}", current_version);

    if current_version < 1 {
        migrate_v0_to_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v1_to_v2(conn)?;
    }

    Ok(())
}

/// v0→v1: preferences, sessions, progress, notes
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v0→v1: Create user tables");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS user_preferences (
            question_id INTEGER PRIMARY KEY,
            status TEXT NOT NULL CHECK (status IN ('favorite', 'hidden'))
        );

        CREATE TABLE IF NOT EXISTS sessions (
            session_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            creation_date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session_progress (
            session_id INTEGER NOT NULL,
            question_id INTEGER NOT NULL,
            completed_at TEXT,
            PRIMARY KEY (session_id, question_id),
            FOREIGN KEY (session_id) REFERENCES sessions(session_id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id INTEGER NOT NULL,
            question_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (session_id) REFERENCES sessions(session_id) ON DELETE CASCADE
        );
        "#,
    )?;
    record_version(&tx, 1, "Create user tables (preferences, sessions, progress, notes)")?;
    tx.commit()
}

/// v1→v2: lookup indexes
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1→v2: Add lookup indexes");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_user_preferences_status ON user_preferences(status);
        CREATE INDEX IF NOT EXISTS idx_session_progress_session ON session_progress(session_id);
        CREATE INDEX IF NOT EXISTS idx_notes_session_question ON notes(session_id, question_id);
        "#,
    )?;
    record_version(&tx, 2, "Add lookup indexes")?;
    tx.commit()
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        params![version, Utc::now().to_rfc3339(), description],
    )?;
    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM db_version", [], |row| row.get(0))
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

/// Create the corpus table. Used when building a corpus file; the app itself
/// only ever opens the corpus read-only.
pub fn init_corpus_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            question_id INTEGER PRIMARY KEY,
            question_text TEXT NOT NULL,
            pack TEXT NOT NULL DEFAULT '',
            version_added TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT ''
        );
        "#,
    )
}

/// Check that an opened corpus has the expected table
pub fn verify_corpus(conn: &Connection) -> Result<()> {
    conn.query_row(
        "SELECT question_id, question_text, pack, version_added, tags FROM questions LIMIT 1",
        [],
        |_| Ok(()),
    )
    .optional()?;
    Ok(())
}
