//! Named sessions. Deleting a session removes its progress and notes.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::Session;
use crate::error::SessionError;
use crate::validation::normalize_session_name;

/// Create a session. The name is trimmed, truncated, and must be unused.
pub fn create_session(conn: &Connection, raw_name: &str) -> Result<Session, SessionError> {
    let name = normalize_session_name(raw_name)?;
    if session_name_exists(conn, &name, None)? {
        return Err(SessionError::DuplicateName(name));
    }

    let creation_date = Utc::now();
    conn.execute(
        "INSERT INTO sessions (name, creation_date) VALUES (?1, ?2)",
        params![name, creation_date.to_rfc3339()],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!("Created session {} '{}'", id, name);

    Ok(Session {
        id,
        name,
        creation_date,
    })
}

/// Rename a session under the same rules as creation
pub fn rename_session(conn: &Connection, session_id: i64, raw_name: &str) -> Result<Session, SessionError> {
    let name = normalize_session_name(raw_name)?;
    let existing = get_session(conn, session_id)?.ok_or(SessionError::NotFound(session_id))?;
    if session_name_exists(conn, &name, Some(session_id))? {
        return Err(SessionError::DuplicateName(name));
    }

    conn.execute(
        "UPDATE sessions SET name = ?1 WHERE session_id = ?2",
        params![name, session_id],
    )?;
    Ok(Session { name, ..existing })
}

pub fn get_session(conn: &Connection, session_id: i64) -> rusqlite::Result<Option<Session>> {
    conn.query_row(
        "SELECT session_id, name, creation_date FROM sessions WHERE session_id = ?1",
        params![session_id],
        row_to_session,
    )
    .optional()
}

/// All sessions, oldest first
pub fn list_sessions(conn: &Connection) -> rusqlite::Result<Vec<Session>> {
    let mut stmt = conn.prepare(
        "SELECT session_id, name, creation_date FROM sessions ORDER BY creation_date ASC, session_id ASC",
    )?;
    let sessions = stmt
        .query_map([], row_to_session)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sessions)
}

/// Delete a session together with its progress records and notes.
pub fn delete_session(conn: &Connection, session_id: i64) -> Result<(), SessionError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM notes WHERE session_id = ?1", params![session_id])?;
    tx.execute("DELETE FROM session_progress WHERE session_id = ?1", params![session_id])?;
    let removed = tx.execute("DELETE FROM sessions WHERE session_id = ?1", params![session_id])?;
    if removed == 0 {
        // Dropping the transaction rolls back
        return Err(SessionError::NotFound(session_id));
    }
    tx.commit()?;
    tracing::info!("Deleted session {}", session_id);
    Ok(())
}

fn session_name_exists(conn: &Connection, name: &str, except: Option<i64>) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sessions WHERE name = ?1 AND session_id != ?2",
        params![name, except.unwrap_or(0)],
        |row| row.get(0),
    )
}

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<Session> {
    let creation_date: String = row.get(2)?;
    Ok(Session {
        id: row.get(0)?,
        name: row.get(1)?,
        creation_date: DateTime::parse_from_rfc3339(&creation_date)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{notes, progress, schema::run_migrations};

    fn user_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_and_list() {
        let conn = user_db();
        let a = create_session(&conn, "Road trip").unwrap();
        let b = create_session(&conn, "  Dinner  ").unwrap();

        assert_eq!(b.name, "Dinner");
        let names: Vec<_> = list_sessions(&conn).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Road trip", "Dinner"]);
        assert_eq!(get_session(&conn, a.id).unwrap().unwrap().name, "Road trip");
    }

    #[test]
    fn test_whitespace_name_rejected() {
        let conn = user_db();
        let err = create_session(&conn, "  ").unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(list_sessions(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let conn = user_db();
        create_session(&conn, "Friday").unwrap();
        let err = create_session(&conn, " Friday ").unwrap_err();
        assert!(matches!(err, SessionError::DuplicateName(ref n) if n == "Friday"));
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_long_name_truncated() {
        let conn = user_db();
        let session = create_session(&conn, &"A".repeat(25)).unwrap();
        assert_eq!(session.name, "A".repeat(20));

        // The truncated form is what uniqueness is checked against
        let err = create_session(&conn, &"A".repeat(22)).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_rename() {
        let conn = user_db();
        let a = create_session(&conn, "One").unwrap();
        create_session(&conn, "Two").unwrap();

        assert_eq!(rename_session(&conn, a.id, "One").unwrap().name, "One");
        assert!(rename_session(&conn, a.id, "Two").unwrap_err().is_constraint_violation());
        assert_eq!(rename_session(&conn, a.id, "Uno").unwrap().name, "Uno");
        assert!(matches!(rename_session(&conn, 999, "X"), Err(SessionError::NotFound(999))));
    }

    #[test]
    fn test_delete_cascades() {
        let conn = user_db();
        let keep = create_session(&conn, "Keep").unwrap();
        let gone = create_session(&conn, "Gone").unwrap();
        progress::mark_completed(&conn, keep.id, 1).unwrap();
        progress::mark_completed(&conn, gone.id, 1).unwrap();
        notes::create_note(&conn, gone.id, 1, "bye").unwrap();

        delete_session(&conn, gone.id).unwrap();

        assert!(get_session(&conn, gone.id).unwrap().is_none());
        assert!(progress::list_completed_ids(&conn, gone.id).unwrap().is_empty());
        assert!(notes::get_note(&conn, gone.id, 1).unwrap().is_none());
        assert!(progress::is_completed(&conn, keep.id, 1).unwrap());
    }

    #[test]
    fn test_delete_missing_session() {
        let conn = user_db();
        assert!(matches!(delete_session(&conn, 12), Err(SessionError::NotFound(12))));
    }
}
