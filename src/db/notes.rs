//! Notes attached to a question within a session.
//!
//! Several rows may exist for the same (session, question); the newest one is
//! the current note. Length limits are enforced by callers.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::Note;

/// Most recent note for a question in a session
pub fn get_note(conn: &Connection, session_id: i64, question_id: i64) -> Result<Option<Note>> {
  conn
    .query_row(
      r#"
      SELECT id, session_id, question_id, content, created_at FROM notes
      WHERE session_id = ?1 AND question_id = ?2
      ORDER BY created_at DESC, id DESC
      LIMIT 1
      "#,
      params![session_id, question_id],
      row_to_note,
    )
    .optional()
}

pub fn create_note(conn: &Connection, session_id: i64, question_id: i64, content: &str) -> Result<Note> {
  let created_at = Utc::now();
  conn.execute(
    "INSERT INTO notes (session_id, question_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
    params![session_id, question_id, content, created_at.to_rfc3339()],
  )?;
  Ok(Note {
    id: conn.last_insert_rowid(),
    session_id,
    question_id,
    content: content.to_string(),
    created_at,
  })
}

/// Replace the content of an existing note. Returns false if no such note exists.
pub fn update_note(conn: &Connection, id: i64, content: &str) -> Result<bool> {
  let updated = conn.execute("UPDATE notes SET content = ?1 WHERE id = ?2", params![content, id])?;
  Ok(updated > 0)
}

fn row_to_note(row: &rusqlite::Row) -> Result<Note> {
  let created_at: String = row.get(4)?;
  Ok(Note {
    id: row.get(0)?,
    session_id: row.get(1)?,
    question_id: row.get(2)?,
    content: row.get(3)?,
    created_at: DateTime::parse_from_rfc3339(&created_at)
      .map(|dt| dt.with_timezone(&Utc))
      .unwrap_or_else(|_| Utc::now()),
  })
}
