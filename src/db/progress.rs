//! Per-session completion records.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::HashSet;

use crate::config;
use crate::domain::ProgressRecord;

/// Mark a question completed in a session. Re-marking refreshes the timestamp.
pub fn mark_completed(conn: &Connection, session_id: i64, question_id: i64) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO session_progress (session_id, question_id, completed_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(session_id, question_id) DO UPDATE SET completed_at = excluded.completed_at
    "#,
    params![session_id, question_id, Utc::now().to_rfc3339()],
  )?;
  Ok(())
}

pub fn is_completed(conn: &Connection, session_id: i64, question_id: i64) -> Result<bool> {
  let completed: Option<bool> = conn
    .query_row(
      r#"
      SELECT completed_at IS NOT NULL FROM session_progress
      WHERE session_id = ?1 AND question_id = ?2
      "#,
      params![session_id, question_id],
      |row| row.get(0),
    )
    .optional()?;
  Ok(completed.unwrap_or(false))
}

/// Ids completed in a session, never including the placeholder id
pub fn list_completed_ids(conn: &Connection, session_id: i64) -> Result<HashSet<i64>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT question_id FROM session_progress
    WHERE session_id = ?1 AND completed_at IS NOT NULL AND question_id != ?2
    "#,
  )?;
  let ids = stmt
    .query_map(params![session_id, config::PLACEHOLDER_QUESTION_ID], |row| row.get(0))?
    .collect::<Result<HashSet<i64>>>()?;
  Ok(ids)
}

pub fn get_progress_record(conn: &Connection, session_id: i64, question_id: i64) -> Result<Option<ProgressRecord>> {
  conn
    .query_row(
      r#"
      SELECT session_id, question_id, completed_at FROM session_progress
      WHERE session_id = ?1 AND question_id = ?2
      "#,
      params![session_id, question_id],
      |row| {
        let completed_at: Option<String> = row.get(2)?;
        Ok(ProgressRecord {
          session_id: row.get(0)?,
          question_id: row.get(1)?,
          completed_at: completed_at.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
              .map(|dt| dt.with_timezone(&Utc))
              .ok()
          }),
        })
      },
    )
    .optional()
}
