//! Favorite/hidden flags per question.
//!
//! The table is sparse: a question without a row is "normal", and every
//! stored row carries exactly one status. Writes go through one transaction
//! each, so readers never see a half-applied toggle.

use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::HashSet;

use crate::domain::{PreferenceStatus, UserPreference};

pub fn get_preference(conn: &Connection, question_id: i64) -> Result<UserPreference> {
  let status: Option<String> = conn
    .query_row(
      "SELECT status FROM user_preferences WHERE question_id = ?1",
      params![question_id],
      |row| row.get(0),
    )
    .optional()?;

  let status = status.and_then(|s| {
    let parsed = PreferenceStatus::from_str(&s);
    if parsed.is_none() {
      tracing::warn!("Unknown preference status '{}' for question {}", s, question_id);
    }
    parsed
  });
  Ok(UserPreference::from_status(status))
}

/// Set or clear the favorite flag. Setting it replaces a hidden flag.
pub fn set_favorite(conn: &Connection, question_id: i64, value: bool) -> Result<()> {
  set_status(conn, question_id, PreferenceStatus::Favorite, value)
}

/// Set or clear the hidden flag. Setting it replaces a favorite flag.
pub fn set_hidden(conn: &Connection, question_id: i64, value: bool) -> Result<()> {
  set_status(conn, question_id, PreferenceStatus::Hidden, value)
}

fn set_status(conn: &Connection, question_id: i64, status: PreferenceStatus, value: bool) -> Result<()> {
  let tx = conn.unchecked_transaction()?;
  if value {
    tx.execute(
      r#"
      INSERT INTO user_preferences (question_id, status) VALUES (?1, ?2)
      ON CONFLICT(question_id) DO UPDATE SET status = excluded.status
      "#,
      params![question_id, status.as_str()],
    )?;
  } else {
    // Clearing one flag leaves the other one alone
    tx.execute(
      "DELETE FROM user_preferences WHERE question_id = ?1 AND status = ?2",
      params![question_id, status.as_str()],
    )?;
  }
  tx.commit()
}

pub fn list_ids_with_status(conn: &Connection, status: PreferenceStatus) -> Result<HashSet<i64>> {
  let mut stmt = conn.prepare("SELECT question_id FROM user_preferences WHERE status = ?1")?;
  let ids = stmt
    .query_map(params![status.as_str()], |row| row.get(0))?
    .collect::<Result<HashSet<i64>>>()?;
  Ok(ids)
}

pub fn count_with_status(conn: &Connection, status: PreferenceStatus) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM user_preferences WHERE status = ?1",
    params![status.as_str()],
    |row| row.get(0),
  )
}

pub fn list_hidden(conn: &Connection) -> Result<HashSet<i64>> {
  list_ids_with_status(conn, PreferenceStatus::Hidden)
}

pub fn list_favorites(conn: &Connection) -> Result<HashSet<i64>> {
  list_ids_with_status(conn, PreferenceStatus::Favorite)
}

pub fn count_hidden(conn: &Connection) -> Result<i64> {
  count_with_status(conn, PreferenceStatus::Hidden)
}

pub fn count_favorites(conn: &Connection) -> Result<i64> {
  count_with_status(conn, PreferenceStatus::Favorite)
}
