use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, independent run through the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub id: i64,
  pub name: String,
  pub creation_date: DateTime<Utc>,
}

/// Completion of one question within one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
  pub session_id: i64,
  pub question_id: i64,
  pub completed_at: Option<DateTime<Utc>>,
}

/// Free-text note on a question within a session. The newest row is the current note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
  pub id: i64,
  pub session_id: i64,
  pub question_id: i64,
  pub content: String,
  pub created_at: DateTime<Utc>,
}
