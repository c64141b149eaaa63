//! Store traits the deck controller depends on, and their SQLite implementations.
//!
//! The controller never touches a connection directly. Each store owns a
//! [`DbPool`] handle passed in at construction, so tests can swap in doubles.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::{notes, preferences, progress, questions, try_lock, DbPool};
use crate::domain::{Note, Question, UserPreference};
use crate::error::StoreError;
use crate::selection::{eligible_ids, take_uniform};

/// Read-only access to the question corpus
pub trait QuestionStore: Send {
    fn corpus_size(&self) -> Result<i64, StoreError>;
    fn all_ids(&self) -> Result<HashSet<i64>, StoreError>;
    fn tag_universe(&self) -> Result<BTreeSet<String>, StoreError>;
    fn tag_index(&self) -> Result<HashMap<String, HashSet<i64>>, StoreError>;

    /// Uniformly random question inside `candidates` (when given) and outside
    /// `exclude`. `Ok(None)` means nothing is eligible.
    fn random(&self, candidates: Option<&HashSet<i64>>, exclude: &HashSet<i64>)
        -> Result<Option<Question>, StoreError>;
}

/// Favorite/hidden flags
pub trait PreferenceStore: Send {
    fn get(&self, question_id: i64) -> Result<UserPreference, StoreError>;
    fn set_favorite(&self, question_id: i64, value: bool) -> Result<(), StoreError>;
    fn set_hidden(&self, question_id: i64, value: bool) -> Result<(), StoreError>;
    fn list_hidden(&self) -> Result<HashSet<i64>, StoreError>;
    fn list_favorites(&self) -> Result<HashSet<i64>, StoreError>;
    fn count_hidden(&self) -> Result<i64, StoreError>;
    fn count_favorites(&self) -> Result<i64, StoreError>;
}

/// Per-session completion plus the notes kept alongside it
pub trait ProgressStore: Send {
    fn is_completed(&self, session_id: i64, question_id: i64) -> Result<bool, StoreError>;
    fn mark_completed(&self, session_id: i64, question_id: i64) -> Result<(), StoreError>;
    fn list_completed_ids(&self, session_id: i64) -> Result<HashSet<i64>, StoreError>;
    fn get_note(&self, session_id: i64, question_id: i64) -> Result<Option<Note>, StoreError>;
    fn create_note(&self, session_id: i64, question_id: i64, content: &str) -> Result<Note, StoreError>;
    fn update_note(&self, id: i64, content: &str) -> Result<bool, StoreError>;
}

/// The three stores a deck controller runs against
pub struct Stores {
    pub questions: Box<dyn QuestionStore>,
    pub preferences: Box<dyn PreferenceStore>,
    pub progress: Box<dyn ProgressStore>,
}

impl Stores {
    /// SQLite-backed stores. A missing corpus falls back to [`UnavailableQuestionStore`].
    pub fn sqlite(corpus: Option<DbPool>, user: DbPool) -> Self {
        let questions: Box<dyn QuestionStore> = match corpus {
            Some(pool) => Box::new(SqliteQuestionStore::new(pool)),
            None => Box::new(UnavailableQuestionStore),
        };
        Self {
            questions,
            preferences: Box::new(SqlitePreferenceStore::new(user.clone())),
            progress: Box::new(SqliteProgressStore::new(user)),
        }
    }
}

// ==================== Corpus ====================

pub struct SqliteQuestionStore {
    pool: DbPool,
}

impl SqliteQuestionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl QuestionStore for SqliteQuestionStore {
    fn corpus_size(&self) -> Result<i64, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(questions::get_corpus_size(&conn)?)
    }

    fn all_ids(&self) -> Result<HashSet<i64>, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(questions::get_all_question_ids(&conn)?)
    }

    fn tag_universe(&self) -> Result<BTreeSet<String>, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(questions::get_tag_universe(&conn)?)
    }

    fn tag_index(&self) -> Result<HashMap<String, HashSet<i64>>, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(questions::get_tag_index(&conn)?)
    }

    fn random(
        &self,
        candidates: Option<&HashSet<i64>>,
        exclude: &HashSet<i64>,
    ) -> Result<Option<Question>, StoreError> {
        let conn = try_lock(&self.pool)?;
        let mut eligible = match candidates {
            Some(candidates) => eligible_ids(candidates, None, exclude),
            None => eligible_ids(&questions::get_all_question_ids(&conn)?, None, exclude),
        };

        let mut rng = rand::rng();
        // Candidate ids can outlive a corpus row; keep drawing until one resolves
        while let Some(id) = take_uniform(&mut eligible, &mut rng) {
            if let Some(question) = questions::get_question_by_id(&conn, id)? {
                return Ok(Some(question));
            }
            tracing::debug!("Candidate {} has no corpus row, drawing again", id);
        }
        Ok(None)
    }
}

/// Stand-in used when the corpus could not be opened. Every call fails, so the
/// deck degrades to the placeholder question.
pub struct UnavailableQuestionStore;

impl QuestionStore for UnavailableQuestionStore {
    fn corpus_size(&self) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn all_ids(&self) -> Result<HashSet<i64>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn tag_universe(&self) -> Result<BTreeSet<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn tag_index(&self) -> Result<HashMap<String, HashSet<i64>>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn random(&self, _: Option<&HashSet<i64>>, _: &HashSet<i64>) -> Result<Option<Question>, StoreError> {
        Err(StoreError::Unavailable)
    }
}

// ==================== User data ====================

pub struct SqlitePreferenceStore {
    pool: DbPool,
}

impl SqlitePreferenceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get(&self, question_id: i64) -> Result<UserPreference, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(preferences::get_preference(&conn, question_id)?)
    }

    fn set_favorite(&self, question_id: i64, value: bool) -> Result<(), StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(preferences::set_favorite(&conn, question_id, value)?)
    }

    fn set_hidden(&self, question_id: i64, value: bool) -> Result<(), StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(preferences::set_hidden(&conn, question_id, value)?)
    }

    fn list_hidden(&self) -> Result<HashSet<i64>, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(preferences::list_hidden(&conn)?)
    }

    fn list_favorites(&self) -> Result<HashSet<i64>, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(preferences::list_favorites(&conn)?)
    }

    fn count_hidden(&self) -> Result<i64, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(preferences::count_hidden(&conn)?)
    }

    fn count_favorites(&self) -> Result<i64, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(preferences::count_favorites(&conn)?)
    }
}

pub struct SqliteProgressStore {
    pool: DbPool,
}

impl SqliteProgressStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProgressStore for SqliteProgressStore {
    fn is_completed(&self, session_id: i64, question_id: i64) -> Result<bool, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(progress::is_completed(&conn, session_id, question_id)?)
    }

    fn mark_completed(&self, session_id: i64, question_id: i64) -> Result<(), StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(progress::mark_completed(&conn, session_id, question_id)?)
    }

    fn list_completed_ids(&self, session_id: i64) -> Result<HashSet<i64>, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(progress::list_completed_ids(&conn, session_id)?)
    }

    fn get_note(&self, session_id: i64, question_id: i64) -> Result<Option<Note>, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(notes::get_note(&conn, session_id, question_id)?)
    }

    fn create_note(&self, session_id: i64, question_id: i64, content: &str) -> Result<Note, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(notes::create_note(&conn, session_id, question_id, content)?)
    }

    fn update_note(&self, id: i64, content: &str) -> Result<bool, StoreError> {
        let conn = try_lock(&self.pool)?;
        Ok(notes::update_note(&conn, id, content)?)
    }
}
