//! Test utilities for database setup.
//!
//! Builds both datastores with the authoritative schema functions so tests
//! never duplicate table definitions.

use rusqlite::Connection;
use tempfile::TempDir;

use crate::db::{self, schema, DbPool, Stores};
use crate::domain::{Question, Session};
use crate::error::StoreError;

/// Test environment with a corpus and a user datastore in one temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Corpus opened read-only, exactly like production
    pub corpus: DbPool,
    /// User datastore with all migrations applied
    pub user: DbPool,
}

impl TestEnv {
    /// Corpus of `size` questions with ids `1..=size`, no tags.
    pub fn with_corpus(size: i64) -> Result<Self, StoreError> {
        let questions: Vec<Question> = (1..=size)
            .map(|id| Question::new(id, &format!("Question {}", id), "core", "1.0", &[]))
            .collect();
        Self::with_questions(&questions)
    }

    /// Corpus containing exactly `questions`.
    pub fn with_questions(questions: &[Question]) -> Result<Self, StoreError> {
        let temp = TempDir::new()?;

        let corpus_path = temp.path().join("corpus.db");
        {
            let conn = Connection::open(&corpus_path)?;
            schema::init_corpus_schema(&conn)?;
            for q in questions {
                db::questions::insert_question(&conn, q)?;
            }
        }
        let corpus = db::open_corpus(&corpus_path)?;
        let user = db::provision_user_db(&temp.path().join("user.db"), None)?;

        Ok(Self { temp, corpus, user })
    }

    /// SQLite stores over this environment
    pub fn stores(&self) -> Stores {
        Stores::sqlite(Some(self.corpus.clone()), self.user.clone())
    }

    pub fn create_session(&self, name: &str) -> Session {
        let conn = db::try_lock(&self.user).expect("user db lock");
        db::sessions::create_session(&conn, name).expect("create session")
    }
}
