//! Application state shared by all handlers.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::controller::SessionQuestionController;
use crate::db::{DbPool, Stores};

/// The deck slot: at most one open session at a time
pub type DeckSlot = Arc<Mutex<Option<SessionQuestionController>>>;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only question corpus, `None` when it could not be opened
    pub corpus: Option<DbPool>,

    /// Sessions, preferences, progress and notes
    pub user_db: DbPool,

    pub deck: DeckSlot,
}

impl AppState {
    pub fn new(corpus: Option<DbPool>, user_db: DbPool) -> Self {
        Self {
            corpus,
            user_db,
            deck: Arc::new(Mutex::new(None)),
        }
    }

    /// Fresh stores for a controller
    pub fn stores(&self) -> Stores {
        Stores::sqlite(self.corpus.clone(), self.user_db.clone())
    }
}
