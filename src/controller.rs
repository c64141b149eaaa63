//! Deck controller: the state machine a UI binds to.
//!
//! One controller drives one session. It caches the corpus ids, tag index,
//! hidden/favorite sets and the session's completed ids, and keeps the
//! candidate set and both counters in step after every operation.
//!
//! Operations take `&mut self`, so two of them can never interleave on the
//! same controller. Callers sharing a controller across tasks put it behind a
//! lock and refuse new operations while one is running (see `handlers`).
//!
//! Failure handling:
//! - a failed write (`mark_complete`, toggles) returns `false` and leaves
//!   every in-memory field untouched
//! - a failed read degrades to defaults, and a failed draw to the placeholder

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::db::{LogOnError, Stores};
use crate::domain::{FilterState, Note, Question, UserPreference};
use crate::error::StoreError;
use crate::selection::{compute_counts, FilterCounts, FilterInputs, FilterSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckState {
    /// Only the placeholder is shown
    NoQuestion,
    QuestionDisplayed,
}

/// Immutable view of everything a UI renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSnapshot {
    pub session_id: i64,
    pub state: DeckState,
    pub question_id: i64,
    pub question_text: String,
    pub pack: String,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub is_hidden: bool,
    pub completed_for_filter: usize,
    pub filtered_total: usize,
    /// Corpus questions that are not hidden
    pub total_available: usize,
    /// "completed/total" under the active filter
    pub progress_text: String,
    pub favorites_filter: FilterState,
    pub tag_filters: BTreeMap<String, FilterState>,
}

/// Called with the new snapshot after every state change
pub type Listener = Box<dyn Fn(&DeckSnapshot) + Send>;

pub struct SessionQuestionController {
    stores: Stores,
    session_id: i64,
    universe: HashSet<i64>,
    tag_index: HashMap<String, HashSet<i64>>,
    hidden: HashSet<i64>,
    favorites: HashSet<i64>,
    completed: HashSet<i64>,
    filters: FilterSelection,
    counts: FilterCounts,
    total_available: usize,
    current: Question,
    preference: UserPreference,
    state: DeckState,
    listeners: Vec<Listener>,
}

impl SessionQuestionController {
    /// Load everything for `session_id` and draw the first question.
    ///
    /// Never fails: unreadable data starts out empty and an empty candidate
    /// set shows the placeholder.
    pub fn open(stores: Stores, session_id: i64) -> Self {
        let universe = stores.questions.all_ids().log_warn_default("Failed to load corpus ids");
        let tag_index = stores.questions.tag_index().log_warn_default("Failed to load tag index");
        let tags: BTreeSet<String> = stores.questions.tag_universe().log_warn_default("Failed to load tags");
        let hidden = stores.preferences.list_hidden().log_warn_default("Failed to load hidden questions");
        let favorites = stores.preferences.list_favorites().log_warn_default("Failed to load favorites");
        let completed = stores
            .progress
            .list_completed_ids(session_id)
            .log_warn_default("Failed to load session progress");

        let total_available = universe.iter().filter(|id| !hidden.contains(*id)).count();
        tracing::info!(
            "Opening session {} (corpus {}, hidden {}, favorites {}, completed {})",
            session_id,
            universe.len(),
            hidden.len(),
            favorites.len(),
            completed.len()
        );

        let mut controller = Self {
            stores,
            session_id,
            universe,
            tag_index,
            hidden,
            favorites,
            completed,
            filters: FilterSelection::seeded(tags.iter()),
            counts: FilterCounts::default(),
            total_available,
            current: Question::placeholder(),
            preference: UserPreference::default(),
            state: DeckState::NoQuestion,
            listeners: Vec::new(),
        };
        controller.recompute();
        controller.advance();
        controller
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn state(&self) -> DeckState {
        self.state
    }

    pub fn current_question(&self) -> &Question {
        &self.current
    }

    pub fn current_preference(&self) -> UserPreference {
        self.preference
    }

    pub fn completed_for_filter(&self) -> usize {
        self.counts.completed_for_filter
    }

    pub fn filtered_total(&self) -> usize {
        self.counts.filtered_total
    }

    pub fn total_available(&self) -> usize {
        self.total_available
    }

    pub fn candidates(&self) -> &HashSet<i64> {
        &self.counts.candidates
    }

    /// Candidates that are neither hidden nor completed
    pub fn eligible_count(&self) -> usize {
        self.counts
            .candidates
            .iter()
            .filter(|id| !self.hidden.contains(*id) && !self.completed.contains(*id))
            .count()
    }

    pub fn completed_ids(&self) -> &HashSet<i64> {
        &self.completed
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            session_id: self.session_id,
            state: self.state,
            question_id: self.current.id,
            question_text: self.current.text.clone(),
            pack: self.current.pack.clone(),
            tags: self.current.tags.clone(),
            is_favorite: self.preference.is_favorite,
            is_hidden: self.preference.is_hidden,
            completed_for_filter: self.counts.completed_for_filter,
            filtered_total: self.counts.filtered_total,
            total_available: self.total_available,
            progress_text: format!("{}/{}", self.counts.completed_for_filter, self.counts.filtered_total),
            favorites_filter: self.filters.favorites,
            tag_filters: self.filters.tags.clone(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Draw a different question under the current filters.
    pub fn skip(&mut self) {
        self.advance();
        self.publish();
    }

    /// Record the current question as completed, then move on.
    pub fn mark_complete(&mut self) -> bool {
        if self.current.is_placeholder() {
            return false;
        }
        let id = self.current.id;
        if let Err(e) = self.stores.progress.mark_completed(self.session_id, id) {
            tracing::warn!("Failed to mark question {} complete in session {}: {}", id, self.session_id, e);
            return false;
        }

        if self.completed.insert(id) && self.counts.candidates.contains(&id) {
            self.counts.completed_for_filter += 1;
        }
        self.advance();
        self.publish();
        true
    }

    pub fn toggle_favorite(&mut self) -> bool {
        if self.current.is_placeholder() {
            return false;
        }
        let id = self.current.id;
        let value = !self.preference.is_favorite;
        if let Err(e) = self.stores.preferences.set_favorite(id, value) {
            tracing::warn!("Failed to set favorite={} on question {}: {}", value, id, e);
            return false;
        }

        if value {
            self.favorites.insert(id);
            self.unhide(id);
            self.preference = UserPreference { is_favorite: true, is_hidden: false };
        } else {
            self.favorites.remove(&id);
            self.preference.is_favorite = false;
        }
        self.after_preference_change();
        true
    }

    pub fn toggle_hidden(&mut self) -> bool {
        if self.current.is_placeholder() {
            return false;
        }
        let id = self.current.id;
        let value = !self.preference.is_hidden;
        if let Err(e) = self.stores.preferences.set_hidden(id, value) {
            tracing::warn!("Failed to set hidden={} on question {}: {}", value, id, e);
            return false;
        }

        if value {
            self.favorites.remove(&id);
            if self.hidden.insert(id) && self.universe.contains(&id) {
                self.total_available -= 1;
            }
            self.preference = UserPreference { is_favorite: false, is_hidden: true };
        } else {
            self.unhide(id);
            self.preference.is_hidden = false;
        }
        self.after_preference_change();
        true
    }

    pub fn cycle_favorites_filter(&mut self) -> FilterState {
        let state = self.filters.cycle_favorites();
        tracing::debug!("Favorites filter now {}", state.as_str());
        self.recompute();
        self.advance();
        self.publish();
        state
    }

    /// Advance a tag's filter. Tags outside the corpus return `None` and change nothing.
    pub fn cycle_tag_filter(&mut self, tag: &str) -> Option<FilterState> {
        let state = self.filters.cycle_tag(tag)?;
        tracing::debug!("Tag filter '{}' now {}", tag, state.as_str());
        self.recompute();
        self.advance();
        self.publish();
        Some(state)
    }

    /// Current note on the displayed question
    pub fn current_note(&self) -> Option<Note> {
        if self.current.is_placeholder() {
            return None;
        }
        self.stores
            .progress
            .get_note(self.session_id, self.current.id)
            .log_warn("Failed to load note")
            .flatten()
    }

    /// Write the note for the displayed question, updating the current note if one exists.
    /// Returns `Ok(None)` while the placeholder is shown.
    pub fn save_note(&self, content: &str) -> Result<Option<Note>, StoreError> {
        if self.current.is_placeholder() {
            return Ok(None);
        }
        let progress = &self.stores.progress;
        match progress.get_note(self.session_id, self.current.id)? {
            Some(note) if progress.update_note(note.id, content)? => Ok(Some(Note {
                content: content.to_string(),
                ..note
            })),
            _ => Ok(Some(progress.create_note(self.session_id, self.current.id, content)?)),
        }
    }

    fn unhide(&mut self, id: i64) {
        if self.hidden.remove(&id) && self.universe.contains(&id) {
            self.total_available += 1;
        }
    }

    /// Hidden/favorite sets changed: refresh counts and replace the question if it no longer qualifies.
    fn after_preference_change(&mut self) {
        self.recompute();
        if !self.counts.candidates.contains(&self.current.id) {
            self.advance();
        }
        self.publish();
    }

    fn recompute(&mut self) {
        let inputs = FilterInputs {
            universe: &self.universe,
            hidden: &self.hidden,
            favorites: &self.favorites,
            tag_index: &self.tag_index,
        };
        self.counts = compute_counts(inputs, &self.filters, &self.completed);
        tracing::debug!(
            "Session {} filter counts: {}/{}",
            self.session_id,
            self.counts.completed_for_filter,
            self.counts.filtered_total
        );
    }

    fn advance(&mut self) {
        let exclude: HashSet<i64> = self.hidden.union(&self.completed).copied().collect();
        match self.draw(&exclude) {
            Some(question) => {
                tracing::debug!(
                    "Session {} drew question {} ({} eligible)",
                    self.session_id,
                    question.id,
                    self.eligible_count()
                );
                self.preference = self
                    .stores
                    .preferences
                    .get(question.id)
                    .log_warn_default("Failed to load preference");
                self.current = question;
                self.state = DeckState::QuestionDisplayed;
            }
            None => {
                tracing::debug!("Session {} has no eligible question", self.session_id);
                self.current = Question::placeholder();
                self.preference = UserPreference::default();
                self.state = DeckState::NoQuestion;
            }
        }
    }

    /// Prefer anything other than the question already on screen; fall back to it
    /// only when it is the sole eligible one.
    fn draw(&self, exclude: &HashSet<i64>) -> Option<Question> {
        let candidates = Some(&self.counts.candidates);
        if !self.current.is_placeholder() && !exclude.contains(&self.current.id) {
            let mut without_current = exclude.clone();
            without_current.insert(self.current.id);
            match self.stores.questions.random(candidates, &without_current) {
                Ok(Some(question)) => return Some(question),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Failed to draw question: {}", e);
                    return None;
                }
            }
        }
        self.stores
            .questions
            .random(candidates, exclude)
            .log_warn("Failed to draw question")
            .flatten()
    }

    fn publish(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in &self.listeners {
            listener(&snapshot);
        }
    }
}
