//! Deck endpoints: everything that reads or drives the open session's controller.
//!
//! Each mutating route claims the deck with `try_lock`. A request that finds
//! the deck busy gets 409 instead of queueing behind the running operation.

use axum::{
  extract::{Path, State},
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::controller::{DeckSnapshot, SessionQuestionController};
use crate::db::LogOnError;
use crate::state::AppState;

use super::{busy_response, no_deck_response};

/// Result of a deck operation. `changed` is false when a write failed or had nothing to act on.
#[derive(Debug, Serialize)]
pub struct DeckResponse {
  pub changed: bool,
  pub deck: DeckSnapshot,
}

#[derive(Debug, Serialize)]
pub struct CorpusStats {
  pub corpus_size: i64,
  pub hidden: i64,
  pub favorites: i64,
}

/// Run `op` against the open controller, or answer 409/404.
fn with_deck(state: &AppState, op: impl FnOnce(&mut SessionQuestionController) -> bool) -> Response {
  let Ok(mut slot) = state.deck.try_lock() else {
    return busy_response();
  };
  let Some(controller) = slot.as_mut() else {
    return no_deck_response();
  };

  let changed = op(controller);
  Json(DeckResponse {
    changed,
    deck: controller.snapshot(),
  })
  .into_response()
}

/// GET /api/deck
pub async fn current_deck(State(state): State<AppState>) -> Response {
  let Ok(slot) = state.deck.try_lock() else {
    return busy_response();
  };
  match slot.as_ref() {
    Some(controller) => Json(controller.snapshot()).into_response(),
    None => no_deck_response(),
  }
}

/// POST /api/deck/skip
pub async fn skip(State(state): State<AppState>) -> Response {
  with_deck(&state, |deck| {
    deck.skip();
    true
  })
}

/// POST /api/deck/complete
pub async fn mark_complete(State(state): State<AppState>) -> Response {
  with_deck(&state, SessionQuestionController::mark_complete)
}

/// POST /api/deck/favorite
pub async fn toggle_favorite(State(state): State<AppState>) -> Response {
  with_deck(&state, SessionQuestionController::toggle_favorite)
}

/// POST /api/deck/hide
pub async fn toggle_hidden(State(state): State<AppState>) -> Response {
  with_deck(&state, SessionQuestionController::toggle_hidden)
}

/// POST /api/deck/filters/favorites
pub async fn cycle_favorites_filter(State(state): State<AppState>) -> Response {
  with_deck(&state, |deck| {
    deck.cycle_favorites_filter();
    true
  })
}

/// POST /api/deck/filters/tags/{tag}
pub async fn cycle_tag_filter(State(state): State<AppState>, Path(tag): Path<String>) -> Response {
  with_deck(&state, |deck| deck.cycle_tag_filter(&tag).is_some())
}

/// GET /api/tags
///
/// Works without an open deck; an unreadable corpus yields an empty list.
pub async fn list_tags(State(state): State<AppState>) -> Json<Vec<String>> {
  let tags: BTreeSet<String> = state
    .stores()
    .questions
    .tag_universe()
    .log_warn_default("Failed to load tags");
  Json(tags.into_iter().collect())
}

/// GET /api/corpus
pub async fn corpus_stats(State(state): State<AppState>) -> Json<CorpusStats> {
  let stores = state.stores();
  Json(CorpusStats {
    corpus_size: stores.questions.corpus_size().log_warn_default("Failed to count corpus"),
    hidden: stores.preferences.count_hidden().log_warn_default("Failed to count hidden"),
    favorites: stores.preferences.count_favorites().log_warn_default("Failed to count favorites"),
  })
}
