//! Note on the question currently shown.

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Deserialize;

use crate::config::NOTE_MAX_CHARS;
use crate::state::AppState;
use crate::validation::is_valid_note_content;

use super::{busy_response, error_response, no_deck_response, store_error_response};

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
  pub content: String,
}

/// GET /api/deck/note
///
/// `null` when the question has no note or the placeholder is shown.
pub async fn get_note(State(state): State<AppState>) -> Response {
  let Ok(slot) = state.deck.try_lock() else {
    return busy_response();
  };
  match slot.as_ref() {
    Some(controller) => Json(controller.current_note()).into_response(),
    None => no_deck_response(),
  }
}

/// PUT /api/deck/note
pub async fn save_note(State(state): State<AppState>, Json(request): Json<NoteRequest>) -> Response {
  if !is_valid_note_content(&request.content) {
    return error_response(
      StatusCode::UNPROCESSABLE_ENTITY,
      format!("note cannot exceed {} characters", NOTE_MAX_CHARS),
    );
  }

  let Ok(slot) = state.deck.try_lock() else {
    return busy_response();
  };
  let Some(controller) = slot.as_ref() else {
    return no_deck_response();
  };

  match controller.save_note(&request.content) {
    Ok(Some(note)) => Json(note).into_response(),
    Ok(None) => error_response(StatusCode::CONFLICT, "No question is displayed"),
    Err(e) => store_error_response(&e),
  }
}
