//! JSON API a front-end binds to.

pub mod deck;
pub mod notes;
pub mod sessions;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post, put},
  Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::error::{SessionError, StoreError};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/sessions", get(sessions::list_sessions).post(sessions::create_session))
    .route(
      "/api/sessions/{id}",
      put(sessions::rename_session).delete(sessions::delete_session),
    )
    .route("/api/sessions/{id}/open", post(sessions::open_session))
    .route("/api/deck", get(deck::current_deck))
    .route("/api/deck/skip", post(deck::skip))
    .route("/api/deck/complete", post(deck::mark_complete))
    .route("/api/deck/favorite", post(deck::toggle_favorite))
    .route("/api/deck/hide", post(deck::toggle_hidden))
    .route("/api/deck/filters/favorites", post(deck::cycle_favorites_filter))
    .route("/api/deck/filters/tags/{tag}", post(deck::cycle_tag_filter))
    .route("/api/deck/note", get(notes::get_note).put(notes::save_note))
    .route("/api/tags", get(deck::list_tags))
    .route("/api/corpus", get(deck::corpus_stats))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
  let message = message.into();
  (status, Json(serde_json::json!({ "error": message }))).into_response()
}

pub(crate) fn store_error_response(e: &StoreError) -> Response {
  tracing::error!("Datastore error: {}", e);
  error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

pub(crate) fn session_error_response(e: &SessionError) -> Response {
  match e {
    SessionError::EmptyName | SessionError::DuplicateName(_) => {
      error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    }
    SessionError::NotFound(_) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    SessionError::Store(inner) => store_error_response(inner),
  }
}

pub(crate) fn busy_response() -> Response {
  error_response(StatusCode::CONFLICT, "Another deck operation is in progress")
}

pub(crate) fn no_deck_response() -> Response {
  error_response(StatusCode::NOT_FOUND, "No session is open")
}
