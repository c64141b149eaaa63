//! Session management endpoints.

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Deserialize;

use crate::controller::SessionQuestionController;
use crate::db::{self, try_lock};
use crate::state::AppState;

use super::{busy_response, error_response, session_error_response, store_error_response};

#[derive(Debug, Deserialize)]
pub struct SessionNameRequest {
  pub name: String,
}

/// GET /api/sessions
pub async fn list_sessions(State(state): State<AppState>) -> Response {
  let conn = match try_lock(&state.user_db) {
    Ok(conn) => conn,
    Err(e) => return store_error_response(&e),
  };
  match db::sessions::list_sessions(&conn) {
    Ok(sessions) => Json(sessions).into_response(),
    Err(e) => store_error_response(&e.into()),
  }
}

/// POST /api/sessions
pub async fn create_session(
  State(state): State<AppState>,
  Json(request): Json<SessionNameRequest>,
) -> Response {
  let conn = match try_lock(&state.user_db) {
    Ok(conn) => conn,
    Err(e) => return store_error_response(&e),
  };
  match db::sessions::create_session(&conn, &request.name) {
    Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
    Err(e) => session_error_response(&e),
  }
}

/// PUT /api/sessions/{id}
pub async fn rename_session(
  State(state): State<AppState>,
  Path(id): Path<i64>,
  Json(request): Json<SessionNameRequest>,
) -> Response {
  let conn = match try_lock(&state.user_db) {
    Ok(conn) => conn,
    Err(e) => return store_error_response(&e),
  };
  match db::sessions::rename_session(&conn, id, &request.name) {
    Ok(session) => Json(session).into_response(),
    Err(e) => session_error_response(&e),
  }
}

/// DELETE /api/sessions/{id}
///
/// Closes the deck first when it belongs to the deleted session.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
  let Ok(mut deck) = state.deck.try_lock() else {
    return busy_response();
  };

  let result = match try_lock(&state.user_db) {
    Ok(conn) => db::sessions::delete_session(&conn, id),
    Err(e) => return store_error_response(&e),
  };
  if let Err(e) = result {
    return session_error_response(&e);
  }

  if deck.as_ref().is_some_and(|d| d.session_id() == id) {
    tracing::info!("Closing deck for deleted session {}", id);
    *deck = None;
  }
  StatusCode::NO_CONTENT.into_response()
}

/// POST /api/sessions/{id}/open
///
/// Replaces whatever deck was open with a fresh controller for `id`.
pub async fn open_session(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
  let Ok(mut deck) = state.deck.try_lock() else {
    return busy_response();
  };

  let session = match try_lock(&state.user_db).and_then(|conn| Ok(db::sessions::get_session(&conn, id)?)) {
    Ok(Some(session)) => session,
    Ok(None) => return error_response(StatusCode::NOT_FOUND, format!("session {} not found", id)),
    Err(e) => return store_error_response(&e),
  };

  let controller = SessionQuestionController::open(state.stores(), session.id);
  let snapshot = controller.snapshot();
  *deck = Some(controller);
  Json(snapshot).into_response()
}
