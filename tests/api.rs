//! HTTP surface tests against real SQLite files in a temp directory.

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{json, Value};
use tempfile::TempDir;

use prompt_deck::db::{self, schema};
use prompt_deck::domain::Question;
use prompt_deck::handlers;
use prompt_deck::state::AppState;

struct Harness {
  _temp: TempDir,
  state: AppState,
  server: TestServer,
}

/// corpus {1..4}; "deep" on {1,2}, "light" on {3}
fn harness() -> Harness {
  let temp = TempDir::new().unwrap();
  let corpus_path = temp.path().join("corpus.db");
  {
    let conn = Connection::open(&corpus_path).unwrap();
    schema::init_corpus_schema(&conn).unwrap();
    for q in [
      Question::new(1, "What surprised you this week?", "core", "1.0", &["deep"]),
      Question::new(2, "What do you miss?", "core", "1.0", &["deep"]),
      Question::new(3, "Best meal lately?", "core", "1.0", &["light"]),
      Question::new(4, "Where next?", "travel", "1.1", &[]),
    ] {
      db::questions::insert_question(&conn, &q).unwrap();
    }
  }

  let corpus = db::open_corpus(&corpus_path).unwrap();
  let user_db = db::provision_user_db(&temp.path().join("user.db"), None).unwrap();
  let state = AppState::new(Some(corpus), user_db);
  let server = TestServer::new(handlers::router(state.clone())).unwrap();

  Harness {
    _temp: temp,
    state,
    server,
  }
}

async fn create_and_open(h: &Harness, name: &str) -> Value {
  let session: Value = h
    .server
    .post("/api/sessions")
    .json(&json!({ "name": name }))
    .await
    .json();
  let id = session["id"].as_i64().unwrap();
  h.server.post(&format!("/api/sessions/{}/open", id)).await.json()
}

#[tokio::test]
async fn test_create_and_list_sessions() {
  let h = harness();

  let response = h.server.post("/api/sessions").json(&json!({ "name": "Friday" })).await;
  response.assert_status(StatusCode::CREATED);
  let created: Value = response.json();
  assert_eq!(created["name"], "Friday");

  let sessions: Vec<Value> = h.server.get("/api/sessions").await.json();
  assert_eq!(sessions.len(), 1);
  assert_eq!(sessions[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_session_name_rules() {
  let h = harness();

  h.server
    .post("/api/sessions")
    .json(&json!({ "name": "   " }))
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

  let long: Value = h
    .server
    .post("/api/sessions")
    .json(&json!({ "name": "A".repeat(25) }))
    .await
    .json();
  assert_eq!(long["name"], "A".repeat(20));

  h.server.post("/api/sessions").json(&json!({ "name": "Friday" })).await;
  let duplicate = h.server.post("/api/sessions").json(&json!({ "name": "Friday" })).await;
  duplicate.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
  let body: Value = duplicate.json();
  assert!(body["error"].as_str().unwrap().contains("Friday"));
}

#[tokio::test]
async fn test_rename_session() {
  let h = harness();
  let a: Value = h.server.post("/api/sessions").json(&json!({ "name": "A" })).await.json();
  h.server.post("/api/sessions").json(&json!({ "name": "B" })).await;
  let id = a["id"].as_i64().unwrap();

  let renamed: Value = h
    .server
    .put(&format!("/api/sessions/{}", id))
    .json(&json!({ "name": " Road trip " }))
    .await
    .json();
  assert_eq!(renamed["name"], "Road trip");

  h.server
    .put(&format!("/api/sessions/{}", id))
    .json(&json!({ "name": "B" }))
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_session_closes_its_deck() {
  let h = harness();
  let deck = create_and_open(&h, "Doomed").await;
  let id = deck["session_id"].as_i64().unwrap();

  h.server
    .delete(&format!("/api/sessions/{}", id))
    .await
    .assert_status(StatusCode::NO_CONTENT);

  h.server.get("/api/deck").await.assert_status(StatusCode::NOT_FOUND);
  h.server
    .delete(&format!("/api/sessions/{}", id))
    .await
    .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_open_unknown_session() {
  let h = harness();
  h.server.post("/api/sessions/99/open").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deck_routes_need_open_session() {
  let h = harness();
  h.server.get("/api/deck").await.assert_status(StatusCode::NOT_FOUND);
  h.server.post("/api/deck/skip").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_open_returns_snapshot() {
  let h = harness();
  let deck = create_and_open(&h, "Evening").await;

  assert_eq!(deck["state"], "question_displayed");
  assert_eq!(deck["progress_text"], "0/4");
  assert_eq!(deck["total_available"], 4);
  assert_eq!(deck["favorites_filter"], "none");
  assert_eq!(deck["tag_filters"]["deep"], "none");
  assert!((1..=4).contains(&deck["question_id"].as_i64().unwrap()));
}

#[tokio::test]
async fn test_complete_every_question() {
  let h = harness();
  create_and_open(&h, "Marathon").await;

  let mut last = Value::Null;
  for _ in 0..4 {
    let response: Value = h.server.post("/api/deck/complete").await.json();
    assert_eq!(response["changed"], true);
    last = response["deck"].clone();
  }

  assert_eq!(last["state"], "no_question");
  assert_eq!(last["question_id"], 0);
  assert_eq!(last["question_text"], "No questions available");
  assert_eq!(last["progress_text"], "4/4");

  let again: Value = h.server.post("/api/deck/complete").await.json();
  assert_eq!(again["changed"], false);
  assert_eq!(again["deck"]["completed_for_filter"], 4);
}

#[tokio::test]
async fn test_tag_filter_cycle() {
  let h = harness();
  create_and_open(&h, "Tags").await;

  let include: Value = h.server.post("/api/deck/filters/tags/deep").await.json();
  assert_eq!(include["deck"]["tag_filters"]["deep"], "include");
  assert_eq!(include["deck"]["filtered_total"], 2);
  let id = include["deck"]["question_id"].as_i64().unwrap();
  assert!(id == 1 || id == 2);

  let exclude: Value = h.server.post("/api/deck/filters/tags/deep").await.json();
  assert_eq!(exclude["deck"]["filtered_total"], 2);
  let id = exclude["deck"]["question_id"].as_i64().unwrap();
  assert!(id == 3 || id == 4);

  let none: Value = h.server.post("/api/deck/filters/tags/deep").await.json();
  assert_eq!(none["deck"]["tag_filters"]["deep"], "none");
  assert_eq!(none["deck"]["filtered_total"], 4);

  let unknown: Value = h.server.post("/api/deck/filters/tags/ghost").await.json();
  assert_eq!(unknown["changed"], false);
}

#[tokio::test]
async fn test_favorite_then_filter() {
  let h = harness();
  let deck = create_and_open(&h, "Favs").await;
  let id = deck["question_id"].clone();

  let favorited: Value = h.server.post("/api/deck/favorite").await.json();
  assert_eq!(favorited["changed"], true);
  assert_eq!(favorited["deck"]["is_favorite"], true);

  let filtered: Value = h.server.post("/api/deck/filters/favorites").await.json();
  assert_eq!(filtered["deck"]["favorites_filter"], "include");
  assert_eq!(filtered["deck"]["filtered_total"], 1);
  assert_eq!(filtered["deck"]["question_id"], id);

  let stats: Value = h.server.get("/api/corpus").await.json();
  assert_eq!(stats["corpus_size"], 4);
  assert_eq!(stats["favorites"], 1);
}

#[tokio::test]
async fn test_hide_removes_question() {
  let h = harness();
  let deck = create_and_open(&h, "Hide").await;
  let hidden_id = deck["question_id"].as_i64().unwrap();

  let response: Value = h.server.post("/api/deck/hide").await.json();
  assert_eq!(response["changed"], true);
  assert_eq!(response["deck"]["total_available"], 3);
  assert_ne!(response["deck"]["question_id"].as_i64().unwrap(), hidden_id);

  for _ in 0..20 {
    let skipped: Value = h.server.post("/api/deck/skip").await.json();
    assert_ne!(skipped["deck"]["question_id"].as_i64().unwrap(), hidden_id);
  }

  let stats: Value = h.server.get("/api/corpus").await.json();
  assert_eq!(stats["hidden"], 1);
}

#[tokio::test]
async fn test_tags_listing() {
  let h = harness();
  let tags: Vec<String> = h.server.get("/api/tags").await.json();
  assert_eq!(tags, vec!["deep".to_string(), "light".to_string()]);
}

#[tokio::test]
async fn test_notes_roundtrip() {
  let h = harness();
  create_and_open(&h, "Notes").await;

  let empty: Value = h.server.get("/api/deck/note").await.json();
  assert!(empty.is_null());

  let saved: Value = h
    .server
    .put("/api/deck/note")
    .json(&json!({ "content": "ask again next month" }))
    .await
    .json();
  assert_eq!(saved["content"], "ask again next month");

  let updated: Value = h
    .server
    .put("/api/deck/note")
    .json(&json!({ "content": "done" }))
    .await
    .json();
  assert_eq!(updated["id"], saved["id"]);

  let current: Value = h.server.get("/api/deck/note").await.json();
  assert_eq!(current["content"], "done");
}

#[tokio::test]
async fn test_note_length_limit() {
  let h = harness();
  create_and_open(&h, "Long").await;

  h.server
    .put("/api/deck/note")
    .json(&json!({ "content": "x".repeat(351) }))
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
  h.server
    .put("/api/deck/note")
    .json(&json!({ "content": "x".repeat(350) }))
    .await
    .assert_status_ok();
}

#[tokio::test]
async fn test_busy_deck_rejects_operations() {
  let h = harness();
  create_and_open(&h, "Busy").await;

  let guard = h.state.deck.lock().await;
  h.server.post("/api/deck/skip").await.assert_status(StatusCode::CONFLICT);
  h.server.post("/api/deck/complete").await.assert_status(StatusCode::CONFLICT);
  drop(guard);

  h.server.post("/api/deck/skip").await.assert_status_ok();
}

#[tokio::test]
async fn test_sessions_keep_separate_progress() {
  let h = harness();
  create_and_open(&h, "First").await;
  h.server.post("/api/deck/complete").await;
  h.server.post("/api/deck/complete").await;

  let second = create_and_open(&h, "Second").await;
  assert_eq!(second["progress_text"], "0/4");

  let first_id = h.server.get("/api/sessions").await.json::<Vec<Value>>()[0]["id"].as_i64().unwrap();
  let reopened: Value = h.server.post(&format!("/api/sessions/{}/open", first_id)).await.json();
  assert_eq!(reopened["progress_text"], "2/4");
}

#[tokio::test]
async fn test_missing_corpus_serves_placeholder() {
  let temp = TempDir::new().unwrap();
  let user_db = db::provision_user_db(&temp.path().join("user.db"), None).unwrap();
  let server = TestServer::new(handlers::router(AppState::new(None, user_db))).unwrap();

  let session: Value = server.post("/api/sessions").json(&json!({ "name": "Offline" })).await.json();
  let deck: Value = server
    .post(&format!("/api/sessions/{}/open", session["id"]))
    .await
    .json();

  assert_eq!(deck["state"], "no_question");
  assert_eq!(deck["question_id"], 0);
  let tags: Vec<String> = server.get("/api/tags").await.json();
  assert!(tags.is_empty());
}
