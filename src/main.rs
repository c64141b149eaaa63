use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prompt_deck::{config::AppConfig, db, handlers, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "prompt_deck=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = AppConfig::load();

  // A missing corpus is not fatal: every deck shows the placeholder instead
  let corpus = match db::open_corpus(&config.corpus_db_path) {
    Ok(pool) => Some(pool),
    Err(e) => {
      tracing::error!("Corpus unavailable ({}), serving placeholder only", e);
      None
    }
  };

  let user_db = match db::provision_user_db_or_in_memory(&config.user_db_path, Some(&config.user_seed_path)) {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!("No user datastore could be opened: {}", e);
      return;
    }
  };

  let app = handlers::router(AppState::new(corpus, user_db));

  let bind_addr = config.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
