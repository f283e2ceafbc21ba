mod config;
mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use kotoba_core::EntryStore;
use tower_http::trace::TraceLayer;

use config::Config;

pub struct AppState {
    store: EntryStore,
    request_timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(message) => {
            tracing::error!(%message, "invalid configuration");
            std::process::exit(1);
        }
    };

    let pool = match sqlx::PgPool::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to database");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        store: EntryStore::new(pool),
        request_timeout_ms: config.request_timeout_ms,
    });

    let app = Router::new()
        .route("/", get(|| async { "pong" }))
        .route("/v1/search", get(routes::search))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
