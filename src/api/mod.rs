mod auth;
mod errors;
mod handlers;
mod state;

use axum::{Router, routing::get};
use tokio::net::TcpListener;

pub use auth::{AdminAuth, TelegramAuth, authenticate};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::MeResponse;
pub use state::{AppState, AuthConfig};

use crate::config::Config;

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/me", get(handlers::me))
        .route("/api/admin/me", get(handlers::admin_me))
        .with_state(state)
}

/// Binds `config.bind_address` and serves the API until the process exits.
pub async fn serve(config: &Config) -> std::io::Result<()> {
    let listener = bind(config).await?;
    serve_on(listener, AppState::new(AuthConfig::from_config(config))).await
}

/// Binds the API listener. Bind failures surface here, before anything is
/// spawned.
pub async fn bind(config: &Config) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!("HTTP API listening on {}", config.bind_address);
    Ok(listener)
}

/// Serves the API on an already bound `listener`.
pub async fn serve_on(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}
