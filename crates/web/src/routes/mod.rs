//! HTTP route handlers.

use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

pub mod products;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .route("/health", get(health))
        .merge(products::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
