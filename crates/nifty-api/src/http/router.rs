//! Axum router configuration with middleware.
//!
//! Middleware: permissive CORS and request tracing.

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/health", get(health_check))
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness probe, independent of storage and the agent.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
