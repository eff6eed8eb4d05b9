pub mod events;
mod extract;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().merge(events::routes())
}

/// Full application router with the shared state applied.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Event Tickets API v0.1" }))
        .route("/health", get(health))
        .merge(routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let environment = state.config.app.environment.as_str();
    let storage = match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => "postgres",
            Err(e) => {
                error!(error = ?e, "Health check failed to reach the database");
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "status": "unavailable",
                        "storage": "postgres",
                        "environment": environment,
                    })),
                );
            }
        },
        None => "memory",
    };

    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "storage": storage, "environment": environment })),
    )
}
