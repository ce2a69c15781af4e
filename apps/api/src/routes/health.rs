use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /
pub async fn live_handler() -> &'static str {
    "Server is Live"
}

/// GET /health
/// Reports service version and whether the resume store answers.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, database) = match state.resumes.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!("Health check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status.is_success() { "ok" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "service": "resume-api",
            "database": database
        })),
    )
}
