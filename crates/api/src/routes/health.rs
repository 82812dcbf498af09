//! Health check endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::app::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}

/// Basic health check with service identification.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "giftwish-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness probe: the process is up.
async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: the database answers.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
