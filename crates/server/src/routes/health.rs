use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::db::Repository;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": "catalogo-server" }))
}

pub async fn readiness_check(State(repo): State<Repository>) -> impl IntoResponse {
    match repo.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(err) => {
            tracing::warn!(%err, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
