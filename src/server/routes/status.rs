//! Dependency health reporting

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::server::state::AppState;
use crate::types::response::{ComponentStatus, StatusResponse};

/// GET /api/status - probe the store and the model service independently
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<StatusResponse>) {
    let database = match state.db().health_check() {
        Ok(()) => ComponentStatus::ok(),
        Err(e) => {
            tracing::warn!(error = %e, "database health probe failed");
            ComponentStatus::error(e.to_string())
        }
    };

    let model = match state.embedder().health_check().await {
        Ok(true) => ComponentStatus::ok(),
        Ok(false) => ComponentStatus::error("model service unreachable"),
        Err(e) => {
            tracing::warn!(error = %e, "model health probe failed");
            ComponentStatus::error(e.to_string())
        }
    };

    let overall = match (database.is_ok(), model.is_ok()) {
        (true, true) => "healthy",
        (false, false) => "unhealthy",
        _ => "degraded",
    };

    let code = match overall {
        "healthy" => StatusCode::OK,
        "degraded" => StatusCode::MULTI_STATUS,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };

    let body = StatusResponse {
        database,
        model,
        overall: overall.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };

    (code, Json(body))
}
