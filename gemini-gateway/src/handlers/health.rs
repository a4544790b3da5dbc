use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Liveness check.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gemini-gateway",
        "model": state.text_provider.model(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check: the model provider must answer.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    match state.text_provider.health_check().await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::warn!(error = %e, "Model provider not ready");
            Err(AppError::ServiceUnavailable)
        }
    }
}
