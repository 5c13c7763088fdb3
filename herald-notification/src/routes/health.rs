use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use herald_shared::{HealthCheck, HealthResponse};

use crate::AppState;

/// Health check that probes the configured storage backend.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let storage = match state.service.storage_ready() {
        Ok(()) => HealthCheck::healthy("storage"),
        Err(e) => HealthCheck::unhealthy("storage", e.to_string()),
    };

    let response = HealthResponse::healthy("herald-notification", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![storage]);

    (response.http_status(), Json(response)).into_response()
}

/// Prometheus exposition; 404 when no recorder was installed.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
