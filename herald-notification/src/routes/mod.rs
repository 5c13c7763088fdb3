use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod health;
pub mod notifications;
pub mod preferences;

/// Build the full HTTP surface of the service.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/notifications/preferences",
            get(preferences::get_preference).post(preferences::upsert_preference),
        )
        .route(
            "/notifications",
            get(notifications::notification_history).post(notifications::send_notification),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api)
        .layer(middleware::from_fn(herald_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
