//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::state::AppState;

/// Calculator API routes
pub fn queue_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/queue/metrics", post(handlers::queue_metrics))
        .route("/v1/queue/rate", post(handlers::queue_rate))
}

/// Admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(handlers::get_stats))
        .route("/admin/stats/reset", post(handlers::reset_stats))
        .route("/admin/drain", get(handlers::drain_status).post(handlers::start_drain))
}

/// Health and metrics routes
pub fn health_routes(metrics_path: &str) -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/healthz", get(handlers::health_check))
        .route("/ready", get(handlers::ready_check))
        .route("/readyz", get(handlers::ready_check))
        .route(metrics_path, get(handlers::metrics))
        .route("/version", get(handlers::version))
        .route("/", get(handlers::root))
}
