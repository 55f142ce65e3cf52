//! HTTP server implementation
//!
//! Axum front-end exposing the calculator as a JSON API, plus health,
//! readiness, Prometheus metrics and admin endpoints.

mod handlers;
mod middleware;
mod routes;
mod state;
pub mod shutdown;

pub use handlers::*;
pub use middleware::*;
pub use routes::*;
pub use shutdown::*;
pub use state::*;

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::config::CalculatorConfig;
use crate::telemetry::init_telemetry;

/// Run the calculator server until Ctrl+C or SIGTERM
pub async fn run_server(config: CalculatorConfig) -> anyhow::Result<()> {
    init_telemetry(&config.telemetry)?;

    let addr: SocketAddr = config.server.socket_addr()?;

    let state = AppState::new(config.clone());
    let shutdown_state = state.shutdown.clone();
    let app = create_router(state);

    info!(
        "Starting M/M/s queue calculator v{} on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );
    info!("Request timeout: {:?}", config.server.request_timeout);
    info!("CORS: {}", if config.server.cors_enabled { "enabled" } else { "disabled" });

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown(shutdown_state))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout));

    let mut router = Router::new()
        .merge(routes::queue_routes())
        .merge(routes::admin_routes())
        .merge(routes::health_routes(&config.telemetry.metrics_path))
        .layer(axum::middleware::from_fn_with_state(
            state.shutdown.clone(),
            request_tracking_middleware,
        ))
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(middleware);

    if config.server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
