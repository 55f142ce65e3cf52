//! Connection draining for graceful shutdown
//!
//! In-flight requests are counted through an RAII guard so that requests
//! cut short by the timeout layer still release their slot. Once draining
//! starts, new requests get 503 and shutdown waits for the count to reach
//! zero or for the drain timeout, whichever comes first.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::error::ErrorResponse;

/// Drain bookkeeping shared by the middleware and the shutdown task
#[derive(Debug)]
pub struct ShutdownState {
    in_flight: AtomicU64,
    draining: AtomicBool,
    idle: Notify,
    drain_timeout: Duration,
    start_time: Instant,
}

impl ShutdownState {
    pub fn new(drain_timeout: Duration) -> Self {
        Self {
            in_flight: AtomicU64::new(0),
            draining: AtomicBool::new(false),
            idle: Notify::new(),
            drain_timeout,
            start_time: Instant::now(),
        }
    }

    /// Count a request until the returned guard drops
    pub fn track(self: &Arc<Self>) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            state: Arc::clone(self),
        }
    }

    fn release(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    pub fn is_ready(&self) -> bool {
        !self.is_draining()
    }

    /// Stop admitting new requests
    pub fn start_drain(&self) {
        if !self.draining.swap(true, Ordering::SeqCst) {
            info!(in_flight = self.in_flight_count(), "Draining, new requests will be rejected");
        }
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    pub fn status(&self) -> DrainStatus {
        DrainStatus {
            draining: self.is_draining(),
            in_flight_requests: self.in_flight_count(),
            ready: self.is_ready(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Wait until no request is in flight, giving up after the drain timeout.
    ///
    /// Returns whether the drain completed.
    pub async fn wait_for_drain(&self) -> bool {
        let drained = async {
            loop {
                // register before checking so a release in between is not missed
                let idle = self.idle.notified();
                if self.in_flight_count() == 0 {
                    return;
                }
                idle.await;
            }
        };

        match tokio::time::timeout(self.drain_timeout, drained).await {
            Ok(()) => {
                info!("All requests drained");
                true
            }
            Err(_) => {
                warn!(
                    remaining_requests = self.in_flight_count(),
                    timeout_ms = self.drain_timeout.as_millis() as u64,
                    "Drain timeout exceeded, forcing shutdown"
                );
                false
            }
        }
    }
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

/// Releases one in-flight slot on drop
#[derive(Debug)]
pub struct InFlightGuard {
    state: Arc<ShutdownState>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.state.release();
    }
}

/// Drain status response
#[derive(Debug, Serialize)]
pub struct DrainStatus {
    pub draining: bool,
    pub in_flight_requests: u64,
    pub ready: bool,
    pub uptime_seconds: u64,
}

/// Reject requests while draining, count the rest
pub async fn request_tracking_middleware(
    State(shutdown): State<Arc<ShutdownState>>,
    request: Request,
    next: Next,
) -> Result<Response, DrainError> {
    if shutdown.is_draining() {
        return Err(DrainError);
    }

    let _guard = shutdown.track();
    Ok(next.run(request).await)
}

/// Returned for requests that arrive while draining
#[derive(Debug)]
pub struct DrainError;

impl IntoResponse for DrainError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(
            "service_unavailable",
            "Server is shutting down. Please retry your request.",
        )
        .with_code("draining");
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}

/// Resolve on Ctrl+C or SIGTERM, then drain in-flight requests
pub async fn graceful_shutdown(shutdown_state: Arc<ShutdownState>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }

    shutdown_state.start_drain();
    shutdown_state.wait_for_drain().await;
}
