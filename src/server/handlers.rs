//! HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::shutdown::DrainStatus;
use super::state::AppState;
use crate::engine::{compute_metrics, convert_to_rate, CalculatorStats};
use crate::error::QueueError;
use crate::report::MetricsReport;
use crate::telemetry::EvaluationTimer;
use crate::types::{Outcome, QueueInputs, TimeUnit, ValueKind};

fn reject(state: &AppState, rejection: JsonRejection) -> QueueError {
    let err = QueueError::invalid_input("body", rejection.body_text());
    state.metrics.record_error(err.error_type());
    err
}

// ============== Queue Handlers ==============

/// POST /v1/queue/metrics
pub async fn queue_metrics(
    State(state): State<AppState>,
    payload: Result<Json<QueueInputs>, JsonRejection>,
) -> Result<Json<MetricsReport>, QueueError> {
    state.metrics.record_request("/v1/queue/metrics");
    let Json(inputs) = payload.map_err(|e| reject(&state, e))?;

    let timer = EvaluationTimer::start(&state.metrics);
    let result = state
        .calculator
        .evaluate(&inputs)
        .and_then(|outcome| {
            timer.finish(outcome.label());
            outcome.into_metrics()
        });

    match result {
        Ok(metrics) => Ok(Json(MetricsReport::from(metrics))),
        Err(e) => {
            state.metrics.record_error(e.error_type());
            Err(e)
        }
    }
}

/// Body of POST /v1/queue/rate
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateRequest {
    pub kind: ValueKind,
    pub value: f64,
    #[serde(default)]
    pub time_unit: TimeUnit,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateResponse {
    pub kind: ValueKind,
    pub value: f64,
    pub time_unit: TimeUnit,
    pub rate_per_second: f64,
}

/// POST /v1/queue/rate
pub async fn queue_rate(
    State(state): State<AppState>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> Result<Json<RateResponse>, QueueError> {
    state.metrics.record_request("/v1/queue/rate");
    let Json(request) = payload.map_err(|e| reject(&state, e))?;

    let rate = convert_to_rate(request.kind, request.value, request.time_unit).map_err(|e| {
        state.metrics.record_error(e.error_type());
        e
    })?;

    Ok(Json(RateResponse {
        kind: request.kind,
        value: request.value,
        time_unit: request.time_unit,
        rate_per_second: rate,
    }))
}

// ============== Admin Handlers ==============

/// Statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub calculator: CalculatorStats,
    pub unstable_rate: f64,
    pub mean_evaluation_ns: u64,
    pub uptime_seconds: u64,
    pub in_flight_requests: u64,
}

/// GET /admin/stats
pub async fn get_stats(
    State(state): State<AppState>,
) -> Json<StatsResponse> {
    let stats = state.calculator.stats();
    Json(StatsResponse {
        unstable_rate: stats.unstable_rate(),
        mean_evaluation_ns: stats.mean_duration().as_nanos() as u64,
        calculator: stats,
        uptime_seconds: state.calculator.uptime().as_secs(),
        in_flight_requests: state.shutdown.in_flight_count(),
    })
}

/// POST /admin/stats/reset
pub async fn reset_stats(
    State(state): State<AppState>,
) -> StatusCode {
    state.calculator.reset_stats();
    state.metrics.reset();
    StatusCode::NO_CONTENT
}

/// GET /admin/drain
pub async fn drain_status(
    State(state): State<AppState>,
) -> Json<DrainStatus> {
    Json(state.shutdown.status())
}

/// POST /admin/drain
pub async fn start_drain(
    State(state): State<AppState>,
) -> Json<DrainStatus> {
    state.shutdown.start_drain();
    Json(state.shutdown.status())
}

// ============== Health Handlers ==============

/// Textbook M/M/1 case evaluated by every health probe
const REFERENCE_LAMBDA: f64 = 2.0;
const REFERENCE_MU: f64 = 5.0;
const REFERENCE_P0: f64 = 0.6;

/// Result of evaluating the reference queue
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceCheck {
    pub lambda: f64,
    pub mu: f64,
    pub expected_p0: f64,
    pub p0: Option<f64>,
    pub pass: bool,
}

impl ReferenceCheck {
    fn run() -> Self {
        let p0 = match compute_metrics(REFERENCE_LAMBDA, REFERENCE_MU, 1) {
            Ok(Outcome::Stable(m)) => Some(m.p0),
            _ => None,
        };
        Self {
            lambda: REFERENCE_LAMBDA,
            mu: REFERENCE_MU,
            expected_p0: REFERENCE_P0,
            pass: p0.is_some_and(|p| (p - REFERENCE_P0).abs() < 1e-9),
            p0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub draining: bool,
    pub reference: ReferenceCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reference = ReferenceCheck::run();
    let draining = state.shutdown.is_draining();

    let (code, status) = if reference.pass && !draining {
        (StatusCode::OK, HealthStatus::Healthy)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Unhealthy)
    };

    let body = HealthResponse {
        status,
        version: crate::VERSION,
        uptime_seconds: state.calculator.uptime().as_secs(),
        timestamp: chrono::Utc::now(),
        draining,
        reference,
    };
    (code, Json(body))
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// GET /ready
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if state.shutdown.is_ready() {
        (StatusCode::OK, Json(ReadyResponse { ready: true, reason: None }))
    } else {
        let body = ReadyResponse { ready: false, reason: Some("draining") };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body))
    }
}

/// GET /metrics
pub async fn metrics(
    State(state): State<AppState>,
) -> String {
    state.metrics.set_active_requests(state.shutdown.in_flight_count());
    state.metrics.export()
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub rust_version: &'static str,
}

/// GET /version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: crate::VERSION,
        rust_version: env!("CARGO_PKG_RUST_VERSION"),
    })
}

/// Routes listed by GET /
const ENDPOINTS: [&str; 6] = [
    "/v1/queue/metrics",
    "/v1/queue/rate",
    "/health",
    "/ready",
    "/metrics",
    "/admin/stats",
];

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: &'static [&'static str],
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        name: "M/M/s Queue Calculator",
        version: crate::VERSION,
        description: env!("CARGO_PKG_DESCRIPTION"),
        endpoints: &ENDPOINTS,
    })
}
