//! Error types for the M/M/s calculator

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calculator operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Process exit code for malformed or non-positive input
pub const EXIT_INVALID_INPUT: u8 = 2;

/// Process exit code for an unstable system (rho >= 1)
pub const EXIT_UNSTABLE: u8 = 3;

/// Main error type for calculator operations
#[derive(Error, Debug, Clone)]
pub enum QueueError {
    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error(
        "System is unstable: rho = {rho:.4} >= 1 (lambda = {lambda:e}/s, mu = {mu:e}/s, s = {servers})"
    )]
    UnstableSystem {
        lambda: f64,
        mu: f64,
        servers: u32,
        rho: f64,
    },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        param: Option<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueueError {
    /// Build an `InvalidInput` error for the named field
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::UnstableSystem { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &str {
        match self {
            Self::InvalidInput { .. } | Self::Validation { .. } => "invalid_request_error",
            Self::UnstableSystem { .. } => "unstable_system",
            Self::Config(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Process exit code used by the CLI for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput { .. } => EXIT_INVALID_INPUT,
            Self::UnstableSystem { .. } => EXIT_UNSTABLE,
            _ => 1,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let mut response = ErrorResponse::new(self.error_type(), &self.to_string());

        match self {
            Self::InvalidInput { field, .. } => {
                response = response.with_param(field);
            }
            Self::Validation { param: Some(p), .. } => {
                response = response.with_param(p);
            }
            Self::UnstableSystem { rho, .. } => {
                response = response.with_code("rho_at_or_above_one").with_rho(*rho);
            }
            _ => {}
        }

        response
    }
}

/// JSON error body returned by the HTTP front-end
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rho: Option<f64>,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: ErrorDetail {
                message: message.to_string(),
                error_type: error_type.to_string(),
                param: None,
                code: None,
                rho: None,
            },
        }
    }

    pub fn with_param(mut self, param: &str) -> Self {
        self.error.param = Some(param.to_string());
        self
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.error.code = Some(code.to_string());
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.error.rho = Some(rho);
        self
    }
}

impl IntoResponse for QueueError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_error_response());
        (status, body).into_response()
    }
}

impl From<std::io::Error> for QueueError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_input("body", err.to_string())
    }
}
