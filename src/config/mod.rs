//! Configuration module for the M/M/s calculator
//!
//! Provides hierarchical configuration with support for:
//! - YAML/TOML/JSON config files
//! - Environment variable overrides
//! - Validation

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{QueueError, QueueResult};
use crate::report::OutputFormat;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// HTTP front-end configuration
    pub server: ServerConfig,
    /// Telemetry settings
    pub telemetry: TelemetryConfig,
    /// Console output settings
    pub output: OutputConfig,
}

impl CalculatorConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> QueueResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| QueueError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| QueueError::Config(format!("YAML parse error: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| QueueError::Config(format!("TOML parse error: {}", e)))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| QueueError::Config(format!("JSON parse error: {}", e)))?,
            _ => return Err(QueueError::Config(
                "Unsupported config file format. Use .yaml, .toml, or .json".to_string()
            )),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_env() -> QueueResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MMS_QUEUE_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> QueueResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("MMS_QUEUE_PORT") {
            self.server.port = port.parse().map_err(|_| {
                QueueError::Config(format!("Invalid port number: {}", port))
            })?;
        }

        if let Some(host) = lookup("MMS_QUEUE_HOST") {
            self.server.host = host;
        }

        if let Some(secs) = lookup("MMS_QUEUE_TIMEOUT") {
            let secs: u64 = secs.parse().map_err(|_| {
                QueueError::Config(format!("Invalid timeout: {}", secs))
            })?;
            self.server.request_timeout = Duration::from_secs(secs);
        }

        if let Some(format) = lookup("MMS_QUEUE_OUTPUT_FORMAT") {
            self.output.format = format.parse().map_err(QueueError::Config)?;
        }

        if let Some(val) = lookup("MMS_QUEUE_BANNER") {
            self.output.banner = val.parse().map_err(|_| {
                QueueError::Config(format!("Invalid banner flag (expected true or false): {}", val))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> QueueResult<()> {
        self.server.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

/// HTTP front-end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Drain period for graceful shutdown
    #[serde(with = "humantime_serde")]
    pub drain_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 64 * 1024,
            cors_enabled: true,
            drain_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> QueueResult<()> {
        if self.port == 0 {
            return Err(QueueError::Validation {
                message: "Port cannot be 0".to_string(),
                param: Some("server.port".to_string()),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(QueueError::Validation {
                message: "request_timeout must be greater than 0".to_string(),
                param: Some("server.request_timeout".to_string()),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(QueueError::Validation {
                message: "max_body_bytes must be greater than 0".to_string(),
                param: Some("server.max_body_bytes".to_string()),
            });
        }
        Ok(())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> QueueResult<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| QueueError::Config(format!("Invalid socket address: {}", e)))
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Enable telemetry
    pub enabled: bool,
    /// Log level
    pub log_level: String,
    /// Enable JSON logging
    pub json_logs: bool,
    /// Prometheus metrics endpoint path
    pub metrics_path: String,
    /// Service name for tracing
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
            metrics_path: "/metrics".to_string(),
            service_name: "mms-queue".to_string(),
        }
    }
}

/// Routes the metrics endpoint may not shadow
const RESERVED_PATHS: [&str; 11] = [
    "/",
    "/health",
    "/healthz",
    "/ready",
    "/readyz",
    "/version",
    "/v1/queue/metrics",
    "/v1/queue/rate",
    "/admin/stats",
    "/admin/stats/reset",
    "/admin/drain",
];

impl TelemetryConfig {
    pub fn validate(&self) -> QueueResult<()> {
        if self.log_level.trim().is_empty() {
            return Err(QueueError::Validation {
                message: "log_level cannot be empty".to_string(),
                param: Some("telemetry.log_level".to_string()),
            });
        }
        if !self.metrics_path.starts_with('/') {
            return Err(QueueError::Validation {
                message: "metrics_path must start with '/'".to_string(),
                param: Some("telemetry.metrics_path".to_string()),
            });
        }
        if RESERVED_PATHS.contains(&self.metrics_path.as_str()) {
            return Err(QueueError::Validation {
                message: format!("metrics_path '{}' is already served", self.metrics_path),
                param: Some("telemetry.metrics_path".to_string()),
            });
        }
        Ok(())
    }
}

/// Console output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format for interactive and calc runs
    pub format: OutputFormat,
    /// Print the title banner before prompting
    pub banner: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            banner: true,
        }
    }
}

/// Helper module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    /// Suffixes in match order; `ms` must precede `s` and `m`
    const UNITS: [(&str, u64); 3] = [("ms", 1), ("s", 1_000), ("m", 60_000)];

    /// Parse `500ms`, `30s`, `2m` or a bare number of seconds
    pub(super) fn parse_duration(raw: &str) -> Result<Duration, String> {
        let raw = raw.trim();
        let (digits, millis_per_unit) = UNITS
            .iter()
            .find_map(|&(suffix, scale)| raw.strip_suffix(suffix).map(|d| (d, scale)))
            .unwrap_or((raw, 1_000));

        digits
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(millis_per_unit))
            .map(Duration::from_millis)
            .ok_or_else(|| format!("invalid duration '{}', expected e.g. 500ms, 30s or 2m", raw))
    }
}
