//! Queue model types
//!
//! Inputs accepted by the calculator (how a rate is expressed and in which
//! time unit) and the outcome it produces.

mod inputs;
mod outcome;

pub use inputs::*;
pub use outcome::*;
pub(crate) use inputs::{validate_positive, validate_servers};

use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// Whether a supplied value is a rate or a mean duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Events per time unit
    #[serde(alias = "r")]
    Rate,
    /// Time units per event
    #[serde(alias = "m")]
    Mean,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rate => write!(f, "rate"),
            Self::Mean => write!(f, "mean"),
        }
    }
}

impl std::str::FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "r" | "rate" => Ok(Self::Rate),
            "m" | "mean" => Ok(Self::Mean),
            other => Err(format!("expected 'r' (rate) or 'm' (mean), got '{}'", other)),
        }
    }
}

/// Time unit in which rates and means are expressed.
///
/// Parsing never fails: `hour` and `min` are recognized, every other label
/// (including misspellings) is treated as seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeUnit {
    Hour,
    Minute,
    #[default]
    Second,
}

impl TimeUnit {
    /// Seconds per unit
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Hour => 3600.0,
            Self::Minute => 60.0,
            Self::Second => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Minute => "min",
            Self::Second => "sec",
        }
    }

    /// Whether `raw` names a unit explicitly rather than falling back to seconds
    pub fn is_recognized(raw: &str) -> bool {
        matches!(raw.trim().to_lowercase().as_str(), "hour" | "min" | "sec")
    }

    /// Parse a user-supplied label, warning when it falls back to seconds
    pub fn parse_lenient(raw: &str) -> Self {
        if !Self::is_recognized(raw) {
            tracing::warn!(unit = %raw, "Unrecognized time unit, treating values as per-second");
        }
        Self::from(raw)
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for TimeUnit {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "hour" => Self::Hour,
            "min" => Self::Minute,
            _ => Self::Second,
        }
    }
}

impl From<String> for TimeUnit {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<TimeUnit> for String {
    fn from(unit: TimeUnit) -> Self {
        unit.label().to_string()
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
