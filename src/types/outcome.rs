//! Calculator outcome types

use serde::{Deserialize, Serialize};

use crate::error::{QueueError, QueueResult};

/// Steady-state metrics of a stable M/M/s system.
///
/// Rates are per second; `wq` and `ws` are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Arrival rate
    pub lambda: f64,
    /// Service rate of one server
    pub mu: f64,
    pub servers: u32,
    /// Traffic intensity, lambda / (s * mu)
    pub rho: f64,
    /// Probability the system is empty
    pub p0: f64,
    /// Expected number waiting
    pub lq: f64,
    /// Expected number in system
    pub ls: f64,
    /// Expected wait in queue
    pub wq: f64,
    /// Expected time in system
    pub ws: f64,
}

/// Why no metrics exist: the queue grows without bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Instability {
    pub lambda: f64,
    pub mu: f64,
    pub servers: u32,
    pub rho: f64,
}

impl From<Instability> for QueueError {
    fn from(i: Instability) -> Self {
        QueueError::UnstableSystem {
            lambda: i.lambda,
            mu: i.mu,
            servers: i.servers,
            rho: i.rho,
        }
    }
}

/// Result of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Stable(Metrics),
    Unstable(Instability),
}

impl Outcome {
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable(_))
    }

    pub fn rho(&self) -> f64 {
        match self {
            Self::Stable(m) => m.rho,
            Self::Unstable(i) => i.rho,
        }
    }

    /// Label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stable(_) => "stable",
            Self::Unstable(_) => "unstable",
        }
    }

    /// Metrics, or `QueueError::UnstableSystem`
    pub fn into_metrics(self) -> QueueResult<Metrics> {
        match self {
            Self::Stable(m) => Ok(m),
            Self::Unstable(i) => Err(i.into()),
        }
    }
}
