//! Calculator input types

use serde::{Deserialize, Serialize};

use super::{TimeUnit, ValueKind};
use crate::error::{QueueError, QueueResult};

/// A rate or mean duration, expressed in the run's time unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateInput {
    pub kind: ValueKind,
    pub value: f64,
}

impl RateInput {
    pub fn rate(value: f64) -> Self {
        Self {
            kind: ValueKind::Rate,
            value,
        }
    }

    pub fn mean(value: f64) -> Self {
        Self {
            kind: ValueKind::Mean,
            value,
        }
    }

    /// Reject non-positive and non-finite values, naming `field`
    pub fn validate(&self, field: &str) -> QueueResult<()> {
        validate_positive(field, self.value)
    }
}

/// Everything one calculator run needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueInputs {
    pub arrival: RateInput,
    pub service: RateInput,
    #[serde(default)]
    pub time_unit: TimeUnit,
    pub servers: u32,
}

impl QueueInputs {
    pub fn new(arrival: RateInput, service: RateInput, time_unit: TimeUnit, servers: u32) -> Self {
        Self {
            arrival,
            service,
            time_unit,
            servers,
        }
    }

    pub fn validate(&self) -> QueueResult<()> {
        self.arrival.validate("arrival value")?;
        self.service.validate("service value")?;
        validate_servers(self.servers)
    }
}

pub(crate) fn validate_positive(field: &str, value: f64) -> QueueResult<()> {
    if !value.is_finite() {
        return Err(QueueError::invalid_input(
            field,
            format!("expected a finite number, got {}", value),
        ));
    }
    if value <= 0.0 {
        return Err(QueueError::invalid_input(
            field,
            format!("must be greater than 0, got {}", value),
        ));
    }
    Ok(())
}

pub(crate) fn validate_servers(servers: u32) -> QueueResult<()> {
    if servers == 0 {
        return Err(QueueError::invalid_input("servers", "must be at least 1"));
    }
    Ok(())
}
