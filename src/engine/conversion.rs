//! Rate normalization

use crate::error::QueueResult;
use crate::types::{validate_positive, RateInput, TimeUnit, ValueKind};

/// Convert a rate or mean duration expressed in `unit` into events per second.
///
/// A rate is events per `unit`; a mean is `unit`s per event.
pub fn convert_to_rate(kind: ValueKind, value: f64, unit: TimeUnit) -> QueueResult<f64> {
    validate_positive("value", value)?;

    let seconds = unit.seconds();
    let rate = match kind {
        ValueKind::Rate => value / seconds,
        ValueKind::Mean => 1.0 / (value * seconds),
    };

    Ok(rate)
}

impl RateInput {
    /// Events per second for this input in `unit`
    pub fn per_second(&self, unit: TimeUnit) -> QueueResult<f64> {
        convert_to_rate(self.kind, self.value, unit)
    }
}
