//! Queue metrics calculator
//!
//! The computational core: rate normalization and the closed-form M/M/s
//! formulas are free functions; `QueueCalculator` runs them for a full set
//! of inputs and keeps evaluation statistics for long-running front-ends.

mod conversion;
mod formulas;
mod state;

pub use conversion::*;
pub use formulas::*;
pub use state::*;

use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::QueueResult;
use crate::types::{Outcome, QueueInputs};

/// Evaluates queue inputs and records what it saw
pub struct QueueCalculator {
    state: CalculatorState,
    start_time: Instant,
}

impl QueueCalculator {
    pub fn new() -> Self {
        Self {
            state: CalculatorState::new(),
            start_time: Instant::now(),
        }
    }

    /// Get calculator uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Convert both inputs to per-second rates and evaluate the model
    pub fn evaluate(&self, inputs: &QueueInputs) -> QueueResult<Outcome> {
        let start = Instant::now();

        let outcome = match evaluate(inputs) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state.record_invalid();
                return Err(e);
            }
        };

        let elapsed = start.elapsed();
        if outcome.is_stable() {
            self.state.record_stable(elapsed);
        } else {
            self.state.record_unstable(elapsed);
        }

        debug!(
            servers = inputs.servers,
            time_unit = %inputs.time_unit,
            rho = outcome.rho(),
            outcome = outcome.label(),
            elapsed_ns = elapsed.as_nanos() as u64,
            "Evaluated M/M/s model"
        );

        Ok(outcome)
    }

    /// Get current statistics
    pub fn stats(&self) -> CalculatorStats {
        self.state.stats()
    }

    /// Reset statistics
    pub fn reset_stats(&self) {
        self.state.reset();
    }
}

impl Default for QueueCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless evaluation of one set of inputs
pub fn evaluate(inputs: &QueueInputs) -> QueueResult<Outcome> {
    inputs.validate()?;

    let lambda = inputs.arrival.per_second(inputs.time_unit)?;
    let mu = inputs.service.per_second(inputs.time_unit)?;

    compute_metrics(lambda, mu, inputs.servers)
}
