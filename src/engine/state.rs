//! Calculator statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Thread-safe evaluation counters
pub struct CalculatorState {
    total_evaluations: AtomicU64,
    stable: AtomicU64,
    unstable: AtomicU64,
    invalid: AtomicU64,
    total_duration_ns: AtomicU64,
}

impl CalculatorState {
    pub fn new() -> Self {
        Self {
            total_evaluations: AtomicU64::new(0),
            stable: AtomicU64::new(0),
            unstable: AtomicU64::new(0),
            invalid: AtomicU64::new(0),
            total_duration_ns: AtomicU64::new(0),
        }
    }

    pub fn record_stable(&self, elapsed: Duration) {
        self.total_evaluations.fetch_add(1, Ordering::Relaxed);
        self.stable.fetch_add(1, Ordering::Relaxed);
        self.add_duration(elapsed);
    }

    pub fn record_unstable(&self, elapsed: Duration) {
        self.total_evaluations.fetch_add(1, Ordering::Relaxed);
        self.unstable.fetch_add(1, Ordering::Relaxed);
        self.add_duration(elapsed);
    }

    pub fn record_invalid(&self) {
        self.total_evaluations.fetch_add(1, Ordering::Relaxed);
        self.invalid.fetch_add(1, Ordering::Relaxed);
    }

    fn add_duration(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.total_duration_ns.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Get current statistics
    pub fn stats(&self) -> CalculatorStats {
        CalculatorStats {
            total_evaluations: self.total_evaluations.load(Ordering::Relaxed),
            stable: self.stable.load(Ordering::Relaxed),
            unstable: self.unstable.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            total_duration_ns: self.total_duration_ns.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics
    pub fn reset(&self) {
        self.total_evaluations.store(0, Ordering::Relaxed);
        self.stable.store(0, Ordering::Relaxed);
        self.unstable.store(0, Ordering::Relaxed);
        self.invalid.store(0, Ordering::Relaxed);
        self.total_duration_ns.store(0, Ordering::Relaxed);
    }
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of calculator statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorStats {
    pub total_evaluations: u64,
    pub stable: u64,
    pub unstable: u64,
    pub invalid: u64,
    pub total_duration_ns: u64,
}

impl CalculatorStats {
    /// Share of evaluations that ended unstable
    pub fn unstable_rate(&self) -> f64 {
        if self.total_evaluations == 0 {
            0.0
        } else {
            self.unstable as f64 / self.total_evaluations as f64
        }
    }

    /// Mean evaluation time over completed (stable or unstable) evaluations
    pub fn mean_duration(&self) -> Duration {
        let completed = self.stable + self.unstable;
        if completed == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_duration_ns / completed)
        }
    }
}
