//! Server state management

use std::sync::Arc;
use crate::config::CalculatorConfig;
use crate::engine::QueueCalculator;
use crate::telemetry::CalculatorMetrics;
use super::shutdown::ShutdownState;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<QueueCalculator>,
    pub metrics: Arc<CalculatorMetrics>,
    pub config: Arc<CalculatorConfig>,
    pub shutdown: Arc<ShutdownState>,
}

impl AppState {
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            calculator: Arc::new(QueueCalculator::new()),
            metrics: Arc::new(CalculatorMetrics::new()),
            shutdown: Arc::new(ShutdownState::new(config.server.drain_timeout)),
            config: Arc::new(config),
        }
    }
}
