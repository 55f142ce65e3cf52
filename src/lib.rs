//! # mms-queue
//!
//! Steady-state performance metrics for M/M/s queues: Poisson arrivals,
//! exponential service, `s` identical parallel servers.
//!
//! Inputs may be given as rates or as mean durations in hours, minutes or
//! seconds. They are normalized to events per second and evaluated with the
//! closed-form M/M/1 expressions or the Erlang-C based M/M/s expressions.
//!
//! ## Features
//!
//! - **Closed form**: no simulation, one evaluation per run
//! - **Typed outcomes**: unstable systems (ρ ≥ 1) are a distinct result
//! - **Console and HTTP**: interactive prompts, one-shot CLI, JSON API
//!
//! ## Quick Start
//!
//! ```rust
//! use mms_queue::engine::compute_metrics;
//!
//! let outcome = compute_metrics(2.0, 5.0, 1).unwrap();
//! let metrics = outcome.into_metrics().unwrap();
//! assert!((metrics.p0 - 0.6).abs() < 1e-9);
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod server;
pub mod telemetry;
pub mod types;

pub use config::CalculatorConfig;
pub use engine::{compute_metrics, convert_to_rate, factorial, QueueCalculator};
pub use error::{QueueError, QueueResult};
pub use report::format_time;
pub use server::run_server;
pub use types::{Metrics, Outcome, QueueInputs, RateInput, TimeUnit, ValueKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;
