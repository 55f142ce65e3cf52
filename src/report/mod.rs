//! Result presentation
//!
//! Turns an [`Outcome`] into the console report or its JSON form. Nothing
//! here computes; it only picks units and precision.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::types::{Metrics, Outcome};

pub const TITLE: &str = "=== M/M/s Queue Simulation ===";
pub const FOOTER: &str = "=== Simulation Complete ===";
pub const UNSTABLE_MESSAGE: &str = "⚠️ The system is unstable (λ ≥ sμ). Simulation cannot proceed.";

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Render a duration in seconds as sec, min or hr with two decimals
pub fn format_time(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{:.2} sec", seconds)
    } else if seconds < 3600.0 {
        format!("{:.2} min", seconds / 60.0)
    } else {
        format!("{:.2} hr", seconds / 3600.0)
    }
}

/// Scientific notation with six decimals and a signed, three-digit exponent
/// (`2.000000E+000`)
pub fn format_scientific(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}E{}{:03}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

/// The `--- Results ---` block for stable metrics
pub fn render_metrics(metrics: &Metrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Results ---");
    let _ = writeln!(out, "Lambda (Arrival Rate): {} per second", format_scientific(metrics.lambda));
    let _ = writeln!(out, "Mu (Service Rate): {} per second", format_scientific(metrics.mu));
    let _ = writeln!(out, "s (Servers): {}", metrics.servers);
    let _ = writeln!(out, "Rho (Traffic Intensity): {:.4}", metrics.rho);
    let _ = writeln!(out, "P0 (Idle Probability): {:.6}", metrics.p0);
    let _ = writeln!(out, "Lq (Avg. number in queue): {:.4}", metrics.lq);
    let _ = writeln!(out, "Ls (Avg. number in system): {:.4}", metrics.ls);
    let _ = writeln!(out, "Wq (Avg. waiting time in queue): {}", format_time(metrics.wq));
    let _ = writeln!(out, "Ws (Avg. time in system): {}", format_time(metrics.ws));
    out
}

/// Full text report. Unstable outcomes render only the warning.
pub fn render_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Stable(metrics) => format!("\n{}\n{}\n", render_metrics(metrics), FOOTER),
        Outcome::Unstable(_) => format!("\n{}\n", UNSTABLE_MESSAGE),
    }
}

/// Human-readable times that accompany JSON metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTimes {
    pub wq: String,
    pub ws: String,
}

impl From<&Metrics> for DisplayTimes {
    fn from(metrics: &Metrics) -> Self {
        Self {
            wq: format_time(metrics.wq),
            ws: format_time(metrics.ws),
        }
    }
}

/// JSON report for a stable outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub status: String,
    pub metrics: Metrics,
    pub display: DisplayTimes,
}

impl From<Metrics> for MetricsReport {
    fn from(metrics: Metrics) -> Self {
        Self {
            status: "stable".to_string(),
            display: DisplayTimes::from(&metrics),
            metrics,
        }
    }
}

/// JSON rendering of any outcome
pub fn render_json(outcome: &Outcome) -> serde_json::Result<String> {
    match outcome {
        Outcome::Stable(metrics) => serde_json::to_string_pretty(&MetricsReport::from(*metrics)),
        Outcome::Unstable(_) => serde_json::to_string_pretty(outcome),
    }
}

/// Render in the requested format
pub fn render(outcome: &Outcome, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(outcome)),
        OutputFormat::Json => render_json(outcome),
    }
}
