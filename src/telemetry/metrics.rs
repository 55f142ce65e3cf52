//! Prometheus metrics for the HTTP front-end
//!
//! The metric set is fixed, so each family is a typed field rather than an
//! entry in a name-keyed registry. Export writes `# HELP` and `# TYPE` once
//! per family followed by its series.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

/// Upper bounds of histogram buckets, in seconds
const BUCKETS: [f64; 10] = [
    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.1,
];

/// Metric names
pub mod metric_names {
    pub const REQUESTS_TOTAL: &str = "mms_queue_requests_total";
    pub const ACTIVE_REQUESTS: &str = "mms_queue_active_requests";
    pub const EVALUATIONS_TOTAL: &str = "mms_queue_evaluations_total";
    pub const EVALUATION_DURATION: &str = "mms_queue_evaluation_duration_seconds";
    pub const ERRORS_TOTAL: &str = "mms_queue_errors_total";
}

/// Counter family split by a single label
pub struct LabeledCounter {
    name: &'static str,
    help: &'static str,
    label: &'static str,
    series: RwLock<BTreeMap<String, AtomicU64>>,
}

impl LabeledCounter {
    pub fn new(name: &'static str, help: &'static str, label: &'static str) -> Self {
        Self {
            name,
            help,
            label,
            series: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn inc(&self, label_value: &str) {
        if let Some(counter) = self.series.read().get(label_value) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.series
            .write()
            .entry(label_value.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, label_value: &str) -> u64 {
        self.series
            .read()
            .get(label_value)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Sum over all label values
    pub fn total(&self) -> u64 {
        self.series
            .read()
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    fn write_to(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} counter", self.name);
        for (value, counter) in self.series.read().iter() {
            let _ = writeln!(
                out,
                "{}{{{}=\"{}\"}} {}",
                self.name,
                self.label,
                value,
                counter.load(Ordering::Relaxed)
            );
        }
    }

    fn reset(&self) {
        self.series.write().clear();
    }
}

/// Fixed-bucket histogram
pub struct Histogram {
    buckets: [AtomicU64; BUCKETS.len()],
    sum: Mutex<f64>,
    count: AtomicU64,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: Mutex::new(0.0),
            count: AtomicU64::new(0),
        }
    }

    pub fn observe(&self, value: f64) {
        if let Some(idx) = BUCKETS.iter().position(|&bound| value <= bound) {
            self.buckets[idx].fetch_add(1, Ordering::Relaxed);
        }
        *self.sum.lock() += value;
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> HistogramStats {
        let mut running = 0;
        let cumulative = self
            .buckets
            .iter()
            .map(|b| {
                running += b.load(Ordering::Relaxed);
                running
            })
            .collect();

        let count = self.count.load(Ordering::Relaxed);
        let sum = *self.sum.lock();

        HistogramStats {
            count,
            sum,
            mean: if count == 0 { 0.0 } else { sum / count as f64 },
            cumulative,
        }
    }

    fn write_to(&self, name: &str, help: &str, out: &mut String) {
        let stats = self.stats();
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for (bound, count) in BUCKETS.iter().zip(stats.cumulative.iter()) {
            let _ = writeln!(out, "{}_bucket{{le=\"{}\"}} {}", name, bound, count);
        }
        let _ = writeln!(out, "{}_bucket{{le=\"+Inf\"}} {}", name, stats.count);
        let _ = writeln!(out, "{}_sum {}", name, stats.sum);
        let _ = writeln!(out, "{}_count {}", name, stats.count);
    }

    fn reset(&self) {
        for bucket in &self.buckets {
            bucket.store(0, Ordering::Relaxed);
        }
        *self.sum.lock() = 0.0;
        self.count.store(0, Ordering::Relaxed);
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Histogram statistics
#[derive(Debug, Clone, Default)]
pub struct HistogramStats {
    pub count: u64,
    pub sum: f64,
    pub mean: f64,
    /// Observations at or below each bucket bound
    pub cumulative: Vec<u64>,
}

/// All metrics exported by the calculator server
pub struct CalculatorMetrics {
    requests: LabeledCounter,
    evaluations: LabeledCounter,
    errors: LabeledCounter,
    active_requests: AtomicU64,
    evaluation_duration: Histogram,
}

impl CalculatorMetrics {
    pub fn new() -> Self {
        Self {
            requests: LabeledCounter::new(
                metric_names::REQUESTS_TOTAL,
                "Calculator API requests by route",
                "route",
            ),
            evaluations: LabeledCounter::new(
                metric_names::EVALUATIONS_TOTAL,
                "Completed model evaluations by outcome",
                "outcome",
            ),
            errors: LabeledCounter::new(
                metric_names::ERRORS_TOTAL,
                "Rejected requests by error type",
                "error_type",
            ),
            active_requests: AtomicU64::new(0),
            evaluation_duration: Histogram::new(),
        }
    }

    pub fn record_request(&self, route: &str) {
        self.requests.inc(route);
    }

    /// Record a completed evaluation, labelled stable or unstable
    pub fn record_evaluation(&self, outcome: &str, duration: Duration) {
        self.evaluations.inc(outcome);
        self.evaluation_duration.observe(duration.as_secs_f64());
    }

    pub fn record_error(&self, error_type: &str) {
        self.errors.inc(error_type);
    }

    pub fn set_active_requests(&self, count: u64) {
        self.active_requests.store(count, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.requests.total()
    }

    pub fn evaluations(&self, outcome: &str) -> u64 {
        self.evaluations.get(outcome)
    }

    pub fn evaluation_duration(&self) -> HistogramStats {
        self.evaluation_duration.stats()
    }

    /// Prometheus text exposition
    pub fn export(&self) -> String {
        let mut out = String::new();
        self.requests.write_to(&mut out);
        self.evaluations.write_to(&mut out);
        self.errors.write_to(&mut out);

        let _ = writeln!(out, "# HELP {} Requests currently in flight", metric_names::ACTIVE_REQUESTS);
        let _ = writeln!(out, "# TYPE {} gauge", metric_names::ACTIVE_REQUESTS);
        let _ = writeln!(
            out,
            "{} {}",
            metric_names::ACTIVE_REQUESTS,
            self.active_requests.load(Ordering::Relaxed)
        );

        self.evaluation_duration.write_to(
            metric_names::EVALUATION_DURATION,
            "Time spent evaluating the model",
            &mut out,
        );
        out
    }

    pub fn reset(&self) {
        self.requests.reset();
        self.evaluations.reset();
        self.errors.reset();
        self.active_requests.store(0, Ordering::Relaxed);
        self.evaluation_duration.reset();
    }
}

impl Default for CalculatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Times an evaluation and records it on drop once labelled
pub struct EvaluationTimer<'a> {
    start: Instant,
    metrics: &'a CalculatorMetrics,
    outcome: Option<&'static str>,
}

impl<'a> EvaluationTimer<'a> {
    pub fn start(metrics: &'a CalculatorMetrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
            outcome: None,
        }
    }

    /// Label the evaluation; unlabelled timers record nothing
    pub fn finish(mut self, outcome: &'static str) {
        self.outcome = Some(outcome);
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for EvaluationTimer<'_> {
    fn drop(&mut self) {
        if let Some(outcome) = self.outcome {
            self.metrics.record_evaluation(outcome, self.start.elapsed());
        }
    }
}
