//! Observability for teach runs
//!
//! Provides:
//! - Prometheus metrics (submissions, failures, skips, submit latency)
//! - Structured logging of workflow events with tracing

use prometheus::{
    register_histogram, register_int_counter, Encoder, Histogram, IntCounter, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for submit latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<TeachMetricsInner> = OnceLock::new();

struct TeachMetricsInner {
    examples_submitted: IntCounter,
    submission_errors: IntCounter,
    decode_errors: IntCounter,
    examples_skipped: IntCounter,
    submit_latency_seconds: Histogram,
}

impl TeachMetricsInner {
    fn new() -> Self {
        Self {
            examples_submitted: register_int_counter!(
                "cbox_examples_submitted_total",
                "Examples accepted by the teach endpoint"
            )
            .expect("Failed to register examples_submitted"),

            submission_errors: register_int_counter!(
                "cbox_submission_errors_total",
                "Examples the teach endpoint rejected or failed to receive"
            )
            .expect("Failed to register submission_errors"),

            decode_errors: register_int_counter!(
                "cbox_decode_errors_total",
                "Example elements that could not be decoded"
            )
            .expect("Failed to register decode_errors"),

            examples_skipped: register_int_counter!(
                "cbox_examples_skipped_total",
                "Examples skipped after a failed submission"
            )
            .expect("Failed to register examples_skipped"),

            submit_latency_seconds: register_histogram!(
                "cbox_submit_latency_seconds",
                "Time spent on a single teach request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register submit_latency_seconds"),
        }
    }
}

/// Handle to the process-wide teach metrics
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct TeachMetrics {
    _private: (),
}

impl Default for TeachMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TeachMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(TeachMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &TeachMetricsInner {
        GLOBAL_METRICS.get_or_init(TeachMetricsInner::new)
    }

    pub fn observe_submitted(&self, duration_secs: f64) {
        self.inner().examples_submitted.inc();
        self.inner().submit_latency_seconds.observe(duration_secs);
    }

    pub fn inc_submission_errors(&self) {
        self.inner().submission_errors.inc();
    }

    pub fn inc_decode_errors(&self) {
        self.inner().decode_errors.inc();
    }

    pub fn inc_skipped(&self) {
        self.inner().examples_skipped.inc();
    }

    pub fn examples_submitted(&self) -> u64 {
        self.inner().examples_submitted.get()
    }

    /// Render every registered metric in the text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Structured logger for workflow events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_service_reset(&self, models_deleted: usize) {
        info!(
            event = "service_reset",
            service = %self.service,
            models_deleted = models_deleted,
            "Classification service reset"
        );
    }

    pub fn log_model_provisioned(&self, model_id: &str, name: &str, classes: usize) {
        info!(
            event = "model_provisioned",
            service = %self.service,
            model_id = %model_id,
            name = %name,
            classes = classes,
            "Model provisioned"
        );
    }

    pub fn log_teach_started(&self, model_id: &str, source: &str) {
        info!(
            event = "teach_started",
            service = %self.service,
            model_id = %model_id,
            source = %source,
            "Teaching model"
        );
    }

    pub fn log_example_skipped(&self, model_id: &str, position: usize, error: &str) {
        warn!(
            event = "example_skipped",
            service = %self.service,
            model_id = %model_id,
            position = position,
            error = %error,
            "Example not accepted, continuing"
        );
    }

    pub fn log_teach_completed(&self, model_id: &str, submitted: usize, skipped: usize) {
        info!(
            event = "teach_completed",
            service = %self.service,
            model_id = %model_id,
            submitted = submitted,
            skipped = skipped,
            "Teaching finished"
        );
    }

    /// `position` is where teaching stopped; earlier examples were taught
    pub fn log_teach_failed(&self, model_id: &str, position: Option<usize>, error: &str) {
        warn!(
            event = "teach_failed",
            service = %self.service,
            model_id = %model_id,
            position = ?position,
            error = %error,
            "Teaching stopped"
        );
    }
}
