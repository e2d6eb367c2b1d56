//! Prometheus metrics for the volume subscription client.
//!
//! All metrics follow the naming convention: `vs_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., logs_decoded_total)
//! - **Histogram**: Distribution of values (e.g., finality_wait_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LOG DECODING PIPELINE (vs-01)
    // =========================================================================

    /// Raw logs that matched a known event signature
    pub static ref LOGS_DECODED: CounterVec = CounterVec::new(
        Opts::new("vs_pipeline_logs_decoded_total", "Raw logs decoded into events"),
        &["event"]
    ).expect("metric creation failed");

    /// Raw logs dropped because no event signature matched
    pub static ref LOGS_DROPPED: Counter = Counter::new(
        "vs_pipeline_logs_dropped_total",
        "Raw logs dropped as unmatched or malformed"
    ).expect("metric creation failed");

    /// Time spent waiting for a submitted transaction to finalize
    pub static ref FINALITY_WAIT_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "vs_pipeline_finality_wait_seconds",
            "Time spent waiting for transaction finality"
        ).buckets(exponential_buckets(0.01, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Transactions that never produced a usable receipt
    pub static ref FINALITY_FAILURES: CounterVec = CounterVec::new(
        Opts::new("vs_pipeline_finality_failures_total", "Transactions that did not finalize"),
        &["reason"]  // reason: timeout/reverted
    ).expect("metric creation failed");

    // =========================================================================
    // ENTITY ORCHESTRATOR (vs-02)
    // =========================================================================

    /// State-changing calls submitted to the ledger
    pub static ref TRANSACTIONS_SUBMITTED: CounterVec = CounterVec::new(
        Opts::new("vs_orchestrator_transactions_submitted_total", "Calls submitted to the ledger"),
        &["operation"]
    ).expect("metric creation failed");

    /// Direct storage reads
    pub static ref STORAGE_READS: CounterVec = CounterVec::new(
        Opts::new("vs_orchestrator_storage_reads_total", "Direct contract storage reads"),
        &["entity"]  // entity: plans/subscriptions getter
    ).expect("metric creation failed");

    /// Historical log scans
    pub static ref LOG_SCANS: CounterVec = CounterVec::new(
        Opts::new("vs_orchestrator_log_scans_total", "Full-history event log scans"),
        &["event"]
    ).expect("metric creation failed");

    /// Number of logs replayed per scan
    pub static ref LOG_SCAN_SIZE: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "vs_orchestrator_log_scan_size",
            "Logs returned by a single historical scan"
        ).buckets(exponential_buckets(1.0, 4.0, 10).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Handle to the registered metrics.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Number of metric families currently exported.
    pub fn family_count(&self) -> usize {
        self.registry.gather().len()
    }
}

/// Register every metric with the global registry.
///
/// Safe to call more than once; metrics that are already registered are
/// left in place.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Pipeline
        Box::new(LOGS_DECODED.clone()),
        Box::new(LOGS_DROPPED.clone()),
        Box::new(FINALITY_WAIT_DURATION.clone()),
        Box::new(FINALITY_FAILURES.clone()),
        // Orchestrator
        Box::new(TRANSACTIONS_SUBMITTED.clone()),
        Box::new(STORAGE_READS.clone()),
        Box::new(LOG_SCANS.clone()),
        Box::new(LOG_SCAN_SIZE.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
