//! # VS Telemetry
//!
//! Logging and metrics bootstrap for the volume subscription client.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter`, plain or JSON output
//! - **Metrics**: Prometheus counters and histograms recorded by the pipeline
//!   and the orchestrator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vs_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _metrics = init_telemetry(&TelemetryConfig::from_env())?;
//! // Spans, logs and metrics are now being collected.
//! println!("{}", vs_telemetry::encode_metrics()?);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `volume-subscription-client` | Service name reported at startup |
//! | `VS_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `VS_JSON_LOGS` | `false` | Emit JSON lines instead of human-readable logs |
//! | `VS_CONSOLE_OUTPUT` | `true` | Write logs to stdout at all |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, register_metrics, HistogramTimer, MetricsHandle};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// The configuration could not be applied.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register all metrics.
///
/// Returns the metrics handle; logging stays installed for the lifetime of
/// the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<MetricsHandle, TelemetryError> {
    let metrics_handle = register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(metrics_handle)
}

/// Convenience macro for creating a span tagged with the emitting component.
///
/// # Example
///
/// ```rust,ignore
/// let span = vs_telemetry::component_span!("create_plan", component = "vs-02");
/// ```
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
