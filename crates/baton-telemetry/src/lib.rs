//! Observability setup for baton chains.
//!
//! `baton-core` only talks to the `tracing` and `metrics` facades. This
//! crate installs the backends:
//!
//! - **Logging**: a `tracing-subscriber` fmt layer (JSON, pretty or compact)
//!   filtered by an `EnvFilter`
//! - **Metrics**: an in-process Prometheus recorder with text rendering
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `baton_chain_runs_total` | Counter | `chain`, `outcome` | Finished runs |
//! | `baton_chain_run_duration_seconds` | Histogram | `chain` | Run latency |
//! | `baton_handler_invocations_total` | Counter | `chain`, `handler` | Handler calls |
//! | `baton_late_errors_total` | Counter | `chain`, `handler` | Discarded late errors |
//!
//! # Example
//!
//! ```rust,ignore
//! use baton_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder()
//!     .log_level("baton_core=trace,info")
//!     .metrics_enabled(true)
//!     .build();
//!
//! let guard = init_telemetry(config)?;
//!
//! // ... run chains ...
//!
//! if let Some(text) = guard.render_metrics() {
//!     println!("{text}");
//! }
//! ```
//!
//! Sample exposition:
//!
//! ```text
//! # HELP baton_chain_runs_total Total number of chain runs by outcome
//! # TYPE baton_chain_runs_total counter
//! baton_chain_runs_total{chain="checkout",outcome="terminated"} 1234
//! baton_chain_runs_total{chain="checkout",outcome="failed"} 56
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{init_metrics, render_metrics, MetricsConfig};

use metrics_exporter_prometheus::PrometheusHandle;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Handle to the telemetry installed by [`init_telemetry`].
///
/// Keep it around to render metrics; dropping it does not uninstall the
/// global subscriber or recorder.
#[derive(Default)]
pub struct TelemetryGuard {
    metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("metrics_enabled", &self.metrics_enabled())
            .finish()
    }
}

impl TelemetryGuard {
    /// Creates a new telemetry guard.
    #[must_use]
    pub fn new(metrics: Option<PrometheusHandle>) -> Self {
        Self { metrics }
    }

    /// Returns true if a Prometheus recorder was installed.
    #[must_use]
    pub fn metrics_enabled(&self) -> bool {
        self.metrics.is_some()
    }

    /// Renders metrics in Prometheus text format, if enabled.
    #[must_use]
    pub fn render_metrics(&self) -> Option<String> {
        self.metrics.as_ref().map(PrometheusHandle::render)
    }
}

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: TelemetryConfig) -> TelemetryResult<TelemetryGuard> {
    init_logging(&config.logging)?;
    let metrics = init_metrics(&config.metrics)?;

    tracing::debug!(
        log_level = %config.logging.level,
        metrics = metrics.is_some(),
        "telemetry initialized"
    );

    Ok(TelemetryGuard::new(metrics))
}
