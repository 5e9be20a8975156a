//! Prometheus metrics for chain runs.
//!
//! `baton-core` records through the `metrics` facade. Installing the
//! Prometheus recorder here makes those records observable; without it they
//! are dropped.
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
//! The recorder is in-process only. Call [`render_metrics`] to get the text
//! exposition and serve it however the host application prefers.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use baton_core::metrics::names;
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Histogram buckets for run duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s
            duration_buckets: vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0,
            ],
        }
    }
}

/// Installs the Prometheus recorder and describes the standard metrics.
///
/// Returns `Ok(None)` when metrics are disabled.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidConfig` for an empty bucket list and
/// `TelemetryError::MetricsInit` if a global recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<Option<PrometheusHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(names::RUN_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::InvalidConfig(e.to_string()))?
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    // Only reachable once per process: a second install fails above.
    METRICS_HANDLE
        .set(handle.clone())
        .map_err(|_| TelemetryError::MetricsInit("metrics handle already stored".to_string()))?;
    register_metric_descriptions();

    Ok(Some(handle))
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(
        names::RUNS_TOTAL,
        "Total number of chain runs by outcome"
    );
    describe_histogram!(
        names::RUN_DURATION_SECONDS,
        Unit::Seconds,
        "Chain run duration in seconds"
    );
    describe_counter!(
        names::HANDLER_INVOCATIONS_TOTAL,
        "Total number of handler invocations"
    );
    describe_counter!(
        names::LATE_ERRORS_TOTAL,
        "Errors raised after their run had already settled"
    );
}
