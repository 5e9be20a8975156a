//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use baton_telemetry::{LogConfig, LogFormat, MetricsConfig};
use serde::{Deserialize, Serialize};

/// Chain section.
///
/// Applied to chains and pipelines built through the facade helpers.
///
/// # Example
///
/// ```
/// use baton_config::ChainSettings;
///
/// let settings = ChainSettings {
///     name: "checkout".to_string(),
///     record_metrics: false,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChainSettings {
    /// Name used in log spans and metric labels.
    #[serde(default = "default_chain_name")]
    pub name: String,

    /// Whether runs record metrics.
    #[serde(default = "default_true")]
    pub record_metrics: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            name: default_chain_name(),
            record_metrics: true,
        }
    }
}

fn default_chain_name() -> String {
    baton_core::DEFAULT_CHAIN_NAME.to_string()
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` directive list).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,

    /// Log span open/close events.
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
            span_events: false,
        }
    }
}

impl LoggingSettings {
    /// Converts this section into a telemetry [`LogConfig`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            ansi: self.ansi_enabled,
            span_events: self.span_events,
            file_line_info: self.include_location,
            ..LogConfig::default()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct MetricsSettings {
    /// Install the in-process Prometheus recorder.
    #[serde(default)]
    pub enabled: bool,
}

impl MetricsSettings {
    /// Converts this section into a telemetry [`MetricsConfig`].
    #[must_use]
    pub fn to_metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            enabled: self.enabled,
            ..MetricsConfig::default()
        }
    }
}

fn default_true() -> bool {
    true
}
