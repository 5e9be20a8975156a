//! Main configuration types.
//!
//! This module provides the top-level [`BatonConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use baton_telemetry::logging::create_env_filter;
use baton_telemetry::{LogFormat, TelemetryConfig};

use crate::{ChainSettings, ConfigError, LoggingSettings, MetricsSettings};

/// Complete baton configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use baton_config::BatonConfig;
///
/// let config = BatonConfig::default();
/// assert_eq!(config.chain.name, "chain");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BatonConfig {
    /// Chain settings.
    #[serde(default)]
    pub chain: ChainSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Metrics settings.
    #[serde(default)]
    pub metrics: MetricsSettings,
}

impl BatonConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use baton_config::{BatonConfig, ChainSettings};
    ///
    /// let config = BatonConfig::builder()
    ///     .chain(ChainSettings {
    ///         name: "checkout".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.chain.name, "checkout");
    /// ```
    #[must_use]
    pub fn builder() -> BatonConfigBuilder {
        BatonConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The chain name is empty
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.name.trim().is_empty() {
            return Err(ConfigError::invalid_value("chain.name", "must not be empty"));
        }

        if let Err(e) = create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// Telemetry configuration derived from the logging and metrics sections.
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig::builder()
            .logging(self.logging.to_log_config())
            .metrics(self.metrics.to_metrics_config())
            .build()
    }

    /// Create a development configuration preset.
    ///
    /// - Debug log level
    /// - Pretty log formatting with ANSI colors and source locations
    /// - Span open/close events
    ///
    /// # Example
    ///
    /// ```
    /// use baton_config::BatonConfig;
    ///
    /// let config = BatonConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;
        config.logging.span_events = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// - Info log level
    /// - JSON log formatting
    /// - Prometheus recorder installed
    ///
    /// # Example
    ///
    /// ```
    /// use baton_config::{BatonConfig, LogFormat};
    ///
    /// let config = BatonConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// assert!(config.metrics.enabled);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;
        config.metrics.enabled = true;

        config
    }
}

/// Builder for [`BatonConfig`].
#[derive(Debug, Default)]
pub struct BatonConfigBuilder {
    chain: Option<ChainSettings>,
    logging: Option<LoggingSettings>,
    metrics: Option<MetricsSettings>,
}

impl BatonConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chain section.
    #[must_use]
    pub fn chain(mut self, chain: ChainSettings) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingSettings) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsSettings) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> BatonConfig {
        BatonConfig {
            chain: self.chain.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<BatonConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
