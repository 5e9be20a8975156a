//! Typed configuration for baton.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults or preset → file → env)
//!
//! # Overview
//!
//! [`BatonConfig`] has three sections:
//!
//! - [`ChainSettings`] - chain name and per-chain metric recording
//! - [`LoggingSettings`] - log filter, format and decorations
//! - [`MetricsSettings`] - whether to install the Prometheus recorder
//!
//! # Example
//!
//! ```no_run
//! use baton_config::ConfigLoader;
//!
//! # fn main() -> Result<(), baton_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("baton.toml")?
//!     .with_env_prefix("BATON")
//!     .load()?;
//!
//! println!("chain name: {}", config.chain.name);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [chain]
//! name = "checkout"
//! record_metrics = true
//!
//! [logging]
//! enabled = true
//! level = "baton_core=debug,info"
//! format = "json"
//! ansi_enabled = false
//! include_location = false
//! span_events = false
//!
//! [metrics]
//! enabled = true
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables named `PREFIX__SECTION__KEY`:
//!
//! - `BATON__CHAIN__NAME=checkout`
//! - `BATON__LOGGING__FORMAT=pretty`
//! - `BATON__METRICS__ENABLED=true`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use baton_telemetry::LogFormat;
pub use config::{BatonConfig, BatonConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{ChainSettings, LoggingSettings, MetricsSettings};
