//! # Baton
//!
//! **Sequential handler chains with explicit continuations**
//!
//! Baton runs an ordered list of handlers over a mutable, caller-owned
//! context. Each handler receives the context through a single-use
//! continuation and decides what happens next:
//!
//! - **Advance** – `next.run()` hands the context to the next handler
//! - **Fail** – `next.fail(err)` or returning `Err(err)` diverts to the error callback
//! - **Halt** – dropping `next` stops the run without any callback
//! - **Post-process** – code after `next.run()` sees downstream mutations
//!
//! ## Quick Start
//!
//! ```rust
//! use baton::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BatonConfig::builder()
//!     .chain(ChainSettings {
//!         name: "greeting".to_string(),
//!         record_metrics: false,
//!     })
//!     .build_validated()?;
//!
//! let chain = baton::chain_builder::<Vec<String>, String>(&config.chain)
//!     .handler_fn("hello", |mut next: Next<'_, Vec<String>, String>| {
//!         next.context_mut().push("hello".to_string());
//!         next.run();
//!         Ok(())
//!     })
//!     .on_complete(|words: &mut Vec<String>| words.push("done".to_string()))
//!     .on_error(|err: String, _: &mut Vec<String>| eprintln!("failed: {err}"))
//!     .build()?;
//!
//! let mut words = Vec::new();
//! chain.run(&mut words);
//! assert_eq!(words, ["hello", "done"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`core`] | `baton-core` | chain, pipeline, continuations, exchange context |
//! | [`config`] | `baton-config` | layered configuration |
//! | [`telemetry`] | `baton-telemetry` | logging and Prometheus metrics |

#![doc(html_root_url = "https://docs.rs/baton/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use baton_core as core;
pub use baton_core::{
    AsyncHandler, AsyncNext, BoxFuture, Chain, ChainBuilder, ChainError, ChainState, Exchange,
    Handler, Next, Pipeline, PipelineBuilder, RunId,
};

// Re-export configuration types
pub use baton_config as config;

// Re-export telemetry types
pub use baton_telemetry as telemetry;

use baton_config::{BatonConfig, ChainSettings};
use baton_telemetry::{TelemetryGuard, TelemetryResult};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use baton::prelude::*;
/// ```
pub mod prelude {
    pub use baton_core::{
        AsyncFnHandler, AsyncHandler, AsyncNext, BoxFuture, Chain, ChainBuilder, ChainError,
        Exchange, FnHandler, Handler, Next, Pipeline, PipelineBuilder, RunId,
    };

    // Re-export configuration types
    pub use baton_config::{BatonConfig, ChainSettings, ConfigError, ConfigLoader};

    // Re-export telemetry types
    pub use baton_telemetry::{TelemetryConfig, TelemetryError, TelemetryGuard};
}

/// Starts a [`ChainBuilder`] named and configured from `settings`.
#[must_use]
pub fn chain_builder<C: 'static, E: 'static>(settings: &ChainSettings) -> ChainBuilder<C, E> {
    Chain::builder()
        .name(settings.name.clone())
        .record_metrics(settings.record_metrics)
}

/// Starts a [`PipelineBuilder`] named and configured from `settings`.
#[must_use]
pub fn pipeline_builder<C, E>(settings: &ChainSettings) -> PipelineBuilder<C, E>
where
    C: Send + 'static,
    E: Send + 'static,
{
    PipelineBuilder::new()
        .name(settings.name.clone())
        .record_metrics(settings.record_metrics)
}

/// Initializes logging and metrics from the `logging` and `metrics`
/// sections of `config`.
///
/// Keep the returned guard alive for as long as metrics should be rendered.
///
/// # Example
///
/// ```rust,no_run
/// use baton::config::ConfigLoader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigLoader::new().with_production().load()?;
/// let guard = baton::init_telemetry(&config)?;
///
/// if let Some(text) = guard.render_metrics() {
///     println!("{text}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn init_telemetry(config: &BatonConfig) -> TelemetryResult<TelemetryGuard> {
    let guard = baton_telemetry::init_telemetry(config.telemetry_config())?;
    tracing::info!(
        chain = %config.chain.name,
        metrics = guard.metrics_enabled(),
        "baton telemetry initialized"
    );
    Ok(guard)
}
