//! Metric names and recorders for chain runs.
//!
//! Everything here goes through the `metrics` facade, so recording is a
//! no-op until a recorder is installed (see `baton-telemetry`).
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `baton_chain_runs_total` | Counter | `chain`, `outcome` |
//! | `baton_chain_run_duration_seconds` | Histogram | `chain` |
//! | `baton_handler_invocations_total` | Counter | `chain`, `handler` |
//! | `baton_late_errors_total` | Counter | `chain`, `handler` |

use crate::fields;
use metrics::{counter, histogram};
use std::time::Duration;

/// Standard metric names.
pub mod names {
    /// Completed runs, labelled by outcome.
    pub const RUNS_TOTAL: &str = "baton_chain_runs_total";

    /// Wall-clock duration of a run.
    pub const RUN_DURATION_SECONDS: &str = "baton_chain_run_duration_seconds";

    /// Handler invocations.
    pub const HANDLER_INVOCATIONS_TOTAL: &str = "baton_handler_invocations_total";

    /// Errors raised after their run had already settled.
    pub const LATE_ERRORS_TOTAL: &str = "baton_late_errors_total";
}

/// Records a finished run.
pub(crate) fn record_run(chain: &str, outcome: &'static str, duration: Duration) {
    counter!(
        names::RUNS_TOTAL,
        fields::CHAIN => chain.to_string(),
        fields::OUTCOME => outcome
    )
    .increment(1);

    histogram!(
        names::RUN_DURATION_SECONDS,
        fields::CHAIN => chain.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a single handler invocation.
pub(crate) fn record_invocation(chain: &str, handler: &'static str) {
    counter!(
        names::HANDLER_INVOCATIONS_TOTAL,
        fields::CHAIN => chain.to_string(),
        fields::HANDLER => handler
    )
    .increment(1);
}

/// Records an error discarded because its run had already settled.
pub(crate) fn record_late_error(chain: &str, handler: &'static str) {
    counter!(
        names::LATE_ERRORS_TOTAL,
        fields::CHAIN => chain.to_string(),
        fields::HANDLER => handler
    )
    .increment(1);
}
