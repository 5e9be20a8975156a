//! # Baton Test
//!
//! Test utilities for baton chains and pipelines.
//!
//! ## Key Features
//!
//! - **Call Log**: a shared, ordered record of which handlers ran
//! - **Canned Handlers**: handlers that advance, fail, raise or halt
//! - **Outcome Probe**: terminal callbacks that count what they receive
//!
//! ## Example
//!
//! ```
//! use baton_test::{CallLog, OutcomeProbe, Raising, Recording};
//!
//! let log = CallLog::new();
//! let probe = OutcomeProbe::with_log(&log);
//!
//! let mut chain = probe.chain::<()>();
//! chain.append(Recording::new("h1", &log));
//! chain.append(Raising::new("h2", &log, "boom"));
//! chain.append(Recording::new("h3", &log));
//!
//! chain.run(&mut ());
//!
//! log.assert_order(&["h1", "h2", "on_error"]);
//! probe.outcome().assert_failed_with(&"boom");
//! ```

#![doc(html_root_url = "https://docs.rs/baton-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod call_log;
mod handlers;
mod probe;

pub use call_log::CallLog;
pub use handlers::{Failing, Halting, Raising, Recording};
pub use probe::{Outcome, OutcomeProbe, COMPLETE, ERROR};
