//! The [`Handler`] trait implemented by every chain step.
//!
//! A handler receives the [`Next`] continuation for its position. The
//! continuation carries the run's context, so the handler reads and writes
//! the context through it and then decides how the run proceeds:
//!
//! | Handler action | Effect |
//! |----------------|--------|
//! | `next.run()` | advance to the following handler (or completion) |
//! | `next.fail(err)` | divert to the error handler |
//! | `next.resume(result)` | `Ok` advances, `Err` diverts |
//! | return `Err(err)` | divert to the error handler |
//! | drop `next` | the run halts here |
//!
//! # Example
//!
//! ```
//! use baton_core::{Handler, Next};
//!
//! struct Stamp;
//!
//! impl Handler<Vec<&'static str>, String> for Stamp {
//!     fn name(&self) -> &'static str {
//!         "stamp"
//!     }
//!
//!     fn handle(&self, mut next: Next<'_, Vec<&'static str>, String>) -> Result<(), String> {
//!         next.context_mut().push("stamp");
//!         next.run();
//!         Ok(())
//!     }
//! }
//! ```

use crate::next::Next;

/// A single step of a [`Chain`](crate::Chain).
///
/// # Invariants
///
/// - The continuation is consumed at most once; the type system enforces it.
/// - Returning `Err` after the run has already settled does not reach the
///   error handler a second time. The error is logged and discarded.
pub trait Handler<C, E>: Send + Sync + 'static {
    /// Returns the name of this handler, used for logs and metrics.
    fn name(&self) -> &'static str;

    /// Runs this step.
    ///
    /// Returning `Err` is equivalent to calling `next.fail(err)`.
    fn handle(&self, next: Next<'_, C, E>) -> Result<(), E>;
}

/// A handler built from a closure.
///
/// Usually created through [`Chain::append_fn`](crate::Chain::append_fn)
/// or [`ChainBuilder::handler_fn`](crate::ChainBuilder::handler_fn), which
/// give the closure a fully inferred signature.
pub struct FnHandler<F> {
    name: &'static str,
    func: F,
}

impl<F> FnHandler<F> {
    /// Creates a new function-based handler.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

impl<C, E, F> Handler<C, E> for FnHandler<F>
where
    F: Fn(Next<'_, C, E>) -> Result<(), E> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, next: Next<'_, C, E>) -> Result<(), E> {
        (self.func)(next)
    }
}
