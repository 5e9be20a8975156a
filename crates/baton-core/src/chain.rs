//! Sequential handler chain.
//!
//! A [`Chain`] runs an ordered list of handlers over one caller-owned
//! context. Each handler gets a fresh [`Next`] bound to its position and to
//! the context, and opts in to continuing by consuming it.
//!
//! ```text
//! run(ctx) → h0 ─next.run()→ h1 ─next.run()→ … ─next.run()→ on_complete(ctx)
//!             │               │
//!             └─ Err / fail ──┴──────────────────────────→ on_error(err, ctx)
//! ```
//!
//! Exactly one of `on_complete` and `on_error` runs per run, unless a
//! handler halts the run by dropping its continuation, in which case
//! neither does.

use crate::error::ChainError;
use crate::handler::{FnHandler, Handler};
use crate::metrics;
use crate::next::Next;
use crate::state::{ChainState, RunState};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A type-erased handler that can be stored in a chain.
pub type SharedHandler<C, E> = Arc<dyn Handler<C, E>>;

/// Callback invoked once every handler has advanced.
pub type CompletionFn<C> = Box<dyn Fn(&mut C) + Send + Sync>;

/// Callback invoked once when a handler fails.
pub type ErrorFn<C, E> = Box<dyn Fn(E, &mut C) + Send + Sync>;

/// Name given to chains that were not named explicitly.
pub const DEFAULT_CHAIN_NAME: &str = "chain";

/// An ordered chain of handlers over a context `C`, failing with `E`.
///
/// The handler list only grows, through [`append`](Self::append) and its
/// variants. [`run`](Self::run) takes `&self`, so one chain can serve any
/// number of runs, sequentially or from several threads, each with its own
/// context.
///
/// # Example
///
/// ```
/// use baton_core::Chain;
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Ctx {
///     user: Option<String>,
/// }
///
/// let greeted = Arc::new(Mutex::new(None));
/// let sink = greeted.clone();
///
/// let mut chain: Chain<Ctx, String> = Chain::new(
///     move |ctx: &mut Ctx| *sink.lock().unwrap() = ctx.user.clone(),
///     |err: String, _ctx: &mut Ctx| eprintln!("failed: {err}"),
/// );
///
/// chain.append_fn("login", |mut next| {
///     next.context_mut().user = Some("kim".to_string());
///     next.run();
///     Ok(())
/// });
///
/// chain.run(&mut Ctx::default());
/// assert_eq!(greeted.lock().unwrap().as_deref(), Some("kim"));
/// ```
pub struct Chain<C, E> {
    name: String,
    handlers: Vec<SharedHandler<C, E>>,
    on_complete: CompletionFn<C>,
    on_error: ErrorFn<C, E>,
    record_metrics: bool,
}

impl<C: 'static, E: 'static> Chain<C, E> {
    /// Creates an empty chain with its two terminal callbacks.
    pub fn new<T, R>(on_complete: T, on_error: R) -> Self
    where
        T: Fn(&mut C) + Send + Sync + 'static,
        R: Fn(E, &mut C) + Send + Sync + 'static,
    {
        Self {
            name: DEFAULT_CHAIN_NAME.to_string(),
            handlers: Vec::new(),
            on_complete: Box::new(on_complete),
            on_error: Box::new(on_error),
            record_metrics: true,
        }
    }

    /// Creates a new chain builder.
    #[must_use]
    pub fn builder() -> ChainBuilder<C, E> {
        ChainBuilder::new()
    }

    /// Appends a handler to the end of the chain.
    pub fn append<H: Handler<C, E>>(&mut self, handler: H) {
        self.handlers.push(Arc::new(handler));
    }

    /// Appends a handler that may also be used by other chains.
    pub fn append_shared(&mut self, handler: SharedHandler<C, E>) {
        self.handlers.push(handler);
    }

    /// Appends a closure as a handler.
    pub fn append_fn<F>(&mut self, name: &'static str, func: F)
    where
        F: Fn(Next<'_, C, E>) -> Result<(), E> + Send + Sync + 'static,
    {
        self.append(FnHandler::new(name, func));
    }

    /// Runs the chain over `context`, starting at the first handler.
    ///
    /// Nothing is returned: the outcome is observed through which of the
    /// completion and error callbacks was invoked.
    pub fn run(&self, context: &mut C) {
        let run = RunState::new();
        let span = tracing::debug_span!(
            "chain.run",
            chain = %self.name,
            run_id = %run.id(),
            handlers = self.handlers.len()
        );
        let _entered = span.enter();
        let started = Instant::now();

        self.advance(0, context, &run);

        finish_run(
            &self.name,
            run.current(),
            |position| self.handlers[position].name(),
            started.elapsed(),
            self.record_metrics,
        );
    }

    /// Returns the chain name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the names of all handlers in order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Returns the number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if the chain has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn advance(&self, position: usize, context: &mut C, run: &RunState) {
        let Some(handler) = self.handlers.get(position) else {
            if run.terminate() {
                tracing::trace!("all handlers advanced, completing");
                (self.on_complete)(context);
            }
            return;
        };

        run.enter(position);
        tracing::trace!(position, handler = handler.name(), "invoking handler");
        if self.record_metrics {
            metrics::record_invocation(&self.name, handler.name());
        }

        let next = Next::new(self, position, &mut *context, run);
        if let Err(error) = handler.handle(next) {
            self.fail(position, error, context, run);
        }
    }

    pub(crate) fn fail(&self, position: usize, error: E, context: &mut C, run: &RunState) {
        let handler = self.handlers[position].name();
        if run.fail(position) {
            tracing::debug!(position, handler, "handler failed");
            (self.on_error)(error, context);
        } else {
            tracing::warn!(position, handler, "discarding error raised after the run settled");
            if self.record_metrics {
                metrics::record_late_error(&self.name, handler);
            }
        }
    }
}

impl<C: 'static, E: 'static> std::fmt::Debug for Chain<C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("name", &self.name)
            .field("handlers", &self.handler_names())
            .field("record_metrics", &self.record_metrics)
            .finish_non_exhaustive()
    }
}

/// Logs and records the final state of a run.
pub(crate) fn finish_run(
    chain: &str,
    state: ChainState,
    handler_at: impl FnOnce(usize) -> &'static str,
    elapsed: Duration,
    record_metrics: bool,
) {
    if let ChainState::Running(position) = state {
        tracing::debug!(
            position,
            handler = handler_at(position),
            "run halted before completion"
        );
    }
    tracing::trace!(
        outcome = state.outcome(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "run finished"
    );
    if record_metrics {
        metrics::record_run(chain, state.outcome(), elapsed);
    }
}

/// Builder for constructing a [`Chain`].
pub struct ChainBuilder<C, E> {
    name: String,
    handlers: Vec<SharedHandler<C, E>>,
    on_complete: Option<CompletionFn<C>>,
    on_error: Option<ErrorFn<C, E>>,
    record_metrics: bool,
}

impl<C: 'static, E: 'static> ChainBuilder<C, E> {
    /// Creates a new builder with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: DEFAULT_CHAIN_NAME.to_string(),
            handlers: Vec::new(),
            on_complete: None,
            on_error: None,
            record_metrics: true,
        }
    }

    /// Sets the chain name used in logs and metric labels.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends a handler.
    #[must_use]
    pub fn handler<H: Handler<C, E>>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Appends a shared handler.
    #[must_use]
    pub fn shared(mut self, handler: SharedHandler<C, E>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Appends a closure as a handler.
    #[must_use]
    pub fn handler_fn<F>(self, name: &'static str, func: F) -> Self
    where
        F: Fn(Next<'_, C, E>) -> Result<(), E> + Send + Sync + 'static,
    {
        self.handler(FnHandler::new(name, func))
    }

    /// Sets the completion callback.
    #[must_use]
    pub fn on_complete<T>(mut self, on_complete: T) -> Self
    where
        T: Fn(&mut C) + Send + Sync + 'static,
    {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Sets the error callback.
    #[must_use]
    pub fn on_error<R>(mut self, on_error: R) -> Self
    where
        R: Fn(E, &mut C) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }

    /// Enables or disables metric recording for this chain.
    #[must_use]
    pub fn record_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }

    /// Builds the chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if either terminal callback is missing.
    pub fn build(self) -> Result<Chain<C, E>, ChainError> {
        let on_complete = self
            .on_complete
            .ok_or_else(|| ChainError::missing_completion(&self.name))?;
        let on_error = self
            .on_error
            .ok_or_else(|| ChainError::missing_error_handler(&self.name))?;

        Ok(Chain {
            name: self.name,
            handlers: self.handlers,
            on_complete,
            on_error,
            record_metrics: self.record_metrics,
        })
    }
}

impl<C: 'static, E: 'static> Default for ChainBuilder<C, E> {
    fn default() -> Self {
        Self::new()
    }
}
