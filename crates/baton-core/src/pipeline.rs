//! Async handler pipeline.
//!
//! [`Pipeline`] is the async counterpart of [`Chain`](crate::Chain): the
//! same ordering, exactly-once and settlement rules, but handlers return
//! futures and may suspend before consuming their continuation. A handler
//! can wait on a timer, a channel or another service and only then call
//! `next.run().await`; the continuation still resumes at the right position
//! with the same context.
//!
//! # Example
//!
//! ```
//! use baton_core::{AsyncNext, Pipeline};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut pipeline: Pipeline<Vec<u32>, String> = Pipeline::new(
//!     |ctx: &mut Vec<u32>| ctx.push(99),
//!     |err: String, _ctx: &mut Vec<u32>| eprintln!("failed: {err}"),
//! );
//!
//! pipeline.append_fn("load", |mut next: AsyncNext<'_, Vec<u32>, String>| {
//!     Box::pin(async move {
//!         next.context_mut().push(1);
//!         next.run().await;
//!         Ok(())
//!     })
//! });
//!
//! let mut ctx = Vec::new();
//! pipeline.run(&mut ctx).await;
//! assert_eq!(ctx, vec![1, 99]);
//! # }
//! ```

use crate::chain::{finish_run, CompletionFn, ErrorFn, DEFAULT_CHAIN_NAME};
use crate::error::ChainError;
use crate::metrics;
use crate::state::RunState;
use crate::RunId;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// A boxed future borrowed for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased async handler that can be stored in a pipeline.
pub type SharedAsyncHandler<C, E> = Arc<dyn AsyncHandler<C, E>>;

/// A single async step of a [`Pipeline`].
///
/// The rules are those of [`Handler`](crate::Handler): consume the
/// continuation to advance or fail, resolve to `Err` to raise, drop it to
/// halt.
pub trait AsyncHandler<C, E>: Send + Sync + 'static {
    /// Returns the name of this handler, used for logs and metrics.
    fn name(&self) -> &'static str;

    /// Runs this step.
    fn handle<'a>(&'a self, next: AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>>;
}

/// Continuation for an async handler.
pub struct AsyncNext<'a, C, E> {
    pipeline: &'a Pipeline<C, E>,
    position: usize,
    context: &'a mut C,
    run: &'a RunState,
}

impl<'a, C, E> AsyncNext<'a, C, E>
where
    C: Send + 'static,
    E: Send + 'static,
{
    fn new(
        pipeline: &'a Pipeline<C, E>,
        position: usize,
        context: &'a mut C,
        run: &'a RunState,
    ) -> Self {
        Self {
            pipeline,
            position,
            context,
            run,
        }
    }

    /// Returns the shared context.
    #[must_use]
    pub fn context(&self) -> &C {
        self.context
    }

    /// Returns the shared context mutably.
    pub fn context_mut(&mut self) -> &mut C {
        self.context
    }

    /// Position of the handler holding this continuation.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// True when advancing from here reaches the completion handler.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.pipeline.len()
    }

    /// Identifier of the current run.
    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run.id()
    }

    /// Advances to the next handler, or to the completion handler.
    pub async fn run(self) -> &'a mut C {
        let Self {
            pipeline,
            position,
            context,
            run,
        } = self;
        pipeline.advance(position + 1, &mut *context, run).await;
        context
    }

    /// Diverts the run to the error handler with `error`.
    pub fn fail(self, error: E) -> &'a mut C {
        let Self {
            pipeline,
            position,
            context,
            run,
        } = self;
        pipeline.fail(position, error, &mut *context, run);
        context
    }

    /// Advances on `Ok(())`, fails on `Err`.
    pub async fn resume(self, result: Result<(), E>) -> &'a mut C {
        match result {
            Ok(()) => self.run().await,
            Err(error) => self.fail(error),
        }
    }
}

impl<C: 'static, E: 'static> std::fmt::Debug for AsyncNext<'_, C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncNext")
            .field("pipeline", &self.pipeline.name)
            .field("position", &self.position)
            .field("run_id", &self.run.id())
            .finish_non_exhaustive()
    }
}

/// An async handler built from a closure returning a boxed future.
pub struct AsyncFnHandler<F> {
    name: &'static str,
    func: F,
}

impl<F> AsyncFnHandler<F> {
    /// Creates a new function-based async handler.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> std::fmt::Debug for AsyncFnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncFnHandler")
            .field("name", &self.name)
            .finish()
    }
}

impl<C, E, F> AsyncHandler<C, E> for AsyncFnHandler<F>
where
    F: for<'a> Fn(AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(&'a self, next: AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>> {
        (self.func)(next)
    }
}

/// An ordered async pipeline of handlers over a context `C`.
pub struct Pipeline<C, E> {
    name: String,
    handlers: Vec<SharedAsyncHandler<C, E>>,
    on_complete: CompletionFn<C>,
    on_error: ErrorFn<C, E>,
    record_metrics: bool,
}

impl<C, E> Pipeline<C, E>
where
    C: Send + 'static,
    E: Send + 'static,
{
    /// Creates an empty pipeline with its two terminal callbacks.
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

    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder<C, E> {
        PipelineBuilder::new()
    }

    /// Appends a handler to the end of the pipeline.
    pub fn append<H: AsyncHandler<C, E>>(&mut self, handler: H) {
        self.handlers.push(Arc::new(handler));
    }

    /// Appends a handler that may also be used by other pipelines.
    pub fn append_shared(&mut self, handler: SharedAsyncHandler<C, E>) {
        self.handlers.push(handler);
    }

    /// Appends a closure returning a boxed future as a handler.
    pub fn append_fn<F>(&mut self, name: &'static str, func: F)
    where
        F: for<'a> Fn(AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>>
            + Send
            + Sync
            + 'static,
    {
        self.append(AsyncFnHandler::new(name, func));
    }

    /// Runs the pipeline over `context`, starting at the first handler.
    pub async fn run(&self, context: &mut C) {
        let run = RunState::new();
        let span = tracing::debug_span!(
            "pipeline.run",
            chain = %self.name,
            run_id = %run.id(),
            handlers = self.handlers.len()
        );
        let started = Instant::now();

        self.advance(0, context, &run).instrument(span.clone()).await;

        let _entered = span.enter();
        finish_run(
            &self.name,
            run.current(),
            |position| self.handlers[position].name(),
            started.elapsed(),
            self.record_metrics,
        );
    }

    /// Returns the pipeline name.
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

    /// Returns true if the pipeline has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn advance<'a>(
        &'a self,
        position: usize,
        context: &'a mut C,
        run: &'a RunState,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
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

            let next = AsyncNext::new(self, position, &mut *context, run);
            if let Err(error) = handler.handle(next).await {
                self.fail(position, error, context, run);
            }
        })
    }

    fn fail(&self, position: usize, error: E, context: &mut C, run: &RunState) {
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

impl<C: 'static, E: 'static> std::fmt::Debug for Pipeline<C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers: Vec<_> = self.handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("handlers", &handlers)
            .field("record_metrics", &self.record_metrics)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Pipeline`].
pub struct PipelineBuilder<C, E> {
    name: String,
    handlers: Vec<SharedAsyncHandler<C, E>>,
    on_complete: Option<CompletionFn<C>>,
    on_error: Option<ErrorFn<C, E>>,
    record_metrics: bool,
}

impl<C, E> PipelineBuilder<C, E>
where
    C: Send + 'static,
    E: Send + 'static,
{
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

    /// Sets the pipeline name used in logs and metric labels.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends a handler.
    #[must_use]
    pub fn handler<H: AsyncHandler<C, E>>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Appends a shared handler.
    #[must_use]
    pub fn shared(mut self, handler: SharedAsyncHandler<C, E>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Appends a closure returning a boxed future as a handler.
    #[must_use]
    pub fn handler_fn<F>(self, name: &'static str, func: F) -> Self
    where
        F: for<'a> Fn(AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>>
            + Send
            + Sync
            + 'static,
    {
        self.handler(AsyncFnHandler::new(name, func))
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

    /// Enables or disables metric recording for this pipeline.
    #[must_use]
    pub fn record_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if either terminal callback is missing.
    pub fn build(self) -> Result<Pipeline<C, E>, ChainError> {
        let on_complete = self
            .on_complete
            .ok_or_else(|| ChainError::missing_completion(&self.name))?;
        let on_error = self
            .on_error
            .ok_or_else(|| ChainError::missing_error_handler(&self.name))?;

        Ok(Pipeline {
            name: self.name,
            handlers: self.handlers,
            on_complete,
            on_error,
            record_metrics: self.record_metrics,
        })
    }
}

impl<C, E> Default for PipelineBuilder<C, E>
where
    C: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
