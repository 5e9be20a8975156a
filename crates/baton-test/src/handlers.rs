//! Canned handlers.
//!
//! Each handler records its name in a [`CallLog`] when invoked and then does
//! one fixed thing with its continuation. All of them work with any context
//! type and implement both [`Handler`] and [`AsyncHandler`].
//!
//! | Handler | Continuation |
//! |---------|--------------|
//! | [`Recording`] | advances |
//! | [`Failing`] | `next.fail(error)` |
//! | [`Raising`] | returns `Err(error)` |
//! | [`Halting`] | dropped |

use crate::CallLog;
use baton_core::{AsyncHandler, AsyncNext, BoxFuture, Handler, Next};

/// Records its name, then advances.
#[derive(Debug, Clone)]
pub struct Recording {
    name: &'static str,
    log: CallLog,
}

impl Recording {
    /// Creates a recording handler.
    #[must_use]
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl<C: 'static, E: 'static> Handler<C, E> for Recording {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, next: Next<'_, C, E>) -> Result<(), E> {
        self.log.record(self.name);
        next.run();
        Ok(())
    }
}

impl<C: Send + 'static, E: Send + 'static> AsyncHandler<C, E> for Recording {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(&'a self, next: AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>> {
        Box::pin(async move {
            self.log.record(self.name);
            next.run().await;
            Ok(())
        })
    }
}

/// Records its name, then fails the run through `next.fail`.
#[derive(Debug, Clone)]
pub struct Failing<E> {
    name: &'static str,
    log: CallLog,
    error: E,
}

impl<E> Failing<E> {
    /// Creates a handler failing with clones of `error`.
    #[must_use]
    pub fn new(name: &'static str, log: &CallLog, error: E) -> Self {
        Self {
            name,
            log: log.clone(),
            error,
        }
    }
}

impl<C, E> Handler<C, E> for Failing<E>
where
    C: 'static,
    E: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, next: Next<'_, C, E>) -> Result<(), E> {
        self.log.record(self.name);
        next.fail(self.error.clone());
        Ok(())
    }
}

impl<C, E> AsyncHandler<C, E> for Failing<E>
where
    C: Send + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(&'a self, next: AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>> {
        Box::pin(async move {
            self.log.record(self.name);
            next.fail(self.error.clone());
            Ok(())
        })
    }
}

/// Records its name, then returns an error without touching its
/// continuation.
#[derive(Debug, Clone)]
pub struct Raising<E> {
    name: &'static str,
    log: CallLog,
    error: E,
}

impl<E> Raising<E> {
    /// Creates a handler raising clones of `error`.
    #[must_use]
    pub fn new(name: &'static str, log: &CallLog, error: E) -> Self {
        Self {
            name,
            log: log.clone(),
            error,
        }
    }
}

impl<C, E> Handler<C, E> for Raising<E>
where
    C: 'static,
    E: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, _next: Next<'_, C, E>) -> Result<(), E> {
        self.log.record(self.name);
        Err(self.error.clone())
    }
}

impl<C, E> AsyncHandler<C, E> for Raising<E>
where
    C: Send + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(&'a self, _next: AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>> {
        Box::pin(async move {
            self.log.record(self.name);
            Err(self.error.clone())
        })
    }
}

/// Records its name, then drops its continuation, halting the run.
#[derive(Debug, Clone)]
pub struct Halting {
    name: &'static str,
    log: CallLog,
}

impl Halting {
    /// Creates a halting handler.
    #[must_use]
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl<C: 'static, E: 'static> Handler<C, E> for Halting {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, next: Next<'_, C, E>) -> Result<(), E> {
        self.log.record(self.name);
        drop(next);
        Ok(())
    }
}

impl<C: Send + 'static, E: Send + 'static> AsyncHandler<C, E> for Halting {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(&'a self, next: AsyncNext<'a, C, E>) -> BoxFuture<'a, Result<(), E>> {
        self.log.record(self.name);
        drop(next);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baton_core::{Chain, Pipeline};

    fn chain(log: &CallLog) -> Chain<(), &'static str> {
        let (complete, error) = (log.clone(), log.clone());
        Chain::new(
            move |_: &mut ()| complete.record("complete"),
            move |err: &'static str, _: &mut ()| error.record(format!("error:{err}")),
        )
    }

    #[test]
    fn test_recording_advances() {
        let log = CallLog::new();
        let mut chain = chain(&log);
        chain.append(Recording::new("a", &log));
        chain.append(Recording::new("b", &log));

        chain.run(&mut ());

        log.assert_order(&["a", "b", "complete"]);
    }

    #[test]
    fn test_failing_and_raising_are_equivalent() {
        let failing = CallLog::new();
        let mut chain_a = chain(&failing);
        chain_a.append(Failing::new("h", &failing, "boom"));
        chain_a.append(Recording::new("after", &failing));
        chain_a.run(&mut ());

        let raising = CallLog::new();
        let mut chain_b = chain(&raising);
        chain_b.append(Raising::new("h", &raising, "boom"));
        chain_b.append(Recording::new("after", &raising));
        chain_b.run(&mut ());

        failing.assert_order(&["h", "error:boom"]);
        assert_eq!(failing.entries(), raising.entries());
    }

    #[test]
    fn test_halting_stops_everything() {
        let log = CallLog::new();
        let mut chain = chain(&log);
        chain.append(Halting::new("gate", &log));
        chain.append(Recording::new("after", &log));

        chain.run(&mut ());

        log.assert_order(&["gate"]);
    }

    #[test]
    fn test_async_variants() {
        let log = CallLog::new();
        let (complete, error) = (log.clone(), log.clone());
        let mut pipeline: Pipeline<(), &'static str> = Pipeline::new(
            move |_: &mut ()| complete.record("complete"),
            move |err: &'static str, _: &mut ()| error.record(format!("error:{err}")),
        );
        pipeline.append(Recording::new("a", &log));
        pipeline.append(Raising::new("b", &log, "boom"));
        pipeline.append(Halting::new("never", &log));

        tokio_test::block_on(pipeline.run(&mut ()));

        log.assert_order(&["a", "b", "error:boom"]);
    }
}
