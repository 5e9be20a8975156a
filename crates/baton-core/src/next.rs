//! The continuation handed to each handler.
//!
//! A [`Next`] is built by the chain immediately before a handler is invoked.
//! It is bound to exactly three things: the chain, the position of the
//! handler that received it, and the run's context. Because it carries the
//! only live `&mut` to the context, every handler in a run sees the same
//! context the caller passed to [`Chain::run`], and the completion or error
//! handler sees it too.
//!
//! Consuming methods (`run`, `fail`, `resume`) take `self`, so a
//! continuation cannot be reused for another position. Each of them returns
//! the context so the handler can keep working after downstream handlers
//! have returned.

use crate::chain::Chain;
use crate::state::RunState;
use crate::RunId;

/// Continuation for the handler at a given position.
pub struct Next<'a, C, E> {
    chain: &'a Chain<C, E>,
    position: usize,
    context: &'a mut C,
    run: &'a RunState,
}

impl<'a, C: 'static, E: 'static> Next<'a, C, E> {
    pub(crate) fn new(
        chain: &'a Chain<C, E>,
        position: usize,
        context: &'a mut C,
        run: &'a RunState,
    ) -> Self {
        Self {
            chain,
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
        self.position + 1 >= self.chain.len()
    }

    /// Identifier of the current run.
    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run.id()
    }

    /// Advances to the next handler, or to the completion handler when this
    /// is the last position.
    ///
    /// Returns once the rest of the run has unwound back to this point.
    pub fn run(self) -> &'a mut C {
        let Self {
            chain,
            position,
            context,
            run,
        } = self;
        chain.advance(position + 1, &mut *context, run);
        context
    }

    /// Diverts the run to the error handler with `error`.
    ///
    /// No further handler in the chain is invoked.
    pub fn fail(self, error: E) -> &'a mut C {
        let Self {
            chain,
            position,
            context,
            run,
        } = self;
        chain.fail(position, error, &mut *context, run);
        context
    }

    /// Advances on `Ok(())`, fails on `Err`.
    pub fn resume(self, result: Result<(), E>) -> &'a mut C {
        match result {
            Ok(()) => self.run(),
            Err(error) => self.fail(error),
        }
    }
}

impl<C: 'static, E: 'static> std::fmt::Debug for Next<'_, C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("chain", &self.chain.name())
            .field("position", &self.position)
            .field("run_id", &self.run.id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::Chain;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Ctx {
        seen: Vec<(usize, bool)>,
        after: Vec<usize>,
    }

    #[test]
    fn test_position_and_is_last() {
        let mut chain: Chain<Ctx, ()> = Chain::new(|_| {}, |_, _| {});
        for _ in 0..3 {
            chain.append_fn("probe", |mut next| {
                let entry = (next.position(), next.is_last());
                next.context_mut().seen.push(entry);
                next.run();
                Ok(())
            });
        }

        let mut ctx = Ctx::default();
        chain.run(&mut ctx);

        assert_eq!(ctx.seen, vec![(0, false), (1, false), (2, true)]);
    }

    #[test]
    fn test_run_returns_context_for_post_processing() {
        let mut chain: Chain<Ctx, ()> = Chain::new(|_| {}, |_, _| {});
        for _ in 0..3 {
            chain.append_fn("unwind", |next| {
                let position = next.position();
                let ctx = next.run();
                ctx.after.push(position);
                Ok(())
            });
        }

        let mut ctx = Ctx::default();
        chain.run(&mut ctx);

        // Post-processing unwinds innermost first.
        assert_eq!(ctx.after, vec![2, 1, 0]);
    }

    #[test]
    fn test_resume_with_error_fails() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = errors.clone();
        let mut chain: Chain<Ctx, &'static str> = Chain::new(
            |_| panic!("completion must not run"),
            move |err, _| sink.lock().unwrap().push(err),
        );
        chain.append_fn("check", |next| {
            next.resume(Err("rejected"));
            Ok(())
        });
        chain.append_fn("unreachable", |_| panic!("must not run"));

        chain.run(&mut Ctx::default());

        assert_eq!(*errors.lock().unwrap(), vec!["rejected"]);
    }

    #[test]
    fn test_run_id_is_stable_within_a_run() {
        let ids = Arc::new(Mutex::new(Vec::new()));
        let mut chain: Chain<Ctx, ()> = Chain::new(|_| {}, |_, _| {});
        for _ in 0..2 {
            let ids = ids.clone();
            chain.append_fn("id", move |next| {
                ids.lock().unwrap().push(next.run_id());
                next.run();
                Ok(())
            });
        }

        chain.run(&mut Ctx::default());
        chain.run(&mut Ctx::default());

        let ids = ids.lock().unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2], ids[3]);
        assert_ne!(ids[0], ids[2]);
    }
}
