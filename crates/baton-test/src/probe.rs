//! Terminal-callback probes.

use crate::CallLog;
use baton_core::{Chain, Pipeline};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;

/// Log entry recorded by [`OutcomeProbe::on_complete`].
pub const COMPLETE: &str = "on_complete";

/// Log entry recorded by [`OutcomeProbe::on_error`].
pub const ERROR: &str = "on_error";

#[derive(Debug)]
struct ProbeState<E> {
    completions: usize,
    errors: Vec<E>,
}

/// Builds a chain's terminal callbacks and counts what they receive.
///
/// # Example
///
/// ```
/// use baton_test::{CallLog, OutcomeProbe, Recording};
///
/// let log = CallLog::new();
/// let probe = OutcomeProbe::<String>::with_log(&log);
///
/// let mut chain = probe.chain::<()>();
/// chain.append(Recording::new("h1", &log));
/// chain.run(&mut ());
///
/// probe.outcome().assert_completed();
/// log.assert_order(&["h1", "on_complete"]);
/// ```
#[derive(Debug)]
pub struct OutcomeProbe<E> {
    state: Arc<Mutex<ProbeState<E>>>,
    log: Option<CallLog>,
}

impl<E> Clone for OutcomeProbe<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            log: self.log.clone(),
        }
    }
}

impl<E> Default for OutcomeProbe<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> OutcomeProbe<E> {
    /// Creates a probe.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ProbeState {
                completions: 0,
                errors: Vec::new(),
            })),
            log: None,
        }
    }

    /// Creates a probe that also records [`COMPLETE`] and [`ERROR`] in `log`.
    #[must_use]
    pub fn with_log(log: &CallLog) -> Self {
        Self {
            log: Some(log.clone()),
            ..Self::new()
        }
    }

    /// Number of times the completion callback ran.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.state.lock().completions
    }

    /// Number of times the error callback ran.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.state.lock().errors.len()
    }

    /// Resets all counts.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.completions = 0;
        state.errors.clear();
    }
}

impl<E: Send + 'static> OutcomeProbe<E> {
    /// Completion callback feeding this probe.
    pub fn on_complete<C>(&self) -> impl Fn(&mut C) + Send + Sync + 'static {
        let probe = self.clone();
        move |_: &mut C| {
            probe.state.lock().completions += 1;
            if let Some(log) = &probe.log {
                log.record(COMPLETE);
            }
        }
    }

    /// Error callback feeding this probe.
    pub fn on_error<C>(&self) -> impl Fn(E, &mut C) + Send + Sync + 'static {
        let probe = self.clone();
        move |error: E, _: &mut C| {
            probe.state.lock().errors.push(error);
            if let Some(log) = &probe.log {
                log.record(ERROR);
            }
        }
    }

    /// An empty chain whose terminal callbacks feed this probe.
    #[must_use]
    pub fn chain<C: 'static>(&self) -> Chain<C, E> {
        Chain::new(self.on_complete(), self.on_error())
    }

    /// An empty pipeline whose terminal callbacks feed this probe.
    #[must_use]
    pub fn pipeline<C: Send + 'static>(&self) -> Pipeline<C, E> {
        Pipeline::new(self.on_complete(), self.on_error())
    }
}

impl<E: Clone> OutcomeProbe<E> {
    /// Snapshot of what the callbacks have received so far.
    #[must_use]
    pub fn outcome(&self) -> Outcome<E> {
        let state = self.state.lock();
        Outcome {
            completions: state.completions,
            errors: state.errors.clone(),
        }
    }
}

/// What a chain's terminal callbacks received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<E> {
    /// Completion callback invocations.
    pub completions: usize,
    /// Errors passed to the error callback, in order.
    pub errors: Vec<E>,
}

impl<E: Debug> Outcome<E> {
    /// Completed exactly once and never failed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completions == 1 && self.errors.is_empty()
    }

    /// Failed exactly once and never completed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.completions == 0 && self.errors.len() == 1
    }

    /// Neither callback ran.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.completions == 0 && self.errors.is_empty()
    }

    /// Asserts the run completed exactly once.
    ///
    /// # Panics
    ///
    /// Panics on any other outcome.
    #[track_caller]
    pub fn assert_completed(&self) -> &Self {
        assert!(self.is_completed(), "expected completion, got {self:?}");
        self
    }

    /// Asserts the run failed exactly once with `expected`.
    ///
    /// # Panics
    ///
    /// Panics on any other outcome or a different error.
    #[track_caller]
    pub fn assert_failed_with(&self, expected: &E) -> &Self
    where
        E: PartialEq,
    {
        assert!(self.is_failed(), "expected one failure, got {self:?}");
        assert_eq!(&self.errors[0], expected, "error mismatch");
        self
    }

    /// Asserts neither callback ran.
    ///
    /// # Panics
    ///
    /// Panics if either callback ran.
    #[track_caller]
    pub fn assert_halted(&self) -> &Self {
        assert!(self.is_halted(), "expected a halted run, got {self:?}");
        self
    }

    /// Asserts at most one callback ran, at most once.
    ///
    /// # Panics
    ///
    /// Panics if the callbacks ran more than once in total.
    #[track_caller]
    pub fn assert_single_outcome(&self) -> &Self {
        assert!(
            self.completions + self.errors.len() <= 1,
            "expected at most one outcome, got {self:?}"
        );
        self
    }
}
