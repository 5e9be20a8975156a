//! Run state machine.
//!
//! Every run moves through the same states:
//!
//! ```text
//! Running(0) → Running(1) → … → Running(n-1) → Terminated
//!      │            │                 │
//!      └────────────┴───── raise / fail ──────→ Failed { at }
//! ```
//!
//! `Failed` and `Terminated` are absorbing. Once a run has settled, any
//! further attempt to settle it is rejected, which is what keeps the
//! completion and error handlers mutually exclusive within one run.

use crate::RunId;
use parking_lot::Mutex;

/// Where a single run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    /// The handler at this position has been entered.
    Running(usize),
    /// The handler at `at` raised or signalled an error.
    Failed {
        /// Position of the failing handler.
        at: usize,
    },
    /// Every handler advanced and the completion handler ran.
    Terminated,
}

impl ChainState {
    /// Returns true once the run can no longer change outcome.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Terminated)
    }

    /// Label used for logs and the `outcome` metric dimension.
    ///
    /// A run that finishes while still `Running` was halted by a handler
    /// that never consumed its continuation.
    #[must_use]
    pub const fn outcome(self) -> &'static str {
        match self {
            Self::Running(_) => "halted",
            Self::Failed { .. } => "failed",
            Self::Terminated => "terminated",
        }
    }
}

/// Per-run state shared by every continuation issued during that run.
#[derive(Debug)]
pub(crate) struct RunState {
    id: RunId,
    state: Mutex<ChainState>,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            id: RunId::new(),
            state: Mutex::new(ChainState::Running(0)),
        }
    }

    pub(crate) fn id(&self) -> RunId {
        self.id
    }

    pub(crate) fn current(&self) -> ChainState {
        *self.state.lock()
    }

    /// Records that the handler at `position` is about to be invoked.
    pub(crate) fn enter(&self, position: usize) {
        let mut state = self.state.lock();
        debug_assert!(!state.is_settled(), "handler entered after settlement");
        *state = ChainState::Running(position);
    }

    /// Moves the run to `Terminated`. Returns false if it already settled.
    pub(crate) fn terminate(&self) -> bool {
        self.settle(ChainState::Terminated)
    }

    /// Moves the run to `Failed`. Returns false if it already settled.
    pub(crate) fn fail(&self, at: usize) -> bool {
        self.settle(ChainState::Failed { at })
    }

    fn settle(&self, next: ChainState) -> bool {
        let mut state = self.state.lock();
        if state.is_settled() {
            return false;
        }
        *state = next;
        true
    }
}
