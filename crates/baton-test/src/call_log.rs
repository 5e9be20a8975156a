//! Shared, ordered record of invocations.

use parking_lot::Mutex;
use std::sync::Arc;

/// An ordered log of named invocations.
///
/// Clones share the same log, so one `CallLog` can be handed to every
/// handler and callback of a chain and inspected after the run.
///
/// # Example
///
/// ```
/// use baton_test::CallLog;
///
/// let log = CallLog::new();
/// let handle = log.clone();
/// handle.record("h1");
/// handle.record("h2");
///
/// log.assert_order(&["h1", "h2"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&self, name: impl Into<String>) {
        self.entries.lock().push(name.into());
    }

    /// Returns a snapshot of all entries in order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of entries equal to `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.entries.lock().iter().filter(|e| *e == name).count()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Asserts the log holds exactly `expected`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the entries differ.
    #[track_caller]
    pub fn assert_order(&self, expected: &[&str]) -> &Self {
        let entries = self.entries();
        assert_eq!(entries, expected, "call order mismatch");
        self
    }

    /// Asserts `name` was recorded exactly once.
    ///
    /// # Panics
    ///
    /// Panics if `name` appears zero or several times.
    #[track_caller]
    pub fn assert_called_once(&self, name: &str) -> &Self {
        let count = self.count(name);
        assert_eq!(
            count,
            1,
            "expected '{name}' exactly once, got {count} in {:?}",
            self.entries()
        );
        self
    }

    /// Asserts `name` was never recorded.
    ///
    /// # Panics
    ///
    /// Panics if `name` appears in the log.
    #[track_caller]
    pub fn assert_not_called(&self, name: &str) -> &Self {
        assert_eq!(
            self.count(name),
            0,
            "expected '{name}' not to be called, log: {:?}",
            self.entries()
        );
        self
    }
}
