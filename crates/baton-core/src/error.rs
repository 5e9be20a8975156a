//! Error types for chain assembly.
//!
//! Handler failures never surface through [`ChainError`]. They are routed,
//! unchanged, to the error handler the caller registered on the chain.

use thiserror::Error;

/// Errors that can occur while assembling a [`Chain`](crate::Chain) or a
/// [`Pipeline`](crate::Pipeline) from a builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The builder was finalized without a completion handler.
    #[error("chain '{chain}' has no completion handler")]
    MissingCompletion {
        /// Name of the chain being built.
        chain: String,
    },

    /// The builder was finalized without an error handler.
    #[error("chain '{chain}' has no error handler")]
    MissingErrorHandler {
        /// Name of the chain being built.
        chain: String,
    },
}

impl ChainError {
    /// Creates a missing completion handler error.
    pub fn missing_completion(chain: impl Into<String>) -> Self {
        Self::MissingCompletion {
            chain: chain.into(),
        }
    }

    /// Creates a missing error handler error.
    pub fn missing_error_handler(chain: impl Into<String>) -> Self {
        Self::MissingErrorHandler {
            chain: chain.into(),
        }
    }
}
