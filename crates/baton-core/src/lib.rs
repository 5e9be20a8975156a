//! # Baton Core
//!
//! Sequential handler chains with explicit continuations.
//!
//! A [`Chain`] is an ordered list of handlers plus two terminal callbacks:
//! one for completion and one for errors. Running the chain invokes the
//! first handler with a [`Next`] continuation. The handler decides what
//! happens next:
//!
//! ```text
//! run(ctx) → h0 ──next.run()──▶ h1 ──next.run()──▶ h2 ──next.run()──▶ on_complete(ctx)
//!             │                  │
//!             │                  └──Err(e) / next.fail(e)──▶ on_error(e, ctx)
//!             └── drop(next) ──▶ run halts, nothing else is invoked
//! ```
//!
//! ## Guarantees
//!
//! | Property | Meaning |
//! |----------|---------|
//! | Order | handler `i + 1` only runs after handler `i` advanced |
//! | Context identity | every handler and callback sees the caller's context |
//! | Short-circuit | after a failure no later handler runs |
//! | Exactly one outcome | completion and error handler never both fire |
//! | Independent runs | a chain can be run any number of times, concurrently |
//!
//! [`Pipeline`] provides the same model for async handlers that need to
//! await before advancing.
//!
//! ## Example
//!
//! ```
//! use baton_core::Chain;
//!
//! let chain = Chain::<String, ()>::builder()
//!     .name("greeting")
//!     .handler_fn("hello", |mut next| {
//!         next.context_mut().push_str("hello");
//!         next.run();
//!         Ok(())
//!     })
//!     .handler_fn("world", |mut next| {
//!         next.context_mut().push_str(", world");
//!         next.run();
//!         Ok(())
//!     })
//!     .on_complete(|greeting: &mut String| greeting.push('!'))
//!     .on_error(|_err: (), _greeting: &mut String| {})
//!     .build()
//!     .unwrap();
//!
//! let mut greeting = String::new();
//! chain.run(&mut greeting);
//! assert_eq!(greeting, "hello, world!");
//! ```

#![doc(html_root_url = "https://docs.rs/baton-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod context;
pub mod error;
pub mod fields;
pub mod handler;
pub mod metrics;
pub mod next;
pub mod pipeline;
mod run_id;
mod state;

pub use chain::{Chain, ChainBuilder, CompletionFn, ErrorFn, SharedHandler, DEFAULT_CHAIN_NAME};
pub use context::Exchange;
pub use error::ChainError;
pub use handler::{FnHandler, Handler};
pub use next::Next;
pub use pipeline::{
    AsyncFnHandler, AsyncHandler, AsyncNext, BoxFuture, Pipeline, PipelineBuilder,
    SharedAsyncHandler,
};
pub use run_id::RunId;
pub use state::ChainState;
