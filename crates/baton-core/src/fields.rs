//! Standard field names shared by log events and metric labels.

/// Chain name.
pub const CHAIN: &str = "chain";

/// Run identifier (UUID v7).
pub const RUN_ID: &str = "run_id";

/// Number of handlers in the chain.
pub const HANDLERS: &str = "handlers";

/// Handler position within the chain.
pub const POSITION: &str = "position";

/// Handler name.
pub const HANDLER: &str = "handler";

/// Run outcome (`terminated`, `failed`, `halted`).
pub const OUTCOME: &str = "outcome";

/// Run duration in milliseconds.
pub const ELAPSED_MS: &str = "elapsed_ms";
