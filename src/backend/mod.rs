//! Log backends.
//!
//! # Data Flow
//! ```text
//! dispatch engine
//!     → console.rs (stdout/stderr split by severity, best-effort)
//!     → rolling_file.rs (bucketed files, buffered durable appends)
//!     → remote.rs (bounded queue → worker thread → JSON batch POST)
//! ```
//!
//! # Design Decisions
//! - Backends are trait objects owned by the sink; the list is read-only
//!   after construction
//! - Each backend serializes access to its own mutable state
//! - Failures surface as per-backend outcomes; the dispatch engine never
//!   aborts fan-out on the first error
//! - Every lost event is counted somewhere, never silently discarded

pub mod console;
pub mod remote;
pub mod rolling_file;

use std::time::Duration;
use thiserror::Error;

use crate::event::LogEvent;

pub use console::ConsoleBackend;
pub use remote::RemoteCollectorBackend;
pub use rolling_file::RollingFileBackend;

/// Failure classes a backend can report to the dispatch engine.
///
/// None of these ever propagate to producers; the sink counts them and
/// self-logs.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Recoverable I/O or transport failure. Retried internally by the
    /// backend; reported once the retry budget is exhausted.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Failure persisting beyond the retry budget. The backend degrades and
    /// drops subsequent events until a health re-check succeeds.
    #[error("permanent failure: {0}")]
    Permanent(String),

    /// Bounded queue was full; the event was dropped without blocking.
    #[error("queue full, event dropped")]
    QueueFull,
}

/// A concrete destination for log events.
///
/// Implementations must serialize their own internal state; `accept` is
/// called concurrently from many producers.
pub trait Backend: Send + Sync {
    /// Name used in diagnostics and stats.
    fn name(&self) -> &'static str;

    /// Record one event. May buffer; must not block on network I/O.
    fn accept(&self, event: &LogEvent) -> Result<(), BackendError>;

    /// Make all previously accepted events durable before returning.
    fn flush(&self) -> Result<(), BackendError>;

    /// Stop accepting, drain buffered work within the grace period, then
    /// release resources. Events still queued afterwards are dropped and
    /// counted. Idempotent.
    fn close(&self, grace: Duration) -> Result<(), BackendError>;

    /// Total events this backend has dropped so far.
    fn dropped(&self) -> u64;
}
