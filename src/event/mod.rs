//! Log event model.
//!
//! # Data Flow
//! ```text
//! Producer call site
//!     → severity.rs (level check against thresholds)
//!     → record.rs (immutable LogEvent: timestamp, context, template, fields)
//!     → sink fan-out (backends render text or serialize structured form)
//! ```
//!
//! # Design Decisions
//! - Severity is a closed enum; invalid levels are unrepresentable
//! - Timestamps are assigned by the sink, not the caller
//! - Events carry both a template and structured fields so backends can
//!   choose between rendered text and machine-readable output

pub mod record;
pub mod severity;

pub use record::LogEvent;
pub use severity::{should_emit, Severity};
