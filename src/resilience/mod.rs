//! Resilience helpers for backends.
//!
//! # Responsibilities
//! - Exponential backoff with jitter for the remote collector's bounded
//!   retry loop
//!
//! # Design Decisions
//! - Jittered backoff prevents synchronized retry bursts when several
//!   processes log to the same collector
//! - Retries are bounded; exhaustion drops the batch and counts it

pub mod backoff;

pub use backoff::calculate_backoff;
