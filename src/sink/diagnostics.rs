//! Last-resort diagnostics for the sink itself.
//!
//! Backend failures never reach producers, so this is where they become
//! visible: a counter per sink plus an optional stderr self-log. Stderr is
//! assumed always available.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::backend::BackendError;

pub(crate) struct Diagnostics {
    enabled: AtomicBool,
    errors: AtomicU64,
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            errors: AtomicU64::new(0),
        }
    }

    pub(crate) fn report(&self, backend: &str, error: &BackendError) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        if self.enabled.load(Ordering::Relaxed) {
            eprintln!("logsink: backend {} failed: {}", backend, error);
        }
    }

    pub(crate) fn total_errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

/// Snapshot of the sink's loss accounting.
#[derive(Debug, Clone)]
pub struct SinkStats {
    /// Backend errors captured by the sink (also self-logged when enabled).
    pub self_log_errors: u64,
    /// One entry per configured backend, in dispatch order.
    pub backends: Vec<BackendStats>,
}

#[derive(Debug, Clone)]
pub struct BackendStats {
    pub name: &'static str,
    /// Events this backend dropped (queue overflow, exhausted retries,
    /// degraded mode, shutdown grace expiry).
    pub dropped: u64,
}
