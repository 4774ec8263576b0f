//! The logging sink.
//!
//! # Data Flow
//! ```text
//! SinkConfig
//!     → Sink::new (validate, build backends in configured order)
//!     → sink.emit / logger views (timestamp assigned here)
//!     → global floor check
//!     → dispatch.rs (per-backend effective threshold, in-order fan-out)
//!     → backends
//!
//! Failures:
//!     backend outcome → diagnostics.rs (self-log to stderr, counters)
//!     → never back to the producer
//! ```
//!
//! # Design Decisions
//! - One sink per process by convention, owned by the root scope and passed
//!   explicitly; nothing here is a global
//! - The backend list is immutable after construction, so fan-out iterates
//!   without locks
//! - Timestamps are assigned under a small mutex so they never decrease
//!   within one sink instance

pub mod diagnostics;
pub mod dispatch;
pub mod logger;

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::backend::{
    Backend, ConsoleBackend, RemoteCollectorBackend, RollingFileBackend,
};
use crate::config::{validation::validate_config, BackendConfig, ConfigError, SinkConfig};
use crate::event::{should_emit, LogEvent, Severity};
use diagnostics::Diagnostics;
use dispatch::{dispatch, BackendEntry, Outcome};

pub use diagnostics::{BackendStats, SinkStats};
pub use logger::Logger;

/// Assigns event timestamps, never going backwards within one sink.
struct Clock {
    last: Mutex<DateTime<Utc>>,
}

impl Clock {
    fn new() -> Self {
        Self {
            last: Mutex::new(DateTime::UNIX_EPOCH),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        if now > *last {
            *last = now;
        }
        *last
    }
}

struct SinkShared {
    global_minimum: Severity,
    entries: Vec<BackendEntry>,
    clock: Clock,
    diagnostics: Diagnostics,
    closed: AtomicBool,
}

/// The process-wide structured-logging sink.
///
/// Cheap to clone; clones share the same backends, thresholds and clock.
/// Created once at startup from a validated [`SinkConfig`], torn down once
/// via [`Sink::close`].
#[derive(Clone)]
pub struct Sink {
    shared: Arc<SinkShared>,
}

impl Sink {
    /// Construct a sink from a fully-resolved configuration.
    ///
    /// Fails with [`ConfigError`] when a backend's parameters are
    /// structurally invalid; programmatic configs go through the same
    /// validation as file-loaded ones.
    pub fn new(config: SinkConfig) -> Result<Sink, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let mut entries = Vec::with_capacity(config.backends.len());
        for backend_config in &config.backends {
            let backend: Box<dyn Backend> = match backend_config {
                BackendConfig::Console(_) => Box::new(ConsoleBackend::new()),
                BackendConfig::RollingFile(c) => {
                    Box::new(RollingFileBackend::new(&c.path, c.interval))
                }
                BackendConfig::RemoteCollector(c) => {
                    Box::new(RemoteCollectorBackend::new(c.clone())?)
                }
            };
            entries.push(BackendEntry {
                minimum: backend_config.minimum_severity(),
                backend,
            });
        }

        Ok(Sink {
            shared: Arc::new(SinkShared {
                global_minimum: config.global_minimum_severity,
                entries,
                clock: Clock::new(),
                diagnostics: Diagnostics::new(),
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Emit one event.
    ///
    /// Never fails toward the caller and never blocks on network I/O.
    /// Events below the global floor are dropped before fan-out. Backend
    /// failures are counted and self-logged, nothing more.
    pub fn emit(
        &self,
        severity: Severity,
        source_context: &str,
        template: &str,
        fields: &[(&str, Value)],
    ) {
        let shared = &self.shared;
        if shared.closed.load(Ordering::Acquire) {
            return;
        }
        if !should_emit(severity, shared.global_minimum) {
            return;
        }

        let event = LogEvent::new(
            shared.clock.now(),
            severity,
            source_context,
            template,
            fields,
        );

        let outcomes = dispatch(&shared.entries, shared.global_minimum, &event);
        for (entry, outcome) in shared.entries.iter().zip(outcomes) {
            if let Outcome::Failed(error) = outcome {
                shared.diagnostics.report(entry.backend.name(), &error);
            }
        }
    }

    /// A lightweight view that pre-fills `source_context` on every emit.
    ///
    /// Shares this sink's backends and thresholds.
    pub fn for_context(&self, name: impl Into<String>) -> Logger {
        Logger::new(self.clone(), name.into())
    }

    /// Flush every backend in configured order.
    pub fn flush(&self) {
        for entry in &self.shared.entries {
            if let Err(error) = entry.backend.flush() {
                self.shared.diagnostics.report(entry.backend.name(), &error);
            }
        }
    }

    /// Shut the sink down: stop accepting events, then flush and close
    /// every backend in order, bounded overall by the grace period.
    ///
    /// Idempotent; later calls return immediately.
    pub fn close(&self, grace: Duration) {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let deadline = Instant::now() + grace;
        for entry in &self.shared.entries {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if let Err(error) = entry.backend.close(remaining) {
                self.shared.diagnostics.report(entry.backend.name(), &error);
            }
        }
    }

    /// Per-backend drop counters and self-log totals.
    pub fn stats(&self) -> SinkStats {
        SinkStats {
            self_log_errors: self.shared.diagnostics.total_errors(),
            backends: self
                .shared
                .entries
                .iter()
                .map(|entry| BackendStats {
                    name: entry.backend.name(),
                    dropped: entry.backend.dropped(),
                })
                .collect(),
        }
    }

    /// Enable or disable the stderr self-log (on by default).
    pub fn set_self_log(&self, enabled: bool) {
        self.shared.diagnostics.set_enabled(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_never_goes_backwards() {
        let clock = Clock::new();
        let mut previous = clock.now();
        for _ in 0..1_000 {
            let next = clock.now();
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn emit_after_close_is_a_quiet_no_op() {
        let sink = Sink::new(SinkConfig::default()).unwrap();
        sink.close(Duration::from_millis(100));
        sink.emit(Severity::Fatal, "test", "ignored", &[]);
        sink.close(Duration::from_millis(100));
    }
}
