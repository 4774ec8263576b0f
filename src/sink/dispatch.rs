//! Dispatch engine: per-event fan-out to backends.
//!
//! # Responsibilities
//! - Compute the effective threshold per backend
//! - Forward the event to every backend it qualifies for, in configured
//!   order
//! - Isolate failures: one backend erroring never prevents dispatch to the
//!   backends after it
//!
//! # Design Decisions
//! - The engine holds no buffers; buffering belongs to backends
//! - Outcomes are collected per backend and handed back to the sink for
//!   counting and self-logging

use crate::backend::{Backend, BackendError};
use crate::event::{should_emit, LogEvent, Severity};

pub(crate) struct BackendEntry {
    /// Per-backend severity floor from the configuration.
    pub minimum: Severity,
    pub backend: Box<dyn Backend>,
}

/// What happened to one event at one backend.
pub(crate) enum Outcome {
    /// Below the effective threshold; intentionally not forwarded.
    Filtered,
    Delivered,
    Failed(BackendError),
}

/// Fan one event out to every qualifying backend, in order.
///
/// The effective threshold per backend is `max(global, backend_minimum)`;
/// the event is forwarded iff its severity meets it. Returns one outcome
/// per entry, parallel to the input order.
pub(crate) fn dispatch(
    entries: &[BackendEntry],
    global_minimum: Severity,
    event: &LogEvent,
) -> Vec<Outcome> {
    entries
        .iter()
        .map(|entry| {
            let effective = global_minimum.max(entry.minimum);
            if !should_emit(event.severity, effective) {
                return Outcome::Filtered;
            }
            match entry.backend.accept(event) {
                Ok(()) => Outcome::Delivered,
                Err(error) => Outcome::Failed(error),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Records accepted events; optionally fails every accept.
    struct StubBackend {
        accepted: Arc<AtomicU64>,
        fail: bool,
    }

    impl Backend for StubBackend {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn accept(&self, _event: &LogEvent) -> Result<(), BackendError> {
            if self.fail {
                return Err(BackendError::Transient("boom".into()));
            }
            self.accepted.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn flush(&self) -> Result<(), BackendError> {
            Ok(())
        }

        fn close(&self, _grace: Duration) -> Result<(), BackendError> {
            Ok(())
        }

        fn dropped(&self) -> u64 {
            0
        }
    }

    fn entry(minimum: Severity, fail: bool) -> (BackendEntry, Arc<AtomicU64>) {
        let accepted = Arc::new(AtomicU64::new(0));
        let entry = BackendEntry {
            minimum,
            backend: Box::new(StubBackend {
                accepted: accepted.clone(),
                fail,
            }),
        };
        (entry, accepted)
    }

    fn event(severity: Severity) -> LogEvent {
        LogEvent::new(Utc::now(), severity, "test", "message", &[])
    }

    #[test]
    fn effective_threshold_is_max_of_global_and_backend() {
        // Global Warning dominates a looser backend floor.
        let (e, accepted) = entry(Severity::Information, false);
        let outcomes = dispatch(&[e], Severity::Warning, &event(Severity::Information));
        assert!(matches!(outcomes[0], Outcome::Filtered));
        assert_eq!(accepted.load(Ordering::Relaxed), 0);

        // Backend floor dominates a looser global one.
        let (e, accepted) = entry(Severity::Error, false);
        let outcomes = dispatch(&[e], Severity::Trace, &event(Severity::Warning));
        assert!(matches!(outcomes[0], Outcome::Filtered));
        assert_eq!(accepted.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn boundary_severity_is_inclusive() {
        let (e, accepted) = entry(Severity::Warning, false);
        let outcomes = dispatch(&[e], Severity::Trace, &event(Severity::Warning));
        assert!(matches!(outcomes[0], Outcome::Delivered));
        assert_eq!(accepted.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn one_level_below_threshold_is_excluded() {
        let (e, _) = entry(Severity::Warning, false);
        let outcomes = dispatch(&[e], Severity::Trace, &event(Severity::Information));
        assert!(matches!(outcomes[0], Outcome::Filtered));
    }

    #[test]
    fn failing_backend_does_not_stop_fanout() {
        let (failing, _) = entry(Severity::Trace, true);
        let (healthy, accepted) = entry(Severity::Trace, false);
        let outcomes = dispatch(
            &[failing, healthy],
            Severity::Trace,
            &event(Severity::Information),
        );
        assert!(matches!(outcomes[0], Outcome::Failed(_)));
        assert!(matches!(outcomes[1], Outcome::Delivered));
        assert_eq!(accepted.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn backends_receive_events_independently() {
        let (strict, strict_accepted) = entry(Severity::Error, false);
        let (loose, loose_accepted) = entry(Severity::Trace, false);
        dispatch(
            &[strict, loose],
            Severity::Trace,
            &event(Severity::Information),
        );
        assert_eq!(strict_accepted.load(Ordering::Relaxed), 0);
        assert_eq!(loose_accepted.load(Ordering::Relaxed), 1);
    }
}
