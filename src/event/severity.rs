//! Severity levels and threshold filtering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered importance of a log event.
///
/// The ordering is total and ascending: `Trace < Debug < Information <
/// Warning < Error < Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Fatal,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Information
    }
}

impl Severity {
    /// Short code used when rendering events as text.
    pub fn code(self) -> &'static str {
        match self {
            Severity::Trace => "TRC",
            Severity::Debug => "DBG",
            Severity::Information => "INF",
            Severity::Warning => "WRN",
            Severity::Error => "ERR",
            Severity::Fatal => "FTL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Information => "information",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "information" | "info" => Ok(Severity::Information),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// Threshold check used by the global floor and every backend floor.
///
/// True iff the event is at least as important as the threshold. Pure and
/// total; never fails.
pub fn should_emit(event_severity: Severity, threshold: Severity) -> bool {
    event_severity >= threshold
}
