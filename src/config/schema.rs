//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the sink.
//! All types derive Serde traits for deserialization from settings files.

use serde::{Deserialize, Serialize};

use crate::event::Severity;

/// Root configuration for the logging sink.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SinkConfig {
    /// Floor applied before any backend-specific filtering. Events below
    /// this level never reach fan-out.
    pub global_minimum_severity: Severity,

    /// Backend definitions, in dispatch order.
    pub backends: Vec<BackendConfig>,
}

/// One configured backend.
///
/// Tagged by `kind` in settings files:
///
/// ```toml
/// [[backends]]
/// kind = "rolling_file"
/// path = "logs/log-{date}.txt"
/// interval = "daily"
/// minimum_severity = "information"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    Console(ConsoleConfig),
    RollingFile(RollingFileConfig),
    RemoteCollector(RemoteCollectorConfig),
}

impl BackendConfig {
    /// Backend name used in diagnostics and stats.
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Console(_) => "console",
            BackendConfig::RollingFile(_) => "rolling_file",
            BackendConfig::RemoteCollector(_) => "remote_collector",
        }
    }

    /// Per-backend severity floor.
    pub fn minimum_severity(&self) -> Severity {
        match self {
            BackendConfig::Console(c) => c.minimum_severity,
            BackendConfig::RollingFile(c) => c.minimum_severity,
            BackendConfig::RemoteCollector(c) => c.minimum_severity,
        }
    }
}

/// Console backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Events below this level are dropped for this backend only.
    pub minimum_severity: Severity,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            // Backend floor defers to the global floor by default.
            minimum_severity: Severity::Trace,
        }
    }
}

/// Rolling-file backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RollingFileConfig {
    pub minimum_severity: Severity,

    /// Output path template. Must contain a `{date}` placeholder, replaced
    /// with the interval bucket label (e.g. `logs/log-{date}.txt`).
    pub path: String,

    /// Time bucket granularity at which output switches files.
    pub interval: RollInterval,
}

impl Default for RollingFileConfig {
    fn default() -> Self {
        Self {
            minimum_severity: Severity::Trace,
            path: "logs/log-{date}.txt".to_string(),
            interval: RollInterval::Daily,
        }
    }
}

/// Rolling interval for file backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RollInterval {
    Minutely,
    Hourly,
    Daily,
}

/// Remote-collector backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteCollectorConfig {
    pub minimum_severity: Severity,

    /// Collector endpoint URL. Batches are POSTed here as JSON arrays.
    pub endpoint: String,

    /// Bounded producer-side queue. When full, events are dropped and
    /// counted rather than blocking the producer.
    pub queue_capacity: usize,

    /// Maximum events per POST.
    pub batch_size: usize,

    /// How long a partial batch may sit before being shipped anyway.
    pub flush_interval_ms: u64,

    /// Per-request transport timeout in seconds.
    pub request_timeout_secs: u64,

    /// Cool-off before a degraded backend re-checks the collector.
    pub degraded_cooldown_secs: u64,

    /// Retry policy for transient transport failures.
    pub retry: RetryConfig,
}

impl Default for RemoteCollectorConfig {
    fn default() -> Self {
        Self {
            minimum_severity: Severity::Trace,
            endpoint: "http://localhost:5341/".to_string(),
            queue_capacity: 10_000,
            batch_size: 100,
            flush_interval_ms: 2_000,
            request_timeout_secs: 10,
            degraded_cooldown_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for the remote collector.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per batch (first try included).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_settings_file() {
        let toml = r#"
            global_minimum_severity = "debug"

            [[backends]]
            kind = "console"

            [[backends]]
            kind = "rolling_file"
            path = "logs/app-{date}.txt"
            interval = "daily"
            minimum_severity = "information"

            [[backends]]
            kind = "remote_collector"
            endpoint = "http://localhost:5341/"
            batch_size = 50
        "#;
        let config: SinkConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.global_minimum_severity, Severity::Debug);
        assert_eq!(config.backends.len(), 3);
        assert_eq!(config.backends[1].minimum_severity(), Severity::Information);
        match &config.backends[2] {
            BackendConfig::RemoteCollector(c) => {
                assert_eq!(c.batch_size, 50);
                assert_eq!(c.queue_capacity, 10_000);
            }
            other => panic!("unexpected backend: {:?}", other),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: SinkConfig = toml::from_str("").unwrap();
        assert_eq!(config.global_minimum_severity, Severity::Information);
        assert!(config.backends.is_empty());
    }
}
