//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check path templates carry the `{date}` placeholder and land in a
//!   creatable directory
//! - Validate collector endpoint URLs and bound sizes
//! - Detect conflicting rolling-file backends on the same path
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Runs before a config is accepted into the sink; `Sink::new` calls it
//!   for programmatic configs, the loader for file-based ones
//! - The directory probe touches the filesystem; everything else is pure

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::config::schema::{BackendConfig, SinkConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("rolling file path {path:?} has no {{date}} placeholder")]
    MissingDatePlaceholder { path: String },

    #[error("rolling file directory for {path:?} cannot be created: {reason}")]
    UnwritableDirectory { path: String, reason: String },

    #[error("two rolling file backends share the path {path:?}")]
    DuplicateRollingPath { path: String },

    #[error("remote collector endpoint {endpoint:?} is not a valid URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("remote collector queue capacity must be nonzero")]
    ZeroQueueCapacity,

    #[error("remote collector batch size must be nonzero")]
    ZeroBatchSize,

    #[error("remote collector retry attempts must be nonzero")]
    ZeroRetryAttempts,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &SinkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut rolling_paths = HashSet::new();

    for backend in &config.backends {
        match backend {
            BackendConfig::Console(_) => {}
            BackendConfig::RollingFile(c) => {
                if !c.path.contains("{date}") {
                    errors.push(ValidationError::MissingDatePlaceholder {
                        path: c.path.clone(),
                    });
                }
                if !rolling_paths.insert(c.path.clone()) {
                    errors.push(ValidationError::DuplicateRollingPath {
                        path: c.path.clone(),
                    });
                }
                if let Some(parent) = Path::new(&c.path).parent() {
                    if !parent.as_os_str().is_empty() {
                        if let Err(e) = fs::create_dir_all(parent) {
                            errors.push(ValidationError::UnwritableDirectory {
                                path: c.path.clone(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
            BackendConfig::RemoteCollector(c) => {
                if let Err(e) = Url::parse(&c.endpoint) {
                    errors.push(ValidationError::InvalidEndpoint {
                        endpoint: c.endpoint.clone(),
                        reason: e.to_string(),
                    });
                }
                if c.queue_capacity == 0 {
                    errors.push(ValidationError::ZeroQueueCapacity);
                }
                if c.batch_size == 0 {
                    errors.push(ValidationError::ZeroBatchSize);
                }
                if c.retry.max_attempts == 0 {
                    errors.push(ValidationError::ZeroRetryAttempts);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{RemoteCollectorConfig, RollingFileConfig};

    #[test]
    fn rejects_path_without_placeholder() {
        let config = SinkConfig {
            backends: vec![BackendConfig::RollingFile(RollingFileConfig {
                path: "log.txt".into(),
                ..Default::default()
            })],
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::MissingDatePlaceholder { .. }
        ));
    }

    #[test]
    fn rejects_duplicate_rolling_paths_and_reports_all_errors() {
        let file = RollingFileConfig {
            path: "dup-{date}.txt".into(),
            ..Default::default()
        };
        let config = SinkConfig {
            backends: vec![
                BackendConfig::RollingFile(file.clone()),
                BackendConfig::RollingFile(file),
                BackendConfig::RemoteCollector(RemoteCollectorConfig {
                    endpoint: "not a url".into(),
                    ..Default::default()
                }),
            ],
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            ValidationError::DuplicateRollingPath { .. }
        ));
        assert!(matches!(errors[1], ValidationError::InvalidEndpoint { .. }));
    }

    #[test]
    fn accepts_typical_three_backend_config() {
        let path = std::env::temp_dir()
            .join("logsink-validate-{date}.txt")
            .to_string_lossy()
            .to_string();
        let config = SinkConfig {
            backends: vec![
                BackendConfig::Console(Default::default()),
                BackendConfig::RollingFile(RollingFileConfig {
                    path,
                    ..Default::default()
                }),
                BackendConfig::RemoteCollector(Default::default()),
            ],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_zero_bounds_on_remote_collector() {
        let config = SinkConfig {
            backends: vec![BackendConfig::RemoteCollector(RemoteCollectorConfig {
                queue_capacity: 0,
                batch_size: 0,
                ..Default::default()
            })],
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
