//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML) or programmatic construction
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SinkConfig (validated, immutable)
//!     → consumed once by Sink::new at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no runtime reconfiguration
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Sink::new re-runs validation so programmatic configs get the same
//!   guarantees as file-loaded ones

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BackendConfig, ConsoleConfig, RemoteCollectorConfig, RetryConfig, RollInterval,
    RollingFileConfig, SinkConfig,
};
