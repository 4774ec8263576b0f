//! Structured logging sink with multi-backend fan-out.

pub mod backend;
pub mod config;
pub mod event;
pub mod http;
pub mod lifecycle;
pub mod resilience;
pub mod sink;

pub use config::{load_config, ConfigError, SinkConfig};
pub use event::{LogEvent, Severity};
pub use lifecycle::Shutdown;
pub use sink::{Logger, Sink, SinkStats};
