//! Lifecycle management for the demo service.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Validate → Build sink → Start HTTP server
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting requests → Drain sink → Exit
//!
//! Signals (signals.rs):
//!     Ctrl-C / SIGTERM → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The sink outlives the HTTP server: it is closed only after the server
//!   has stopped, so late request handlers can still log
//! - Sink drain is bounded by a grace period; losses past it are counted

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
