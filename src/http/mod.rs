//! Demo HTTP service.
//!
//! # Data Flow
//! ```text
//! GET /v1/logger     → handler with a Logger injected via AppState
//! GET /v1/factory    → handler creating a fresh named view per request
//! GET /v1/minimalapi → closure route registered directly on the router
//!     → each logs one Information event through the shared sink
//! ```
//!
//! Routing, serialization and the rest of the HTTP machinery belong to
//! axum; this layer only demonstrates how request handlers consume the
//! sink.

pub mod server;

pub use server::HttpServer;
