//! Logging sink demo service.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 DEMO SERVICE                 │
//!                    │                                              │
//!   GET /v1/*        │  ┌────────┐   emit    ┌───────────────────┐  │
//!   ─────────────────┼─▶│  http  │──────────▶│       sink        │  │
//!                    │  │ server │           │  global floor +   │  │
//!                    │  └────────┘           │  dispatch engine  │  │
//!                    │                       └────┬────┬────┬────┘  │
//!                    │                            │    │    │       │
//!                    │                            ▼    ▼    ▼       │
//!                    │                      ┌───────┐┌─────┐┌─────┐ │
//!                    │                      │console││ file││ re- │ │
//!                    │                      │       ││roll ││mote │ │
//!                    │                      └───────┘└─────┘└─────┘ │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! With no `--config`, the built-in configuration is used: console at the
//! global floor (Debug), a daily rolling file under `logs/` at Information,
//! and a remote collector on `http://localhost:5341/`. With `--config`, the
//! same shape is loaded from a TOML settings file instead.

use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;

use logsink::config::{
    self, BackendConfig, ConsoleConfig, RemoteCollectorConfig, RollingFileConfig, SinkConfig,
};
use logsink::http::HttpServer;
use logsink::lifecycle::{signals, Shutdown};
use logsink::{Severity, Sink};

#[derive(Parser, Debug)]
#[command(name = "logsink", about = "Structured logging sink demo service")]
struct Args {
    /// Path to a TOML settings file; defaults to the built-in config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address the demo HTTP service binds to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Grace period for draining backends on shutdown, in seconds.
    #[arg(long, default_value_t = 5)]
    shutdown_grace_secs: u64,
}

/// Programmatic configuration the demo runs with when no settings file is
/// given.
fn default_demo_config() -> SinkConfig {
    SinkConfig {
        global_minimum_severity: Severity::Debug,
        backends: vec![
            BackendConfig::Console(ConsoleConfig::default()),
            BackendConfig::RollingFile(RollingFileConfig {
                minimum_severity: Severity::Information,
                path: "logs/log-{date}.txt".to_string(),
                ..Default::default()
            }),
            BackendConfig::RemoteCollector(RemoteCollectorConfig::default()),
        ],
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => default_demo_config(),
    };

    // The sink is built once here and handed to every collaborator that
    // logs; no global logger state anywhere.
    let sink = Sink::new(config)?;
    let startup = sink.for_context("startup");

    let listener = TcpListener::bind(&args.bind).await?;
    let local_addr = listener.local_addr()?;
    startup.info(
        "listening on {address}",
        &[("address", json!(local_addr.to_string()))],
    );

    let shutdown = Shutdown::new();
    let server_rx = shutdown.subscribe();
    tokio::spawn(async move {
        signals::watch_signals(&shutdown).await;
    });

    let server = HttpServer::new(sink.clone());
    server.run(listener, server_rx).await?;

    startup.info("shutting down", &[]);
    sink.close(Duration::from_secs(args.shutdown_grace_secs));

    Ok(())
}
