//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with the demo endpoints
//! - Inject the sink and a pre-built logger view into handlers via State
//! - Serve with graceful shutdown driven by the lifecycle coordinator
//!
//! The three endpoints mirror the three ways a web application typically
//! consumes a logging sink: a view built once at startup and injected, a
//! view created per request, and a closure route that captures its own.

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::sink::{Logger, Sink};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// View constructed once at startup, the constructor-injection style.
    pub logger: Logger,
    /// The sink itself, for handlers that build their own views.
    pub sink: Sink,
}

/// HTTP server for the logging demo.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server wired to the given sink.
    pub fn new(sink: Sink) -> Self {
        let state = AppState {
            logger: sink.for_context("http::logger"),
            sink: sink.clone(),
        };
        let router = Self::build_router(sink, state);
        Self { router }
    }

    fn build_router(sink: Sink, state: AppState) -> Router {
        // The minimal-API route owns its view, registered directly against
        // the router rather than going through AppState.
        let minimal = sink.for_context("http::minimal_api");

        Router::new()
            .route("/v1/logger", get(logger_handler))
            .route("/v1/factory", get(factory_handler))
            .route(
                "/v1/minimalapi",
                get(move || {
                    let logger = minimal.clone();
                    async move {
                        logger.info(
                            "handled {route}",
                            &[
                                ("route", json!("/v1/minimalapi")),
                                ("request_id", json!(Uuid::new_v4())),
                            ],
                        );
                        StatusCode::OK
                    }
                }),
            )
            .with_state(state)
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
    }
}

/// Uses the view injected at construction time.
async fn logger_handler(State(state): State<AppState>) -> StatusCode {
    state.logger.info(
        "handled {route}",
        &[
            ("route", json!("/v1/logger")),
            ("request_id", json!(Uuid::new_v4())),
        ],
    );
    StatusCode::OK
}

/// Builds a fresh named view per request, the factory style.
async fn factory_handler(State(state): State<AppState>) -> StatusCode {
    let logger = state.sink.for_context("http::factory");
    logger.info(
        "handled {route}",
        &[
            ("route", json!("/v1/factory")),
            ("request_id", json!(Uuid::new_v4())),
        ],
    );
    StatusCode::OK
}
