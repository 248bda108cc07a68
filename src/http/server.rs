//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the two endpoints and the not-found fallback
//! - Wire up middleware (tracing, stats timeout, request ID, CORS headers)
//! - Serve on a listener until shutdown

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::{body::Body, http::Request, routing::any, BoxError, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::cors::with_cors_headers;
use crate::http::handlers::{
    color_stats, not_found, random_color, COLOR_STATS_PATH, RANDOM_COLOR_PATH,
};
use crate::http::request::{request_id, MakeRequestUuid};
use crate::http::response::ApiError;
use crate::lifecycle::signals::shutdown_signal;
use crate::rotation::RotationEngine;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: RotationEngine,
}

/// HTTP server for the color rotation service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server around an initialized engine.
    pub fn new(config: ServiceConfig, engine: RotationEngine) -> Self {
        let state = AppState { engine };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Only the stats route carries the request timeout. A rotation is not
    /// cut short, so its response always reports what was committed.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let stats_timeout = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        let router = Router::new()
            .route(RANDOM_COLOR_PATH, any(random_color))
            .route(COLOR_STATS_PATH, any(color_stats).layer(stats_timeout))
            .fallback(not_found)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id(request)
                    )
                }),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        with_cors_headers(router)
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns after a shutdown signal once in-flight requests finish.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn handle_timeout(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Stats request timed out");
    } else {
        tracing::error!(error = %err, "Stats request failed in middleware");
    }
    ApiError::Timeout
}
