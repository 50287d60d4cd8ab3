//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the page routes
//! - Wire up middleware (correlation, timeouts, body limits, tracing)
//! - Serve on a listener until shutdown

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::FrontendConfig;
use crate::flights::{FlightMonitor, FlightResult, FlightServiceClient};
use crate::http::handlers;
use crate::http::middleware::correlation_middleware;
use crate::telemetry::TelemetryDispatcher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub flights: FlightServiceClient,
    pub monitor: Arc<FlightMonitor>,
    pub dispatcher: TelemetryDispatcher,
}

/// HTTP server for the flight front end.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &FrontendConfig, dispatcher: TelemetryDispatcher) -> FlightResult<Self> {
        let flights = FlightServiceClient::new(&config.flight_service, dispatcher.clone())?;
        let monitor = Arc::new(FlightMonitor::new(flights.clone()));

        let state = AppState {
            flights,
            monitor,
            dispatcher,
        };

        let router = Self::build_router(config, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &FrontendConfig, state: AppState) -> Router {
        let dispatcher = state.dispatcher.clone();
        Router::new()
            .route("/", get(handlers::index).post(handlers::submit))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(dispatcher, correlation_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// Monitoring state shared with the handlers.
    pub fn monitor(&self) -> Arc<FlightMonitor> {
        self.state.monitor.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            flight_service = %self.state.flights.endpoint(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        self.state.monitor.stop();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
