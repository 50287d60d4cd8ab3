//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order (metrics, telemetry, reload, HTTP)
//! - Bind the listener last, so traffic only arrives when ready
//! - Drive the ordered shutdown: stop accepting, stop monitoring, drain telemetry
//!
//! Logging is installed by the caller, before configuration errors can occur.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::watcher::{apply_updates, ConfigWatcher};
use crate::config::FrontendConfig;
use crate::flights::FlightError;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{Shutdown, ShutdownReason};
use crate::lifecycle::signals;
use crate::observability::metrics;
use crate::telemetry::{TelemetryDispatcher, TelemetryError};

/// How long queued telemetry may take to flush on shutdown.
const TELEMETRY_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Fatal startup or serving errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("telemetry setup failed: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("flight service client setup failed: {0}")]
    Flights(#[from] FlightError),

    #[error("config watcher failed: {0}")]
    Watch(#[from] notify::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Run the front end until a shutdown signal arrives.
///
/// With `config_path` set, edits to that file re-point the telemetry collector.
pub async fn run(config: FrontendConfig, config_path: Option<PathBuf>) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let (dispatcher, telemetry_worker) = TelemetryDispatcher::start(&config.telemetry)?;

    let watcher = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            tokio::spawn(apply_updates(updates, dispatcher.clone(), shutdown.subscribe()));
            Some(handle)
        }
        None => None,
    };

    let server = HttpServer::new(&config, dispatcher)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for connections"
    );

    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let early_exit = tokio::select! {
        _ = signals::wait_for_signal() => None,
        result = &mut server_task => Some(result),
    };

    let reason = if early_exit.is_some() {
        ShutdownReason::ServerExited
    } else {
        ShutdownReason::Signal
    };
    shutdown.trigger(reason);
    let served = match early_exit {
        Some(result) => result,
        None => server_task.await,
    };
    drop(watcher);

    // The worker exits once the last dispatcher handle is gone.
    if tokio::time::timeout(TELEMETRY_DRAIN_TIMEOUT, telemetry_worker).await.is_err() {
        tracing::warn!("Telemetry queue not drained before shutdown deadline");
    }

    served??;
    tracing::info!("Shutdown complete");
    Ok(())
}
