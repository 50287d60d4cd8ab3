//! Configuration file watcher for hot reload.
//!
//! Only the telemetry collector endpoint is applied live; other changes are
//! logged and take effect on restart.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

use crate::config::loader::resolve_config;
use crate::config::schema::FrontendConfig;
use crate::telemetry::TelemetryDispatcher;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<FrontendConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<FrontendConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(path = ?path, "Config file change detected, reloading");
                    match resolve_config(Some(&path)) {
                        Ok(config) => {
                            let _ = tx.send(config);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Apply configuration updates to the running dispatcher until shutdown.
pub async fn apply_updates(
    mut updates: mpsc::UnboundedReceiver<FrontendConfig>,
    dispatcher: TelemetryDispatcher,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(config) = update else { break };
                match config.telemetry.collector_endpoint.as_deref() {
                    Some(endpoint) => {
                        if let Err(e) = dispatcher.configure(endpoint) {
                            tracing::warn!(error = %e, "Ignoring reloaded collector endpoint");
                        }
                    }
                    None => tracing::warn!("Reloaded config has no collector endpoint, keeping the current one"),
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}
