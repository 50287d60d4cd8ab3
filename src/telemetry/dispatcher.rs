//! Best-effort delivery of telemetry envelopes to the collector.
//!
//! # Data Flow
//! ```text
//! request / dependency code
//!     → send() (filter, try_send on a bounded queue, never awaits)
//!     → worker task (serialize, single POST, no retry)
//!     → collector sidecar
//! ```

use arc_swap::ArcSwapOption;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use url::Url;

use crate::config::TelemetryConfig;
use crate::observability::metrics;
use crate::telemetry::envelope::TelemetryEnvelope;
use crate::telemetry::error::{TelemetryError, TelemetryResult};
use crate::telemetry::filter::TelemetryFilter;

/// Handle used by request and background code to emit telemetry.
///
/// Cloning is cheap. The worker exits once every handle has been dropped and
/// the queue has drained.
#[derive(Clone)]
pub struct TelemetryDispatcher {
    tx: mpsc::Sender<TelemetryEnvelope>,
    endpoint: Arc<ArcSwapOption<Url>>,
    filter: Arc<TelemetryFilter>,
}

impl TelemetryDispatcher {
    /// Build the dispatcher and spawn its worker on the current runtime.
    pub fn start(config: &TelemetryConfig) -> TelemetryResult<(Self, JoinHandle<()>)> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let dispatcher = Self {
            tx,
            endpoint: Arc::new(ArcSwapOption::empty()),
            filter: Arc::new(TelemetryFilter::new(
                config.excluded_request_paths.clone(),
                config.excluded_dependency_prefixes.clone(),
            )),
        };

        if let Some(endpoint) = &config.collector_endpoint {
            dispatcher.configure(endpoint)?;
        } else {
            tracing::warn!("No collector endpoint configured, telemetry will be discarded");
        }

        let worker = tokio::spawn(run_worker(rx, client, dispatcher.endpoint.clone()));
        Ok((dispatcher, worker))
    }

    /// Point the dispatcher at a collector. Safe to call while records are in flight.
    pub fn configure(&self, endpoint: &str) -> TelemetryResult<()> {
        let url = Url::parse(endpoint).map_err(|source| TelemetryError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;

        tracing::info!(collector = %url, "Telemetry collector configured");
        self.endpoint.store(Some(Arc::new(url)));
        Ok(())
    }

    /// Current collector endpoint.
    pub fn endpoint(&self) -> Option<Arc<Url>> {
        self.endpoint.load_full()
    }

    /// Queue `envelope` for delivery, reporting why it was not queued.
    pub fn try_send(&self, envelope: TelemetryEnvelope) -> TelemetryResult<()> {
        let collector = self.endpoint.load_full();
        let Some(collector) = collector.as_deref() else {
            return Err(TelemetryError::NotConfigured);
        };

        if let Some(reason) = self.filter.rejects(&envelope, Some(collector)) {
            return Err(TelemetryError::Filtered(reason));
        }

        self.tx.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(_) => TelemetryError::QueueFull,
            TrySendError::Closed(_) => TelemetryError::Closed,
        })
    }

    /// Fire and forget. Anything that stops the record is logged at debug
    /// level and otherwise ignored.
    pub fn send(&self, envelope: TelemetryEnvelope) {
        let operation_id = envelope.tags.operation_id.clone();
        if let Err(e) = self.try_send(envelope) {
            tracing::debug!(operation_id = %operation_id, reason = %e, "Telemetry record not queued");
            metrics::record_telemetry(e.outcome());
        }
    }
}

/// POST one envelope to `endpoint`.
pub async fn deliver(
    client: &reqwest::Client,
    endpoint: &Url,
    envelope: &TelemetryEnvelope,
) -> TelemetryResult<()> {
    let body = serde_json::to_vec(envelope)?;
    let response = client
        .post(endpoint.clone())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(TelemetryError::Collector(status.as_u16()));
    }
    Ok(())
}

async fn run_worker(
    mut rx: mpsc::Receiver<TelemetryEnvelope>,
    client: reqwest::Client,
    endpoint: Arc<ArcSwapOption<Url>>,
) {
    while let Some(envelope) = rx.recv().await {
        let result = match endpoint.load_full() {
            Some(url) => deliver(&client, &url, &envelope).await,
            None => Err(TelemetryError::NotConfigured),
        };

        match result {
            Ok(()) => metrics::record_telemetry("sent"),
            Err(e) => {
                tracing::debug!(
                    operation_id = %envelope.tags.operation_id,
                    base_type = envelope.base_type(),
                    error = %e,
                    "Telemetry record discarded"
                );
                metrics::record_telemetry(e.outcome());
            }
        }
    }

    tracing::debug!("Telemetry worker stopped");
}
