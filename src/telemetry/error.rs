//! Telemetry error types.

use thiserror::Error;

/// Reasons a telemetry record was not delivered.
///
/// None of these ever reach a request handler; the dispatcher logs them at
/// debug level and drops the record.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// No collector endpoint has been configured yet.
    #[error("collector endpoint not configured")]
    NotConfigured,

    /// Collector endpoint is not a valid absolute URL.
    #[error("invalid collector endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Record matched an exclusion rule.
    #[error("record filtered: {0}")]
    Filtered(String),

    /// Dispatch queue is at capacity.
    #[error("dispatch queue full")]
    QueueFull,

    /// Dispatch worker has stopped.
    #[error("dispatcher closed")]
    Closed,

    /// Envelope could not be encoded.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// POST to the collector failed before a response arrived.
    #[error("collector unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Collector answered with a non-success status.
    #[error("collector returned {0}")]
    Collector(u16),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

impl TelemetryError {
    /// Short label used as the metrics `outcome`.
    pub fn outcome(&self) -> &'static str {
        match self {
            TelemetryError::NotConfigured => "not_configured",
            TelemetryError::InvalidEndpoint { .. } => "invalid_endpoint",
            TelemetryError::Filtered(_) => "filtered",
            TelemetryError::QueueFull => "queue_full",
            TelemetryError::Closed => "closed",
            TelemetryError::Serialize(_) => "serialize_failed",
            TelemetryError::Transport(_) => "transport_failed",
            TelemetryError::Collector(_) => "collector_rejected",
        }
    }
}
