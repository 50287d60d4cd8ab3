//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the front end.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the flight front end.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FrontendConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Upstream flight service.
    pub flight_service: FlightServiceConfig,

    /// Telemetry collector settings.
    pub telemetry: TelemetryConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Flight service (upstream) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlightServiceConfig {
    /// Flights API URL, used for both `PUT` (start) and streamed `GET` (monitor).
    pub endpoint: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total timeout for non-streaming calls in seconds.
    pub request_timeout_secs: u64,
}

impl Default for FlightServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5023/api/flights".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

/// Telemetry collector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Collector URL. `None` discards all telemetry.
    pub collector_endpoint: Option<String>,

    /// Envelopes buffered before new ones are dropped.
    pub queue_capacity: usize,

    /// Timeout for a single POST to the collector in seconds.
    pub request_timeout_secs: u64,

    /// Request paths never reported (prefix match).
    pub excluded_request_paths: Vec<String>,

    /// Dependency URLs never reported (prefix match).
    pub excluded_dependency_prefixes: Vec<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            collector_endpoint: Some(
                "http://localhost:8887/ApplicationInsightsHttpChannel".to_string(),
            ),
            queue_capacity: 1024,
            request_timeout_secs: 5,
            excluded_request_paths: vec!["/health".to_string()],
            excluded_dependency_prefixes: Vec::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}
