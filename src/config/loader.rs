//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::FrontendConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Collector endpoint override, set by the deployment next to the sidecar.
pub const COLLECTOR_ENDPOINT_ENV: &str = "LOGGING_SIDECAR_ENDPOINT";
/// Flight service discovery variables (both must be set).
pub const FLIGHT_SERVICE_HOST_ENV: &str = "ATCSVC_SERVICE_HOST";
pub const FLIGHT_SERVICE_PORT_ENV: &str = "ATCSVC_SERVICE_PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load from `path` if given, otherwise start from defaults, then apply
/// environment overrides and validate the result.
pub fn resolve_config(path: Option<&Path>) -> Result<FrontendConfig, ConfigError> {
    resolve_with(path, |key| std::env::var(key).ok())
}

fn resolve_with<F>(path: Option<&Path>, lookup: F) -> Result<FrontendConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => FrontendConfig::default(),
    };

    let config = apply_env_overrides(config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply deployment overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut config: FrontendConfig, lookup: F) -> FrontendConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup(COLLECTOR_ENDPOINT_ENV).filter(|v| !v.is_empty()) {
        config.telemetry.collector_endpoint = Some(endpoint);
    }

    let host = lookup(FLIGHT_SERVICE_HOST_ENV).filter(|v| !v.is_empty());
    let port = lookup(FLIGHT_SERVICE_PORT_ENV).filter(|v| !v.is_empty());
    if let (Some(host), Some(port)) = (host, port) {
        config.flight_service.endpoint = format!("http://{}:{}/api/flights", host, port);
    }

    config
}
