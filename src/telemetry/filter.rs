//! Exclusion rules applied before a record is queued.

use url::Url;

use crate::telemetry::envelope::{TelemetryData, TelemetryEnvelope};

/// Drops records nobody wants to see in the collector.
///
/// - Request records whose URL path starts with an excluded path (health probes).
/// - Dependency records whose URL starts with an excluded prefix, which
///   always includes the collector itself.
#[derive(Debug, Clone, Default)]
pub struct TelemetryFilter {
    request_paths: Vec<String>,
    dependency_prefixes: Vec<String>,
}

impl TelemetryFilter {
    pub fn new(request_paths: Vec<String>, dependency_prefixes: Vec<String>) -> Self {
        Self {
            request_paths: request_paths.into_iter().filter(|p| !p.trim().is_empty()).collect(),
            dependency_prefixes: dependency_prefixes
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect(),
        }
    }

    /// Returns the reason `envelope` should be dropped, if any.
    pub fn rejects(&self, envelope: &TelemetryEnvelope, collector: Option<&Url>) -> Option<String> {
        let url = envelope.url();
        match &envelope.data {
            TelemetryData::RequestData(_) => {
                let path = request_path(url);
                self.request_paths
                    .iter()
                    .find(|excluded| path.starts_with(excluded.as_str()))
                    .map(|excluded| format!("request path matches '{}'", excluded))
            }
            TelemetryData::RemoteDependencyData(_) => {
                if collector.is_some_and(|collector| url.starts_with(collector.as_str())) {
                    return Some("dependency targets the collector".to_string());
                }
                self.dependency_prefixes
                    .iter()
                    .find(|prefix| url.starts_with(prefix.as_str()))
                    .map(|prefix| format!("dependency url matches '{}'", prefix))
            }
        }
    }
}

fn request_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    }
}
