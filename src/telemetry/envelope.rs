//! Telemetry envelope types and builders.
//!
//! # Wire Format
//! ```text
//! { "time": "2026-10-16T09:30:12.345678Z",
//!   "tags": { "ai.operation.id": "<root id>",
//!             "ai.operation.parentId": "<parent id>",
//!             "ai.operation.name": "POST /" },
//!   "data": { "baseType": "RequestData" | "RemoteDependencyData",
//!             "baseData": { ... } } }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::correlation::TraceContext;
use crate::telemetry::duration::{elapsed_between, format_duration};

/// Reported duration for streamed calls whose completion is never observed.
pub const UNOBSERVED_DURATION: &str = "00:00:00";

/// One record bound for the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEnvelope {
    pub time: DateTime<Utc>,
    pub tags: OperationTags,
    pub data: TelemetryData,
}

/// Correlation tags attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTags {
    #[serde(rename = "ai.operation.id")]
    pub operation_id: String,

    #[serde(rename = "ai.operation.parentId")]
    pub operation_parent_id: String,

    #[serde(rename = "ai.operation.name")]
    pub operation_name: String,
}

impl OperationTags {
    fn from_context(ctx: &TraceContext) -> Self {
        Self {
            operation_id: ctx.root_id().to_string(),
            operation_parent_id: ctx.activity().parent_id().to_string(),
            operation_name: ctx.operation_name().to_string(),
        }
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "baseType", content = "baseData")]
pub enum TelemetryData {
    RequestData(RequestData),
    RemoteDependencyData(RemoteDependencyData),
}

/// An inbound request handled by this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub success: bool,
    pub response_code: u16,
    pub url: String,
    pub properties: BTreeMap<String, String>,
}

/// An outbound call made by this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDependencyData {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub success: bool,
    pub result_code: u16,
    #[serde(rename = "type")]
    pub dependency_type: String,
    pub data: String,
    pub target: String,
}

impl TelemetryEnvelope {
    /// Request url for request records, dependency url for dependency records.
    pub fn url(&self) -> &str {
        match &self.data {
            TelemetryData::RequestData(request) => &request.url,
            TelemetryData::RemoteDependencyData(dependency) => &dependency.data,
        }
    }

    pub fn base_type(&self) -> &'static str {
        match &self.data {
            TelemetryData::RequestData(_) => "RequestData",
            TelemetryData::RemoteDependencyData(_) => "RemoteDependencyData",
        }
    }
}

/// Build the record for an inbound request that has completed.
pub fn build_request_telemetry(
    ctx: &TraceContext,
    method: &str,
    route_name: &str,
    status_code: u16,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    url: &str,
) -> TelemetryEnvelope {
    let mut properties = BTreeMap::new();
    properties.insert("httpMethod".to_string(), method.to_string());

    TelemetryEnvelope {
        time: finished_at,
        tags: OperationTags::from_context(ctx),
        data: TelemetryData::RequestData(RequestData {
            id: ctx.activity().id().to_string(),
            name: format!("{} {}", method, route_name),
            duration: format_duration(elapsed_between(started_at, finished_at)),
            success: status_code < 400,
            response_code: status_code,
            url: url.to_string(),
            properties,
        }),
    }
}

/// Build the record for an outbound HTTP call that has completed.
///
/// `path_portion` is the path and query of `url`; the target is what remains
/// of `url` once it is removed from the end.
pub fn build_dependency_telemetry(
    ctx: &TraceContext,
    method: &str,
    url: &str,
    path_portion: &str,
    status_code: u16,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> TelemetryEnvelope {
    dependency_envelope(
        ctx,
        method,
        url,
        path_portion,
        finished_at,
        format_duration(elapsed_between(started_at, finished_at)),
        status_code,
    )
}

/// Build the record for a streamed call at the moment it is issued.
///
/// The stream may run for the life of the process, so the record is sent up
/// front and always claims an instant, successful 200. Failures after this
/// point never show up as dependency records.
pub fn build_stream_dependency_telemetry(
    ctx: &TraceContext,
    method: &str,
    url: &str,
    path_portion: &str,
) -> TelemetryEnvelope {
    dependency_envelope(
        ctx,
        method,
        url,
        path_portion,
        Utc::now(),
        UNOBSERVED_DURATION.to_string(),
        200,
    )
}

fn dependency_envelope(
    ctx: &TraceContext,
    method: &str,
    url: &str,
    path_portion: &str,
    time: DateTime<Utc>,
    duration: String,
    status_code: u16,
) -> TelemetryEnvelope {
    TelemetryEnvelope {
        time,
        tags: OperationTags::from_context(ctx),
        data: TelemetryData::RemoteDependencyData(RemoteDependencyData {
            id: ctx.activity().id().to_string(),
            name: format!("{} {}", method, path_portion),
            duration,
            success: status_code < 400,
            result_code: status_code,
            dependency_type: "HTTP".to_string(),
            data: url.to_string(),
            target: url.strip_suffix(path_portion).unwrap_or(url).to_string(),
        }),
    }
}
