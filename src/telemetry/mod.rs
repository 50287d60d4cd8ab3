//! Telemetry records for the collector sidecar.
//!
//! # Data Flow
//! ```text
//! TraceContext + outcome
//!     → envelope.rs (request / dependency records, duration.rs for timings)
//!     → dispatcher.rs (filter.rs, bounded queue, background POST)
//!     → collector
//! ```
//!
//! # Design Decisions
//! - Delivery is best effort: no retries, no backoff, no delivery guarantee
//! - Failures surface as `TelemetryError` and end at the dispatcher
//! - The dispatcher is injected, there is no process-wide endpoint

pub mod dispatcher;
pub mod duration;
pub mod envelope;
pub mod error;
pub mod filter;

pub use dispatcher::TelemetryDispatcher;
pub use duration::format_duration;
pub use envelope::{
    build_dependency_telemetry, build_request_telemetry, build_stream_dependency_telemetry,
    OperationTags, RemoteDependencyData, RequestData, TelemetryData, TelemetryEnvelope,
};
pub use error::{TelemetryError, TelemetryResult};
pub use filter::TelemetryFilter;
