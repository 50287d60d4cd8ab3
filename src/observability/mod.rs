//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! Correlation telemetry for the collector lives in `crate::telemetry`; this
//! module covers the process's own diagnostics.

pub mod logging;
pub mod metrics;
