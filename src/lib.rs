//! Flight tracking web front end with distributed-trace correlation.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                ┌────────────────────────────────────────────────┐
//!     ──────────────────────▶│ http (middleware/correlation → handlers)       │
//!       Request-Id (opt.)    │        │ TraceContext (owned per request)      │
//!     ◀──────────────────────│        ▼                                       │
//!       Request-Id           │ flights (child contexts) ──────────────────────┼──▶ Flight service
//!                            │        │                     Request-Id        │
//!                            │        ▼                                       │
//!                            │ telemetry (envelope → dispatcher → worker) ────┼──▶ Collector sidecar
//!                            │                                                │
//!                            │ correlation · config · observability · lifecycle│
//!                            └────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod correlation;
pub mod http;
pub mod telemetry;

// Collaborators
pub mod flights;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::FrontendConfig;
pub use correlation::{ActivityId, TraceContext};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use telemetry::TelemetryDispatcher;
