//! HTTP front end.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → middleware/correlation.rs (TraceContext in, Request-Id out, request telemetry)
//!     → handlers.rs (page state, start flight, toggle monitoring)
//!     → flights (outbound calls with child contexts)
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{AppState, HttpServer};
