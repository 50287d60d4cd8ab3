//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config (loaded by main) → Metrics → Telemetry dispatcher → Config watcher → HTTP server
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Stop monitoring → Drain telemetry → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownReason};
pub use startup::{run, StartupError};
