//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse, environment overrides)
//!     → validation.rs (semantic checks)
//!     → FrontendConfig (validated, immutable)
//!     → sections handed to the subsystems that need them
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs reloads and validates
//!     → collector endpoint swapped in the telemetry dispatcher
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Deployment variables override the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{resolve_config, ConfigError};
pub use schema::{
    FlightServiceConfig, FrontendConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    TelemetryConfig, TimeoutConfig,
};
