//! Flight service collaborator.
//!
//! The business flow lives in the flight service; this module only issues
//! the calls the front end needs and keeps their trace context straight.

pub mod client;
pub mod error;
pub mod monitor;
pub mod types;

pub use client::{FlightServiceClient, StreamEnd};
pub use error::{FlightError, FlightResult};
pub use monitor::{FlightMonitor, MonitorRun, MonitorSwitch};
pub use types::{FlightEvent, FlightPlan};
