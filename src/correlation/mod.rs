//! Request correlation subsystem.
//!
//! # Data Flow
//! ```text
//! inbound Request-Id header (optional)
//!     → activity.rs (root / cross-process child id)
//!     → context.rs (TraceContext owned by the request task)
//!     → context.child() for every spawned task or outbound call
//!     → propagation.rs (outbound Request-Id header)
//! ```
//!
//! # Design Decisions
//! - Context is passed explicitly, never looked up from thread or task locals
//! - Deriving a child needs `&mut`, so one owner hands out each sequence number
//! - Malformed inbound ids are sanitized, never rejected

pub mod activity;
pub mod context;
pub mod propagation;

pub use activity::{root_id, ActivityId};
pub use context::TraceContext;
pub use propagation::{extract_request_id, inject_request_id, REQUEST_ID_HEADER};
