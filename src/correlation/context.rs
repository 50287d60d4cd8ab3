//! Per-operation trace context.

use chrono::{DateTime, Utc};

use crate::correlation::activity::ActivityId;

/// Everything needed to report one logical operation.
///
/// A context is owned by the task executing the operation. Work that runs
/// elsewhere (a spawned task, an outbound call) gets its own context from
/// [`TraceContext::child`], moved in at spawn time.
#[derive(Debug, Clone)]
pub struct TraceContext {
    activity: ActivityId,
    started_at: DateTime<Utc>,
    operation_name: String,
}

impl TraceContext {
    /// Start a context for `activity` now.
    pub fn new(activity: ActivityId, operation_name: impl Into<String>) -> Self {
        Self::started_at(activity, operation_name, Utc::now())
    }

    pub fn started_at(
        activity: ActivityId,
        operation_name: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            activity,
            started_at,
            operation_name: operation_name.into(),
        }
    }

    /// Context for an inbound request, extending the caller's `Request-Id`
    /// when one was sent.
    pub fn from_request_id(request_id: Option<&str>, operation_name: impl Into<String>) -> Self {
        let activity = match request_id {
            Some(value) => ActivityId::from_header(value),
            None => ActivityId::root(),
        };
        Self::new(activity, operation_name)
    }

    /// Derive the context for a unit of work started on behalf of this one.
    ///
    /// The child inherits the operation name so that dependency records are
    /// grouped under the request that caused them.
    pub fn child(&mut self) -> TraceContext {
        TraceContext {
            activity: self.activity.child(),
            started_at: Utc::now(),
            operation_name: self.operation_name.clone(),
        }
    }

    pub fn activity(&self) -> &ActivityId {
        &self.activity
    }

    pub fn started(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Shorthand for `self.activity().root_id()`.
    pub fn root_id(&self) -> &str {
        self.activity.root_id()
    }
}
