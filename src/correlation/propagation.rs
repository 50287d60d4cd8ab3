//! `Request-Id` header propagation.

use axum::http::{HeaderMap, HeaderValue};

use crate::correlation::activity::ActivityId;

/// Header carrying the hierarchical activity id in both directions.
pub const REQUEST_ID_HEADER: &str = "Request-Id";

/// Read the inbound `Request-Id`, if present and textual.
///
/// A value that is not visible ASCII is treated as absent, which starts a
/// fresh root instead of rejecting the request.
pub fn extract_request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Set `Request-Id` to `activity`'s id.
pub fn inject_request_id(headers: &mut HeaderMap, activity: &ActivityId) {
    // Derived ids only contain generated tokens and text that was already a readable header.
    if let Ok(value) = HeaderValue::from_str(activity.id()) {
        headers.insert(REQUEST_ID_HEADER, value);
    } else {
        tracing::debug!(activity_id = %activity, "Activity id is not a valid header value");
    }
}
