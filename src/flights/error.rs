//! Flight service error types.

use thiserror::Error;

/// Failures on the business path. Shown to the user as feedback.
#[derive(Debug, Error)]
pub enum FlightError {
    /// Configured endpoint is not a usable URL.
    #[error("invalid flight service endpoint '{0}'")]
    InvalidEndpoint(String),

    /// Connection or protocol failure before a status arrived.
    #[error("flight service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// Flight service answered with a failure status.
    #[error("{status}, {reason}")]
    Rejected { status: u16, reason: String },
}

/// Result type for flight service operations.
pub type FlightResult<T> = Result<T, FlightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = FlightError::Rejected {
            status: 409,
            reason: "Conflict".into(),
        };
        assert_eq!(err.to_string(), "409, Conflict");
    }
}
