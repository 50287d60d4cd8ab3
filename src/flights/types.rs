//! Flight service payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named point on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fix {
    pub name: String,
}

/// Body of the flight-service `PUT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlightPlan {
    pub departure_point: Fix,
    pub destination: Fix,
    pub call_sign: String,
}

impl FlightPlan {
    pub fn new(departure: &str, destination: &str, call_sign: &str) -> Self {
        Self {
            departure_point: Fix { name: departure.trim().to_string() },
            destination: Fix { name: destination.trim().to_string() },
            call_sign: call_sign.trim().to_string(),
        }
    }

    /// True when every field has a value.
    pub fn is_complete(&self) -> bool {
        !self.departure_point.name.is_empty()
            && !self.destination.name.is_empty()
            && !self.call_sign.is_empty()
    }
}

/// One line of monitoring output, timestamped on arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightEvent {
    pub received_at: DateTime<Utc>,
    pub message: String,
}

impl FlightEvent {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            received_at: Utc::now(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_plan_wire_names() {
        let plan = FlightPlan::new("KSEA", "KPDX", "N123AB");
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["DeparturePoint"]["Name"], "KSEA");
        assert_eq!(json["Destination"]["Name"], "KPDX");
        assert_eq!(json["CallSign"], "N123AB");
    }

    #[test]
    fn test_incomplete_plan() {
        assert!(FlightPlan::new("KSEA", "KPDX", "N1").is_complete());
        assert!(!FlightPlan::new("KSEA", " ", "N1").is_complete());
        assert!(!FlightPlan::new("", "KPDX", "N1").is_complete());
    }
}
