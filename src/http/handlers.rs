//! Route handlers.
//!
//! Page rendering is out of scope; the handlers answer with the JSON the
//! page would be rendered from.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::correlation::TraceContext;
use crate::flights::FlightPlan;
use crate::http::server::AppState;

/// Form value of `vote` that starts a flight. Any other value toggles monitoring.
pub const START_NEW_FLIGHT: &str = "startNewFlight";

/// Fields posted by the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightForm {
    #[serde(default)]
    pub vote: String,
    #[serde(default)]
    pub departure: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub callsign: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageState {
    pub monitoring: bool,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback: String,
    pub monitoring: bool,
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Json<PageState> {
    Json(PageState {
        monitoring: state.monitor.is_monitoring(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /`
pub async fn submit(
    State(state): State<AppState>,
    Extension(mut ctx): Extension<TraceContext>,
    Form(form): Form<FlightForm>,
) -> Json<Feedback> {
    let feedback = if form.vote == START_NEW_FLIGHT {
        start_new_flight(&state, &mut ctx, &form).await
    } else if state.monitor.toggle(&mut ctx) {
        "Flights monitoring started".to_string()
    } else {
        "Flights monitoring stopped".to_string()
    };

    Json(Feedback {
        feedback,
        monitoring: state.monitor.is_monitoring(),
    })
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn start_new_flight(state: &AppState, ctx: &mut TraceContext, form: &FlightForm) -> String {
    let plan = FlightPlan::new(&form.departure, &form.destination, &form.callsign);
    if !plan.is_complete() {
        return "Input can't be null!".to_string();
    }

    match state.flights.start_flight(ctx, &plan).await {
        Ok(status) => {
            tracing::info!(request_id = %ctx.activity(), call_sign = %plan.call_sign, "Flight started");
            format!("New flight started: {}", status)
        }
        Err(e) => {
            tracing::warn!(request_id = %ctx.activity(), error = %e, "Failed to start flight");
            format!("Failed to start flight, {}", e)
        }
    }
}

