//! Airport endpoints.
//!
//! - GET /api/airports - List airports ordered by code
//! - POST /api/airports - Add an airport

use super::dispatch;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::types::{Airport, AirportCode, FlightAction};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Request to add an airport.
#[derive(Debug, Deserialize)]
pub struct CreateAirportRequest {
    /// Three-letter code
    pub code: String,
    /// City served
    pub city: String,
}

/// List all airports.
pub async fn list_airports(State(state): State<AppState>) -> Json<Vec<Airport>> {
    Json(state.store.state(|s| s.airports().cloned().collect()).await)
}

/// Add an airport.
///
/// # Errors
///
/// 422 for an invalid code, an empty city or a code already in use.
pub async fn create_airport(
    State(state): State<AppState>,
    Json(request): Json<CreateAirportRequest>,
) -> Result<(StatusCode, Json<Airport>), AppError> {
    let code = AirportCode::parse(&request.code).map_err(|e| AppError::validation(e.to_string()))?;

    let action = FlightAction::AddAirport {
        code: code.clone(),
        city: request.city,
    };

    let wanted = code.clone();
    let outcome = dispatch(&state, action, move |a| {
        matches!(
            a,
            FlightAction::AirportAdded { code: got } | FlightAction::AirportRejected { code: got, .. }
                if *got == wanted
        )
    })
    .await?;

    if let FlightAction::AirportRejected { error, .. } = outcome {
        return Err(AppError::validation(error));
    }

    let airport = state
        .store
        .state(|s| s.airport(&code).cloned())
        .await
        .ok_or_else(|| AppError::internal("Airport vanished after creation"))?;

    Ok((StatusCode::CREATED, Json(airport)))
}
