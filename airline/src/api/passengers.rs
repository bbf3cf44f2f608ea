//! Passenger endpoints.
//!
//! - GET /api/passengers - List passengers in registration order
//! - POST /api/passengers - Register a passenger
//! - GET /api/passengers/:id/flights - Flights a passenger is booked on

use super::dispatch;
use crate::error::AppError;
use crate::queries::FlightSummary;
use crate::server::state::AppState;
use crate::types::{FlightAction, Passenger, PassengerId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

/// Request to register a passenger.
#[derive(Debug, Deserialize)]
pub struct CreatePassengerRequest {
    /// Given name
    pub first: String,
    /// Family name
    pub last: String,
}

/// List all passengers.
pub async fn list_passengers(State(state): State<AppState>) -> Json<Vec<Passenger>> {
    Json(state.store.state(|s| s.passengers().cloned().collect()).await)
}

/// Register a passenger.
///
/// # Errors
///
/// 422 if either name is empty.
pub async fn create_passenger(
    State(state): State<AppState>,
    Json(request): Json<CreatePassengerRequest>,
) -> Result<(StatusCode, Json<Passenger>), AppError> {
    let id = PassengerId::new();
    let action = FlightAction::RegisterPassenger {
        id,
        first: request.first,
        last: request.last,
    };

    let outcome = dispatch(&state, action, move |a| {
        matches!(
            a,
            FlightAction::PassengerRegistered { id: got }
                | FlightAction::PassengerRejected { id: got, .. }
                if *got == id
        )
    })
    .await?;

    if let FlightAction::PassengerRejected { error, .. } = outcome {
        return Err(AppError::validation(error));
    }

    let passenger = state
        .store
        .state(|s| s.passenger(&id).cloned())
        .await
        .ok_or_else(|| AppError::internal("Passenger vanished after registration"))?;

    Ok((StatusCode::CREATED, Json(passenger)))
}

/// Flights a passenger is booked on.
///
/// # Errors
///
/// 404 if the passenger does not exist.
pub async fn passenger_flights(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FlightSummary>>, AppError> {
    let passenger_id = PassengerId::from_uuid(id);

    state
        .store
        .state(|s| s.passenger_flights(&passenger_id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Passenger", id))
}
