//! Flight endpoints.
//!
//! - GET /api/flights - List flights with remaining seats
//! - POST /api/flights - Schedule a flight
//! - GET /api/flights/:id - Flight with its passengers and non-passengers
//! - POST /api/flights/:id/book - Book a passenger (form field `passenger`)

use super::dispatch;
use crate::error::AppError;
use crate::queries::{FlightDetail, FlightSummary};
use crate::server::state::AppState;
use crate::types::{AirportCode, BookingId, BookingRejection, FlightAction, FlightId, PassengerId};
use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
    response::Redirect,
};
use serde::Deserialize;
use uuid::Uuid;

/// Request to schedule a flight.
#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    /// Departure airport code
    pub origin: String,
    /// Arrival airport code
    pub destination: String,
    /// Flight time in minutes
    pub duration_minutes: u32,
    /// Seats; the configured default when omitted
    pub capacity: Option<u32>,
}

/// Booking form.
#[derive(Debug, Deserialize)]
pub struct BookForm {
    /// Passenger to book
    pub passenger: Uuid,
}

/// List all flights in the order they were scheduled.
pub async fn list_flights(State(state): State<AppState>) -> Json<Vec<FlightSummary>> {
    Json(state.store.state(|s| s.flight_summaries()).await)
}

/// Schedule a new flight.
///
/// # Errors
///
/// 422 for an invalid airport code or a rejected flight.
pub async fn create_flight(
    State(state): State<AppState>,
    Json(request): Json<CreateFlightRequest>,
) -> Result<(StatusCode, Json<FlightSummary>), AppError> {
    let origin = AirportCode::parse(&request.origin).map_err(|e| AppError::validation(e.to_string()))?;
    let destination =
        AirportCode::parse(&request.destination).map_err(|e| AppError::validation(e.to_string()))?;

    let id = FlightId::new();
    let action = FlightAction::AddFlight {
        id,
        origin,
        destination,
        duration_minutes: request.duration_minutes,
        capacity: request.capacity.unwrap_or(state.default_capacity),
    };

    let outcome = dispatch(&state, action, move |a| {
        matches!(
            a,
            FlightAction::FlightAdded { id: got } | FlightAction::FlightRejected { id: got, .. }
                if *got == id
        )
    })
    .await?;

    if let FlightAction::FlightRejected { error, .. } = outcome {
        return Err(AppError::validation(error));
    }

    let summary = state
        .store
        .state(|s| s.flight(&id).map(|f| s.summarize(f)))
        .await
        .ok_or_else(|| AppError::internal("Flight vanished after creation"))?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Get a flight with its passengers and the passengers who could still book.
///
/// # Errors
///
/// 404 if the flight does not exist.
pub async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight_id = FlightId::from_uuid(id);

    state
        .store
        .state(|s| s.flight_detail(&flight_id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Flight", id))
}

/// Book a passenger onto a flight, then redirect to the flight.
///
/// # Errors
///
/// - 400 if the form has no valid `passenger` id
/// - 404 for an unknown flight or passenger
/// - 409 if the flight is full or the passenger is already on it
pub async fn book_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    form: Result<Form<BookForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|e| AppError::bad_request(e.body_text()))?;
    let booking_id = BookingId::new();
    let flight_id = FlightId::from_uuid(id);
    let passenger_id = PassengerId::from_uuid(form.passenger);

    let action = FlightAction::BookPassenger {
        booking_id,
        flight_id,
        passenger_id,
    };

    let outcome = dispatch(&state, action, move |a| a.booking_outcome() == Some(&booking_id)).await?;

    match outcome {
        FlightAction::PassengerBooked { .. } => {
            metrics::counter!("reservations.attempts.total", "outcome" => "booked").increment(1);
            Ok(Redirect::to(&format!("/api/flights/{id}")))
        },
        FlightAction::BookingRejected { reason, .. } => {
            metrics::counter!("reservations.attempts.total", "outcome" => rejection_label(reason))
                .increment(1);
            Err(match reason {
                BookingRejection::UnknownFlight => AppError::not_found("Flight", id),
                BookingRejection::UnknownPassenger => AppError::not_found("Passenger", form.passenger),
                other => other.into(),
            })
        },
        other => Err(AppError::internal(format!("Unexpected booking outcome: {other:?}"))),
    }
}

const fn rejection_label(reason: BookingRejection) -> &'static str {
    match reason {
        BookingRejection::UnknownFlight => "unknown_flight",
        BookingRejection::UnknownPassenger => "unknown_passenger",
        BookingRejection::AlreadyBooked => "already_booked",
        BookingRejection::FlightFull => "full",
    }
}
