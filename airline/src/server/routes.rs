//! Router configuration for the airline.

use super::health::{health_check, metrics_handler, readiness_check};
use super::state::AppState;
use crate::api::{airports, flights, passengers};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// - `/health`, `/ready`, `/metrics`
/// - `/api/flights`, `/api/flights/:id`, `/api/flights/:id/book`
/// - `/api/airports`
/// - `/api/passengers`, `/api/passengers/:id/flights`
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/flights", get(flights::list_flights).post(flights::create_flight))
        .route("/flights/:id", get(flights::get_flight))
        .route("/flights/:id/book", post(flights::book_flight))
        .route("/airports", get(airports::list_airports).post(airports::create_airport))
        .route(
            "/passengers",
            get(passengers::list_passengers).post(passengers::create_passenger),
        )
        .route("/passengers/:id/flights", get(passengers::passenger_flights));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
