//! HTTP API tests against the full router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use airline::{
    AirlineState, AirlineStore, FlightEnvironment, FlightReducer,
    server::{AppState, build_router},
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use seatbook_runtime::metrics::MetricsServer;
use seatbook_testing::test_clock;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const DEFAULT_CAPACITY: u32 = 2;

fn create_app() -> (Router, AirlineStore) {
    let store = AirlineStore::new(
        AirlineState::new(),
        FlightReducer::new(),
        FlightEnvironment::new(Arc::new(test_clock())),
    );
    let state = AppState::new(
        store.clone(),
        Arc::new(MetricsServer::new()),
        Duration::from_secs(2),
        DEFAULT_CAPACITY,
    );
    (build_router(state), store)
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn call(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply { status, location, body }
}

async fn get(app: &Router, uri: &str) -> Reply {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> Reply {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(app, request).await
}

async fn post_form(app: &Router, uri: &str, body: String) -> Reply {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    call(app, request).await
}

/// JFK and LHR plus one flight between them; returns the flight id
async fn schedule_flight(app: &Router, capacity: Option<u32>) -> String {
    for (code, city) in [("jfk", "New York"), ("LHR", "London")] {
        let reply = post_json(app, "/api/airports", &json!({ "code": code, "city": city })).await;
        assert_eq!(reply.status, StatusCode::CREATED);
    }

    let reply = post_json(
        app,
        "/api/flights",
        &json!({
            "origin": "JFK",
            "destination": "LHR",
            "duration_minutes": 415,
            "capacity": capacity,
        }),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body["id"].as_str().unwrap().to_string()
}

async fn register(app: &Router, first: &str, last: &str) -> String {
    let reply = post_json(app, "/api/passengers", &json!({ "first": first, "last": last })).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_readiness() {
    let (app, store) = create_app();

    let health = get(&app, "/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    assert_eq!(get(&app, "/ready").await.status, StatusCode::OK);

    store.shutdown(Duration::from_secs(1)).await.unwrap();
    let ready = get(&app, "/ready").await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ready.body["ready"], false);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (app, _) = create_app();
    assert_eq!(get(&app, "/metrics").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_airports() {
    let (app, _) = create_app();

    let created = post_json(&app, "/api/airports", &json!({ "code": "cdg", "city": "Paris" })).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["code"], "CDG");

    let bad = post_json(&app, "/api/airports", &json!({ "code": "PARIS", "city": "Paris" })).await;
    assert_eq!(bad.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(bad.body["code"], "VALIDATION_ERROR");

    let twice = post_json(&app, "/api/airports", &json!({ "code": "CDG", "city": "Paris" })).await;
    assert_eq!(twice.status, StatusCode::UNPROCESSABLE_ENTITY);

    let list = get(&app, "/api/airports").await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_flight_capacity_defaults_from_config() {
    let (app, _) = create_app();
    let id = schedule_flight(&app, None).await;

    let detail = get(&app, &format!("/api/flights/{id}")).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["flight"]["capacity"], DEFAULT_CAPACITY);
    assert_eq!(detail.body["flight"]["remaining_seats"], DEFAULT_CAPACITY);
    assert_eq!(detail.body["flight"]["origin_city"], "New York");

    let list = get(&app, "/api/flights").await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_flights_rejected() {
    let (app, _) = create_app();
    schedule_flight(&app, Some(1)).await;

    let unknown_airport = post_json(
        &app,
        "/api/flights",
        &json!({ "origin": "JFK", "destination": "NRT", "duration_minutes": 840 }),
    )
    .await;
    assert_eq!(unknown_airport.status, StatusCode::UNPROCESSABLE_ENTITY);

    let zero_seats = post_json(
        &app,
        "/api/flights",
        &json!({ "origin": "JFK", "destination": "LHR", "duration_minutes": 415, "capacity": 0 }),
    )
    .await;
    assert_eq!(zero_seats.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(zero_seats.body["message"], "Capacity must be greater than zero");
}

#[tokio::test]
async fn test_unknown_flight_is_404() {
    let (app, _) = create_app();
    let missing = uuid::Uuid::new_v4();

    let reply = get(&app, &format!("/api/flights/{missing}")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], format!("Flight with id {missing} not found"));
}

#[tokio::test]
async fn test_booking_redirects_then_fills_up() {
    let (app, _) = create_app();
    let flight = schedule_flight(&app, Some(1)).await;
    let harry = register(&app, "Harry", "Potter").await;
    let ron = register(&app, "Ron", "Weasley").await;

    let booked = post_form(&app, &format!("/api/flights/{flight}/book"), format!("passenger={harry}")).await;
    assert_eq!(booked.status, StatusCode::SEE_OTHER);
    assert_eq!(booked.location, Some(format!("/api/flights/{flight}")));

    let again = post_form(&app, &format!("/api/flights/{flight}/book"), format!("passenger={harry}")).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["code"], "ALREADY_BOOKED");

    let full = post_form(&app, &format!("/api/flights/{flight}/book"), format!("passenger={ron}")).await;
    assert_eq!(full.status, StatusCode::CONFLICT);
    assert_eq!(full.body["code"], "FLIGHT_FULL");

    let detail = get(&app, &format!("/api/flights/{flight}")).await;
    assert_eq!(detail.body["flight"]["remaining_seats"], 0);
    assert_eq!(detail.body["flight"]["availability"], "Full");
    assert_eq!(detail.body["passengers"][0]["first"], "Harry");
    assert_eq!(detail.body["non_passengers"][0]["first"], "Ron");

    let harry_flights = get(&app, &format!("/api/passengers/{harry}/flights")).await;
    assert_eq!(harry_flights.body.as_array().unwrap().len(), 1);
    let ron_flights = get(&app, &format!("/api/passengers/{ron}/flights")).await;
    assert!(ron_flights.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_unknown_ids_is_404() {
    let (app, _) = create_app();
    let flight = schedule_flight(&app, None).await;
    let harry = register(&app, "Harry", "Potter").await;
    let nobody = uuid::Uuid::new_v4();

    let unknown_passenger =
        post_form(&app, &format!("/api/flights/{flight}/book"), format!("passenger={nobody}")).await;
    assert_eq!(unknown_passenger.status, StatusCode::NOT_FOUND);
    assert_eq!(
        unknown_passenger.body["message"],
        format!("Passenger with id {nobody} not found")
    );

    let unknown_flight =
        post_form(&app, &format!("/api/flights/{nobody}/book"), format!("passenger={harry}")).await;
    assert_eq!(unknown_flight.status, StatusCode::NOT_FOUND);

    let missing_passenger = get(&app, &format!("/api/passengers/{nobody}/flights")).await;
    assert_eq!(missing_passenger.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_booking_form_is_400() {
    let (app, _) = create_app();
    let flight = schedule_flight(&app, None).await;

    let garbled =
        post_form(&app, &format!("/api/flights/{flight}/book"), "passenger=not-a-uuid".to_string()).await;
    assert_eq!(garbled.status, StatusCode::BAD_REQUEST);
    assert_eq!(garbled.body["code"], "BAD_REQUEST");

    let empty = post_form(&app, &format!("/api/flights/{flight}/book"), String::new()).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let detail = get(&app, &format!("/api/flights/{flight}")).await;
    assert_eq!(detail.body["flight"]["remaining_seats"], DEFAULT_CAPACITY);
}

#[tokio::test]
async fn test_passenger_names_required() {
    let (app, _) = create_app();

    let reply = post_json(&app, "/api/passengers", &json!({ "first": "", "last": "Granger" })).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(get(&app, "/api/passengers").await.body, json!([]));
}
