//! Reducer logic for the airline.
//!
//! Validates commands, applies them to [`AirlineState`] and announces each
//! outcome as a follow-up action. Booking goes through the flight's
//! [`ReservationRegistry`]; the reducer runs under the store's write lock,
//! which makes the capacity check and the append atomic with respect to
//! other bookings.

use crate::types::{
    AirlineState, Airport, AirportCode, BookingId, BookingRejection, Flight, FlightAction,
    FlightId, Passenger, PassengerId,
};
use seatbook_core::{
    SmallVec, effect::Effect, environment::Clock, reducer::Reducer,
    registry::ReservationRegistry, smallvec,
};
use std::sync::Arc;

/// Environment dependencies for the airline reducer
#[derive(Clone)]
pub struct FlightEnvironment {
    /// Clock for booking timestamps
    pub clock: Arc<dyn Clock>,
}

impl FlightEnvironment {
    /// Creates a new `FlightEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// Reducer for the airline
#[derive(Clone, Debug, Default)]
pub struct FlightReducer;

impl FlightReducer {
    /// Creates a new `FlightReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_add_airport(state: &AirlineState, code: &AirportCode, city: &str) -> Result<(), String> {
        if state.airports.contains_key(code) {
            return Err(format!("Airport {code} already exists"));
        }

        if city.trim().is_empty() {
            return Err("Airport city cannot be empty".to_string());
        }

        Ok(())
    }

    fn build_flight(
        state: &AirlineState,
        id: FlightId,
        origin: AirportCode,
        destination: AirportCode,
        duration_minutes: u32,
        capacity: u32,
    ) -> Result<Flight, String> {
        if state.flights.contains_key(&id) {
            return Err(format!("Flight with ID {id} already exists"));
        }

        for code in [&origin, &destination] {
            if !state.airports.contains_key(code) {
                return Err(format!("Airport {code} not found"));
            }
        }

        if origin == destination {
            return Err("Origin and destination must differ".to_string());
        }

        if duration_minutes == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        let seats = ReservationRegistry::new(capacity).map_err(|e| e.to_string())?;

        Ok(Flight::new(id, origin, destination, duration_minutes, seats))
    }

    fn validate_register_passenger(
        state: &AirlineState,
        id: &PassengerId,
        first: &str,
        last: &str,
    ) -> Result<(), String> {
        if state.passengers.contains_key(id) {
            return Err(format!("Passenger with ID {id} already exists"));
        }

        if first.trim().is_empty() || last.trim().is_empty() {
            return Err("Passenger first and last name are required".to_string());
        }

        Ok(())
    }

    /// Seats the passenger or says why not
    fn book(
        state: &mut AirlineState,
        flight_id: &FlightId,
        passenger_id: PassengerId,
    ) -> Result<u32, BookingRejection> {
        let flight = state
            .flights
            .get_mut(flight_id)
            .ok_or(BookingRejection::UnknownFlight)?;

        if !state.passengers.contains_key(&passenger_id) {
            return Err(BookingRejection::UnknownPassenger);
        }

        if flight.has_passenger(&passenger_id) {
            return Err(BookingRejection::AlreadyBooked);
        }

        if !flight.board(passenger_id) {
            return Err(BookingRejection::FlightFull);
        }

        Ok(flight.remaining_seats())
    }

    fn reject(state: &mut AirlineState, error: String, outcome: FlightAction) -> SmallVec<[Effect<FlightAction>; 4]> {
        tracing::warn!(%error, "Command rejected");
        state.last_error = Some(error);
        smallvec![Effect::emit(outcome)]
    }

    fn accept(state: &mut AirlineState, outcome: FlightAction) -> SmallVec<[Effect<FlightAction>; 4]> {
        state.last_error = None;
        smallvec![Effect::emit(outcome)]
    }

    fn reduce_booking(
        state: &mut AirlineState,
        booking_id: BookingId,
        flight_id: FlightId,
        passenger_id: PassengerId,
        env: &FlightEnvironment,
    ) -> SmallVec<[Effect<FlightAction>; 4]> {
        match Self::book(state, &flight_id, passenger_id) {
            Ok(remaining_seats) => {
                tracing::info!(
                    %booking_id,
                    %flight_id,
                    %passenger_id,
                    remaining_seats,
                    "Passenger booked"
                );
                Self::accept(
                    state,
                    FlightAction::PassengerBooked {
                        booking_id,
                        flight_id,
                        passenger_id,
                        remaining_seats,
                        booked_at: env.clock.now(),
                    },
                )
            },
            Err(reason) => {
                tracing::info!(%booking_id, %flight_id, %passenger_id, %reason, "Booking rejected");
                state.last_error = Some(reason.to_string());
                smallvec![Effect::emit(FlightAction::BookingRejected {
                    booking_id,
                    flight_id,
                    passenger_id,
                    reason,
                })]
            },
        }
    }
}

impl Reducer for FlightReducer {
    type State = AirlineState;
    type Action = FlightAction;
    type Environment = FlightEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            FlightAction::AddAirport { code, city } => {
                if let Err(error) = Self::validate_add_airport(state, &code, &city) {
                    return Self::reject(
                        state,
                        error.clone(),
                        FlightAction::AirportRejected { code, error },
                    );
                }

                let city = city.trim().to_string();
                tracing::debug!(%code, %city, "Airport added");
                state.airports.insert(code.clone(), Airport { code: code.clone(), city });
                Self::accept(state, FlightAction::AirportAdded { code })
            },

            FlightAction::AddFlight {
                id,
                origin,
                destination,
                duration_minutes,
                capacity,
            } => match Self::build_flight(state, id, origin, destination, duration_minutes, capacity) {
                Ok(flight) => {
                    tracing::debug!(%id, capacity, "Flight added");
                    state.flights.insert(id, flight);
                    state.flight_order.push(id);
                    Self::accept(state, FlightAction::FlightAdded { id })
                },
                Err(error) => Self::reject(
                    state,
                    error.clone(),
                    FlightAction::FlightRejected { id, error },
                ),
            },

            FlightAction::RegisterPassenger { id, first, last } => {
                if let Err(error) = Self::validate_register_passenger(state, &id, &first, &last) {
                    return Self::reject(
                        state,
                        error.clone(),
                        FlightAction::PassengerRejected { id, error },
                    );
                }

                let passenger = Passenger {
                    id,
                    first: first.trim().to_string(),
                    last: last.trim().to_string(),
                };
                tracing::debug!(%id, name = %passenger.full_name(), "Passenger registered");
                state.passengers.insert(id, passenger);
                state.passenger_order.push(id);
                Self::accept(state, FlightAction::PassengerRegistered { id })
            },

            FlightAction::BookPassenger {
                booking_id,
                flight_id,
                passenger_id,
            } => Self::reduce_booking(state, booking_id, flight_id, passenger_id, env),

            // ========== Outcomes ==========
            // Already applied while handling the command
            FlightAction::AirportAdded { .. }
            | FlightAction::AirportRejected { .. }
            | FlightAction::FlightAdded { .. }
            | FlightAction::FlightRejected { .. }
            | FlightAction::PassengerRegistered { .. }
            | FlightAction::PassengerRejected { .. }
            | FlightAction::PassengerBooked { .. }
            | FlightAction::BookingRejected { .. } => SmallVec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use seatbook_testing::{ReducerTest, assertions, test_clock};

    fn create_test_env() -> FlightEnvironment {
        FlightEnvironment::new(Arc::new(test_clock()))
    }

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    fn reduce_all(state: &mut AirlineState, actions: Vec<FlightAction>) {
        let env = create_test_env();
        for action in actions {
            FlightReducer::new().reduce(state, action, &env);
        }
    }

    /// Two airports, one flight with `capacity` seats, and `passengers`
    /// registered passengers
    fn airline(capacity: u32, passengers: usize) -> (AirlineState, FlightId, Vec<PassengerId>) {
        let mut state = AirlineState::new();
        let flight_id = FlightId::new();
        let ids: Vec<PassengerId> = (0..passengers).map(|_| PassengerId::new()).collect();

        let mut actions = vec![
            FlightAction::AddAirport { code: code("JFK"), city: "New York".to_string() },
            FlightAction::AddAirport { code: code("LHR"), city: "London".to_string() },
            FlightAction::AddFlight {
                id: flight_id,
                origin: code("JFK"),
                destination: code("LHR"),
                duration_minutes: 415,
                capacity,
            },
        ];
        for (n, id) in ids.iter().enumerate() {
            actions.push(FlightAction::RegisterPassenger {
                id: *id,
                first: format!("Passenger{n}"),
                last: "Test".to_string(),
            });
        }
        reduce_all(&mut state, actions);

        (state, flight_id, ids)
    }

    fn book(flight_id: FlightId, passenger_id: PassengerId) -> FlightAction {
        FlightAction::BookPassenger {
            booking_id: BookingId::new(),
            flight_id,
            passenger_id,
        }
    }

    #[test]
    fn test_add_airport() {
        ReducerTest::new(FlightReducer::new())
            .with_env(create_test_env())
            .given_state(AirlineState::new())
            .when_action(FlightAction::AddAirport {
                code: code("cdg"),
                city: " Paris ".to_string(),
            })
            .then_state(|state| {
                let airport = state.airport(&code("CDG")).unwrap();
                assert_eq!(airport.city, "Paris");
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_duplicate_airport_rejected() {
        ReducerTest::new(FlightReducer::new())
            .with_env(create_test_env())
            .given_state(AirlineState::new())
            .when_action(FlightAction::AddAirport { code: code("CDG"), city: "Paris".to_string() })
            .when_action(FlightAction::AddAirport { code: code("CDG"), city: "Paris".to_string() })
            .then_state(|state| {
                assert_eq!(state.airports().count(), 1);
                assert!(state.last_error.as_ref().unwrap().contains("already exists"));
            })
            .run();
    }

    #[test]
    fn test_add_flight() {
        let (state, flight_id, _) = airline(3, 0);

        let flight = state.flight(&flight_id).unwrap();
        assert_eq!(flight.capacity(), 3);
        assert_eq!(flight.remaining_seats(), 3);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_flight_with_zero_capacity_rejected() {
        let (state, _, _) = airline(1, 0);

        ReducerTest::new(FlightReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(FlightAction::AddFlight {
                id: FlightId::new(),
                origin: code("LHR"),
                destination: code("JFK"),
                duration_minutes: 420,
                capacity: 0,
            })
            .then_state(|state| {
                assert_eq!(state.flights().count(), 1);
                assert!(state.last_error.as_ref().unwrap().contains("greater than zero"));
            })
            .run();
    }

    #[test]
    fn test_flight_to_same_airport_rejected() {
        let (state, _, _) = airline(1, 0);

        ReducerTest::new(FlightReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(FlightAction::AddFlight {
                id: FlightId::new(),
                origin: code("JFK"),
                destination: code("JFK"),
                duration_minutes: 60,
                capacity: 10,
            })
            .then_state(|state| {
                assert_eq!(state.flights().count(), 1);
                assert!(state.last_error.as_ref().unwrap().contains("must differ"));
            })
            .run();
    }

    #[test]
    fn test_flight_to_unknown_airport_rejected() {
        let (state, _, _) = airline(1, 0);

        ReducerTest::new(FlightReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(FlightAction::AddFlight {
                id: FlightId::new(),
                origin: code("JFK"),
                destination: code("NRT"),
                duration_minutes: 840,
                capacity: 10,
            })
            .then_state(|state| {
                assert!(state.last_error.as_ref().unwrap().contains("NRT not found"));
            })
            .run();
    }

    #[test]
    fn test_register_passenger_requires_names() {
        ReducerTest::new(FlightReducer::new())
            .with_env(create_test_env())
            .given_state(AirlineState::new())
            .when_action(FlightAction::RegisterPassenger {
                id: PassengerId::new(),
                first: "Harry".to_string(),
                last: "   ".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.passengers().count(), 0);
                assert!(state.last_error.is_some());
            })
            .run();
    }

    #[test]
    fn test_book_passenger() {
        let (state, flight_id, ids) = airline(2, 1);
        let passenger = ids[0];

        ReducerTest::new(FlightReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(book(flight_id, passenger))
            .then_state(move |state| {
                let flight = state.flight(&flight_id).unwrap();
                assert_eq!(flight.passenger_ids(), &[passenger]);
                assert_eq!(flight.remaining_seats(), 1);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn test_full_flight_turns_passengers_away() {
        let (mut state, flight_id, ids) = airline(2, 4);

        reduce_all(&mut state, ids.iter().map(|p| book(flight_id, *p)).collect());

        let flight = state.flight(&flight_id).unwrap();
        assert_eq!(flight.passenger_ids(), &ids[..2]);
        assert_eq!(flight.remaining_seats(), 0);
        assert_eq!(
            state.last_error.as_deref(),
            Some("no seats left on this flight")
        );
    }

    #[test]
    fn test_duplicate_booking_rejected() {
        let (mut state, flight_id, ids) = airline(3, 1);

        reduce_all(&mut state, vec![book(flight_id, ids[0]), book(flight_id, ids[0])]);

        let flight = state.flight(&flight_id).unwrap();
        assert_eq!(flight.passenger_ids().len(), 1);
        assert_eq!(flight.remaining_seats(), 2);
        assert_eq!(
            state.last_error.as_deref(),
            Some("passenger is already booked on this flight")
        );
    }

    #[tokio::test]
    async fn test_booking_outcomes() {
        let (mut state, flight_id, ids) = airline(1, 2);
        let env = create_test_env();
        let reducer = FlightReducer::new();

        let outcome = |state: &mut AirlineState, action| {
            let mut effects = reducer.reduce(state, action, &env);
            assert_eq!(effects.len(), 1);
            match effects.remove(0) {
                Effect::Future(fut) => fut,
                other => unreachable!("expected an outcome future, got {other:?}"),
            }
        };

        let booked = outcome(&mut state, book(flight_id, ids[0])).await.unwrap();
        assert!(matches!(
            booked,
            FlightAction::PassengerBooked { remaining_seats: 0, booked_at, .. }
                if booked_at == test_clock().now()
        ));

        let full = outcome(&mut state, book(flight_id, ids[1])).await.unwrap();
        assert!(matches!(
            full,
            FlightAction::BookingRejected { reason: BookingRejection::FlightFull, .. }
        ));

        let unknown_flight = outcome(&mut state, book(FlightId::new(), ids[1])).await.unwrap();
        assert!(matches!(
            unknown_flight,
            FlightAction::BookingRejected { reason: BookingRejection::UnknownFlight, .. }
        ));

        let unknown_passenger = outcome(&mut state, book(flight_id, PassengerId::new())).await.unwrap();
        assert!(matches!(
            unknown_passenger,
            FlightAction::BookingRejected { reason: BookingRejection::UnknownPassenger, .. }
        ));
    }

    #[test]
    fn test_outcomes_do_not_change_state() {
        let (state, flight_id, ids) = airline(1, 1);
        let before = state.flight(&flight_id).cloned();

        ReducerTest::new(FlightReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(FlightAction::PassengerBooked {
                booking_id: BookingId::new(),
                flight_id,
                passenger_id: ids[0],
                remaining_seats: 0,
                booked_at: test_clock().now(),
            })
            .then_state(move |state| {
                assert_eq!(state.flight(&flight_id).cloned(), before);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
