//! Demo data loaded on startup when `SEED_DEMO_DATA` is set.

use crate::AirlineStore;
use crate::types::{AirportCode, FlightAction, FlightId, InvalidAirportCode, PassengerId};
use seatbook_runtime::StoreError;
use thiserror::Error;

const AIRPORTS: &[(&str, &str)] = &[
    ("CDG", "Paris"),
    ("IST", "Istanbul"),
    ("JFK", "New York"),
    ("LHR", "London"),
    ("LIM", "Lima"),
    ("NRT", "Tokyo"),
    ("PVG", "Shanghai"),
    ("SVO", "Moscow"),
];

/// Origin, destination, duration in minutes
const FLIGHTS: &[(&str, &str, u32)] = &[
    ("JFK", "LHR", 415),
    ("PVG", "CDG", 760),
    ("IST", "NRT", 700),
    ("JFK", "CDG", 435),
    ("SVO", "CDG", 245),
    ("LIM", "JFK", 455),
];

const PASSENGERS: &[(&str, &str)] = &[
    ("Harry", "Potter"),
    ("Ron", "Weasley"),
    ("Hermione", "Granger"),
    ("Draco", "Malfoy"),
    ("Luna", "Lovegood"),
];

/// Why [`apply`] stopped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// A demo airport code failed to parse
    #[error("Bad demo data: {0}")]
    InvalidAirport(#[from] InvalidAirportCode),

    /// The store refused a command
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What [`apply`] created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seeded {
    /// Flights in the order they were added
    pub flights: Vec<FlightId>,
    /// Passengers in the order they registered
    pub passengers: Vec<PassengerId>,
}

/// Loads the demo airline into `store`, giving every flight `capacity` seats.
///
/// # Errors
///
/// Returns [`SeedError::Store`] if the store rejects a command (e.g. it is
/// shutting down), or [`SeedError::InvalidAirport`] if a demo code is malformed.
pub async fn apply(store: &AirlineStore, capacity: u32) -> Result<Seeded, SeedError> {
    let mut seeded = Seeded::default();

    for (code, city) in AIRPORTS {
        store
            .send(FlightAction::AddAirport {
                code: AirportCode::parse(code)?,
                city: (*city).to_string(),
            })
            .await?;
    }

    for (origin, destination, duration_minutes) in FLIGHTS {
        let id = FlightId::new();
        store
            .send(FlightAction::AddFlight {
                id,
                origin: AirportCode::parse(origin)?,
                destination: AirportCode::parse(destination)?,
                duration_minutes: *duration_minutes,
                capacity,
            })
            .await?;
        seeded.flights.push(id);
    }

    for (first, last) in PASSENGERS {
        let id = PassengerId::new();
        store
            .send(FlightAction::RegisterPassenger {
                id,
                first: (*first).to_string(),
                last: (*last).to_string(),
            })
            .await?;
        seeded.passengers.push(id);
    }

    tracing::info!(
        airports = AIRPORTS.len(),
        flights = seeded.flights.len(),
        passengers = seeded.passengers.len(),
        capacity,
        "Demo data loaded"
    );

    Ok(seeded)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_demo_codes_parse() {
        for (code, _) in AIRPORTS {
            assert_eq!(AirportCode::parse(code).map(|c| c.to_string()), Ok((*code).to_string()));
        }
        for (origin, destination, _) in FLIGHTS {
            assert!(AIRPORTS.iter().any(|(code, _)| code == origin));
            assert!(AIRPORTS.iter().any(|(code, _)| code == destination));
        }
    }

    #[test]
    fn test_seed_error_from_bad_code() {
        let err: SeedError = AirportCode::parse("PARIS").unwrap_err().into();
        assert!(matches!(err, SeedError::InvalidAirport(_)));
    }
}
