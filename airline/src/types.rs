//! Domain types for the airline.
//!
//! A flight is the fixed-capacity resource and its passengers are the
//! holders: every [`Flight`] owns a [`ReservationRegistry`] of
//! [`PassengerId`]s, and booking a passenger is a reservation against it.

use chrono::{DateTime, Utc};
use seatbook_core::registry::ReservationRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Declares a UUID-backed identifier newtype
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Creates a `", stringify!($name), "` from a UUID")]
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a flight
    FlightId
}

uuid_id! {
    /// Unique identifier for a passenger
    PassengerId
}

uuid_id! {
    /// Correlates a booking request with its outcome
    BookingId
}

/// Rejected airport code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Airport code must be exactly three letters, got {0:?}")]
pub struct InvalidAirportCode(pub String);

/// Three-letter airport code, stored upper-case (e.g. `JFK`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AirportCode(String);

impl AirportCode {
    /// Parses an airport code, normalizing it to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAirportCode`] unless `code` is exactly three ASCII
    /// letters.
    pub fn parse(code: &str) -> Result<Self, InvalidAirportCode> {
        let trimmed = code.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(InvalidAirportCode(code.to_string()))
        }
    }

    /// Returns the code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AirportCode {
    type Error = InvalidAirportCode;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::parse(&code)
    }
}

impl From<AirportCode> for String {
    fn from(code: AirportCode) -> Self {
        code.0
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An airport flights can depart from or arrive at
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Airport code
    pub code: AirportCode,
    /// City served
    pub city: String,
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.city, self.code)
    }
}

/// A scheduled flight and its seat registry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Unique identifier
    pub id: FlightId,
    /// Departure airport
    pub origin: AirportCode,
    /// Arrival airport
    pub destination: AirportCode,
    /// Flight time in minutes
    pub duration_minutes: u32,
    seats: ReservationRegistry<PassengerId>,
}

impl Flight {
    /// Creates a flight with an empty seat registry
    #[must_use]
    pub const fn new(
        id: FlightId,
        origin: AirportCode,
        destination: AirportCode,
        duration_minutes: u32,
        seats: ReservationRegistry<PassengerId>,
    ) -> Self {
        Self {
            id,
            origin,
            destination,
            duration_minutes,
            seats,
        }
    }

    /// Total number of seats
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.seats.capacity()
    }

    /// Seats still open
    #[must_use]
    pub fn remaining_seats(&self) -> u32 {
        self.seats.remaining_capacity()
    }

    /// Booked passengers in booking order
    #[must_use]
    pub fn passenger_ids(&self) -> &[PassengerId] {
        self.seats.holders()
    }

    /// Whether `passenger` already holds a seat
    #[must_use]
    pub fn has_passenger(&self, passenger: &PassengerId) -> bool {
        self.seats.contains(passenger)
    }

    /// Read access to the seat registry
    #[must_use]
    pub const fn seats(&self) -> &ReservationRegistry<PassengerId> {
        &self.seats
    }

    /// Attempts to seat `passenger`; `false` when the flight is full
    pub(crate) fn board(&mut self, passenger: PassengerId) -> bool {
        self.seats.reserve(passenger)
    }
}

/// A person who can be booked onto flights
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Unique identifier
    pub id: PassengerId,
    /// Given name
    pub first: String,
    /// Family name
    pub last: String,
}

impl Passenger {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

/// Why a booking was turned down
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingRejection {
    /// No flight with that id
    #[error("flight not found")]
    UnknownFlight,
    /// No passenger with that id
    #[error("passenger not found")]
    UnknownPassenger,
    /// The passenger already holds a seat on this flight
    #[error("passenger is already booked on this flight")]
    AlreadyBooked,
    /// Every seat is taken
    #[error("no seats left on this flight")]
    FlightFull,
}

/// State of the airline: airports, flights and passengers
#[derive(Clone, Debug, Default)]
pub struct AirlineState {
    pub(crate) airports: BTreeMap<AirportCode, Airport>,
    pub(crate) flights: HashMap<FlightId, Flight>,
    pub(crate) flight_order: Vec<FlightId>,
    pub(crate) passengers: HashMap<PassengerId, Passenger>,
    pub(crate) passenger_order: Vec<PassengerId>,
    /// Last validation error (if any)
    pub last_error: Option<String>,
}

impl AirlineState {
    /// Creates an empty airline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Airports ordered by code
    pub fn airports(&self) -> impl Iterator<Item = &Airport> {
        self.airports.values()
    }

    /// Looks up an airport
    #[must_use]
    pub fn airport(&self, code: &AirportCode) -> Option<&Airport> {
        self.airports.get(code)
    }

    /// Flights in the order they were added
    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.flight_order.iter().filter_map(|id| self.flights.get(id))
    }

    /// Looks up a flight
    #[must_use]
    pub fn flight(&self, id: &FlightId) -> Option<&Flight> {
        self.flights.get(id)
    }

    /// Passengers in the order they registered
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.passenger_order
            .iter()
            .filter_map(|id| self.passengers.get(id))
    }

    /// Looks up a passenger
    #[must_use]
    pub fn passenger(&self, id: &PassengerId) -> Option<&Passenger> {
        self.passengers.get(id)
    }
}

/// Actions representing commands and their outcomes
///
/// Commands are validated and applied by the reducer. Each command produces
/// exactly one outcome action, which the store broadcasts so that callers
/// can wait for it. Outcomes do not change state when reduced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightAction {
    // ========== Commands ==========
    /// Command: Add an airport
    AddAirport {
        /// Airport code
        code: AirportCode,
        /// City served
        city: String,
    },

    /// Command: Schedule a flight
    AddFlight {
        /// Flight identifier
        id: FlightId,
        /// Departure airport
        origin: AirportCode,
        /// Arrival airport
        destination: AirportCode,
        /// Flight time in minutes
        duration_minutes: u32,
        /// Number of seats
        capacity: u32,
    },

    /// Command: Register a passenger
    RegisterPassenger {
        /// Passenger identifier
        id: PassengerId,
        /// Given name
        first: String,
        /// Family name
        last: String,
    },

    /// Command: Book a passenger onto a flight
    BookPassenger {
        /// Correlation id for the outcome
        booking_id: BookingId,
        /// Flight to book
        flight_id: FlightId,
        /// Passenger to seat
        passenger_id: PassengerId,
    },

    // ========== Outcomes ==========
    /// Outcome: Airport was added
    AirportAdded {
        /// Airport code
        code: AirportCode,
    },

    /// Outcome: Airport was rejected
    AirportRejected {
        /// Airport code
        code: AirportCode,
        /// Error message
        error: String,
    },

    /// Outcome: Flight was scheduled
    FlightAdded {
        /// Flight identifier
        id: FlightId,
    },

    /// Outcome: Flight was rejected
    FlightRejected {
        /// Flight identifier
        id: FlightId,
        /// Error message
        error: String,
    },

    /// Outcome: Passenger was registered
    PassengerRegistered {
        /// Passenger identifier
        id: PassengerId,
    },

    /// Outcome: Passenger was rejected
    PassengerRejected {
        /// Passenger identifier
        id: PassengerId,
        /// Error message
        error: String,
    },

    /// Outcome: Passenger holds a seat
    PassengerBooked {
        /// Correlation id
        booking_id: BookingId,
        /// Flight booked
        flight_id: FlightId,
        /// Passenger seated
        passenger_id: PassengerId,
        /// Seats left after this booking
        remaining_seats: u32,
        /// When the seat was taken
        booked_at: DateTime<Utc>,
    },

    /// Outcome: Booking was turned down
    BookingRejected {
        /// Correlation id
        booking_id: BookingId,
        /// Flight requested
        flight_id: FlightId,
        /// Passenger requested
        passenger_id: PassengerId,
        /// Why
        reason: BookingRejection,
    },
}

impl FlightAction {
    /// Returns `true` for commands
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::AddAirport { .. }
                | Self::AddFlight { .. }
                | Self::RegisterPassenger { .. }
                | Self::BookPassenger { .. }
        )
    }

    /// Returns `true` for outcomes
    #[must_use]
    pub const fn is_outcome(&self) -> bool {
        !self.is_command()
    }

    /// Returns the booking id carried by a booking outcome
    #[must_use]
    pub const fn booking_outcome(&self) -> Option<&BookingId> {
        match self {
            Self::PassengerBooked { booking_id, .. } | Self::BookingRejected { booking_id, .. } => {
                Some(booking_id)
            },
            _ => None,
        }
    }
}
