//! # Airline
//!
//! Flight booking built on the Seatbook reservation registry.
//!
//! Every flight owns a fixed number of seats. Booking a passenger is a
//! reservation against the flight's [`ReservationRegistry`]: it succeeds
//! while seats remain and is turned away once the flight is full.
//!
//! All mutations go through a single [`Store`], whose write lock makes the
//! capacity check and the append one atomic step even when many requests
//! race for the last seat.
//!
//! ## Layout
//!
//! - [`types`]: airports, flights, passengers and actions
//! - [`reducer`]: command validation and booking
//! - [`queries`]: read models for the HTTP API
//! - [`server`] and [`api`]: axum router and handlers
//! - [`config`]: environment configuration
//! - [`seed`]: demo data
//!
//! [`ReservationRegistry`]: seatbook_core::registry::ReservationRegistry

pub mod api;
pub mod config;
pub mod error;
pub mod queries;
pub mod reducer;
pub mod seed;
pub mod server;
pub mod types;

pub use config::Config;
pub use error::AppError;
pub use queries::{FlightDetail, FlightSummary};
pub use reducer::{FlightEnvironment, FlightReducer};
pub use types::{
    AirlineState, Airport, AirportCode, BookingId, BookingRejection, Flight, FlightAction,
    FlightId, Passenger, PassengerId,
};

use seatbook_runtime::Store;

/// The store every handler talks to
pub type AirlineStore = Store<AirlineState, FlightAction, FlightEnvironment, FlightReducer>;
