//! Read models served by the HTTP API.

use crate::types::{AirlineState, AirportCode, Flight, FlightId, Passenger, PassengerId};
use seatbook_core::registry::Availability;
use serde::Serialize;

/// One row of the flight list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlightSummary {
    /// Flight identifier
    pub id: FlightId,
    /// Departure airport code
    pub origin: AirportCode,
    /// Departure city, if the airport is known
    pub origin_city: Option<String>,
    /// Arrival airport code
    pub destination: AirportCode,
    /// Arrival city, if the airport is known
    pub destination_city: Option<String>,
    /// Flight time in minutes
    pub duration_minutes: u32,
    /// Total seats
    pub capacity: u32,
    /// Seats still open
    pub remaining_seats: u32,
    /// `HasRoom` or `Full`
    pub availability: Availability,
}

/// A flight together with who is and who is not on it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlightDetail {
    /// The flight
    pub flight: FlightSummary,
    /// Booked passengers in booking order
    pub passengers: Vec<Passenger>,
    /// Registered passengers not on this flight, in registration order
    pub non_passengers: Vec<Passenger>,
}

impl AirlineState {
    /// Summarizes a single flight
    #[must_use]
    pub fn summarize(&self, flight: &Flight) -> FlightSummary {
        let city = |code: &AirportCode| self.airport(code).map(|a| a.city.clone());

        FlightSummary {
            id: flight.id,
            origin: flight.origin.clone(),
            origin_city: city(&flight.origin),
            destination: flight.destination.clone(),
            destination_city: city(&flight.destination),
            duration_minutes: flight.duration_minutes,
            capacity: flight.capacity(),
            remaining_seats: flight.remaining_seats(),
            availability: flight.seats().availability(),
        }
    }

    /// All flights in the order they were added
    #[must_use]
    pub fn flight_summaries(&self) -> Vec<FlightSummary> {
        self.flights().map(|f| self.summarize(f)).collect()
    }

    /// Flight page data, or `None` for an unknown flight
    #[must_use]
    pub fn flight_detail(&self, id: &FlightId) -> Option<FlightDetail> {
        let flight = self.flight(id)?;

        let passengers = flight
            .passenger_ids()
            .iter()
            .filter_map(|p| self.passenger(p))
            .cloned()
            .collect();

        let non_passengers = self
            .passengers()
            .filter(|p| !flight.has_passenger(&p.id))
            .cloned()
            .collect();

        Some(FlightDetail {
            flight: self.summarize(flight),
            passengers,
            non_passengers,
        })
    }

    /// Flights a passenger is booked on, or `None` for an unknown passenger
    #[must_use]
    pub fn passenger_flights(&self, id: &PassengerId) -> Option<Vec<FlightSummary>> {
        self.passenger(id)?;

        Some(
            self.flights()
                .filter(|f| f.has_passenger(id))
                .map(|f| self.summarize(f))
                .collect(),
        )
    }
}
