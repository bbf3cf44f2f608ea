//! Boarding drill.
//!
//! Boards a list of people onto a single flight and reports who got a seat.
//!
//! ```bash
//! boarding                      # partho, faruk, jhony, gina onto 2 seats
//! DEFAULT_CAPACITY=3 boarding ann bob cy dee
//! ```

use airline::Config;
use seatbook_core::registry::ReservationRegistry;

const DEFAULT_PASSENGERS: [&str; 4] = ["partho", "faruk", "jhony", "gina"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();

    let mut names: Vec<String> = std::env::args().skip(1).collect();
    if names.is_empty() {
        names = DEFAULT_PASSENGERS.iter().map(ToString::to_string).collect();
    }

    let mut flight = ReservationRegistry::new(config.fleet.default_capacity)?;
    tracing::debug!(capacity = flight.capacity(), passengers = names.len(), "Boarding");

    for name in names {
        println!("{}", board(&mut flight, &name));
    }

    tracing::debug!(holders = ?flight.holders(), "Boarding complete");
    Ok(())
}

/// Tries to seat `name` and returns the line to print.
fn board(flight: &mut ReservationRegistry<String>, name: &str) -> String {
    if flight.reserve(name.to_string()) {
        format!("{name} Added to the Flight")
    } else {
        format!("There is no room for {name}")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_drill_output() {
        let mut flight = ReservationRegistry::new(2).unwrap();

        let lines: Vec<String> = DEFAULT_PASSENGERS
            .iter()
            .map(|name| board(&mut flight, name))
            .collect();

        assert_eq!(
            lines,
            [
                "partho Added to the Flight",
                "faruk Added to the Flight",
                "There is no room for jhony",
                "There is no room for gina",
            ]
        );
        assert_eq!(flight.remaining_capacity(), 0);
    }
}
