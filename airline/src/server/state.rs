//! Application state for the airline HTTP server.

use crate::AirlineStore;
use seatbook_runtime::metrics::MetricsServer;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the store and metrics handle are shared.
#[derive(Clone)]
pub struct AppState {
    /// Store holding airports, flights and passengers
    pub store: AirlineStore,

    /// Prometheus recorder for `/metrics`
    pub metrics: Arc<MetricsServer>,

    /// How long a handler waits for a command outcome
    pub request_timeout: Duration,

    /// Seats on a flight created without an explicit capacity
    pub default_capacity: u32,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(
        store: AirlineStore,
        metrics: Arc<MetricsServer>,
        request_timeout: Duration,
        default_capacity: u32,
    ) -> Self {
        Self {
            store,
            metrics,
            request_timeout,
            default_capacity,
        }
    }
}
