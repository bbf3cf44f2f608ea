//! Configuration management for the airline service.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that are missing or fail to parse fall back to the default.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application server configuration
    pub server: ServerConfig,
    /// Flight defaults and demo data
    pub fleet: FleetConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// How long a handler waits for a command outcome, in milliseconds
    pub request_timeout_ms: u64,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Flight configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Seats on a flight created without an explicit capacity
    pub default_capacity: u32,
    /// Load the demo airports, flights and passengers on startup
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(defaults.server.host),
                port: lookup("PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.server.port),
                log_level: lookup("RUST_LOG").unwrap_or(defaults.server.log_level),
                request_timeout_ms: lookup("REQUEST_TIMEOUT_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.server.request_timeout_ms),
                shutdown_timeout: lookup("SHUTDOWN_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.server.shutdown_timeout),
            },
            fleet: FleetConfig {
                default_capacity: lookup("DEFAULT_CAPACITY")
                    .and_then(|s| s.parse().ok())
                    .filter(|capacity| *capacity > 0)
                    .unwrap_or(defaults.fleet.default_capacity),
                seed_demo_data: lookup("SEED_DEMO_DATA")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.fleet.seed_demo_data),
            },
        }
    }

    /// Socket address string for the HTTP listener
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// Shutdown timeout as a `Duration`
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_level: "info".to_string(),
                request_timeout_ms: 5000,
                shutdown_timeout: 30,
            },
            fleet: FleetConfig {
                default_capacity: 2,
                seed_demo_data: true,
            },
        }
    }
}
