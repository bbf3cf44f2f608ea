//! Airline HTTP server.
//!
//! In-memory flight booking: airports, flights with a fixed number of
//! seats, passengers, and bookings that are turned away once a flight is
//! full.

use airline::{
    AirlineState, Config, FlightEnvironment, FlightReducer, seed,
    server::{AppState, build_router},
};
use seatbook_core::environment::SystemClock;
use seatbook_runtime::{Store, metrics::MetricsServer};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        addr = %config.addr(),
        default_capacity = config.fleet.default_capacity,
        seed_demo_data = config.fleet.seed_demo_data,
        "Starting airline server"
    );

    let mut metrics = MetricsServer::new();
    metrics.start()?;

    let store = Store::new(
        AirlineState::new(),
        FlightReducer::new(),
        FlightEnvironment::new(Arc::new(SystemClock)),
    );

    if config.fleet.seed_demo_data {
        seed::apply(&store, config.fleet.default_capacity).await?;
    }

    let state = AppState::new(
        store.clone(),
        Arc::new(metrics),
        config.request_timeout(),
        config.fleet.default_capacity,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    // Stop taking bookings first so /ready reports 503 while connections drain
    let draining = store.clone();
    let shutdown_timeout = config.shutdown_timeout();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            if let Err(e) = draining.shutdown(shutdown_timeout).await {
                warn!(error = %e, "Store did not drain before the shutdown timeout");
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
