//! HTTP API handlers.
//!
//! Commands are sent through the store with `send_and_wait_for`, matching
//! on the outcome action that carries the command's id. Queries read the
//! store state directly.

pub mod airports;
pub mod flights;
pub mod passengers;

use crate::error::AppError;
use crate::server::state::AppState;
use crate::types::FlightAction;

/// Sends `action` and waits for the outcome selected by `is_outcome`
pub(crate) async fn dispatch<F>(
    state: &AppState,
    action: FlightAction,
    is_outcome: F,
) -> Result<FlightAction, AppError>
where
    F: Fn(&FlightAction) -> bool + Send + Sync + 'static,
{
    Ok(state
        .store
        .send_and_wait_for(action, is_outcome, state.request_timeout)
        .await?)
}
