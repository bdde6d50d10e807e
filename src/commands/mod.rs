//! Boundary layer called by the front end.
//!
//! Every command takes the shared [`CoreState`], opens its own connection,
//! and returns `Result<T, String>` carrying a message fit to show the user.

pub mod patients;
pub mod session;
pub mod users;
pub mod visits;

use rusqlite::Connection;

use crate::core_state::{CoreError, CoreState};

/// Health check: verifies the backend is running.
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    "ok".to_string()
}

/// Connection for a signed-in action.
fn signed_in_conn(state: &CoreState) -> Result<Connection, CoreError> {
    state.current_user()?;
    state.open_db()
}

/// Connection for an admin-only action.
fn admin_conn(state: &CoreState) -> Result<Connection, CoreError> {
    state.require_admin()?;
    state.open_db()
}

/// Converts any failure into its user message. Faults the user cannot fix are logged.
fn to_message(err: impl Into<CoreError>) -> String {
    let err = err.into();
    if err.is_unexpected() {
        tracing::error!(error = %err, "Command failed");
    }
    err.to_string()
}
