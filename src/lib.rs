pub mod attachments;
pub mod commands;
pub mod config;
pub mod core_state;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod patients;
pub mod users;
pub mod validation;
pub mod visits;

use tracing_subscriber::EnvFilter;

pub use core_state::{CoreError, CoreState};
pub use error::ClinicError;

/// Initializes logging and the clinic database, returning the state the front end drives.
pub fn run() -> CoreState {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let state = CoreState::new();
    if let Err(e) = state.initialize() {
        tracing::error!(error = %e, path = %state.db_path().display(), "Database initialization failed");
        std::process::exit(1);
    }
    state
}
