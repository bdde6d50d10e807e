//! User accounts and login.
//!
//! Credentials are stored and compared as plaintext. The seeded default admin
//! can never be deleted.

use rusqlite::Connection;

use crate::config;
use crate::db::repository;
use crate::error::ClinicError;
use crate::models::*;
use crate::validation;

pub fn add_user(conn: &Connection, user: &NewUser) -> Result<i64, ClinicError> {
    let user = validation::validate_new_user(user)?;
    let id = repository::insert_user(conn, &user).map_err(|e| match ClinicError::from(e) {
        ClinicError::Duplicate(_) => ClinicError::Duplicate("Username already exists".into()),
        other => other,
    })?;
    tracing::info!(user_id = id, role = %user.role, "User added");
    Ok(id)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, ClinicError> {
    Ok(repository::list_users(conn)?)
}

/// Fails with `Permission` for the default admin, whoever asks.
pub fn delete_user(conn: &Connection, id: i64) -> Result<(), ClinicError> {
    let user = repository::get_user(conn, id)?.ok_or_else(|| ClinicError::not_found("User", id))?;
    if user.username == config::DEFAULT_ADMIN_USERNAME {
        tracing::warn!(user_id = id, "Refused to delete the default admin user");
        return Err(ClinicError::Permission(
            "Cannot delete the default admin user".into(),
        ));
    }
    repository::delete_user_row(conn, id)?;
    tracing::info!(user_id = id, "User deleted");
    Ok(())
}

pub fn authenticate(conn: &Connection, username: &str, password: &str) -> Result<User, ClinicError> {
    match repository::find_user_by_credentials(conn, username, password)? {
        Some(user) => {
            tracing::info!(user_id = user.id, role = %user.role, "Login succeeded");
            Ok(user)
        }
        None => {
            tracing::warn!("Login failed: invalid credentials");
            Err(ClinicError::Auth)
        }
    }
}
