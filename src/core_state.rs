//! Application state shared by every user action.
//!
//! Holds the database location and the signed-in user. Each action opens its
//! own connection through [`CoreState::open_db`]; no connection outlives the
//! action that opened it.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use rusqlite::Connection;
use thiserror::Error;

use crate::config;
use crate::db;
use crate::error::ClinicError;
use crate::models::User;
use crate::users;

pub struct CoreState {
    /// Signed-in user. `None` when logged out.
    session: RwLock<Option<User>>,
    /// Location of the clinic database file.
    db_path: PathBuf,
}

impl CoreState {
    /// State backed by the default database under the documents directory.
    pub fn new() -> Self {
        Self::with_db_path(config::database_path())
    }

    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            session: RwLock::new(None),
            db_path: db_path.into(),
        }
    }

    /// Create the database directory and file, schema, and default admin.
    pub fn initialize(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::DataDir {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        self.open_db()?;
        tracing::info!(path = %self.db_path.display(), "Database ready");
        Ok(())
    }

    /// Open a fresh connection for one action.
    pub fn open_db(&self) -> Result<Connection, CoreError> {
        db::open_database(&self.db_path).map_err(|e| CoreError::Clinic(e.into()))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ── Session ──────────────────────────────────────────────

    pub fn login(&self, username: &str, password: &str) -> Result<User, CoreError> {
        let conn = self.open_db()?;
        let user = users::authenticate(&conn, username, password)?;
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        if let Some(user) = guard.take() {
            tracing::info!(user_id = user.id, "Logged out");
        }
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.session
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// The signed-in user (owned copy).
    pub fn current_user(&self) -> Result<User, CoreError> {
        let guard = self.session.read().map_err(|_| CoreError::LockPoisoned)?;
        guard.clone().ok_or(CoreError::NotLoggedIn)
    }

    /// The signed-in user, who must hold the admin role.
    pub fn require_admin(&self) -> Result<User, CoreError> {
        let user = self.current_user()?;
        if !user.is_admin() {
            tracing::warn!(user_id = user.id, role = %user.role, "Admin-only action refused");
            return Err(ClinicError::Permission("Admin only".into()).into());
        }
        Ok(user)
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Please log in first")]
    NotLoggedIn,
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Cannot create data directory {path}: {reason}")]
    DataDir { path: PathBuf, reason: String },
    #[error(transparent)]
    Clinic(#[from] ClinicError),
}

impl CoreError {
    pub fn is_unexpected(&self) -> bool {
        match self {
            CoreError::NotLoggedIn => false,
            CoreError::Clinic(e) => e.is_unexpected(),
            CoreError::LockPoisoned | CoreError::DataDir { .. } => true,
        }
    }
}
