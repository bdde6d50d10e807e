use crate::core_state::CoreState;
use crate::error::ClinicError;
use crate::models::User;

use super::to_message;

/// Signs in. Both fields are trimmed, as they are when a user is created;
/// blank fields are rejected before storage is consulted.
pub fn login(state: &CoreState, username: &str, password: &str) -> Result<User, String> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(to_message(ClinicError::validation(
            "Please enter username and password",
        )));
    }
    state.login(username, password).map_err(to_message)
}

pub fn logout(state: &CoreState) -> Result<(), String> {
    state.logout().map_err(to_message)
}

/// The signed-in user, or `None` when logged out.
pub fn current_user(state: &CoreState) -> Option<User> {
    state.current_user().ok()
}
