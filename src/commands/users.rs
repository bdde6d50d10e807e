//! User management. Every command here is admin-only.

use crate::core_state::CoreState;
use crate::models::{NewUser, User};
use crate::users;

use super::{admin_conn, to_message};

pub fn add_user(state: &CoreState, user: &NewUser) -> Result<i64, String> {
    let conn = admin_conn(state).map_err(to_message)?;
    users::add_user(&conn, user).map_err(to_message)
}

pub fn list_users(state: &CoreState) -> Result<Vec<User>, String> {
    let conn = admin_conn(state).map_err(to_message)?;
    users::list_users(&conn).map_err(to_message)
}

pub fn delete_user(state: &CoreState, id: i64) -> Result<(), String> {
    let conn = admin_conn(state).map_err(to_message)?;
    users::delete_user(&conn, id).map_err(to_message)
}
