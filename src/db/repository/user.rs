use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

/// Inserts a user. A taken username surfaces as `DatabaseError::Duplicate`.
pub fn insert_user(conn: &Connection, user: &NewUser) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
        params![user.username, user.password, user.role],
    )
    .map_err(|e| DatabaseError::unique_violation(e, "username", &user.username))?;
    Ok(conn.last_insert_rowid())
}

/// Exact, case-sensitive credential match.
pub fn find_user_by_credentials(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<Option<User>, DatabaseError> {
    let user = conn
        .query_row(
            "SELECT id, username, role FROM users WHERE username = ?1 AND password = ?2",
            params![username, password],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn get_user(conn: &Connection, id: i64) -> Result<Option<User>, DatabaseError> {
    let user = conn
        .query_row(
            "SELECT id, username, role FROM users WHERE id = ?1",
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, username, role FROM users ORDER BY id")?;
    let rows = stmt.query_map([], user_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_user_row(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM users WHERE id = ?1", params![id])?)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        role: row.get(2)?,
    })
}
