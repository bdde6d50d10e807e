use std::path::Path;

use rusqlite::{params, Connection};

use super::DatabaseError;
use crate::config;

/// Open a SQLite connection to the given path, creating the file and schema if absent
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;"
    )?;
    Ok(())
}

/// Ensure all four tables exist and the default admin is present.
pub fn initialize_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(include_str!("../../resources/schema.sql"))?;
    seed_default_admin(conn)?;
    Ok(())
}

/// Insert the default admin keyed by username. Returns true only on the run that created it.
fn seed_default_admin(conn: &Connection) -> Result<bool, DatabaseError> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO users (username, password, role) VALUES (?1, ?2, ?3)",
        params![
            config::DEFAULT_ADMIN_USERNAME,
            config::DEFAULT_ADMIN_PASSWORD,
            config::DEFAULT_ADMIN_ROLE,
        ],
    )?;
    if inserted > 0 {
        tracing::info!(username = config::DEFAULT_ADMIN_USERNAME, "Seeded default admin user");
    }
    Ok(inserted > 0)
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}
