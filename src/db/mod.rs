pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Duplicate {field}: {value}")]
    Duplicate { field: String, value: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

impl DatabaseError {
    /// Reclassify a UNIQUE-constraint failure as `Duplicate`; pass anything else through.
    pub fn unique_violation(err: rusqlite::Error, field: &str, value: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                DatabaseError::Duplicate {
                    field: field.into(),
                    value: value.into(),
                }
            }
            _ => DatabaseError::Sqlite(err),
        }
    }
}
