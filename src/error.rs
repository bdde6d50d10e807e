//! User-facing error taxonomy for every records operation.
//!
//! Storage-layer failures arrive as [`DatabaseError`] and are reclassified:
//! missing rows become `NotFound`, unique violations become `Duplicate`,
//! everything else is a `Storage` fault.

use thiserror::Error;

use crate::db::DatabaseError;
use crate::export::ExportError;

#[derive(Error, Debug)]
pub enum ClinicError {
    /// Bad or missing field. Nothing was written.
    #[error("{0}")]
    Validation(String),

    #[error("{entity_type} not found (id {id})")]
    NotFound { entity_type: String, id: String },

    #[error("{0}")]
    Duplicate(String),

    /// Protected resource or admin-only action.
    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Invalid credentials")]
    Auth,

    #[error("Storage error: {0}")]
    Storage(DatabaseError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl ClinicError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClinicError::Validation(message.into())
    }

    pub fn not_found(entity_type: &str, id: i64) -> Self {
        ClinicError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Faults the user cannot fix by editing input; logged at the boundary.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, ClinicError::Storage(_) | ClinicError::Export(_))
    }
}

impl From<DatabaseError> for ClinicError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => ClinicError::NotFound { entity_type, id },
            DatabaseError::Duplicate { field, value } => {
                ClinicError::Duplicate(format!("{field} '{value}' already exists"))
            }
            other => ClinicError::Storage(other),
        }
    }
}

impl From<rusqlite::Error> for ClinicError {
    fn from(err: rusqlite::Error) -> Self {
        ClinicError::Storage(DatabaseError::Sqlite(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_reclassified() {
        let err: ClinicError = DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: "7".into(),
        }
        .into();
        assert!(matches!(err, ClinicError::NotFound { .. }));
        assert_eq!(err.to_string(), "Patient not found (id 7)");
    }

    #[test]
    fn duplicate_is_reclassified() {
        let err: ClinicError = DatabaseError::Duplicate {
            field: "username".into(),
            value: "nurse".into(),
        }
        .into();
        assert!(matches!(err, ClinicError::Duplicate(_)));
        assert!(!err.is_unexpected());
    }

    #[test]
    fn other_database_errors_are_storage() {
        let err: ClinicError = DatabaseError::InvalidEnum {
            field: "FileType".into(),
            value: "video".into(),
        }
        .into();
        assert!(matches!(err, ClinicError::Storage(_)));
        assert!(err.is_unexpected());
    }
}
