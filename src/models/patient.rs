use serde::{Deserialize, Serialize};

use super::patient_file::PendingAttachment;

/// Full patient profile as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub occupation: String,
    pub diagnosis: String,
    pub prescription: String,
    pub last_visit: Option<String>,
    pub doctor: String,
    /// Photo blob. `None` when no photo was ever supplied (or not loaded, see listings).
    pub image: Option<Vec<u8>>,
}

/// Row shown in the patient table and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
    pub gender: String,
    pub phone: String,
    pub occupation: String,
    pub doctor: String,
    pub last_visit: Option<String>,
}

/// Picker entry for the visit form and filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientChoice {
    pub id: i64,
    pub name: String,
}

/// Unvalidated patient fields as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientInput {
    pub name: String,
    pub age: Option<i64>,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub occupation: String,
    pub diagnosis: String,
    pub prescription: String,
    pub doctor: String,
}

/// Patient fields after validation: trimmed, name present, age in range, gender defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientFields {
    pub name: String,
    pub age: Option<i64>,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub occupation: String,
    pub diagnosis: String,
    pub prescription: String,
    pub doctor: String,
}

/// Uploads that travel with a single add/update call.
///
/// `photo` replaces the stored image only when `Some`. `files` are appended,
/// never replacing earlier attachments.
#[derive(Debug, Clone, Default)]
pub struct PatientUploads {
    pub photo: Option<Vec<u8>>,
    pub files: Vec<PendingAttachment>,
}

impl PatientUploads {
    pub fn none() -> Self {
        Self::default()
    }
}
