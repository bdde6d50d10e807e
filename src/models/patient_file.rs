use serde::{Deserialize, Serialize};

use super::enums::FileType;

/// Attachment row as stored in `patient_files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFile {
    pub id: i64,
    pub patient_id: i64,
    pub file_name: String,
    pub file_type: FileType,
    pub upload_date: String,
    pub file_data: Vec<u8>,
}

/// A file read into memory and classified, waiting for the next patient add/update.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAttachment {
    pub file_name: String,
    pub file_type: FileType,
    pub data: Vec<u8>,
}
