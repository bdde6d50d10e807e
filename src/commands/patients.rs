//! Patient screen commands: form save/load, cascade delete, search, and exports.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::attachments;
use crate::config;
use crate::core_state::CoreState;
use crate::error::ClinicError;
use crate::export;
use crate::models::*;
use crate::patients::{self, DeletedPatient};
use crate::validation;

use super::{signed_in_conn, to_message};

/// Patient form exactly as typed. Age is free text; blank means no age.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub occupation: String,
    pub diagnosis: String,
    pub prescription: String,
    pub doctor: String,
}

impl PatientForm {
    fn to_input(&self) -> Result<PatientInput, ClinicError> {
        Ok(PatientInput {
            name: self.name.clone(),
            age: validation::parse_age(&self.age)?,
            gender: self.gender.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            occupation: self.occupation.clone(),
            diagnosis: self.diagnosis.clone(),
            prescription: self.prescription.clone(),
            doctor: self.doctor.clone(),
        })
    }
}

/// Files picked alongside the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadPaths {
    pub photo: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedPatient {
    pub id: i64,
    /// Attachments left out because they exceeded the upload limit.
    pub skipped_files: Vec<String>,
}

/// Reads the photo (must decode) and queues attachments, skipping oversize ones.
fn read_uploads(paths: &UploadPaths) -> Result<(PatientUploads, Vec<String>), ClinicError> {
    let photo = match &paths.photo {
        Some(path) => Some(attachments::read_photo(path)?),
        None => None,
    };
    let queued = attachments::read_attachments(paths.files.as_slice());
    Ok((
        PatientUploads {
            photo,
            files: queued.queued,
        },
        queued.skipped,
    ))
}

pub fn add_patient(
    state: &CoreState,
    form: &PatientForm,
    uploads: &UploadPaths,
) -> Result<SavedPatient, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    let input = form.to_input().map_err(to_message)?;
    let (uploads, skipped_files) = read_uploads(uploads).map_err(to_message)?;
    let id = patients::add_patient(&conn, &input, &uploads).map_err(to_message)?;
    Ok(SavedPatient { id, skipped_files })
}

/// Loads a patient by the id typed into the lookup box.
pub fn load_patient(state: &CoreState, id_text: &str) -> Result<Patient, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    let id = validation::parse_record_id(id_text).map_err(to_message)?;
    patients::load_patient(&conn, id).map_err(to_message)
}

pub fn update_patient(
    state: &CoreState,
    id: i64,
    form: &PatientForm,
    uploads: &UploadPaths,
) -> Result<SavedPatient, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    let input = form.to_input().map_err(to_message)?;
    let (uploads, skipped_files) = read_uploads(uploads).map_err(to_message)?;
    patients::update_patient(&conn, id, &input, &uploads).map_err(to_message)?;
    Ok(SavedPatient { id, skipped_files })
}

/// Deletes a patient with all visits and files. `confirmed` must be true.
pub fn delete_patient(state: &CoreState, id: i64, confirmed: bool) -> Result<DeletedPatient, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    if !confirmed {
        return Err(to_message(ClinicError::validation(
            "Deletion must be confirmed",
        )));
    }
    patients::delete_patient(&conn, id).map_err(to_message)
}

pub fn list_patients(state: &CoreState) -> Result<Vec<PatientSummary>, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    patients::list_patients(&conn).map_err(to_message)
}

pub fn search_patients(state: &CoreState, keyword: &str) -> Result<Vec<PatientSummary>, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    patients::search_patients(&conn, keyword).map_err(to_message)
}

pub fn patient_choices(state: &CoreState) -> Result<Vec<PatientChoice>, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    patients::patient_choices(&conn).map_err(to_message)
}

/// Writes the patient's PDF report to `out_dir`, or the documents directory when `None`.
pub fn export_patient_pdf(
    state: &CoreState,
    id: i64,
    out_dir: Option<&Path>,
) -> Result<PathBuf, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    let dir = out_dir.map(Path::to_path_buf).unwrap_or_else(config::documents_dir);
    export::build_patient_report(&conn, id, &dir).map_err(to_message)
}

/// Writes every patient to an xlsx workbook at `path`. Returns the number exported.
pub fn export_patients_spreadsheet(state: &CoreState, path: &Path) -> Result<usize, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    export::build_patient_spreadsheet(&conn, path).map_err(to_message)
}
