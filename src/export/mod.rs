//! Patient record exports: a per-patient PDF report and an all-patients workbook.
//!
//! Data is read once into a [`PatientReport`], then rendered. Rendering never
//! touches the database.

mod pdf;
mod spreadsheet;

pub use pdf::render_patient_report;
pub use spreadsheet::{build_patient_spreadsheet, SPREADSHEET_HEADERS, SPREADSHEET_SHEET_NAME};

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::Connection;
use thiserror::Error;

use crate::db::repository;
use crate::error::ClinicError;
use crate::models::*;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything printed in one patient's report.
#[derive(Debug, Clone)]
pub struct PatientReport {
    pub patient: Patient,
    /// Newest date first.
    pub visits: Vec<Visit>,
    /// Newest upload first.
    pub files: Vec<PatientFile>,
}

pub fn assemble_patient_report(conn: &Connection, patient_id: i64) -> Result<PatientReport, ClinicError> {
    let patient = repository::get_patient(conn, patient_id)?
        .ok_or_else(|| ClinicError::not_found("Patient", patient_id))?;
    let visits = repository::get_visits_for_patient(conn, patient_id)?;
    let files = repository::get_files_for_patient(conn, patient_id)?;
    Ok(PatientReport { patient, visits, files })
}

/// `patient_record_<name>_<unix seconds>.pdf`, spaces replaced by underscores.
pub fn report_file_name(patient_name: &str, timestamp: i64) -> String {
    let safe: String = patient_name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect();
    format!("patient_record_{safe}_{timestamp}.pdf")
}

/// Renders the patient's record to a PDF inside `out_dir` and returns its path.
pub fn build_patient_report(
    conn: &Connection,
    patient_id: i64,
    out_dir: &Path,
) -> Result<PathBuf, ClinicError> {
    let report = assemble_patient_report(conn, patient_id)?;
    let bytes = render_patient_report(&report)?;

    std::fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(report_file_name(&report.patient.name, Utc::now().timestamp()));
    std::fs::write(&path, &bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(
        patient_id,
        visits = report.visits.len(),
        files = report.files.len(),
        path = %path.display(),
        "Patient report exported"
    );
    Ok(path)
}
