use std::path::Path;

use rusqlite::Connection;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use super::ExportError;
use crate::db::repository;
use crate::error::ClinicError;
use crate::models::Patient;

pub const SPREADSHEET_SHEET_NAME: &str = "Patients";

pub const SPREADSHEET_HEADERS: [&str; 11] = [
    "ID",
    "Name",
    "Age",
    "Gender",
    "Phone",
    "Address",
    "Occupation",
    "Diagnosis",
    "Prescription",
    "Last Visit",
    "Doctor",
];

/// Writes every patient to a single-sheet workbook at `path`. Returns the number of patients.
pub fn build_patient_spreadsheet(conn: &Connection, path: &Path) -> Result<usize, ClinicError> {
    let patients = repository::list_patient_records(conn)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_sheet(sheet, &patients).map_err(ExportError::from)?;
    workbook.save(path).map_err(ExportError::from)?;

    tracing::info!(patients = patients.len(), path = %path.display(), "Patients exported to spreadsheet");
    Ok(patients.len())
}

fn write_sheet(sheet: &mut Worksheet, patients: &[Patient]) -> Result<(), XlsxError> {
    sheet.set_name(SPREADSHEET_SHEET_NAME)?;
    for (col, header) in SPREADSHEET_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (i, p) in patients.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, p.id as f64)?;
        sheet.write_string(row, 1, p.name.as_str())?;
        match p.age {
            Some(age) => sheet.write_number(row, 2, age as f64)?,
            None => sheet.write_string(row, 2, "")?,
        };
        let cells = [
            p.gender.as_str(),
            p.phone.as_str(),
            p.address.as_str(),
            p.occupation.as_str(),
            p.diagnosis.as_str(),
            p.prescription.as_str(),
            p.last_visit.as_deref().unwrap_or(""),
            p.doctor.as_str(),
        ];
        for (offset, value) in cells.iter().enumerate() {
            sheet.write_string(row, (3 + offset) as u16, *value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{PatientInput, PatientUploads};
    use crate::patients;

    #[test]
    fn header_has_eleven_columns() {
        assert_eq!(SPREADSHEET_HEADERS.len(), 11);
        assert_eq!(SPREADSHEET_HEADERS[0], "ID");
        assert_eq!(SPREADSHEET_HEADERS[9], "Last Visit");
        assert_eq!(SPREADSHEET_HEADERS[10], "Doctor");
    }

    #[test]
    fn workbook_written_with_patient_count() {
        let conn = open_memory_database().unwrap();
        for name in ["Ann", "Bob", "Cy"] {
            let input = PatientInput {
                name: name.into(),
                age: if name == "Bob" { None } else { Some(33) },
                ..Default::default()
            };
            patients::add_patient(&conn, &input, &PatientUploads::none()).unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.xlsx");
        assert_eq!(build_patient_spreadsheet(&conn, &path).unwrap(), 3);

        // xlsx is a zip container
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn empty_database_exports_header_only() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        assert_eq!(build_patient_spreadsheet(&conn, &path).unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn unwritable_path_is_export_error() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.xlsx");
        let err = build_patient_spreadsheet(&conn, &path).unwrap_err();
        assert!(matches!(err, ClinicError::Export(ExportError::Spreadsheet(_))));
    }
}
