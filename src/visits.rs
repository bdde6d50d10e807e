//! Visit history.
//!
//! Saving a visit (add or edit) overwrites the owning patient's `last_visit`
//! with that visit's date, whether or not it is the latest date on record.

use rusqlite::Connection;

use crate::db::repository;
use crate::error::ClinicError;
use crate::models::*;
use crate::validation;

/// Validates field formats and that the referenced patient exists.
fn check_visit(conn: &Connection, input: &VisitInput) -> Result<VisitFields, ClinicError> {
    if repository::count_patients(conn)? == 0 {
        return Err(ClinicError::validation(
            "No patients available. Please add a patient first.",
        ));
    }
    if !repository::patient_exists(conn, input.patient_id)? {
        return Err(ClinicError::validation("Select a valid patient"));
    }
    validation::validate_visit(input)
}

pub fn add_visit(conn: &Connection, input: &VisitInput) -> Result<i64, ClinicError> {
    let visit = check_visit(conn, input)?;

    let tx = conn.unchecked_transaction()?;
    let id = repository::insert_visit(&tx, &visit)?;
    repository::set_last_visit(&tx, visit.patient_id, &visit.date)?;
    tx.commit()?;

    tracing::info!(visit_id = id, patient_id = visit.patient_id, "Visit added");
    Ok(id)
}

pub fn get_visit(conn: &Connection, id: i64) -> Result<Visit, ClinicError> {
    repository::get_visit(conn, id)?.ok_or_else(|| ClinicError::not_found("Visit", id))
}

pub fn update_visit(conn: &Connection, id: i64, input: &VisitInput) -> Result<(), ClinicError> {
    let visit = check_visit(conn, input)?;

    let tx = conn.unchecked_transaction()?;
    if repository::update_visit(&tx, id, &visit)? == 0 {
        return Err(ClinicError::not_found("Visit", id));
    }
    repository::set_last_visit(&tx, visit.patient_id, &visit.date)?;
    tx.commit()?;

    tracing::info!(visit_id = id, patient_id = visit.patient_id, "Visit updated");
    Ok(())
}

pub fn delete_visit(conn: &Connection, id: i64) -> Result<(), ClinicError> {
    if repository::delete_visit(conn, id)? == 0 {
        return Err(ClinicError::not_found("Visit", id));
    }
    tracing::info!(visit_id = id, "Visit deleted");
    Ok(())
}

/// Newest visit id first; `patient_id` restricts to one patient.
pub fn list_visits(
    conn: &Connection,
    patient_id: Option<i64>,
) -> Result<Vec<VisitListing>, ClinicError> {
    Ok(repository::list_visits(conn, patient_id)?)
}
