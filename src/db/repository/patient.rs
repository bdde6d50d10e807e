use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

const PATIENT_COLUMNS: &str = "id, name, age, gender, phone, address, occupation, diagnosis,
     prescription, last_visit, doctor";

pub fn insert_patient(
    conn: &Connection,
    fields: &PatientFields,
    last_visit: &str,
    image: Option<&[u8]>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, age, gender, phone, address, occupation, diagnosis,
         prescription, last_visit, doctor, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            fields.name,
            fields.age,
            fields.gender,
            fields.phone,
            fields.address,
            fields.occupation,
            fields.diagnosis,
            fields.prescription,
            last_visit,
            fields.doctor,
            image,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS}, image FROM patients WHERE id = ?1");
    let patient = conn
        .query_row(&sql, params![id], |row| {
            let mut patient = patient_from_row(row)?;
            patient.image = row.get::<_, Option<Vec<u8>>>(11)?;
            Ok(patient)
        })
        .optional()?;
    Ok(patient)
}

pub fn patient_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let found = conn
        .query_row("SELECT 1 FROM patients WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

/// Rewrites the editable fields. `image` and `last_visit` are left alone.
/// Returns the number of rows touched (0 when the id is absent).
pub fn update_patient_fields(
    conn: &Connection,
    id: i64,
    fields: &PatientFields,
) -> Result<usize, DatabaseError> {
    let updated = conn.execute(
        "UPDATE patients SET name = ?1, age = ?2, gender = ?3, phone = ?4, address = ?5,
         occupation = ?6, diagnosis = ?7, prescription = ?8, doctor = ?9
         WHERE id = ?10",
        params![
            fields.name,
            fields.age,
            fields.gender,
            fields.phone,
            fields.address,
            fields.occupation,
            fields.diagnosis,
            fields.prescription,
            fields.doctor,
            id,
        ],
    )?;
    Ok(updated)
}

pub fn set_patient_image(conn: &Connection, id: i64, image: &[u8]) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE patients SET image = ?1 WHERE id = ?2",
        params![image, id],
    )?;
    Ok(())
}

pub fn set_last_visit(conn: &Connection, id: i64, date: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE patients SET last_visit = ?1 WHERE id = ?2",
        params![date, id],
    )?;
    Ok(())
}

pub fn delete_patient_row(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?)
}

/// All patients, newest id first, without photo blobs.
pub fn list_patient_summaries(conn: &Connection) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, gender, phone, occupation, doctor, last_visit
         FROM patients ORDER BY id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(PatientSummary {
            id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            age: row.get(2)?,
            gender: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            phone: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            occupation: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            doctor: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            last_visit: row.get(7)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Every patient in id order with all text columns. `image` is left `None`.
pub fn list_patient_records(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], patient_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_patient_choices(conn: &Connection) -> Result<Vec<PatientChoice>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name FROM patients ORDER BY name, id")?;
    let rows = stmt.query_map([], |row| {
        Ok(PatientChoice {
            id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

fn patient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        age: row.get(2)?,
        gender: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        phone: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        address: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        occupation: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        diagnosis: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        prescription: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        last_visit: row.get(9)?,
        doctor: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        image: None,
    })
}
