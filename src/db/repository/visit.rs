use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_visit(conn: &Connection, visit: &VisitFields) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO visits (patient_id, date, diagnosis, prescription, doctor, price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            visit.patient_id,
            visit.date,
            visit.diagnosis,
            visit.prescription,
            visit.doctor,
            visit.price,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_visit(conn: &Connection, id: i64) -> Result<Option<Visit>, DatabaseError> {
    let visit = conn
        .query_row(
            "SELECT id, patient_id, date, diagnosis, prescription, doctor, price
             FROM visits WHERE id = ?1",
            params![id],
            visit_from_row,
        )
        .optional()?;
    Ok(visit)
}

/// Returns the number of rows touched (0 when the id is absent).
pub fn update_visit(conn: &Connection, id: i64, visit: &VisitFields) -> Result<usize, DatabaseError> {
    let updated = conn.execute(
        "UPDATE visits SET patient_id = ?1, date = ?2, diagnosis = ?3, prescription = ?4,
         doctor = ?5, price = ?6 WHERE id = ?7",
        params![
            visit.patient_id,
            visit.date,
            visit.diagnosis,
            visit.prescription,
            visit.doctor,
            visit.price,
            id,
        ],
    )?;
    Ok(updated)
}

pub fn delete_visit(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM visits WHERE id = ?1", params![id])?)
}

pub fn delete_visits_for_patient(conn: &Connection, patient_id: i64) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM visits WHERE patient_id = ?1", params![patient_id])?)
}

/// Visit history joined to patient names, newest visit id first.
pub fn list_visits(
    conn: &Connection,
    patient_id: Option<i64>,
) -> Result<Vec<VisitListing>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT v.id, v.patient_id, COALESCE(p.name, 'Unknown'), v.date, v.diagnosis,
                v.prescription, v.doctor, v.price
         FROM visits v LEFT JOIN patients p ON v.patient_id = p.id
         WHERE ?1 IS NULL OR v.patient_id = ?1
         ORDER BY v.id DESC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(VisitListing {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            patient_name: row.get(2)?,
            date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            diagnosis: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            prescription: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            doctor: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            price: row.get::<_, Option<f64>>(7)?.unwrap_or(0.0),
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// One patient's visits by date, newest first (report ordering).
pub fn get_visits_for_patient(conn: &Connection, patient_id: i64) -> Result<Vec<Visit>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, date, diagnosis, prescription, doctor, price
         FROM visits WHERE patient_id = ?1 ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], visit_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

fn visit_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: row.get(0)?,
        patient_id: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
        date: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        diagnosis: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        prescription: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        doctor: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        price: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
    })
}
