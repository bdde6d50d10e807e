use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::enums::FileType;
use crate::models::*;

pub fn insert_patient_file(
    conn: &Connection,
    patient_id: i64,
    file: &PendingAttachment,
    upload_date: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patient_files (patient_id, file_name, file_type, upload_date, file_data)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient_id,
            file.file_name,
            file.file_type.as_str(),
            upload_date,
            file.data,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Attachments for one patient, newest upload first.
pub fn get_files_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<PatientFile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, file_name, file_type, upload_date, file_data
         FROM patient_files WHERE patient_id = ?1
         ORDER BY upload_date DESC, id DESC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, Option<i64>>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<Vec<u8>>>(5)?,
        ))
    })?;

    let mut files = Vec::new();
    for row in rows {
        let (id, owner, file_name, file_type, upload_date, file_data) = row?;
        files.push(PatientFile {
            id,
            patient_id: owner.unwrap_or(patient_id),
            file_name: file_name.unwrap_or_default(),
            file_type: match file_type {
                Some(t) => FileType::from_str(&t)?,
                None => FileType::Other,
            },
            upload_date: upload_date.unwrap_or_default(),
            file_data: file_data.unwrap_or_default(),
        });
    }
    Ok(files)
}

pub fn count_files_for_patient(conn: &Connection, patient_id: i64) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM patient_files WHERE patient_id = ?1",
        params![patient_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn delete_files_for_patient(conn: &Connection, patient_id: i64) -> Result<usize, DatabaseError> {
    Ok(conn.execute(
        "DELETE FROM patient_files WHERE patient_id = ?1",
        params![patient_id],
    )?)
}
