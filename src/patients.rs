//! Patient records: create, load, update, cascade delete, list, and search.
//!
//! Every write validates first and then runs inside one transaction, so a
//! failure at any step (including attachment inserts) leaves no partial row.

use chrono::Local;
use rusqlite::Connection;

use crate::config;
use crate::db::repository;
use crate::error::ClinicError;
use crate::models::*;
use crate::validation;

/// Rows removed by a patient cascade delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DeletedPatient {
    pub visits: usize,
    pub files: usize,
}

fn now_stamp() -> String {
    Local::now().format(config::DATE_TIME_FORMAT).to_string()
}

/// Creates a patient with `last_visit` set to now, plus any queued files. Returns the new id.
pub fn add_patient(
    conn: &Connection,
    input: &PatientInput,
    uploads: &PatientUploads,
) -> Result<i64, ClinicError> {
    let fields = validation::validate_patient(input)?;
    let now = now_stamp();

    let tx = conn.unchecked_transaction()?;
    let id = repository::insert_patient(&tx, &fields, &now, uploads.photo.as_deref())?;
    for file in &uploads.files {
        repository::insert_patient_file(&tx, id, file, &now)?;
    }
    tx.commit()?;

    tracing::info!(
        patient_id = id,
        files = uploads.files.len(),
        has_photo = uploads.photo.is_some(),
        "Patient added"
    );
    Ok(id)
}

pub fn load_patient(conn: &Connection, id: i64) -> Result<Patient, ClinicError> {
    repository::get_patient(conn, id)?.ok_or_else(|| ClinicError::not_found("Patient", id))
}

/// Re-validates and rewrites the patient's fields.
///
/// The photo is replaced only when `uploads.photo` is `Some`; queued files are
/// appended to the existing attachments.
pub fn update_patient(
    conn: &Connection,
    id: i64,
    input: &PatientInput,
    uploads: &PatientUploads,
) -> Result<(), ClinicError> {
    let fields = validation::validate_patient(input)?;

    let tx = conn.unchecked_transaction()?;
    if repository::update_patient_fields(&tx, id, &fields)? == 0 {
        return Err(ClinicError::not_found("Patient", id));
    }
    if let Some(photo) = uploads.photo.as_deref() {
        repository::set_patient_image(&tx, id, photo)?;
    }
    let now = now_stamp();
    for file in &uploads.files {
        repository::insert_patient_file(&tx, id, file, &now)?;
    }
    tx.commit()?;

    tracing::info!(
        patient_id = id,
        files = uploads.files.len(),
        photo_replaced = uploads.photo.is_some(),
        "Patient updated"
    );
    Ok(())
}

/// Deletes visits and files first, then the patient, as one transaction.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<DeletedPatient, ClinicError> {
    let tx = conn.unchecked_transaction()?;
    if !repository::patient_exists(&tx, id)? {
        return Err(ClinicError::not_found("Patient", id));
    }
    let visits = repository::delete_visits_for_patient(&tx, id)?;
    let files = repository::delete_files_for_patient(&tx, id)?;
    repository::delete_patient_row(&tx, id)?;
    tx.commit()?;

    tracing::info!(
        patient_id = id,
        visits,
        files,
        "Patient cascade-deleted with visits and files"
    );
    Ok(DeletedPatient { visits, files })
}

/// All patients, newest id first.
pub fn list_patients(conn: &Connection) -> Result<Vec<PatientSummary>, ClinicError> {
    Ok(repository::list_patient_summaries(conn)?)
}

/// Case-insensitive substring match on name, phone, doctor, or occupation.
/// A blank keyword lists everyone.
pub fn search_patients(conn: &Connection, keyword: &str) -> Result<Vec<PatientSummary>, ClinicError> {
    let keyword = keyword.trim().to_lowercase();
    let patients = repository::list_patient_summaries(conn)?;
    if keyword.is_empty() {
        return Ok(patients);
    }

    Ok(patients
        .into_iter()
        .filter(|p| {
            [&p.name, &p.phone, &p.doctor, &p.occupation]
                .iter()
                .any(|field| field.to_lowercase().contains(&keyword))
        })
        .collect())
}

pub fn patient_choices(conn: &Connection) -> Result<Vec<PatientChoice>, ClinicError> {
    Ok(repository::list_patient_choices(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::FileType;

    fn jane() -> PatientInput {
        PatientInput {
            name: "Jane Doe".into(),
            age: Some(30),
            gender: "Female".into(),
            phone: "555-0101".into(),
            address: "12 Elm St".into(),
            occupation: "Engineer".into(),
            diagnosis: "Migraine".into(),
            prescription: "Ibuprofen".into(),
            doctor: "Dr. Smith".into(),
        }
    }

    fn named(name: &str) -> PatientInput {
        PatientInput {
            name: name.into(),
            ..Default::default()
        }
    }

    fn attachment(name: &str) -> PendingAttachment {
        PendingAttachment {
            file_name: name.into(),
            file_type: FileType::Document,
            data: b"data".to_vec(),
        }
    }

    fn count(conn: &Connection, sql: &str, id: i64) -> i64 {
        conn.query_row(sql, [id], |row| row.get(0)).unwrap()
    }

    #[test]
    fn empty_name_rejected_without_insert() {
        let conn = open_memory_database().unwrap();
        let err = add_patient(&conn, &named("  "), &PatientUploads::none()).unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
        assert!(list_patients(&conn).unwrap().is_empty());
    }

    #[test]
    fn age_boundaries_on_add_and_update() {
        let conn = open_memory_database().unwrap();
        for bad in [-1, 151] {
            let input = PatientInput { age: Some(bad), ..jane() };
            assert!(matches!(
                add_patient(&conn, &input, &PatientUploads::none()),
                Err(ClinicError::Validation(_))
            ));
        }
        let zero = add_patient(&conn, &PatientInput { age: Some(0), ..jane() }, &PatientUploads::none()).unwrap();
        let max = add_patient(&conn, &PatientInput { age: Some(150), ..jane() }, &PatientUploads::none()).unwrap();
        assert_eq!(load_patient(&conn, zero).unwrap().age, Some(0));
        assert_eq!(load_patient(&conn, max).unwrap().age, Some(150));

        let bad_update = PatientInput { age: Some(151), ..jane() };
        assert!(matches!(
            update_patient(&conn, zero, &bad_update, &PatientUploads::none()),
            Err(ClinicError::Validation(_))
        ));
        assert_eq!(load_patient(&conn, zero).unwrap().age, Some(0));
    }

    #[test]
    fn add_then_load_roundtrip() {
        let conn = open_memory_database().unwrap();
        let id = add_patient(&conn, &jane(), &PatientUploads::none()).unwrap();

        let p = load_patient(&conn, id).unwrap();
        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.age, Some(30));
        assert_eq!(p.gender, "Female");
        assert_eq!(p.phone, "555-0101");
        assert_eq!(p.address, "12 Elm St");
        assert_eq!(p.occupation, "Engineer");
        assert_eq!(p.diagnosis, "Migraine");
        assert_eq!(p.prescription, "Ibuprofen");
        assert_eq!(p.doctor, "Dr. Smith");
        assert!(p.image.is_none());
        assert!(p.last_visit.is_some());
    }

    #[test]
    fn add_with_photo_and_files() {
        let conn = open_memory_database().unwrap();
        let uploads = PatientUploads {
            photo: Some(b"photo".to_vec()),
            files: vec![attachment("a.pdf"), attachment("b.txt")],
        };
        let id = add_patient(&conn, &jane(), &uploads).unwrap();

        assert_eq!(load_patient(&conn, id).unwrap().image, Some(b"photo".to_vec()));
        assert_eq!(repository::count_files_for_patient(&conn, id).unwrap(), 2);
    }

    #[test]
    fn load_missing_is_not_found() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(load_patient(&conn, 99), Err(ClinicError::NotFound { .. })));
    }

    #[test]
    fn update_preserves_photo_unless_supplied() {
        let conn = open_memory_database().unwrap();
        let uploads = PatientUploads {
            photo: Some(b"first".to_vec()),
            files: vec![attachment("a.pdf")],
        };
        let id = add_patient(&conn, &jane(), &uploads).unwrap();

        let renamed = PatientInput { name: "Jane Roe".into(), ..jane() };
        update_patient(&conn, id, &renamed, &PatientUploads::none()).unwrap();
        let p = load_patient(&conn, id).unwrap();
        assert_eq!(p.name, "Jane Roe");
        assert_eq!(p.image, Some(b"first".to_vec()));

        let replace = PatientUploads {
            photo: Some(b"second".to_vec()),
            files: vec![attachment("c.pdf")],
        };
        update_patient(&conn, id, &renamed, &replace).unwrap();
        assert_eq!(load_patient(&conn, id).unwrap().image, Some(b"second".to_vec()));
        // files appended, never replaced
        assert_eq!(repository::count_files_for_patient(&conn, id).unwrap(), 2);
    }

    #[test]
    fn update_missing_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = update_patient(&conn, 5, &jane(), &PatientUploads::none()).unwrap_err();
        assert!(matches!(err, ClinicError::NotFound { .. }));
    }

    #[test]
    fn delete_cascades_to_visits_and_files() {
        let conn = open_memory_database().unwrap();
        let uploads = PatientUploads {
            photo: None,
            files: vec![attachment("a.pdf"), attachment("b.pdf")],
        };
        let keep = add_patient(&conn, &named("Keep"), &uploads).unwrap();
        let gone = add_patient(&conn, &named("Gone"), &uploads).unwrap();
        for pid in [keep, gone] {
            conn.execute(
                "INSERT INTO visits (patient_id, date, price) VALUES (?1, '2024-01-01 10:00', 0.0)",
                [pid],
            )
            .unwrap();
        }

        let deleted = delete_patient(&conn, gone).unwrap();
        assert_eq!(deleted, DeletedPatient { visits: 1, files: 2 });

        assert_eq!(count(&conn, "SELECT COUNT(*) FROM visits WHERE patient_id = ?1", gone), 0);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM patient_files WHERE patient_id = ?1", gone), 0);
        assert!(matches!(load_patient(&conn, gone), Err(ClinicError::NotFound { .. })));

        assert_eq!(count(&conn, "SELECT COUNT(*) FROM visits WHERE patient_id = ?1", keep), 1);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM patient_files WHERE patient_id = ?1", keep), 2);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(delete_patient(&conn, 1), Err(ClinicError::NotFound { .. })));
    }

    fn fail_on(conn: &Connection, event: &str) {
        conn.execute_batch(&format!(
            "CREATE TRIGGER fail_step BEFORE {event} BEGIN SELECT RAISE(ABORT, 'forced failure'); END;"
        ))
        .unwrap();
    }

    #[test]
    fn failed_delete_keeps_children() {
        let conn = open_memory_database().unwrap();
        let uploads = PatientUploads {
            photo: None,
            files: vec![attachment("a.pdf")],
        };
        let id = add_patient(&conn, &named("Keep"), &uploads).unwrap();
        conn.execute(
            "INSERT INTO visits (patient_id, date, price) VALUES (?1, '2024-01-01 10:00', 0.0)",
            [id],
        )
        .unwrap();
        fail_on(&conn, "DELETE ON patients");

        let err = delete_patient(&conn, id).unwrap_err();
        assert!(matches!(err, ClinicError::Storage(_)));

        assert!(load_patient(&conn, id).is_ok());
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM visits WHERE patient_id = ?1", id), 1);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM patient_files WHERE patient_id = ?1", id), 1);
    }

    #[test]
    fn failed_attachment_insert_rolls_back_add() {
        let conn = open_memory_database().unwrap();
        let existing = add_patient(&conn, &named("Existing"), &PatientUploads::none()).unwrap();
        fail_on(&conn, "INSERT ON patient_files");

        let uploads = PatientUploads {
            photo: None,
            files: vec![attachment("a.pdf")],
        };
        let err = add_patient(&conn, &jane(), &uploads).unwrap_err();
        assert!(matches!(err, ClinicError::Storage(_)));

        let remaining = list_patients(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, existing);
    }

    #[test]
    fn failed_attachment_insert_rolls_back_update() {
        let conn = open_memory_database().unwrap();
        let id = add_patient(&conn, &jane(), &PatientUploads::none()).unwrap();
        fail_on(&conn, "INSERT ON patient_files");

        let edited = PatientInput {
            name: "Jane Roe".into(),
            age: Some(31),
            ..jane()
        };
        let uploads = PatientUploads {
            photo: Some(b"new photo".to_vec()),
            files: vec![attachment("a.pdf")],
        };
        assert!(update_patient(&conn, id, &edited, &uploads).is_err());

        let p = load_patient(&conn, id).unwrap();
        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.age, Some(30));
        assert_eq!(p.image, None);
    }

    #[test]
    fn search_matches_four_fields_case_insensitively() {
        let conn = open_memory_database().unwrap();
        let by_name = add_patient(&conn, &named("John DOE"), &PatientUploads::none()).unwrap();
        let by_doctor = add_patient(
            &conn,
            &PatientInput { doctor: "Dr. Doeman".into(), ..named("Ann") },
            &PatientUploads::none(),
        )
        .unwrap();
        let by_occupation = add_patient(
            &conn,
            &PatientInput { occupation: "Doe breeder".into(), ..named("Bo") },
            &PatientUploads::none(),
        )
        .unwrap();
        // address and diagnosis are not searched
        add_patient(
            &conn,
            &PatientInput { address: "Doe Street".into(), diagnosis: "doe".into(), ..named("Cy") },
            &PatientUploads::none(),
        )
        .unwrap();

        let ids: Vec<i64> = search_patients(&conn, "doe").unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![by_occupation, by_doctor, by_name]);

        let by_phone = add_patient(
            &conn,
            &PatientInput { phone: "+1 555 0199".into(), ..named("Dee") },
            &PatientUploads::none(),
        )
        .unwrap();
        let ids: Vec<i64> = search_patients(&conn, "0199").unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![by_phone]);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let conn = open_memory_database().unwrap();
        add_patient(&conn, &named("Jane"), &PatientUploads::none()).unwrap();
        assert!(search_patients(&conn, "%").unwrap().is_empty());
        assert!(search_patients(&conn, "_").unwrap().is_empty());
    }

    #[test]
    fn blank_search_equals_list() {
        let conn = open_memory_database().unwrap();
        add_patient(&conn, &named("A"), &PatientUploads::none()).unwrap();
        add_patient(&conn, &named("B"), &PatientUploads::none()).unwrap();
        assert_eq!(search_patients(&conn, "").unwrap(), list_patients(&conn).unwrap());
        assert_eq!(search_patients(&conn, "   ").unwrap(), list_patients(&conn).unwrap());
    }
}
