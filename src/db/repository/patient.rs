use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now_timestamp;
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (fullName, email, phone, password_hash, createdAt)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient.full_name,
            patient.email,
            patient.phone,
            patient.password_hash,
            now_timestamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Look up login credentials by email or phone in a single query.
pub fn find_patient_credentials(
    conn: &Connection,
    identifier: &str,
) -> Result<Option<PatientCredentials>, DatabaseError> {
    let creds = conn
        .query_row(
            "SELECT id, email, phone, password_hash FROM patients
             WHERE email = ?1 OR phone = ?1
             ORDER BY id LIMIT 1",
            params![identifier],
            |row| {
                Ok(PatientCredentials {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    phone: row.get(2)?,
                    password_hash: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(creds)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            "SELECT id, fullName, email, phone, createdAt FROM patients WHERE id = ?1",
            params![id],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

/// Identity fields to copy onto a new appointment.
pub fn get_patient_snapshot(
    conn: &Connection,
    id: i64,
) -> Result<Option<PatientSnapshot>, DatabaseError> {
    Ok(get_patient(conn, id)?.map(|p| PatientSnapshot {
        full_name: p.full_name,
        email: p.email,
        phone: p.phone,
    }))
}

pub fn list_patient_summaries(conn: &Connection) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, fullName, email, createdAt FROM patients ORDER BY createdAt DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(PatientSummary {
            id: row.get(0)?,
            full_name: row.get(1)?,
            email: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(id) FROM patients", [], |row| row.get(0))?)
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::*;

    #[test]
    fn insert_and_get_patient() {
        let conn = test_db();
        let id = seed_patient(&conn, "Jane Doe", Some("jane@x.com"), None);
        let patient = get_patient(&conn, id).unwrap().unwrap();
        assert_eq!(patient.full_name, "Jane Doe");
        assert_eq!(patient.email.as_deref(), Some("jane@x.com"));
        assert_eq!(patient.phone, None);
    }

    #[test]
    fn duplicate_email_reports_email_column() {
        let conn = test_db();
        seed_patient(&conn, "A", Some("dup@x.com"), None);
        let err = insert_patient(
            &conn,
            &NewPatient {
                full_name: "B".into(),
                email: Some("dup@x.com".into()),
                phone: Some("555".into()),
                password_hash: "h".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err.unique_column(), Some("email"));
    }

    #[test]
    fn duplicate_phone_reports_phone_column() {
        let conn = test_db();
        seed_patient(&conn, "A", None, Some("555-0100"));
        let err = insert_patient(
            &conn,
            &NewPatient {
                full_name: "B".into(),
                email: None,
                phone: Some("555-0100".into()),
                password_hash: "h".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err.unique_column(), Some("phone"));
    }

    #[test]
    fn null_emails_do_not_collide() {
        let conn = test_db();
        seed_patient(&conn, "A", None, Some("1"));
        seed_patient(&conn, "B", None, Some("2"));
        assert_eq!(count_patients(&conn).unwrap(), 2);
    }

    #[test]
    fn credentials_found_by_email_or_phone() {
        let conn = test_db();
        let id = seed_patient(&conn, "A", Some("a@x.com"), Some("555"));
        assert_eq!(find_patient_credentials(&conn, "a@x.com").unwrap().unwrap().id, id);
        assert_eq!(find_patient_credentials(&conn, "555").unwrap().unwrap().id, id);
        assert!(find_patient_credentials(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn summaries_newest_first() {
        let conn = test_db();
        let first = seed_patient(&conn, "First", Some("1@x.com"), None);
        let second = seed_patient(&conn, "Second", Some("2@x.com"), None);
        let list = list_patient_summaries(&conn).unwrap();
        assert_eq!(list.iter().map(|p| p.id).collect::<Vec<_>>(), vec![second, first]);
    }

    #[test]
    fn snapshot_missing_patient_is_none() {
        let conn = test_db();
        assert!(get_patient_snapshot(&conn, 99).unwrap().is_none());
    }
}
