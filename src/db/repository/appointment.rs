use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now_timestamp;
use crate::db::DatabaseError;
use crate::models::*;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, fullName, email, phone, date, time, message,
     status, doctor_notes, medical_description, createdAt";

/// Insert a booking with status `Pending`. Missing phone and message are stored as `''`.
pub fn insert_appointment(
    conn: &Connection,
    appointment: &NewAppointment,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments
         (patient_id, fullName, email, phone, date, time, message, status, createdAt)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            appointment.patient_id,
            appointment.snapshot.full_name,
            appointment.snapshot.email,
            appointment.snapshot.phone.as_deref().unwrap_or(""),
            appointment.date,
            appointment.time,
            appointment.message.as_deref().unwrap_or(""),
            AppointmentStatus::Pending.as_str(),
            now_timestamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>, DatabaseError> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], appointment_from_row).optional()?)
}

/// Appointments owned by one patient, latest date first.
pub fn list_patient_appointments(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<PatientAppointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, date, time, status, doctor_notes, medical_description
         FROM appointments WHERE patient_id = ?1
         ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(PatientAppointment {
            id: row.get(0)?,
            date: row.get(1)?,
            time: row.get(2)?,
            status: row.get(3)?,
            doctor_notes: row.get(4)?,
            medical_description: row.get(5)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Every appointment, most recently booked first.
pub fn list_all_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY createdAt DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], appointment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Apply a staff update in a single statement.
///
/// Note columns given as empty strings are stored as NULL. An empty update is a no-op.
pub fn update_appointment(
    conn: &Connection,
    id: i64,
    update: &AppointmentUpdate,
) -> Result<(), DatabaseError> {
    if update.is_empty() {
        return Ok(());
    }

    let mut assignments: Vec<&str> = Vec::new();
    let mut values: Vec<Option<String>> = Vec::new();

    if let Some(status) = &update.status {
        assignments.push("status = ?");
        values.push(Some(status.clone()));
    }
    if let Some(notes) = &update.doctor_notes {
        assignments.push("doctor_notes = ?");
        values.push(non_empty(notes));
    }
    if let Some(description) = &update.medical_description {
        assignments.push("medical_description = ?");
        values.push(non_empty(description));
    }

    let sql = format!("UPDATE appointments SET {} WHERE id = ?", assignments.join(", "));
    let mut bound: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
    bound.push(&id);

    let changed = conn.execute(&sql, bound.as_slice())?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        date: row.get(5)?,
        time: row.get(6)?,
        message: row.get(7)?,
        status: row.get(8)?,
        doctor_notes: row.get(9)?,
        medical_description: row.get(10)?,
        created_at: row.get(11)?,
    })
}
