use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now_timestamp;
use crate::db::DatabaseError;
use crate::models::*;

/// Create the bill for an appointment. A second bill for the same
/// appointment fails with `UniqueViolation` on `appointment_id`.
pub fn insert_billing(conn: &Connection, bill: &NewBilling) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO billing (appointment_id, amount, notes, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            bill.appointment_id,
            bill.amount,
            bill.notes,
            BillingStatus::Unpaid.as_str(),
            now_timestamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_billing(conn: &Connection, id: i64) -> Result<Option<Billing>, DatabaseError> {
    Ok(conn
        .query_row(
            "SELECT id, appointment_id, amount, notes, status, created_at FROM billing WHERE id = ?1",
            params![id],
            billing_from_row,
        )
        .optional()?)
}

/// All bills with the patient name and date of their appointment, newest first.
pub fn list_billing(conn: &Connection) -> Result<Vec<BillingWithAppointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.appointment_id, b.amount, b.notes, b.status, b.created_at,
                a.fullName, a.date
         FROM billing b
         JOIN appointments a ON b.appointment_id = a.id
         ORDER BY b.created_at DESC, b.id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(BillingWithAppointment {
            billing: billing_from_row(row)?,
            full_name: row.get(6)?,
            date: row.get(7)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_billing_status(conn: &Connection, id: i64, status: &str) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE billing SET status = ?1 WHERE id = ?2",
        params![status, id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "billing".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn billing_from_row(row: &Row<'_>) -> rusqlite::Result<Billing> {
    Ok(Billing {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        amount: row.get(2)?,
        notes: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
    })
}
