//! Repository layer: entity-scoped database operations.
//!
//! Every function takes a borrowed `Connection` and runs single statements;
//! callers own checkout from the pool.

mod analytics;
mod appointment;
mod billing;
mod patient;
mod staff;

use chrono::{SecondsFormat, Utc};

// Re-export all public items from sub-modules
pub use analytics::*;
pub use appointment::*;
pub use billing::*;
pub use patient::*;
pub use staff::*;

/// Server-side creation timestamp (RFC 3339, UTC, millisecond precision).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
pub(crate) mod test_support {
    use rusqlite::Connection;

    use super::*;
    use crate::models::*;

    pub fn test_db() -> Connection {
        crate::db::open_memory_database().unwrap()
    }

    pub fn seed_patient(conn: &Connection, name: &str, email: Option<&str>, phone: Option<&str>) -> i64 {
        insert_patient(
            conn,
            &NewPatient {
                full_name: name.into(),
                email: email.map(String::from),
                phone: phone.map(String::from),
                password_hash: "not-a-real-hash".into(),
            },
        )
        .unwrap()
    }

    pub fn seed_appointment(conn: &Connection, patient_id: i64, date: &str) -> i64 {
        let snapshot = get_patient_snapshot(conn, patient_id).unwrap().unwrap();
        insert_appointment(
            conn,
            &NewAppointment {
                patient_id,
                snapshot,
                date: date.into(),
                time: "10:00".into(),
                message: None,
            },
        )
        .unwrap()
    }
}
