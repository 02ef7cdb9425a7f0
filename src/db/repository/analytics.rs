use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection};

use super::count_patients;
use crate::db::DatabaseError;
use crate::models::*;

/// Days covered by the dashboard chart, today included.
pub const CHART_WINDOW_DAYS: i64 = 7;

/// Compute the staff dashboard counters as of `today`.
pub fn compute_analytics(conn: &Connection, today: NaiveDate) -> Result<Analytics, DatabaseError> {
    let today_str = today.format("%Y-%m-%d").to_string();
    let window_start = (today - Duration::days(CHART_WINDOW_DAYS - 1))
        .format("%Y-%m-%d")
        .to_string();

    let pending_count: i64 = conn.query_row(
        "SELECT COUNT(id) FROM appointments WHERE status = ?1",
        params![AppointmentStatus::Pending.as_str()],
        |row| row.get(0),
    )?;

    let today_count: i64 = conn.query_row(
        "SELECT COUNT(id) FROM appointments WHERE date = ?1",
        params![today_str],
        |row| row.get(0),
    )?;

    let total_patients = count_patients(conn)?;

    let mut stmt = conn.prepare(
        "SELECT date, COUNT(id) FROM appointments
         WHERE date >= ?1 AND date <= ?2
         GROUP BY date
         ORDER BY date ASC",
    )?;
    let chart_data = stmt
        .query_map(params![window_start, today_str], |row| {
            Ok(DailyCount {
                appointment_date: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Analytics {
        pending_count,
        today_count,
        total_patients,
        chart_data,
    })
}
