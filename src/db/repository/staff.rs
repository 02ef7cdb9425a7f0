use rusqlite::{params, Connection, OptionalExtension};

use super::now_timestamp;
use crate::db::DatabaseError;
use crate::models::StaffUser;

pub fn insert_staff_user(
    conn: &Connection,
    username: &str,
    password_hash: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO users (username, password_hash, createdAt) VALUES (?1, ?2, ?3)",
        params![username, password_hash, now_timestamp()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_staff_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<StaffUser>, DatabaseError> {
    let user = conn
        .query_row(
            "SELECT id, username, password_hash FROM users WHERE username = ?1",
            params![username],
            |row| {
                Ok(StaffUser {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}
