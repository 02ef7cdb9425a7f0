pub mod pool;
pub mod repository;
pub mod sqlite;

pub use pool::*;
pub use repository::*;
pub use sqlite::*;

use rusqlite::ffi;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Unique constraint violated on {table}.{column}")]
    UniqueViolation { table: String, column: String },

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Connection pool closed")]
    PoolClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatabaseError {
    /// Column named by a unique-constraint failure, if this is one.
    pub fn unique_column(&self) -> Option<&str> {
        match self {
            DatabaseError::UniqueViolation { column, .. } => Some(column),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    /// Constraint failures are split out by extended code so callers can map
    /// them to conflicts without string matching of their own.
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref code, ref message) = err {
            match code.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    if let Some((table, column)) = message.as_deref().and_then(parse_unique_target) {
                        return DatabaseError::UniqueViolation { table, column };
                    }
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return DatabaseError::ForeignKeyViolation(
                        message.clone().unwrap_or_else(|| "FOREIGN KEY constraint failed".into()),
                    );
                }
                _ => {}
            }
        }
        DatabaseError::Sqlite(err)
    }
}

/// Parse `UNIQUE constraint failed: patients.email` into `("patients", "email")`.
///
/// Composite constraints list several columns; the first one is reported.
fn parse_unique_target(message: &str) -> Option<(String, String)> {
    let target = message.split(':').nth(1)?.trim();
    let first = target.split(',').next()?.trim();
    let (table, column) = first.split_once('.')?;
    Some((table.to_string(), column.to_string()))
}
