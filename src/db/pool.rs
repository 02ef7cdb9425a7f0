//! Bounded connection pool over a SQLite file.
//!
//! Every request checks out its own connection. A semaphore caps how many
//! connections exist at once; callers beyond the cap wait in FIFO order
//! with no queue limit and no timeout.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::{open_connection, open_database, DatabaseError};

/// Shared handle to the clinic database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    path: Arc<PathBuf>,
    permits: Arc<Semaphore>,
    pool_size: usize,
}

impl Database {
    /// Open the database at `path`, create parent directories, run migrations
    /// once, and cap concurrent connections at `pool_size`.
    pub fn open(path: &Path, pool_size: usize) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Migrations run on a throwaway connection so request connections skip them.
        drop(open_database(path)?);

        tracing::info!(path = %path.display(), pool_size, "Database ready");

        Ok(Self {
            path: Arc::new(path.to_path_buf()),
            permits: Arc::new(Semaphore::new(pool_size.max(1))),
            pool_size: pool_size.max(1),
        })
    }

    /// Check out a connection, waiting for a free slot if the pool is full.
    pub async fn acquire(&self) -> Result<PooledConnection, DatabaseError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| DatabaseError::PoolClosed)?;
        let conn = open_connection(&self.path)?;
        Ok(PooledConnection {
            conn,
            _permit: permit,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Connections currently checked out.
    pub fn in_use(&self) -> usize {
        self.pool_size - self.permits.available_permits()
    }
}

/// A connection that returns its pool slot when dropped.
pub struct PooledConnection {
    conn: Connection,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}
