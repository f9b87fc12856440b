//! # SQLite
//!
//! Single file database holding both tables.
//!
//! ## Requirements
//!
//! - Survives restarts, created on first start if missing
//! - Uniqueness enforced by the engine: `staff_pass_id` for mappings, `team_name` for redemptions
//! - Many concurrent request tasks, one shared handle
//!
//! ## Implementation
//!
//! - `rusqlite` connection behind `Arc<Mutex<_>>`, cloned into every handler
//! - Blocking calls hop onto the blocking pool through [`Store::run`]
//! - Busy timeout so separate connections to the same file queue for the write lock instead of
//!   failing with `SQLITE_BUSY`
//! - Timestamps stored as epoch millis
use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::BankError;

pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS mapping_entries (
        staff_pass_id TEXT PRIMARY KEY NOT NULL,
        team_name     TEXT NOT NULL,
        created_at    INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS mapping_entries_team_name ON mapping_entries (team_name);

    CREATE TABLE IF NOT EXISTS redemption_entries (
        team_name   TEXT PRIMARY KEY NOT NULL,
        redeemed_at INTEGER NOT NULL,
        redeemed_by TEXT NOT NULL
    );
";

/// Owned handle to the mapping table and the redemption ledger.
///
/// Cheap to clone, every clone shares the same connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Creating new database at {}", path.display());
        }

        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, BankError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, BankError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;

        debug!("Database schema ready");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, BankError> {
        self.conn.lock().map_err(|_| BankError::Poisoned)
    }

    /// Runs blocking store work off the async runtime.
    pub async fn run<T, F>(&self, work: F) -> Result<T, BankError>
    where
        F: FnOnce(&Store) -> Result<T, BankError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();

        tokio::task::spawn_blocking(move || work(&store)).await?
    }
}

pub(crate) fn from_millis(column: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gifts.db");

        Store::open(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gifts.db");

        Store::open(&path).unwrap();
        Store::open(&path).unwrap();
    }

    #[test]
    fn test_from_millis_out_of_range() {
        assert!(from_millis(0, i64::MAX).is_err());
        assert_eq!(from_millis(0, 0).unwrap().timestamp(), 0);
    }

    #[tokio::test]
    async fn test_run_returns_work_result() {
        let store = Store::open_in_memory().unwrap();

        let tables: i64 = store
            .run(|store| {
                let conn = store.connection()?;
                let count = conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await
            .unwrap();

        assert_eq!(tables, 2);
    }
}
