pub mod records;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::models::{AttendanceRecord, NewAttendance};

/// Durable storage for accepted submissions.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, attendance: &NewAttendance) -> Result<AttendanceRecord, sqlx::Error>;
}

/// Open (creating if needed) the SQLite database at `path`.
pub async fn connect(path: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert(&self, attendance: &NewAttendance) -> Result<AttendanceRecord, sqlx::Error> {
        let id = records::create(&self.pool, attendance).await?;
        Ok(AttendanceRecord::stored(id, attendance.clone()))
    }
}
