//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. This module provides a `DatabasePool`
//! with a multi-connection reader pool for concurrent reads and a single-connection
//! writer pool for serialized writes. Both use WAL journal mode and enforce foreign keys.
//!
//! Because every write goes through one connection, a write transaction sees
//! a stable view: the guarded updates in the booking repository cannot
//! interleave with another request's writes.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use tutorhub_types::config::DatabaseConfig;

/// Default size of the reader pool.
pub const DEFAULT_MAX_READERS: u32 = 8;

/// Tables reported by [`DatabasePool::table_counts`], in dependency order.
pub const TABLES: [&str; 10] = [
    "cities",
    "users",
    "students",
    "tutors",
    "subjects",
    "teaching_levels",
    "tutor_subjects",
    "schedules",
    "bookings",
    "reviews",
];

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection, read-only pool for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT/UPDATE/DELETE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open a pool with the default reader count. Runs migrations.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::connect(database_url, DEFAULT_MAX_READERS).await
    }

    /// Open a pool with split reader/writer connections.
    ///
    /// Runs migrations automatically on the writer pool before the reader
    /// pool is opened. Both pools use WAL journal mode, foreign key
    /// enforcement, and a 5-second busy timeout.
    pub async fn connect(database_url: &str, max_readers: u32) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(max_readers.max(1))
            .connect_with(read_opts)
            .await?;

        tracing::debug!(max_readers, "database pool ready");
        Ok(Self { reader, writer })
    }

    /// Open the database described by `config` inside `data_dir`, creating
    /// the directory if needed.
    pub async fn open(data_dir: &Path, config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        tokio::fs::create_dir_all(data_dir).await?;
        let url = database_url(data_dir, &config.filename);
        Self::connect(&url, config.max_read_connections).await
    }

    /// Row count of every application table, in [`TABLES`] order.
    pub async fn table_counts(&self) -> Result<Vec<(&'static str, i64)>, sqlx::Error> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            // Table names come from the fixed list above.
            let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&self.reader)
                .await?;
            counts.push((table, count));
        }
        Ok(counts)
    }

    pub async fn close(&self) {
        self.reader.close().await;
        self.writer.close().await;
    }
}

/// SQLite URL for `filename` inside `data_dir`.
pub fn database_url(data_dir: &Path, filename: &str) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join(filename).display())
}

/// The database URL for the resolved data directory and default file name.
pub fn default_database_url() -> String {
    database_url(
        &crate::data_dir::resolve_data_dir(),
        &DatabaseConfig::default().filename,
    )
}
