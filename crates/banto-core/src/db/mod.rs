//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `records` - Stores and daily record operations
//! - `reports` - Generated reports, schedules, and generation logs

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod records;
mod reports;

pub use records::RecordQuery;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Format a DateTime<Utc> the way SQLite's CURRENT_TIMESTAMP does
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool, running migrations on open
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because each pooled
    /// connection would otherwise open its own empty in-memory database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/banto_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: better concurrency, readers don't block writers
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Store directory
            CREATE TABLE IF NOT EXISTS stores (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Daily operational records, one row per store per day
            CREATE TABLE IF NOT EXISTS daily_records (
                id INTEGER PRIMARY KEY,
                date DATE NOT NULL,
                store_id TEXT NOT NULL,
                store_name TEXT NOT NULL,
                sales REAL NOT NULL DEFAULT 0,
                purchase REAL NOT NULL DEFAULT 0,
                labor_cost REAL NOT NULL DEFAULT 0,
                utilities REAL NOT NULL DEFAULT 0,
                promotion REAL NOT NULL DEFAULT 0,
                cleaning REAL NOT NULL DEFAULT 0,
                misc REAL NOT NULL DEFAULT 0,
                communication REAL NOT NULL DEFAULT 0,
                others REAL NOT NULL DEFAULT 0,
                report_text TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(date, store_id)
            );

            CREATE INDEX IF NOT EXISTS idx_daily_records_date ON daily_records(date);
            CREATE INDEX IF NOT EXISTS idx_daily_records_store ON daily_records(store_id);

            -- Stored periodic reports
            CREATE TABLE IF NOT EXISTS generated_reports (
                id INTEGER PRIMARY KEY,
                store_id TEXT,
                report_type TEXT NOT NULL,
                period_start DATE NOT NULL,
                period_end DATE NOT NULL,
                title TEXT NOT NULL,
                summary TEXT NOT NULL,
                key_insights TEXT NOT NULL DEFAULT '[]',    -- JSON array
                recommendations TEXT NOT NULL DEFAULT '[]', -- JSON array
                metrics TEXT NOT NULL,                      -- JSON ReportMetrics
                generated_by TEXT NOT NULL DEFAULT 'manual',
                generated_at DATETIME NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_generated_reports_type ON generated_reports(report_type);
            CREATE INDEX IF NOT EXISTS idx_generated_reports_period ON generated_reports(period_start, period_end);

            -- Recurring report generation schedules
            CREATE TABLE IF NOT EXISTS report_schedules (
                id INTEGER PRIMARY KEY,
                report_type TEXT NOT NULL,
                store_id TEXT,
                is_enabled BOOLEAN NOT NULL DEFAULT 1,
                cron_expression TEXT NOT NULL,
                last_run_at DATETIME,
                next_run_at DATETIME,
                notification_emails TEXT NOT NULL DEFAULT '[]', -- JSON array
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_report_schedules_enabled ON report_schedules(is_enabled, next_run_at);

            -- Audit rows for report generation attempts
            CREATE TABLE IF NOT EXISTS report_generation_logs (
                id INTEGER PRIMARY KEY,
                schedule_id INTEGER REFERENCES report_schedules(id),
                report_id INTEGER REFERENCES generated_reports(id),
                report_type TEXT NOT NULL,
                store_id TEXT,
                status TEXT NOT NULL DEFAULT 'in_progress',
                started_at DATETIME NOT NULL,
                completed_at DATETIME,
                error_message TEXT,
                record_count INTEGER NOT NULL DEFAULT 0,
                store_count INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_generation_logs_status ON report_generation_logs(status);
            CREATE INDEX IF NOT EXISTS idx_generation_logs_started ON report_generation_logs(started_at);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}
