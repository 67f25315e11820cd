//! SQLite storage adapter.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::adapter::{AppliedMigration, MigrationAdapter};
use crate::error::{MigrateError, Result};
use crate::loader::Migration;

/// SQL to create the bookkeeping table.
pub const CREATE_MIGRATIONS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS yeti_migrations (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    hash TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

// One async mutex per database URL. SQLite has no advisory locks, so runs
// within this process serialize here; the single-connection pool keeps a
// second process from interleaving statements mid-transaction.
static LOCKS: LazyLock<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn lock_for(url: &str) -> Arc<AsyncMutex<()>> {
    let mut locks = LOCKS.lock().expect("lock registry poisoned");
    Arc::clone(
        locks
            .entry(url.to_owned())
            .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
    )
}

/// [`MigrationAdapter`] over a SQLite database.
pub struct SqliteAdapter {
    url: String,
    pool: Option<SqlitePool>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl SqliteAdapter {
    /// Creates an adapter for a SQLite URL, e.g. `sqlite:app.db?mode=rwc`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: None,
            guard: None,
        }
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or(MigrateError::NotConnected)
    }
}

impl MigrationAdapter for SqliteAdapter {
    async fn connect(&mut self) -> Result<()> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&self.url)
            .await?;
        self.pool = Some(pool);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        Ok(())
    }

    async fn lock(&mut self) -> Result<()> {
        let mutex = lock_for(&self.url);
        self.guard = Some(mutex.lock_owned().await);
        Ok(())
    }

    async fn unlock(&mut self) -> Result<()> {
        self.guard = None;
        Ok(())
    }

    async fn ensure_migrations_table(&mut self) -> Result<()> {
        sqlx::query(CREATE_MIGRATIONS_TABLE_SQL)
            .execute(self.pool()?)
            .await?;
        Ok(())
    }

    async fn applied_migrations(&mut self) -> Result<Vec<AppliedMigration>> {
        let rows: Vec<(i64, String, String, String)> =
            sqlx::query_as("SELECT id, name, hash, applied_at FROM yeti_migrations ORDER BY id")
                .fetch_all(self.pool()?)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, hash, applied_at)| AppliedMigration {
                id: u32::try_from(id).unwrap_or(0),
                name,
                hash,
                applied_at: parse_applied_at(&applied_at),
            })
            .collect())
    }

    async fn apply(&mut self, migration: &Migration, sql: &str) -> Result<()> {
        let mut tx = self.pool()?.begin().await?;
        sqlx::raw_sql(sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO yeti_migrations (id, name, hash) VALUES (?, ?, ?)")
            .bind(i64::from(migration.id))
            .bind(&migration.name)
            .bind(&migration.hash)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

fn parse_applied_at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            // SQLite datetime('now') format fallback
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .map(|dt| dt.and_utc())
                .unwrap_or_else(|_| Utc::now())
        })
}
