//! The storage adapter contract.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::loader::Migration;

/// A row of the bookkeeping table: one applied migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// The migration id.
    pub id: u32,
    /// Display name recorded at apply time.
    pub name: String,
    /// Hash of the file as it was applied.
    pub hash: String,
    /// When the migration was applied.
    pub applied_at: DateTime<Utc>,
}

/// Storage backend contract for the migration engine.
///
/// The engine never inspects an adapter's internals; SQLite and future
/// backends differ only in how they implement these methods. `lock` must
/// provide mutual exclusion for one target database so two concurrent runs
/// cannot race over the same file set; the engine guarantees the matching
/// `unlock` runs on every exit path.
#[allow(async_fn_in_trait)]
pub trait MigrationAdapter {
    /// Opens the connection.
    async fn connect(&mut self) -> Result<()>;

    /// Closes the connection. Called on every exit path.
    async fn disconnect(&mut self) -> Result<()>;

    /// Acquires the exclusive run-level lock.
    async fn lock(&mut self) -> Result<()>;

    /// Releases the run-level lock. Called on every exit path after `lock`
    /// succeeded.
    async fn unlock(&mut self) -> Result<()>;

    /// Creates the bookkeeping table if it does not exist.
    async fn ensure_migrations_table(&mut self) -> Result<()>;

    /// Returns the applied migrations ordered by id.
    async fn applied_migrations(&mut self) -> Result<Vec<AppliedMigration>>;

    /// Applies one migration's SQL and records it, atomically.
    async fn apply(&mut self, migration: &Migration, sql: &str) -> Result<()>;
}
