//! The migration run orchestrator.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::adapter::{AppliedMigration, MigrationAdapter};
use crate::error::{MigrateError, Result};
use crate::loader::{self, Migration, MigrationKind};
use crate::validator;

/// Produces SQL for one script migration.
pub type ScriptFn = Box<dyn Fn() -> std::result::Result<String, String> + Send + Sync>;

/// A successful run: what was newly applied and what remains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Migrations applied by this run, in order.
    pub newly_applied: Vec<Migration>,
    /// Migrations still pending after the run. Empty on success.
    pub remaining: Vec<Migration>,
}

/// The applied and pending sets of one target, without applying anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Bookkeeping rows ordered by id.
    pub applied: Vec<AppliedMigration>,
    /// Files beyond the applied count, in order.
    pub pending: Vec<Migration>,
}

/// A failed run, carrying partial progress: migrations committed before the
/// failure stay committed.
#[derive(Debug)]
pub struct MigrationFailure {
    /// Migrations this run applied before failing.
    pub applied: Vec<Migration>,
    /// What stopped the run.
    pub error: MigrateError,
}

impl core::fmt::Display for MigrationFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "migration run failed after {} applied: {}",
            self.applied.len(),
            self.error
        )
    }
}

impl std::error::Error for MigrationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Orchestrates migration runs over one storage adapter.
///
/// Script migrations (`.js` files) carry no SQL themselves; their SQL comes
/// from a generator registered under the migration id with
/// [`MigrationSystem::register_script`]. The file content still participates
/// in hashing, so editing a script invalidates it like any other migration.
pub struct MigrationSystem<A> {
    adapter: A,
    scripts: HashMap<u32, ScriptFn>,
}

impl<A: MigrationAdapter> MigrationSystem<A> {
    /// Creates a system over an adapter.
    #[must_use]
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            scripts: HashMap::new(),
        }
    }

    /// Registers the SQL generator for the script migration with this id.
    pub fn register_script<F>(&mut self, id: u32, generator: F)
    where
        F: Fn() -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        self.scripts.insert(id, Box::new(generator));
    }

    /// Runs one migration pass over a directory.
    ///
    /// Connects, locks, validates, applies each pending migration in its own
    /// transaction, then unlocks and disconnects. Cleanup runs on every exit
    /// path and its errors are logged, never allowed to mask the run's
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`MigrationFailure`] carrying the migrations that were
    /// committed before the failure; migration N+1 is never attempted after
    /// N fails.
    pub async fn migrate(
        &mut self,
        dir: &Path,
    ) -> std::result::Result<MigrationReport, MigrationFailure> {
        if let Err(error) = self.adapter.connect().await {
            return Err(MigrationFailure {
                applied: Vec::new(),
                error,
            });
        }

        let outcome = self.migrate_locked(dir).await;

        if let Err(error) = self.adapter.disconnect().await {
            warn!(error = %error, "disconnect failed after migration run");
        }
        outcome
    }

    /// Returns the applied and pending sets without applying anything.
    ///
    /// # Errors
    ///
    /// Returns a [`MigrateError`] if the directory or database cannot be
    /// read, or if the set fails validation.
    pub async fn status(&mut self, dir: &Path) -> Result<MigrationStatus> {
        self.adapter.connect().await?;
        let outcome = self.status_inner(dir).await;
        if let Err(error) = self.adapter.disconnect().await {
            warn!(error = %error, "disconnect failed after status check");
        }
        outcome
    }

    /// Validates the file set against the applied records without applying.
    ///
    /// # Errors
    ///
    /// Returns the first violated integrity invariant.
    pub async fn check(&mut self, dir: &Path) -> Result<()> {
        self.status(dir).await.map(|_| ())
    }

    async fn status_inner(&mut self, dir: &Path) -> Result<MigrationStatus> {
        self.adapter.ensure_migrations_table().await?;
        let files = loader::load_migrations(dir)?;
        let applied = self.adapter.applied_migrations().await?;
        validator::validate(&files, &applied)?;
        let pending = files[applied.len()..].to_vec();
        Ok(MigrationStatus { applied, pending })
    }

    async fn migrate_locked(
        &mut self,
        dir: &Path,
    ) -> std::result::Result<MigrationReport, MigrationFailure> {
        if let Err(error) = self.adapter.lock().await {
            return Err(MigrationFailure {
                applied: Vec::new(),
                error,
            });
        }

        let mut applied_now = Vec::new();
        let result = self.apply_pending(dir, &mut applied_now).await;

        if let Err(error) = self.adapter.unlock().await {
            warn!(error = %error, "failed to release migration lock");
        }

        match result {
            Ok(()) => Ok(MigrationReport {
                newly_applied: applied_now,
                remaining: Vec::new(),
            }),
            Err(error) => Err(MigrationFailure {
                applied: applied_now,
                error,
            }),
        }
    }

    async fn apply_pending(&mut self, dir: &Path, applied_now: &mut Vec<Migration>) -> Result<()> {
        self.adapter.ensure_migrations_table().await?;

        let files = loader::load_migrations(dir)?;
        let applied = self.adapter.applied_migrations().await?;
        validator::validate(&files, &applied)?;

        // The contiguous-prefix invariant makes "pending" a simple suffix.
        for migration in &files[applied.len()..] {
            let sql = self.resolve_sql(migration)?;
            self.adapter.apply(migration, &sql).await?;
            info!(id = migration.id, name = %migration.name, "applied migration");
            applied_now.push(migration.clone());
        }
        Ok(())
    }

    fn resolve_sql(&self, migration: &Migration) -> Result<String> {
        match migration.kind {
            MigrationKind::Sql => Ok(migration.content.clone()),
            MigrationKind::Script => {
                let generator =
                    self.scripts
                        .get(&migration.id)
                        .ok_or_else(|| MigrateError::ScriptMissing {
                            id: migration.id,
                            path: migration.path.clone(),
                        })?;
                generator().map_err(|message| MigrateError::ScriptFailed {
                    id: migration.id,
                    message,
                })
            }
        }
    }
}
