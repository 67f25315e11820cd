//! # yeti-migrate
//!
//! Ordered, hash-verified database migrations.
//!
//! A migrations directory holds files named `<id>-<name>.sql` (or `.js` for
//! script-backed migrations). Ids must form a contiguous sequence starting
//! at 1; every applied file's SHA-256 hash is recorded and re-checked on
//! each run so post-apply edits are caught, not silently compounded.
//!
//! One run is: connect, take the adapter's exclusive lock, ensure the
//! bookkeeping table, load and validate the file set, then apply each
//! pending migration in its own transaction. Per-file transactions are
//! deliberate: DDL cannot be rolled back in several backends, so one big
//! transaction would leave a half-applied batch unrecoverable. The lock is
//! released and the connection closed on every exit path, and neither
//! cleanup error may mask an earlier failure.
//!
//! Storage backends implement [`MigrationAdapter`]; [`SqliteAdapter`] is the
//! stock implementation.

pub mod adapter;
pub mod error;
pub mod loader;
pub mod sqlite;
pub mod system;
pub mod validator;

pub use adapter::{AppliedMigration, MigrationAdapter};
pub use error::{MigrateError, Result};
pub use loader::{load_migrations, Migration, MigrationKind};
pub use sqlite::SqliteAdapter;
pub use system::{MigrationFailure, MigrationReport, MigrationStatus, MigrationSystem};
pub use validator::validate;
