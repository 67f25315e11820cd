//! Error types for the migration engine.

use std::path::PathBuf;

/// Errors that can occur during a migration run.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Migration file ids do not form a contiguous sequence from 1.
    #[error("missing migration between {after} and {found}")]
    SequenceGap {
        /// The last id before the gap.
        after: u32,
        /// The id actually found.
        found: u32,
    },

    /// Applied migrations are not a contiguous prefix of the file sequence.
    #[error("applied migrations are not contiguous: expected id {expected}, found {found}")]
    NonContiguousApplied {
        /// The id a contiguous prefix would carry at this position.
        expected: u32,
        /// The id actually recorded.
        found: u32,
    },

    /// An applied migration has no matching file on disk.
    #[error("applied migration {id} has no matching file on disk")]
    MissingAppliedFile {
        /// The applied id without a file.
        id: u32,
    },

    /// An applied migration's file changed after it was applied.
    #[error("hash mismatch for migration {id}: recorded {recorded}, found {actual}")]
    HashMismatch {
        /// The tampered migration's id.
        id: u32,
        /// The hash recorded when the migration was applied.
        recorded: String,
        /// The current on-disk hash.
        actual: String,
    },

    /// A script migration has no registered SQL generator.
    #[error("no SQL generator registered for script migration {id} ({path})")]
    ScriptMissing {
        /// The script migration's id.
        id: u32,
        /// The script file path.
        path: PathBuf,
    },

    /// A script migration's generator failed.
    #[error("script migration {id} failed to produce SQL: {message}")]
    ScriptFailed {
        /// The script migration's id.
        id: u32,
        /// What went wrong.
        message: String,
    },

    /// An adapter method was called before `connect`.
    #[error("database not connected; call connect() first")]
    NotConnected,

    /// Database error while applying or recording migrations.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error while reading the migrations directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
