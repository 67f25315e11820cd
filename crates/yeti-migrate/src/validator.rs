//! Migration set validation.
//!
//! Three checks run in a fixed order so the first failure is deterministic:
//! file sequence, applied contiguity, then hashes. All run before any SQL
//! reaches the database.

use crate::adapter::AppliedMigration;
use crate::error::{MigrateError, Result};
use crate::loader::Migration;

/// Validates the on-disk file set against the applied records.
///
/// # Errors
///
/// Returns the first violated invariant: [`MigrateError::SequenceGap`],
/// [`MigrateError::NonContiguousApplied`],
/// [`MigrateError::MissingAppliedFile`] or [`MigrateError::HashMismatch`].
pub fn validate(files: &[Migration], applied: &[AppliedMigration]) -> Result<()> {
    validate_sequence(files)?;
    validate_applied_contiguous(applied)?;
    validate_hashes(files, applied)
}

/// File ids must form a contiguous sequence starting at 1.
fn validate_sequence(files: &[Migration]) -> Result<()> {
    for (index, migration) in files.iter().enumerate() {
        let expected = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        if migration.id != expected {
            return Err(MigrateError::SequenceGap {
                after: expected - 1,
                found: migration.id,
            });
        }
    }
    Ok(())
}

/// Applied ids must be a contiguous prefix: 1, 2, ... with nothing skipped.
fn validate_applied_contiguous(applied: &[AppliedMigration]) -> Result<()> {
    for (index, record) in applied.iter().enumerate() {
        let expected = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        if record.id != expected {
            return Err(MigrateError::NonContiguousApplied {
                expected,
                found: record.id,
            });
        }
    }
    Ok(())
}

/// Every applied record's hash must still match its on-disk file.
fn validate_hashes(files: &[Migration], applied: &[AppliedMigration]) -> Result<()> {
    for record in applied {
        let file = files
            .iter()
            .find(|f| f.id == record.id)
            .ok_or(MigrateError::MissingAppliedFile { id: record.id })?;
        if file.hash != record.hash {
            return Err(MigrateError::HashMismatch {
                id: record.id,
                recorded: record.hash.clone(),
                actual: file.hash.clone(),
            });
        }
    }
    Ok(())
}
