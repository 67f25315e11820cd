//! Migration file discovery.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::Result;

// `<digits><-|_><name>.<sql|js>` — anything else is skipped, not an error.
static FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[-_](.+)\.(sql|js)$").unwrap());

/// How a migration's SQL is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationKind {
    /// The file content is the SQL.
    Sql,
    /// The SQL comes from a registered generator callback.
    Script,
}

/// One numbered, hashed unit of schema change.
///
/// Identity is the pair (id, hash): the id establishes ordering, the hash
/// detects tampering. Values are never mutated; a changed file produces a
/// new `Migration` whose hash differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Ordering id parsed from the file name.
    pub id: u32,
    /// Display name: the file name minus id prefix and extension.
    pub name: String,
    /// Raw file content decoded as UTF-8.
    pub content: String,
    /// SHA-256 of the raw bytes, hex-encoded. Hashing the bytes rather than
    /// the decoded text keeps the hash stable across encoding quirks.
    pub hash: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SQL file or script.
    pub kind: MigrationKind,
}

/// Scans a directory for migration files, sorted ascending by id.
///
/// Files not matching the naming pattern are silently excluded; that is the
/// filter, not a validation failure.
///
/// # Errors
///
/// Returns an IO error if the directory or a matching file cannot be read.
pub fn load_migrations(dir: &Path) -> Result<Vec<Migration>> {
    let mut migrations = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(captures) = FILE_RE.captures(name) else {
            continue;
        };
        let Ok(id) = captures[1].parse::<u32>() else {
            continue;
        };

        let kind = if name.ends_with(".js") {
            MigrationKind::Script
        } else {
            MigrationKind::Sql
        };

        let path = entry.path();
        let bytes = std::fs::read(&path)?;
        migrations.push(Migration {
            id,
            name: captures[2].to_owned(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
            hash: hex::encode(Sha256::digest(&bytes)),
            path,
            kind,
        });
    }

    migrations.sort_by_key(|m| m.id);
    Ok(migrations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_loads_and_sorts_by_id() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2-add-email.sql", "ALTER TABLE users ADD email;");
        write(dir.path(), "10_later.sql", "SELECT 10;");
        write(dir.path(), "1-init.sql", "CREATE TABLE users (id INTEGER);");

        let migrations = load_migrations(dir.path()).unwrap();
        let ids: Vec<u32> = migrations.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 10]);
    }

    #[test]
    fn test_display_name_strips_prefix_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1-create-users.sql", "x");
        write(dir.path(), "2_add_posts.js", "y");

        let migrations = load_migrations(dir.path()).unwrap();
        assert_eq!(migrations[0].name, "create-users");
        assert_eq!(migrations[1].name, "add_posts");
    }

    #[test]
    fn test_non_matching_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1-good.sql", "x");
        write(dir.path(), "README.md", "docs");
        write(dir.path(), "notes.sql", "no id");
        write(dir.path(), "3.sql", "no separator");
        write(dir.path(), "2-good.txt", "wrong extension");

        let migrations = load_migrations(dir.path()).unwrap();
        assert_eq!(migrations.len(), 1);
        assert_eq!(migrations[0].id, 1);
    }

    #[test]
    fn test_kind_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1-static.sql", "x");
        write(dir.path(), "2-dynamic.js", "y");

        let migrations = load_migrations(dir.path()).unwrap();
        assert_eq!(migrations[0].kind, MigrationKind::Sql);
        assert_eq!(migrations[1].kind, MigrationKind::Script);
    }

    #[test]
    fn test_hash_is_over_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1-init.sql", "CREATE TABLE t (id INTEGER);");

        let migrations = load_migrations(dir.path()).unwrap();
        let expected = hex::encode(Sha256::digest(b"CREATE TABLE t (id INTEGER);"));
        assert_eq!(migrations[0].hash, expected);
    }

    #[test]
    fn test_changed_content_changes_hash() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1-init.sql", "one");
        let before = load_migrations(dir.path()).unwrap()[0].hash.clone();

        write(dir.path(), "1-init.sql", "two");
        let after = load_migrations(dir.path()).unwrap()[0].hash.clone();
        assert_ne!(before, after);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_migrations(&missing).is_err());
    }
}
