//! Foreign-key reference sub-parser.
//!
//! `@fk` parameters carry a `> entity.column` reference in canonical string
//! form. The generator re-parses them here so a malformed reference fails
//! loudly instead of being interpolated into an ALTER TABLE statement.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::GenerateError;

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s*([^.\s]+)\.([^.\s]+)$").unwrap());

// Two dots means a schema-qualified target, e.g. `> billing.users.id`.
static QUALIFIED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s*[^.\s]+(?:\.[^.\s]+){2,}$").unwrap());

/// A resolved same-namespace foreign-key target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    /// Target entity name.
    pub table: String,
    /// Target column name.
    pub column: String,
}

/// Parses a canonical `> entity.column` reference.
///
/// # Errors
///
/// Returns [`GenerateError::CrossNamespaceReference`] for targets carrying a
/// namespace qualifier, and [`GenerateError::InvalidReference`] for anything
/// else that is not a plain `> entity.column`.
pub fn parse_reference(reference: &str) -> Result<ForeignKeyRef, GenerateError> {
    if QUALIFIED_RE.is_match(reference) {
        return Err(GenerateError::CrossNamespaceReference(
            reference.to_owned(),
        ));
    }
    let captures = REFERENCE_RE
        .captures(reference)
        .ok_or_else(|| GenerateError::InvalidReference(reference.to_owned()))?;
    Ok(ForeignKeyRef {
        table: captures[1].to_owned(),
        column: captures[2].to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reference() {
        let fk = parse_reference("> users.id").unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.column, "id");
    }

    #[test]
    fn test_reference_without_space() {
        let fk = parse_reference(">users.id").unwrap();
        assert_eq!(fk.table, "users");
    }

    #[test]
    fn test_missing_column_is_invalid() {
        let err = parse_reference("> users").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidReference(_)));
    }

    #[test]
    fn test_missing_arrow_is_invalid() {
        let err = parse_reference("users.id").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidReference(_)));
    }

    #[test]
    fn test_cross_namespace_is_rejected() {
        let err = parse_reference("> billing.users.id").unwrap_err();
        assert!(matches!(err, GenerateError::CrossNamespaceReference(_)));
    }
}
