//! Error types for SQL generation.

/// Errors that can occur while generating DDL.
///
/// The generator fails rather than emit broken SQL: a malformed or
/// unsupported reference aborts generation of the whole document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// A foreign-key reference that does not match `> entity.column`.
    #[error("invalid foreign key reference: {0}")]
    InvalidReference(String),

    /// A foreign-key reference that targets another namespace.
    #[error("cross-namespace foreign key reference is not supported: {0}")]
    CrossNamespaceReference(String),
}
