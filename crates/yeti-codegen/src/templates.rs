//! DDL statement templates.
//!
//! Templates are pure string formatting over pre-quoted identifier parts;
//! all quoting happens in the dialect before a template sees a name.

/// Pre-quoted identifier parts of one foreign-key statement.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKeyParts<'a> {
    /// The schema the constraint lives in.
    pub namespace: &'a str,
    /// The referencing table.
    pub table: &'a str,
    /// The referencing column, also used as the constraint name.
    pub column: &'a str,
    /// The referenced table.
    pub target_table: &'a str,
    /// The referenced column.
    pub target_column: &'a str,
}

/// The statement templates of one target SQL engine.
pub trait TemplateProvider {
    /// Schema/namespace creation.
    fn schema(&self, namespace: &str) -> String;

    /// Native enum type creation. `values` is a pre-escaped, comma-joined
    /// literal list.
    fn enum_type(&self, namespace: &str, name: &str, values: &str) -> String;

    /// Table creation. `columns` is the pre-rendered column block.
    fn table(&self, namespace: &str, name: &str, columns: &str) -> String;

    /// Standalone unique index, used only by dialects whose constraint hook
    /// does not inline uniqueness.
    fn unique_index(&self, namespace: &str, table: &str, column: &str) -> String;

    /// Foreign-key ALTER TABLE statement.
    fn foreign_key(&self, parts: &ForeignKeyParts<'_>) -> String;
}
