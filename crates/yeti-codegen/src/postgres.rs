//! PostgreSQL dialect and templates.

use crate::dialect::SqlDialect;
use crate::generator::SqlGenerator;
use crate::templates::{ForeignKeyParts, TemplateProvider};

/// PostgreSQL naming, typing and constraint rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn serial_type(&self) -> &'static str {
        "SERIAL"
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    fn supports_enums(&self) -> bool {
        true
    }

    fn type_name(&self, ty: &str) -> Option<&'static str> {
        match ty {
            "integer" => Some("INTEGER"),
            "varchar" => Some("VARCHAR(255)"),
            "text" => Some("TEXT"),
            "timestamp" => Some("TIMESTAMP"),
            "boolean" => Some("BOOLEAN"),
            "float" => Some("FLOAT"),
            "decimal" => Some("DECIMAL"),
            "json" => Some("JSONB"),
            _ => None,
        }
    }
}

/// PostgreSQL statement templates. All identifier arguments arrive
/// pre-quoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresTemplates;

impl TemplateProvider for PostgresTemplates {
    fn schema(&self, namespace: &str) -> String {
        format!("CREATE SCHEMA IF NOT EXISTS {namespace};")
    }

    fn enum_type(&self, namespace: &str, name: &str, values: &str) -> String {
        format!("CREATE TYPE {namespace}.{name} AS ENUM ({values});")
    }

    fn table(&self, namespace: &str, name: &str, columns: &str) -> String {
        format!("CREATE TABLE {namespace}.{name} (\n  {columns}\n);")
    }

    fn unique_index(&self, namespace: &str, table: &str, column: &str) -> String {
        format!("CREATE UNIQUE INDEX {column} ON {namespace}.{table} ({column});")
    }

    fn foreign_key(&self, parts: &ForeignKeyParts<'_>) -> String {
        format!(
            "ALTER TABLE {ns}.{table} ADD CONSTRAINT {column} FOREIGN KEY ({column}) \
             REFERENCES {ns}.{target_table} ({target_column}) ON DELETE SET NULL;",
            ns = parts.namespace,
            table = parts.table,
            column = parts.column,
            target_table = parts.target_table,
            target_column = parts.target_column,
        )
    }
}

/// Builds the stock PostgreSQL generator.
#[must_use]
pub const fn postgres() -> SqlGenerator<PostgresDialect, PostgresTemplates> {
    SqlGenerator::new(PostgresDialect, PostgresTemplates)
}
