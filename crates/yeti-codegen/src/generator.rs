//! The dialect-agnostic generation algorithm.

use std::collections::HashSet;

use yeti_core::{Attribute, AttributeName, Entity, EnumDef, Field, Namespace};

use crate::dialect::SqlDialect;
use crate::error::GenerateError;
use crate::fk;
use crate::templates::{ForeignKeyParts, TemplateProvider};

/// Per-namespace state threaded through generation.
struct NamespaceContext<'a> {
    name: &'a str,
    enums: HashSet<&'a str>,
}

impl<'a> NamespaceContext<'a> {
    fn new(namespace: &'a Namespace) -> Self {
        Self {
            name: &namespace.name,
            enums: namespace.enums.iter().map(|e| e.name.as_str()).collect(),
        }
    }
}

/// Renders a document to DDL through one dialect/template pair.
///
/// Statement order within a namespace is fixed: schema creation, enum types,
/// tables, then every foreign key in a trailing pass. The trailing pass is
/// what lets entities reference each other circularly.
pub struct SqlGenerator<D, T> {
    dialect: D,
    templates: T,
}

impl<D: SqlDialect, T: TemplateProvider> SqlGenerator<D, T> {
    /// Creates a generator over a dialect/template pair.
    #[must_use]
    pub const fn new(dialect: D, templates: T) -> Self {
        Self { dialect, templates }
    }

    /// Generates the DDL for a whole document, namespaces in order.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] on a malformed or cross-namespace
    /// foreign-key reference; no partial SQL is returned.
    pub fn generate(&self, ast: &[Namespace]) -> Result<String, GenerateError> {
        let mut parts = Vec::new();
        for namespace in ast {
            self.namespace_sql(namespace, &mut parts)?;
        }
        Ok(parts.join("\n"))
    }

    fn namespace_sql(
        &self,
        namespace: &Namespace,
        parts: &mut Vec<String>,
    ) -> Result<(), GenerateError> {
        let ctx = NamespaceContext::new(namespace);
        let q_ns = self.dialect.quote_identifier(ctx.name);

        parts.push(self.templates.schema(&q_ns));
        parts.push(String::new());

        if self.dialect.supports_enums() {
            for en in &namespace.enums {
                parts.push(self.enum_sql(&ctx, en));
                parts.push(String::new());
            }
        }

        for entity in &namespace.entities {
            parts.push(self.table_sql(&ctx, entity));
            parts.push(String::new());
            let indexes = self.unique_indexes(&ctx, entity);
            if !indexes.is_empty() {
                parts.extend(indexes);
                parts.push(String::new());
            }
        }

        for entity in &namespace.entities {
            let foreign_keys = self.foreign_keys(&ctx, entity)?;
            if !foreign_keys.is_empty() {
                parts.extend(foreign_keys);
                parts.push(String::new());
            }
        }

        Ok(())
    }

    fn enum_sql(&self, ctx: &NamespaceContext<'_>, en: &EnumDef) -> String {
        let values: Vec<String> = en
            .values
            .iter()
            .map(|v| format!("'{}'", self.dialect.escape_string(v)))
            .collect();
        self.templates.enum_type(
            &self.dialect.quote_identifier(ctx.name),
            &self.dialect.quote_identifier(&en.name),
            &values.join(", "),
        )
    }

    fn table_sql(&self, ctx: &NamespaceContext<'_>, entity: &Entity) -> String {
        let columns: Vec<String> = entity
            .fields
            .iter()
            .map(|field| self.column_definition(ctx, field))
            .collect();
        self.templates.table(
            &self.dialect.quote_identifier(ctx.name),
            &self.dialect.quote_identifier(&entity.name),
            &columns.join(",\n  "),
        )
    }

    fn column_definition(&self, ctx: &NamespaceContext<'_>, field: &Field) -> String {
        let mut parts = vec![
            self.dialect.quote_identifier(&field.name),
            self.resolve_type(ctx, &field.ty),
        ];
        // Attributes arrive pre-sorted by priority, so clause order is
        // deterministic regardless of source order.
        for attr in &field.attributes {
            if let Some(clause) = self.dialect.constraint(attr, &field.ty) {
                parts.push(clause);
            }
        }
        parts.join(" ")
    }

    /// Standalone unique indexes for attributes the dialect did not inline.
    fn unique_indexes(&self, ctx: &NamespaceContext<'_>, entity: &Entity) -> Vec<String> {
        let mut indexes = Vec::new();
        for field in &entity.fields {
            for attr in &field.attributes {
                if attr.name == AttributeName::Unique
                    && self.dialect.constraint(attr, &field.ty).is_none()
                {
                    indexes.push(self.templates.unique_index(
                        &self.dialect.quote_identifier(ctx.name),
                        &self.dialect.quote_identifier(&entity.name),
                        &self.dialect.quote_identifier(&field.name),
                    ));
                }
            }
        }
        indexes
    }

    fn foreign_keys(
        &self,
        ctx: &NamespaceContext<'_>,
        entity: &Entity,
    ) -> Result<Vec<String>, GenerateError> {
        let mut statements = Vec::new();
        for field in &entity.fields {
            for attr in &field.attributes {
                if let Some(reference) = fk_reference(attr) {
                    let target = fk::parse_reference(reference)?;
                    statements.push(self.templates.foreign_key(&ForeignKeyParts {
                        namespace: &self.dialect.quote_identifier(ctx.name),
                        table: &self.dialect.quote_identifier(&entity.name),
                        column: &self.dialect.quote_identifier(&field.name),
                        target_table: &self.dialect.quote_identifier(&target.table),
                        target_column: &self.dialect.quote_identifier(&target.column),
                    }));
                }
            }
        }
        Ok(statements)
    }

    fn resolve_type(&self, ctx: &NamespaceContext<'_>, ty: &str) -> String {
        if ty.eq_ignore_ascii_case("serial") {
            return self.dialect.serial_type().to_owned();
        }
        if ctx.enums.contains(ty) {
            return if self.dialect.supports_enums() {
                format!(
                    "{}.{}",
                    self.dialect.quote_identifier(ctx.name),
                    self.dialect.quote_identifier(ty)
                )
            } else {
                self.dialect.enum_fallback().to_owned()
            };
        }
        self.dialect
            .type_name(&ty.to_lowercase())
            .map_or_else(|| ty.to_uppercase(), str::to_owned)
    }
}

/// Returns the reference string of a populated `@fk`, or `None` for other
/// attributes and for `@fk` written without a target.
fn fk_reference(attr: &Attribute) -> Option<&str> {
    if attr.name == AttributeName::ForeignKey {
        attr.first_param()
    } else {
        None
    }
}
