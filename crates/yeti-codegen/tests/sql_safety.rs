//! Quoting and escaping: hostile identifiers and values must never break
//! out of their literal or identifier position.

use yeti_codegen::{postgres, PostgresDialect, PostgresTemplates, SqlDialect, SqlGenerator, TemplateProvider};
use yeti_core::parse_document;

fn generate(source: &str) -> String {
    let result = parse_document(source).unwrap();
    assert!(result.is_clean(), "parse errors: {:?}", result.diagnostics);
    postgres().generate(&result.ast).unwrap()
}

#[test]
fn string_default_with_injection_attempt_stays_one_literal() {
    let sql = generate(
        "namespace app:\n  entity users:\n    bio: varchar @default(\"'; DROP TABLE users; --\")\n",
    );
    assert!(sql.contains("DEFAULT '''; DROP TABLE users; --'"));
    // The payload never appears unquoted.
    assert!(!sql.contains("DEFAULT '; DROP"));
}

#[test]
fn enum_values_with_quotes_are_escaped() {
    // Values with embedded quotes cannot be written in source, but a
    // generator consumer may build the AST directly.
    let namespace = yeti_core::Namespace {
        name: "app".into(),
        entities: vec![],
        enums: vec![yeti_core::EnumDef {
            name: "mood".into(),
            values: vec!["don't-care".into(), "fine".into()],
            span: yeti_core::Span::default(),
        }],
        span: yeti_core::Span::default(),
    };
    let sql = postgres().generate(&[namespace]).unwrap();
    assert!(sql.contains("'don''t-care', 'fine'"));
}

#[test]
fn string_defaults_with_embedded_quotes_are_doubled() {
    let sql =
        generate("namespace app:\n  entity t:\n    q: varchar @default(\"it's fine\")\n");
    assert!(sql.contains("DEFAULT 'it''s fine'"));
}

#[test]
fn quote_identifier_round_trip() {
    let quoted = PostgresDialect.quote_identifier("my\"col");
    // Doubled quote inside, wrapping quotes outside.
    assert_eq!(quoted, r#""my""col""#);
}

/// A dialect that inlines nothing for `@unique`, forcing the standalone
/// unique-index path, and has no native enum types.
#[derive(Clone, Copy)]
struct BareDialect;

impl SqlDialect for BareDialect {
    fn name(&self) -> &'static str {
        "Bare"
    }

    fn serial_type(&self) -> &'static str {
        "INTEGER"
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    fn supports_enums(&self) -> bool {
        false
    }

    fn type_name(&self, ty: &str) -> Option<&'static str> {
        PostgresDialect.type_name(ty)
    }

    fn constraint(
        &self,
        attr: &yeti_core::Attribute,
        field_type: &str,
    ) -> Option<String> {
        if attr.name == yeti_core::AttributeName::Unique {
            None
        } else {
            PostgresDialect.constraint(attr, field_type)
        }
    }
}

#[test]
fn non_inlining_dialect_gets_standalone_unique_indexes() {
    let result = parse_document(
        "namespace app:\n  enum state:\n    on off\n  entity t:\n    email: varchar @unique\n    mode: state\n",
    )
    .unwrap();
    let sql = SqlGenerator::new(BareDialect, PostgresTemplates)
        .generate(&result.ast)
        .unwrap();

    assert!(sql.contains("CREATE UNIQUE INDEX \"email\" ON \"app\".\"t\" (\"email\");"));
    assert!(!sql.contains("UNIQUE\n"));
    // No native enums: the column falls back and no CREATE TYPE is emitted.
    assert!(sql.contains("\"mode\" VARCHAR(255)"));
    assert!(!sql.contains("CREATE TYPE"));
}

#[test]
fn templates_receive_pre_quoted_parts() {
    let rendered = PostgresTemplates.unique_index("\"ns\"", "\"t\"", "\"c\"");
    assert_eq!(rendered, "CREATE UNIQUE INDEX \"c\" ON \"ns\".\"t\" (\"c\");");
}
