//! End-to-end generation: schema source in, DDL text out.

use yeti_codegen::{postgres, GenerateError};
use yeti_core::parse_document;

fn generate(source: &str) -> String {
    let result = parse_document(source).unwrap_or_else(|e| panic!("lex error: {e:?}"));
    assert!(
        result.is_clean(),
        "parse errors: {:?}",
        result.diagnostics
    );
    postgres()
        .generate(&result.ast)
        .unwrap_or_else(|e| panic!("generation failed: {e:?}"))
}

fn generate_err(source: &str) -> GenerateError {
    let result = parse_document(source).unwrap();
    postgres()
        .generate(&result.ast)
        .expect_err("expected generation to fail")
}

#[test]
fn users_table_with_inline_constraints() {
    let sql = generate("namespace app:\n  entity users:\n    id: serial @pk\n    email: varchar @unique\n");

    let schema_pos = sql.find("CREATE SCHEMA IF NOT EXISTS \"app\";").unwrap();
    let table_pos = sql.find("CREATE TABLE \"app\".\"users\"").unwrap();
    assert!(schema_pos < table_pos);

    assert!(sql.contains("\"id\" SERIAL PRIMARY KEY"));
    assert!(sql.contains("\"email\" VARCHAR(255) UNIQUE"));
    assert!(!sql.contains("CREATE UNIQUE INDEX"));
}

#[test]
fn mutual_foreign_keys_generate() {
    let source = concat!(
        "namespace app:\n",
        "  entity users:\n",
        "    id: serial @pk\n",
        "    last_post: integer @fk(> posts.id)\n",
        "  entity posts:\n",
        "    id: serial @pk\n",
        "    author: integer @fk(> users.id)\n",
    );
    let sql = generate(source);

    // Both tables exist before either FK statement.
    let users_table = sql.find("CREATE TABLE \"app\".\"users\"").unwrap();
    let posts_table = sql.find("CREATE TABLE \"app\".\"posts\"").unwrap();
    let first_fk = sql.find("ALTER TABLE").unwrap();
    assert!(users_table < first_fk);
    assert!(posts_table < first_fk);

    assert!(sql.contains(
        "ALTER TABLE \"app\".\"users\" ADD CONSTRAINT \"last_post\" FOREIGN KEY (\"last_post\") \
         REFERENCES \"app\".\"posts\" (\"id\") ON DELETE SET NULL;"
    ));
    assert!(sql.contains(
        "ALTER TABLE \"app\".\"posts\" ADD CONSTRAINT \"author\" FOREIGN KEY (\"author\") \
         REFERENCES \"app\".\"users\" (\"id\") ON DELETE SET NULL;"
    ));
}

#[test]
fn enums_become_types_before_tables() {
    let source = concat!(
        "namespace shop:\n",
        "  enum status:\n",
        "    open closed\n",
        "  entity orders:\n",
        "    id: serial @pk\n",
        "    state: status\n",
    );
    let sql = generate(source);

    let type_pos = sql
        .find("CREATE TYPE \"shop\".\"status\" AS ENUM ('open', 'closed');")
        .unwrap();
    let table_pos = sql.find("CREATE TABLE \"shop\".\"orders\"").unwrap();
    assert!(type_pos < table_pos);

    // The enum-typed column references the schema-qualified type.
    assert!(sql.contains("\"state\" \"shop\".\"status\""));
}

#[test]
fn attribute_order_in_ddl_is_fixed() {
    let sql = generate("namespace app:\n  entity t:\n    c: integer @default(\"7\") @unique @pk\n");
    assert!(sql.contains("\"c\" INTEGER PRIMARY KEY UNIQUE DEFAULT 7"));
}

#[test]
fn default_values_are_classified() {
    let source = concat!(
        "namespace app:\n",
        "  entity t:\n",
        "    a: integer @default(\"42\")\n",
        "    b: boolean @default(true)\n",
        "    c: timestamp @default(now())\n",
        "    d: varchar @default(\"draft\")\n",
    );
    let sql = generate(source);
    assert!(sql.contains("\"a\" INTEGER DEFAULT 42"));
    assert!(sql.contains("\"b\" BOOLEAN DEFAULT true"));
    assert!(sql.contains("\"c\" TIMESTAMP DEFAULT CURRENT_TIMESTAMP"));
    assert!(sql.contains("\"d\" VARCHAR(255) DEFAULT 'draft'"));
}

#[test]
fn unmapped_types_pass_through_upper_cased() {
    let sql = generate("namespace app:\n  entity t:\n    loc: point\n");
    assert!(sql.contains("\"loc\" POINT"));
}

#[test]
fn json_maps_to_jsonb() {
    let sql = generate("namespace app:\n  entity t:\n    meta: json\n");
    assert!(sql.contains("\"meta\" JSONB"));
}

#[test]
fn empty_entity_still_creates_a_table() {
    let sql = generate("namespace app:\n  entity placeholder:\n");
    assert!(sql.contains("CREATE TABLE \"app\".\"placeholder\""));
}

#[test]
fn multiple_namespaces_generate_in_order() {
    let sql = generate("namespace first:\n  entity a:\nnamespace second:\n  entity b:\n");
    let first = sql.find("CREATE SCHEMA IF NOT EXISTS \"first\";").unwrap();
    let second = sql.find("CREATE SCHEMA IF NOT EXISTS \"second\";").unwrap();
    assert!(first < second);
}

#[test]
fn malformed_fk_reference_fails_generation() {
    let err = generate_err("namespace app:\n  entity t:\n    r: integer @fk(\"users id\")\n");
    assert!(matches!(err, GenerateError::InvalidReference(_)));
}

#[test]
fn cross_namespace_fk_fails_generation() {
    let err = generate_err("namespace app:\n  entity t:\n    r: integer @fk(\"> billing.users.id\")\n");
    assert!(matches!(err, GenerateError::CrossNamespaceReference(_)));
}

#[test]
fn fk_without_target_emits_no_statement() {
    let sql = generate("namespace app:\n  entity t:\n    r: integer @fk\n");
    assert!(!sql.contains("ALTER TABLE"));
}
