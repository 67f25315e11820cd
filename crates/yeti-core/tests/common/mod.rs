#![allow(dead_code)]

use yeti_core::{parse_document, Entity, Namespace, ParseResult};

pub fn parse(source: &str) -> ParseResult {
    parse_document(source).unwrap_or_else(|e| panic!("Failed to lex: {source}\nError: {e:?}"))
}

pub fn parse_clean(source: &str) -> Vec<Namespace> {
    let result = parse(source);
    assert!(
        result.is_clean(),
        "Expected a clean parse for: {source}\nDiagnostics: {:?}",
        result.diagnostics
    );
    result.ast
}

pub fn parse_dirty(source: &str) -> ParseResult {
    let result = parse(source);
    assert!(
        !result.is_clean(),
        "Expected parse errors for: {source}\nGot a clean parse"
    );
    result
}

pub fn single_entity(source: &str) -> Entity {
    let ast = parse_clean(source);
    assert_eq!(ast.len(), 1, "Expected one namespace");
    assert_eq!(ast[0].entities.len(), 1, "Expected one entity");
    ast[0].entities[0].clone()
}
