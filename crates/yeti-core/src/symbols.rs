//! Symbol table queries for editor hosts.
//!
//! Hover, go-to-definition and rename need a flat list of named things with
//! locations. These are read-only walks over an already-built AST; nothing
//! here depends on the editor side.

use crate::ast::Namespace;
use crate::lexer::Span;

/// What a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A namespace.
    Namespace,
    /// An entity (table).
    Entity,
    /// A field (column).
    Field,
    /// An enum type.
    Enum,
    /// One enum value.
    EnumValue,
}

/// A named declaration with its location and container path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The declared name.
    pub name: String,
    /// What kind of declaration it is.
    pub kind: SymbolKind,
    /// Dotted path of the containers, e.g. `app.users` for a field of the
    /// `users` entity in namespace `app`. Empty for namespaces.
    pub container: String,
    /// Location of the declaring block or line.
    pub span: Span,
}

/// Collects every symbol declared in the document, in declaration order.
#[must_use]
pub fn document_symbols(ast: &[Namespace]) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    for ns in ast {
        symbols.push(Symbol {
            name: ns.name.clone(),
            kind: SymbolKind::Namespace,
            container: String::new(),
            span: ns.span,
        });
        for entity in &ns.entities {
            symbols.push(Symbol {
                name: entity.name.clone(),
                kind: SymbolKind::Entity,
                container: ns.name.clone(),
                span: entity.span,
            });
            for field in &entity.fields {
                symbols.push(Symbol {
                    name: field.name.clone(),
                    kind: SymbolKind::Field,
                    container: format!("{}.{}", ns.name, entity.name),
                    span: field.span,
                });
            }
        }
        for en in &ns.enums {
            symbols.push(Symbol {
                name: en.name.clone(),
                kind: SymbolKind::Enum,
                container: ns.name.clone(),
                span: en.span,
            });
        }
    }
    symbols
}

/// Finds the innermost symbol whose span contains the byte offset.
#[must_use]
pub fn find_symbol(ast: &[Namespace], offset: usize) -> Option<Symbol> {
    document_symbols(ast)
        .into_iter()
        .filter(|s| s.span.start.offset <= offset && offset < s.span.end.offset)
        .min_by_key(|s| s.span.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_document;

    const SOURCE: &str = "namespace app:\n  entity users:\n    id: serial @pk\n  enum role:\n    admin member\n";

    #[test]
    fn test_document_symbols() {
        let result = parse_document(SOURCE).unwrap();
        let symbols = document_symbols(&result.ast);
        let names: Vec<(&str, SymbolKind)> = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("app", SymbolKind::Namespace),
                ("users", SymbolKind::Entity),
                ("id", SymbolKind::Field),
                ("role", SymbolKind::Enum),
            ]
        );
        assert_eq!(symbols[2].container, "app.users");
    }

    #[test]
    fn test_find_symbol_innermost() {
        let result = parse_document(SOURCE).unwrap();
        let offset = SOURCE.find("id:").unwrap();
        let symbol = find_symbol(&result.ast, offset).unwrap();
        assert_eq!(symbol.name, "id");
        assert_eq!(symbol.kind, SymbolKind::Field);
    }

    #[test]
    fn test_find_symbol_outside_any_span() {
        let result = parse_document("namespace app:\n").unwrap();
        assert!(find_symbol(&result.ast, 10_000).is_none());
    }
}
