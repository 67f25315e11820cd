//! # yeti-core
//!
//! The front end of the Yeti schema definition language:
//!
//! - A hand-written lexer producing position-tagged tokens (comments and
//!   whitespace are kept as trivia so tooling can reconstruct layout)
//! - A recursive descent parser with error recovery that builds a concrete
//!   syntax tree and collects every syntax problem in one pass
//! - An AST builder that lowers the CST into the typed, location-annotated
//!   tree consumed by SQL generators
//! - A content-assist predictor that reuses the parser itself to compute
//!   the grammatically valid next tokens for a truncated input
//!
//! ## Parsing a document
//!
//! ```rust
//! use yeti_core::parse_document;
//!
//! let source = "namespace app:\n  entity users:\n    id: serial @pk\n";
//! let result = parse_document(source).unwrap();
//!
//! assert_eq!(result.ast[0].name, "app");
//! assert_eq!(result.ast[0].entities[0].fields[0].name, "id");
//! assert!(result.diagnostics.is_empty());
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod symbols;

pub use ast::{
    parse_document, Attribute, AttributeName, Diagnostic, Entity, EnumDef, Field, Namespace,
    ParseResult, Severity,
};
pub use lexer::{Keyword, LexError, Lexer, Position, Span, Token, TokenCategory, TokenKind};
pub use parser::{parse, suggest, ParseError, ParseOutcome, Rule, Suggestions};
pub use symbols::{document_symbols, find_symbol, Symbol, SymbolKind};
