//! Grammar-based parser for the Yeti schema language.
//!
//! Grammar (informal EBNF):
//!
//! ```text
//! document    := namespace*
//! namespace   := "namespace" ident ":" (entity | enum)*
//! entity      := "entity" ident ":" field*
//! field       := ident ":" ident attribute*
//! attribute   := "@" ident ( "(" param ("," param)* ")" )?
//! enum        := "enum" ident ":" ident*
//! param       := string | bool | ">" ident "." ident
//!              | ident ( "(" param ("," param)* ")" )?
//!              | ident "://" ident ("." ident)?
//! ```
//!
//! Parsing is recovering: a malformed field records an error and the parser
//! resynchronizes at the next declaration boundary, so one bad line never
//! hides the rest of the document.

pub mod assist;
pub mod cst;
mod error;
#[allow(clippy::module_inception)]
mod parser;

pub use assist::{suggest, suggest_tokens, Suggestions};
pub use error::ParseError;
pub use parser::{parse, parse_tokens, ParseOutcome};

/// Grammar rules, used as the content-assist context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Top level.
    Document,
    /// Inside a `namespace` block.
    Namespace,
    /// Inside an `entity` block.
    Entity,
    /// Inside an `enum` block.
    Enum,
    /// Inside a field declaration.
    Field,
    /// Inside an `@attribute`.
    Attribute,
    /// Inside an attribute parameter.
    Param,
}
