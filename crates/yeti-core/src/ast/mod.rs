//! Typed AST and the CST lowering pass.
//!
//! The AST is the generator-facing view of a document: namespaces hold
//! entities and enums in separate lists, attribute parameters are rendered to
//! canonical strings, and attributes are sorted into the fixed priority order
//! DDL emission depends on.

mod lower;

use crate::lexer::{LexError, Span};
use crate::parser::{parse, ParseError};

/// A top-level namespace, mapped to one database schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
    /// Entities in declaration order.
    pub entities: Vec<Entity>,
    /// Enums in declaration order.
    pub enums: Vec<EnumDef>,
    /// Location of the namespace block.
    pub span: Span,
}

/// An entity, mapped to one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity name.
    pub name: String,
    /// Fields in declaration order; may be empty.
    pub fields: Vec<Field>,
    /// Location of the entity block.
    pub span: Span,
}

/// A field, mapped to one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Type name: a primitive keyword or an enum/entity reference.
    pub ty: String,
    /// Attributes in priority order (see [`Attribute`]).
    pub attributes: Vec<Attribute>,
    /// Location of the field declaration.
    pub span: Span,
}

/// The recognized attribute vocabulary plus an open extension point.
///
/// Attribute names outside the fixed vocabulary are carried through as
/// [`AttributeName::Other`] rather than rejected; dialects may understand
/// attributes the core does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeName {
    /// `@pk`
    PrimaryKey,
    /// `@unique`
    Unique,
    /// `@default`
    Default,
    /// `@fk`
    ForeignKey,
    /// Any other attribute name.
    Other(String),
}

impl AttributeName {
    /// Resolves a source-level attribute name.
    #[must_use]
    pub fn from_source(name: &str) -> Self {
        match name {
            "pk" => Self::PrimaryKey,
            "unique" => Self::Unique,
            "default" => Self::Default,
            "fk" => Self::ForeignKey,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the source-level spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PrimaryKey => "pk",
            Self::Unique => "unique",
            Self::Default => "default",
            Self::ForeignKey => "fk",
            Self::Other(name) => name,
        }
    }

    /// Sort key for the fixed attribute emission order.
    ///
    /// Primary key first, then unique, default, foreign key; everything else
    /// keeps its encounter order after those (the sort is stable).
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Self::PrimaryKey => 1,
            Self::Unique => 2,
            Self::Default => 3,
            Self::ForeignKey => 4,
            Self::Other(_) => 5,
        }
    }
}

/// A field attribute with canonically rendered string parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The attribute name.
    pub name: AttributeName,
    /// Canonical parameter strings. `@pk` and `@pk()` both yield an empty
    /// list, never a single empty string.
    pub params: Vec<String>,
    /// Location of the attribute.
    pub span: Span,
}

impl Attribute {
    /// Returns the first parameter, if any.
    #[must_use]
    pub fn first_param(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }
}

/// An enum declaration, mapped to a native enum type or a fallback column
/// type depending on the dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Values in declaration order.
    pub values: Vec<String>,
    /// Location of the enum block.
    pub span: Span,
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A grammar violation; the surrounding construct was recovered or
    /// dropped.
    Error,
    /// A suspicious but legal construct, e.g. an unrecognized attribute.
    Warning,
}

/// A problem found while parsing or lowering, tied to a source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Where it happened.
    pub span: Span,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    /// Creates a warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }

    /// Returns true for error-severity diagnostics.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Self::error(err.message, err.span)
    }
}

/// The result of parsing and lowering one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Namespaces in declaration order.
    pub ast: Vec<Namespace>,
    /// Parse errors and lowering warnings, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Returns true if no error-severity diagnostic was produced.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parses source text all the way to the typed AST.
///
/// Grammar violations do not abort the call: the returned AST covers what
/// could be recovered and the diagnostics list what could not.
///
/// # Errors
///
/// Returns a [`LexError`] if the input cannot be tokenized.
pub fn parse_document(source: &str) -> Result<ParseResult, LexError> {
    let outcome = parse(source)?;
    let mut diagnostics: Vec<Diagnostic> = outcome.errors.into_iter().map(Into::into).collect();
    let ast = lower::lower_document(&outcome.cst, &mut diagnostics);
    diagnostics.sort_by_key(|d| d.span.start.offset);
    Ok(ParseResult { ast, diagnostics })
}
