//! Concrete syntax tree.
//!
//! The CST mirrors the grammar rules exactly; it keeps the shape the parser
//! saw before the AST builder simplifies it. Node kinds are a closed set, so
//! consumers match exhaustively instead of dispatching through a visitor.

use crate::lexer::Span;

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// The identifier text.
    pub text: String,
    /// Its location.
    pub span: Span,
}

/// The root node: an ordered sequence of namespaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Top-level namespace declarations.
    pub namespaces: Vec<NamespaceNode>,
}

/// `namespace ident : (entity | enum)*`
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceNode {
    /// Namespace name.
    pub name: Ident,
    /// Entities and enums in declaration order.
    pub items: Vec<ItemNode>,
    /// Covers the whole block.
    pub span: Span,
}

/// A declaration inside a namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemNode {
    /// An entity declaration.
    Entity(EntityNode),
    /// An enum declaration.
    Enum(EnumNode),
}

/// `entity ident : field*`
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    /// Entity name.
    pub name: Ident,
    /// Fields in declaration order; may be empty.
    pub fields: Vec<FieldNode>,
    /// Covers the whole block.
    pub span: Span,
}

/// `enum ident : ident*`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumNode {
    /// Enum name.
    pub name: Ident,
    /// Values in declaration order; may be empty.
    pub values: Vec<Ident>,
    /// Covers the whole block.
    pub span: Span,
}

/// `ident : ident attribute*`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    /// Field name.
    pub name: Ident,
    /// Type name (primitive keyword or enum/entity reference).
    pub ty: Ident,
    /// Attributes in source order.
    pub attrs: Vec<AttributeNode>,
    /// Covers name through last attribute.
    pub span: Span,
}

/// `@ ident ( "(" param ("," param)* ")" )?`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeNode {
    /// Attribute name (after `@`).
    pub name: Ident,
    /// `None` when no parens were written; `Some(vec![])` for `()`.
    pub params: Option<Vec<ParamNode>>,
    /// Covers `@` through closing paren.
    pub span: Span,
}

/// An attribute parameter, disambiguated by lookahead.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamNode {
    /// String literal.
    Str {
        /// The unescaped value.
        value: String,
        /// Its location.
        span: Span,
    },
    /// `true` or `false`.
    Bool {
        /// The literal value.
        value: bool,
        /// Its location.
        span: Span,
    },
    /// `> entity.column` explicit cross-entity reference.
    EntityRef {
        /// Target entity.
        entity: Ident,
        /// Target column.
        column: Ident,
        /// Covers `>` through column.
        span: Span,
    },
    /// `ident ( args )` function-call-shaped value, e.g. `now()`.
    Call {
        /// Callee name.
        name: Ident,
        /// Arguments; may be empty.
        args: Vec<ParamNode>,
        /// Covers name through closing paren.
        span: Span,
    },
    /// `scheme://host[.tld]` restricted URL.
    Url {
        /// URL scheme.
        scheme: Ident,
        /// Host part.
        host: Ident,
        /// Optional top-level domain.
        tld: Option<Ident>,
        /// Covers scheme through tld.
        span: Span,
    },
    /// Bare identifier literal.
    Ident(Ident),
}

impl ParamNode {
    /// Returns the location of the parameter.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Str { span, .. }
            | Self::Bool { span, .. }
            | Self::EntityRef { span, .. }
            | Self::Call { span, .. }
            | Self::Url { span, .. } => *span,
            Self::Ident(ident) => ident.span,
        }
    }
}
