//! Token types for the Yeti lexer.

use super::Span;

/// Reserved words of the schema language.
///
/// Keywords are lexically identical to identifiers; the lexer resolves them
/// through [`KEYWORDS`], which is consulted before the identifier fallback.
/// The DSL is lower-case and case-sensitive, so `Entity` is an identifier
/// while `entity` is a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `namespace`
    Namespace,
    /// `entity`
    Entity,
    /// `enum`
    Enum,
    /// `true`
    True,
    /// `false`
    False,
}

/// Keyword priority table: tried before the general identifier pattern.
pub const KEYWORDS: &[(&str, Keyword)] = &[
    ("namespace", Keyword::Namespace),
    ("entity", Keyword::Entity),
    ("enum", Keyword::Enum),
    ("true", Keyword::True),
    ("false", Keyword::False),
];

impl Keyword {
    /// Attempts to resolve a keyword from its source spelling.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == s)
            .map(|(_, kw)| *kw)
    }

    /// Returns the keyword's source spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Entity => "entity",
            Self::Enum => "enum",
            Self::True => "true",
            Self::False => "false",
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Reserved word.
    Keyword(Keyword),
    /// Identifier (entity names, field names, type names, enum values).
    Identifier(String),
    /// String literal with escapes resolved (e.g., `"it\"s"`).
    Str(String),

    // Punctuation
    /// `:`
    Colon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `@`
    At,
    /// `>`
    Gt,
    /// `.`
    Dot,
    /// `://` (URL separator in attribute parameters)
    UrlSep,

    // Trivia: produced by the lexer, filtered from the parser's view.
    /// `# ...` line comment (text without the leading `#`).
    Comment(String),
    /// A run of whitespace.
    Whitespace,

    /// End of input.
    Eof,
}

/// Payload-free classification of a token kind.
///
/// Used by the content-assist predictor, which reports *which kinds* of token
/// may come next, not concrete values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// `namespace`
    NamespaceKeyword,
    /// `entity`
    EntityKeyword,
    /// `enum`
    EnumKeyword,
    /// `true`
    True,
    /// `false`
    False,
    /// Any identifier.
    Identifier,
    /// Any string literal.
    Str,
    /// `:`
    Colon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `@`
    At,
    /// `>`
    Gt,
    /// `.`
    Dot,
    /// `://`
    UrlSep,
}

impl TokenKind {
    /// Returns the category of this kind, or `None` for trivia and EOF.
    #[must_use]
    pub const fn category(&self) -> Option<TokenCategory> {
        match self {
            Self::Keyword(Keyword::Namespace) => Some(TokenCategory::NamespaceKeyword),
            Self::Keyword(Keyword::Entity) => Some(TokenCategory::EntityKeyword),
            Self::Keyword(Keyword::Enum) => Some(TokenCategory::EnumKeyword),
            Self::Keyword(Keyword::True) => Some(TokenCategory::True),
            Self::Keyword(Keyword::False) => Some(TokenCategory::False),
            Self::Identifier(_) => Some(TokenCategory::Identifier),
            Self::Str(_) => Some(TokenCategory::Str),
            Self::Colon => Some(TokenCategory::Colon),
            Self::LParen => Some(TokenCategory::LParen),
            Self::RParen => Some(TokenCategory::RParen),
            Self::Comma => Some(TokenCategory::Comma),
            Self::At => Some(TokenCategory::At),
            Self::Gt => Some(TokenCategory::Gt),
            Self::Dot => Some(TokenCategory::Dot),
            Self::UrlSep => Some(TokenCategory::UrlSep),
            Self::Comment(_) | Self::Whitespace | Self::Eof => None,
        }
    }

    /// Returns true for whitespace and comments.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment(_))
    }
}

/// A token with its raw text and location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The raw source text of the token.
    pub text: String,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: String, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the identifier text if this is an identifier token.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("namespace"), Some(Keyword::Namespace));
        assert_eq!(Keyword::from_str("entity"), Some(Keyword::Entity));
        // Keywords are case-sensitive in the DSL.
        assert_eq!(Keyword::from_str("Entity"), None);
        assert_eq!(Keyword::from_str("namespaces"), None);
    }

    #[test]
    fn test_keyword_round_trip() {
        for (text, kw) in KEYWORDS {
            assert_eq!(Keyword::from_str(text), Some(*kw));
            assert_eq!(kw.as_str(), *text);
        }
    }

    #[test]
    fn test_category() {
        assert_eq!(
            TokenKind::Keyword(Keyword::Entity).category(),
            Some(TokenCategory::EntityKeyword)
        );
        assert_eq!(
            TokenKind::Identifier("users".into()).category(),
            Some(TokenCategory::Identifier)
        );
        assert_eq!(TokenKind::Whitespace.category(), None);
        assert_eq!(TokenKind::Eof.category(), None);
    }

    #[test]
    fn test_trivia() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Comment(" note".into()).is_trivia());
        assert!(!TokenKind::Colon.is_trivia());
    }
}
