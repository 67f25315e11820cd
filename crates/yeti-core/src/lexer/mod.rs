//! Lexer for the Yeti schema language.

mod scanner;
mod span;
mod token;

pub use scanner::{significant, Lexer};
pub use span::{Position, Span};
pub use token::{Keyword, Token, TokenCategory, TokenKind};

/// An error produced while tokenizing input.
///
/// Lex errors are fatal to the parse call that triggered them; the offending
/// position is carried so editors can point at the exact character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A character that cannot start any token.
    #[error("invalid token '{text}' at line {}, column {}", position.line, position.column)]
    InvalidToken {
        /// The offending text.
        text: String,
        /// Where the token started.
        position: Position,
    },

    /// A string literal with no closing quote.
    #[error("unterminated string literal starting at line {}, column {}", position.line, position.column)]
    UnterminatedString {
        /// Where the literal started.
        position: Position,
    },
}

/// Tokenizes the entire input, trivia included.
///
/// # Errors
///
/// Returns a [`LexError`] on the first malformed token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
