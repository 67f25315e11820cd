//! Hand-written scanner producing the token stream.

use super::{Keyword, LexError, Position, Span, Token, TokenKind};

/// A lexer that tokenizes Yeti schema source.
///
/// Whitespace and `#` line comments are emitted as trivia tokens rather than
/// dropped, so callers can reconstruct the original layout.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// Current 1-based line.
    line: u32,
    /// Current 1-based column.
    column: u32,
    /// Position at the start of the current token.
    start: Position,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            start: Position::origin(),
        }
    }

    fn position(&self) -> Position {
        Position::new(self.pos, self.line, self.column)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let span = Span::new(self.start, self.position());
        let text = self.input[self.start.offset..self.pos].to_string();
        Token::new(kind, text, span)
    }

    /// Scans a run of whitespace.
    fn scan_whitespace(&mut self) -> Token {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.make_token(TokenKind::Whitespace)
    }

    /// Scans a `#` line comment.
    fn scan_comment(&mut self) -> Token {
        self.advance(); // #
        let content_start = self.pos;
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        let content = self.input[content_start..self.pos].to_string();
        self.make_token(TokenKind::Comment(content))
    }

    /// Scans an identifier or keyword.
    ///
    /// The keyword table is consulted first; the identifier pattern is the
    /// fallback, so reserved words can never become identifiers.
    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            self.advance();
        }

        let text = &self.input[self.start.offset..self.pos];
        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(String::from(text)))
        }
    }

    /// Scans a double-quoted string literal with backslash escapes.
    fn scan_string(&mut self) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return Ok(self.make_token(TokenKind::Str(value)));
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some(other) => {
                            // Unknown escapes keep the character as written.
                            value.push(other);
                        }
                        None => {
                            return Err(LexError::UnterminatedString {
                                position: self.start,
                            });
                        }
                    }
                }
                Some('\n') | None => {
                    return Err(LexError::UnterminatedString {
                        position: self.start,
                    });
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for unterminated strings and characters that
    /// cannot start any token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.start = self.position();

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        match c {
            c if c.is_whitespace() => Ok(self.scan_whitespace()),
            '#' => Ok(self.scan_comment()),
            '"' => self.scan_string(),
            '(' => {
                self.advance();
                Ok(self.make_token(TokenKind::LParen))
            }
            ')' => {
                self.advance();
                Ok(self.make_token(TokenKind::RParen))
            }
            ',' => {
                self.advance();
                Ok(self.make_token(TokenKind::Comma))
            }
            '@' => {
                self.advance();
                Ok(self.make_token(TokenKind::At))
            }
            '>' => {
                self.advance();
                Ok(self.make_token(TokenKind::Gt))
            }
            '.' => {
                self.advance();
                Ok(self.make_token(TokenKind::Dot))
            }
            ':' => {
                // `://` is a single token so URL parameters keep their shape.
                if self.input[self.pos..].starts_with("://") {
                    self.advance();
                    self.advance();
                    self.advance();
                    Ok(self.make_token(TokenKind::UrlSep))
                } else {
                    self.advance();
                    Ok(self.make_token(TokenKind::Colon))
                }
            }
            c if c.is_alphabetic() || c == '_' => Ok(self.scan_identifier()),
            other => {
                let position = self.start;
                Err(LexError::InvalidToken {
                    text: other.to_string(),
                    position,
                })
            }
        }
    }

    /// Tokenizes the entire input, trivia included, ending with EOF.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] on the first malformed token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

/// Drops trivia tokens, keeping the parser's view of the stream.
#[must_use]
pub fn significant(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn kinds(input: &str) -> Vec<TokenKind> {
        significant(tokenize(input).unwrap())
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("namespace app entity enum users"),
            vec![
                TokenKind::Keyword(Keyword::Namespace),
                TokenKind::Identifier("app".into()),
                TokenKind::Keyword(Keyword::Entity),
                TokenKind::Keyword(Keyword::Enum),
                TokenKind::Identifier("users".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            kinds("Entity"),
            vec![TokenKind::Identifier("Entity".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds(": ( ) , @ > ."),
            vec![
                TokenKind::Colon,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Comma,
                TokenKind::At,
                TokenKind::Gt,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_url_separator() {
        assert_eq!(
            kinds("https://example.com"),
            vec![
                TokenKind::Identifier("https".into()),
                TokenKind::UrlSep,
                TokenKind::Identifier("example".into()),
                TokenKind::Dot,
                TokenKind::Identifier("com".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_colon_not_followed_by_slashes() {
        assert_eq!(
            kinds("id: serial"),
            vec![
                TokenKind::Identifier("id".into()),
                TokenKind::Colon,
                TokenKind::Identifier("serial".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_is_trivia() {
        let tokens = tokenize("id # the key\n").unwrap();
        assert!(tokens
            .iter()
            .any(|t| matches!(&t.kind, TokenKind::Comment(c) if c == " the key")));
        // ...but invisible to the parser's view.
        assert_eq!(
            kinds("id # the key\n"),
            vec![TokenKind::Identifier("id".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_with_escapes() {
        assert_eq!(
            kinds(r#""it\"s""#),
            vec![TokenKind::Str("it\"s".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = tokenize("\"oops").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_invalid_character_is_an_error() {
        let err = tokenize("id: serial $").unwrap_err();
        match err {
            LexError::InvalidToken { text, position } => {
                assert_eq!(text, "$");
                assert_eq!(position.line, 1);
                assert_eq!(position.column, 12);
            }
            LexError::UnterminatedString { .. } => panic!("wrong error kind"),
        }
    }

    #[test]
    fn test_position_tracking() {
        let tokens = significant(tokenize("namespace app:\n  entity users:\n").unwrap());
        // `entity` starts on line 2, column 3.
        let entity = &tokens[3];
        assert_eq!(entity.as_keyword(), Some(Keyword::Entity));
        assert_eq!(entity.span.start.line, 2);
        assert_eq!(entity.span.start.column, 3);
        assert_eq!(entity.span.end.column, 9);
    }

    #[test]
    fn test_raw_text_preserved() {
        let tokens = tokenize("users").unwrap();
        assert_eq!(tokens[0].text, "users");
    }
}
