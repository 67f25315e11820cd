//! Recursive descent parser building the CST.

use crate::lexer::{
    significant, tokenize, Keyword, LexError, Span, Token, TokenCategory, TokenKind,
};

use super::cst::{
    AttributeNode, Document, EntityNode, EnumNode, FieldNode, Ident, ItemNode, NamespaceNode,
    ParamNode,
};
use super::error::ParseError;
use super::Rule;

/// The result of one parse call: a best-effort tree plus every error found.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// The tree, as complete as recovery allowed.
    pub cst: Document,
    /// All grammar violations, in source order.
    pub errors: Vec<ParseError>,
}

/// Token-kind probes observed while parsing a truncated input.
///
/// Every check the parser makes at the end-of-input position is recorded
/// here, together with the deepest rule stack seen at that point. Because
/// the probes come from the parser itself there is no second copy of the
/// grammar to keep in sync.
#[derive(Debug, Default)]
pub(super) struct Probe {
    /// Token categories probed at the truncation point, in probe order.
    pub kinds: Vec<TokenCategory>,
    /// The deepest rule stack active while probing.
    pub context: Vec<Rule>,
}

/// Parses source text into a CST.
///
/// # Errors
///
/// Returns a [`LexError`] if the input cannot be tokenized; grammar
/// violations are collected in the returned [`ParseOutcome`] instead.
pub fn parse(source: &str) -> Result<ParseOutcome, LexError> {
    Ok(parse_tokens(significant(tokenize(source)?)))
}

/// Parses a pre-lexed, trivia-free token stream into a CST.
#[must_use]
pub fn parse_tokens(tokens: Vec<Token>) -> ParseOutcome {
    let (cst, errors, _) = Parser::new(tokens, false).run();
    ParseOutcome { cst, errors }
}

pub(super) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
    stack: Vec<Rule>,
    probe: Option<Probe>,
}

impl Parser {
    pub(super) fn new(mut tokens: Vec<Token>, probing: bool) -> Self {
        if tokens.last().is_none_or(|t| !t.is_eof()) {
            let span = tokens.last().map(|t| t.span).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, String::new(), span));
        }
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            stack: Vec::new(),
            probe: probing.then(Probe::default),
        }
    }

    pub(super) fn run(mut self) -> (Document, Vec<ParseError>, Option<Probe>) {
        let cst = self.parse_document();
        (cst, self.errors, self.probe)
    }

    // --- token stream helpers ---

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn at_eof(&self) -> bool {
        self.current().is_eof()
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn previous_span(&self) -> Span {
        if self.pos == 0 {
            self.current().span
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    /// Records a probe when the parser is testing the truncation point.
    fn record(&mut self, category: TokenCategory) {
        if self.at_eof() {
            let stack = self.stack.clone();
            if let Some(probe) = &mut self.probe {
                if !probe.kinds.contains(&category) {
                    probe.kinds.push(category);
                }
                if stack.len() >= probe.context.len() {
                    probe.context = stack;
                }
            }
        }
    }

    fn check(&mut self, category: TokenCategory) -> bool {
        self.record(category);
        self.current().kind.category() == Some(category)
    }

    fn check_keyword(&mut self, keyword: Keyword) -> bool {
        let category = match keyword {
            Keyword::Namespace => TokenCategory::NamespaceKeyword,
            Keyword::Entity => TokenCategory::EntityKeyword,
            Keyword::Enum => TokenCategory::EnumKeyword,
            Keyword::True => TokenCategory::True,
            Keyword::False => TokenCategory::False,
        };
        self.check(category)
    }

    fn check_identifier(&mut self) -> bool {
        self.check(TokenCategory::Identifier)
    }

    /// True when the current token opens a declaration. Does not probe: this
    /// is a stop condition, not an acceptance test.
    fn at_decl_keyword(&self) -> bool {
        self.current().kind.category().is_some_and(is_decl_keyword)
    }

    /// Peeks past the current token (used for field-boundary detection).
    fn next_kind(&self) -> &TokenKind {
        let next = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[next].kind
    }

    // --- expectation helpers ---

    fn expect_identifier(&mut self, what: &str) -> Result<Ident, ParseError> {
        self.record(TokenCategory::Identifier);
        let token = self.current().clone();
        match token.kind {
            TokenKind::Identifier(text) => {
                self.advance();
                Ok(Ident {
                    text,
                    span: token.span,
                })
            }
            TokenKind::Eof => Err(ParseError::unexpected_eof(what, token.span)),
            kind => Err(ParseError::unexpected(what, kind, token.span)),
        }
    }

    fn expect_category(&mut self, category: TokenCategory, what: &str) -> Result<Token, ParseError> {
        if self.check(category) {
            Ok(self.advance())
        } else {
            let token = self.current().clone();
            if token.is_eof() {
                Err(ParseError::unexpected_eof(what, token.span))
            } else {
                Err(ParseError::unexpected(what, token.kind, token.span))
            }
        }
    }

    /// Expects an identifier; on failure records the error and substitutes a
    /// placeholder so the enclosing node can still be built.
    fn ident_or_recover(&mut self, what: &str) -> Ident {
        match self.expect_identifier(what) {
            Ok(ident) => ident,
            Err(err) => {
                let span = err.span;
                self.errors.push(err);
                Ident {
                    text: String::new(),
                    span,
                }
            }
        }
    }

    fn colon_or_recover(&mut self, what: &str) {
        if let Err(err) = self.expect_category(TokenCategory::Colon, what) {
            self.errors.push(err);
        }
    }

    // --- recovery ---

    /// Skips to the next declaration boundary (`namespace`/`entity`/`enum`
    /// keyword or end of input).
    fn synchronize(&mut self) {
        while !self.at_eof() && !self.current().kind.category().is_some_and(is_decl_keyword) {
            self.advance();
        }
    }

    /// Skips to the next plausible field start, attribute, declaration
    /// keyword, or end of input.
    fn synchronize_field(&mut self) {
        loop {
            if self.at_eof() {
                return;
            }
            match self.current().kind.category() {
                Some(c) if is_decl_keyword(c) => return,
                Some(TokenCategory::At) => return,
                Some(TokenCategory::Identifier)
                    if matches!(self.next_kind(), TokenKind::Colon) =>
                {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skips to the closing paren of a parameter list (consuming it), or to a
    /// field boundary if the list never closes.
    fn synchronize_params(&mut self) {
        loop {
            if self.at_eof() {
                return;
            }
            match self.current().kind.category() {
                Some(TokenCategory::RParen) => {
                    self.advance();
                    return;
                }
                Some(c) if is_decl_keyword(c) => return,
                Some(TokenCategory::At) => return,
                Some(TokenCategory::Identifier)
                    if matches!(self.next_kind(), TokenKind::Colon) =>
                {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // --- grammar rules ---

    fn parse_document(&mut self) -> Document {
        self.stack.push(Rule::Document);
        let mut namespaces = Vec::new();

        loop {
            if self.check_keyword(Keyword::Namespace) {
                namespaces.push(self.parse_namespace());
            } else if self.at_eof() {
                break;
            } else {
                let token = self.advance();
                self.errors.push(ParseError::unexpected(
                    "'namespace'",
                    token.kind,
                    token.span,
                ));
            }
        }

        self.stack.pop();
        Document { namespaces }
    }

    fn parse_namespace(&mut self) -> NamespaceNode {
        self.stack.push(Rule::Namespace);
        let start = self.current().span;
        self.advance(); // `namespace`
        let name = self.ident_or_recover("a namespace name");
        self.colon_or_recover("':' after the namespace name");

        let mut items = Vec::new();
        loop {
            if self.check_keyword(Keyword::Entity) {
                items.push(ItemNode::Entity(self.parse_entity()));
            } else if self.check_keyword(Keyword::Enum) {
                items.push(ItemNode::Enum(self.parse_enum()));
            } else if self.check_keyword(Keyword::Namespace) || self.at_eof() {
                break;
            } else {
                let token = self.current().clone();
                self.errors.push(ParseError::unexpected(
                    "'entity' or 'enum'",
                    token.kind,
                    token.span,
                ));
                self.advance();
                self.synchronize();
            }
        }

        let span = start.merge(self.previous_span());
        self.stack.pop();
        NamespaceNode { name, items, span }
    }

    fn parse_entity(&mut self) -> EntityNode {
        self.stack.push(Rule::Entity);
        let start = self.current().span;
        self.advance(); // `entity`
        let name = self.ident_or_recover("an entity name");
        self.colon_or_recover("':' after the entity name");

        // A sibling declaration right after the colon means the field list is
        // empty; the parser must not consume the sibling's content. The same
        // holds for `entity X:` as the last tokens of input.
        let mut fields = Vec::new();
        loop {
            if self.check_identifier() {
                if let Some(field) = self.parse_field() {
                    fields.push(field);
                }
            } else if self.at_eof() || self.at_decl_keyword() {
                break;
            } else {
                let token = self.advance();
                self.errors
                    .push(ParseError::unexpected("a field name", token.kind, token.span));
                self.synchronize_field();
            }
        }

        let span = start.merge(self.previous_span());
        self.stack.pop();
        EntityNode { name, fields, span }
    }

    fn parse_enum(&mut self) -> EnumNode {
        self.stack.push(Rule::Enum);
        let start = self.current().span;
        self.advance(); // `enum`
        let name = self.ident_or_recover("an enum name");
        self.colon_or_recover("':' after the enum name");

        let mut values = Vec::new();
        loop {
            if self.check_identifier() {
                let token = self.advance();
                if let TokenKind::Identifier(text) = token.kind {
                    values.push(Ident {
                        text,
                        span: token.span,
                    });
                }
            } else if self.at_eof() || self.at_decl_keyword() {
                break;
            } else {
                let token = self.advance();
                self.errors
                    .push(ParseError::unexpected("an enum value", token.kind, token.span));
            }
        }

        let span = start.merge(self.previous_span());
        self.stack.pop();
        EnumNode { name, values, span }
    }

    /// Parses one field; returns `None` after recording and recovering from
    /// a malformed declaration, so siblings keep parsing.
    fn parse_field(&mut self) -> Option<FieldNode> {
        self.stack.push(Rule::Field);
        let result = self.parse_field_inner();
        self.stack.pop();
        match result {
            Ok(field) => Some(field),
            Err(err) => {
                self.errors.push(err);
                self.synchronize_field();
                None
            }
        }
    }

    fn parse_field_inner(&mut self) -> Result<FieldNode, ParseError> {
        let name = self.expect_identifier("a field name")?;
        self.expect_category(TokenCategory::Colon, "':' after the field name")?;
        let ty = self.expect_identifier("a field type")?;

        let mut attrs = Vec::new();
        while self.check(TokenCategory::At) {
            if let Some(attr) = self.parse_attribute() {
                attrs.push(attr);
            }
        }

        let span = name.span.merge(self.previous_span());
        Ok(FieldNode {
            name,
            ty,
            attrs,
            span,
        })
    }

    fn parse_attribute(&mut self) -> Option<AttributeNode> {
        self.stack.push(Rule::Attribute);
        let result = self.parse_attribute_inner();
        self.stack.pop();
        match result {
            Ok(attr) => Some(attr),
            Err(err) => {
                self.errors.push(err);
                self.synchronize_params();
                None
            }
        }
    }

    fn parse_attribute_inner(&mut self) -> Result<AttributeNode, ParseError> {
        let at_span = self.current().span;
        self.advance(); // `@`
        let name = self.expect_identifier("an attribute name")?;

        let params = if self.check(TokenCategory::LParen) {
            self.advance();
            let mut list = Vec::new();
            // `@pk()` yields an empty list, never a single empty string.
            if self.check(TokenCategory::RParen) {
                self.advance();
            } else {
                loop {
                    list.push(self.parse_param()?);
                    if self.check(TokenCategory::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                self.expect_category(TokenCategory::RParen, "')' closing the parameter list")?;
            }
            Some(list)
        } else {
            None
        };

        let span = at_span.merge(self.previous_span());
        Ok(AttributeNode { name, params, span })
    }

    fn parse_param(&mut self) -> Result<ParamNode, ParseError> {
        self.stack.push(Rule::Param);
        let result = self.parse_param_inner();
        self.stack.pop();
        result
    }

    fn parse_param_inner(&mut self) -> Result<ParamNode, ParseError> {
        if self.check(TokenCategory::Str) {
            let token = self.advance();
            if let TokenKind::Str(value) = token.kind {
                return Ok(ParamNode::Str {
                    value,
                    span: token.span,
                });
            }
            unreachable!("category checked above");
        }

        if self.check_keyword(Keyword::True) {
            let token = self.advance();
            return Ok(ParamNode::Bool {
                value: true,
                span: token.span,
            });
        }
        if self.check_keyword(Keyword::False) {
            let token = self.advance();
            return Ok(ParamNode::Bool {
                value: false,
                span: token.span,
            });
        }

        // `> entity.column` explicit reference.
        if self.check(TokenCategory::Gt) {
            let gt_span = self.current().span;
            self.advance();
            let entity = self.expect_identifier("a target entity name")?;
            self.expect_category(TokenCategory::Dot, "'.' between entity and column")?;
            let column = self.expect_identifier("a target column name")?;
            let span = gt_span.merge(column.span);
            return Ok(ParamNode::EntityRef {
                entity,
                column,
                span,
            });
        }

        if self.check_identifier() {
            let name = self.expect_identifier("a parameter")?;

            // Lookahead disambiguation: `(` makes a call, `://` a URL,
            // otherwise a bare literal.
            if self.check(TokenCategory::LParen) {
                self.advance();
                let mut args = Vec::new();
                if self.check(TokenCategory::RParen) {
                    self.advance();
                } else {
                    loop {
                        args.push(self.parse_param()?);
                        if self.check(TokenCategory::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    self.expect_category(TokenCategory::RParen, "')' closing the call")?;
                }
                let span = name.span.merge(self.previous_span());
                return Ok(ParamNode::Call { name, args, span });
            }

            if self.check(TokenCategory::UrlSep) {
                self.advance();
                let host = self.expect_identifier("a URL host")?;
                let tld = if self.check(TokenCategory::Dot) {
                    self.advance();
                    Some(self.expect_identifier("a top-level domain")?)
                } else {
                    None
                };
                // Paths, ports, query strings and fragments are out of
                // grammar: fail instead of truncating.
                if matches!(
                    self.current().kind.category(),
                    Some(
                        TokenCategory::Dot
                            | TokenCategory::UrlSep
                            | TokenCategory::Colon
                            | TokenCategory::Gt
                    )
                ) {
                    let token = self.current().clone();
                    return Err(ParseError::new(
                        "URL parameters are restricted to scheme://host[.tld]",
                        token.span,
                    ));
                }
                let end = tld.as_ref().map_or(host.span, |t| t.span);
                let span = name.span.merge(end);
                return Ok(ParamNode::Url {
                    scheme: name,
                    host,
                    tld,
                    span,
                });
            }

            return Ok(ParamNode::Ident(name));
        }

        let token = self.current().clone();
        if token.is_eof() {
            Err(ParseError::unexpected_eof("a parameter", token.span))
        } else {
            Err(ParseError::unexpected("a parameter", token.kind, token.span))
        }
    }
}

const fn is_decl_keyword(category: TokenCategory) -> bool {
    matches!(
        category,
        TokenCategory::NamespaceKeyword | TokenCategory::EntityKeyword | TokenCategory::EnumKeyword
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::cst::ParamNode;

    fn parse_ok(source: &str) -> Document {
        let outcome = parse(source).unwrap();
        assert!(outcome.errors.is_empty(), "errors: {:?}", outcome.errors);
        outcome.cst
    }

    #[test]
    fn test_empty_document() {
        let doc = parse_ok("");
        assert!(doc.namespaces.is_empty());
    }

    #[test]
    fn test_minimal_namespace() {
        let doc = parse_ok("namespace app:");
        assert_eq!(doc.namespaces.len(), 1);
        assert_eq!(doc.namespaces[0].name.text, "app");
        assert!(doc.namespaces[0].items.is_empty());
    }

    #[test]
    fn test_entity_with_fields() {
        let doc = parse_ok("namespace app:\n  entity users:\n    id: serial @pk\n");
        let ItemNode::Entity(entity) = &doc.namespaces[0].items[0] else {
            panic!("expected entity");
        };
        assert_eq!(entity.name.text, "users");
        assert_eq!(entity.fields.len(), 1);
        assert_eq!(entity.fields[0].name.text, "id");
        assert_eq!(entity.fields[0].ty.text, "serial");
        assert_eq!(entity.fields[0].attrs[0].name.text, "pk");
        assert_eq!(entity.fields[0].attrs[0].params, None);
    }

    #[test]
    fn test_empty_parens_are_empty_params() {
        let doc = parse_ok("namespace app:\n  entity items:\n    id: serial @pk()\n");
        let ItemNode::Entity(entity) = &doc.namespaces[0].items[0] else {
            panic!("expected entity");
        };
        assert_eq!(entity.fields[0].attrs[0].params, Some(vec![]));
    }

    #[test]
    fn test_param_lookahead_call() {
        let doc =
            parse_ok("namespace app:\n  entity events:\n    at: timestamp @default(now())\n");
        let ItemNode::Entity(entity) = &doc.namespaces[0].items[0] else {
            panic!("expected entity");
        };
        let params = entity.fields[0].attrs[0].params.as_ref().unwrap();
        assert!(
            matches!(&params[0], ParamNode::Call { name, args, .. } if name.text == "now" && args.is_empty())
        );
    }

    #[test]
    fn test_param_lookahead_url() {
        let doc = parse_ok(
            "namespace app:\n  entity config:\n    url: varchar @default(https://example.com)\n",
        );
        let ItemNode::Entity(entity) = &doc.namespaces[0].items[0] else {
            panic!("expected entity");
        };
        let params = entity.fields[0].attrs[0].params.as_ref().unwrap();
        assert!(matches!(
            &params[0],
            ParamNode::Url { scheme, host, tld: Some(tld), .. }
                if scheme.text == "https" && host.text == "example" && tld.text == "com"
        ));
    }

    #[test]
    fn test_url_with_path_is_rejected() {
        let outcome =
            parse("namespace app:\n  entity c:\n    u: varchar @default(https://a.b.c)\n").unwrap();
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn test_param_lookahead_entity_ref() {
        let doc = parse_ok("namespace app:\n  entity posts:\n    user_id: integer @fk(> users.id)\n");
        let ItemNode::Entity(entity) = &doc.namespaces[0].items[0] else {
            panic!("expected entity");
        };
        let params = entity.fields[0].attrs[0].params.as_ref().unwrap();
        assert!(matches!(
            &params[0],
            ParamNode::EntityRef { entity, column, .. }
                if entity.text == "users" && column.text == "id"
        ));
    }

    #[test]
    fn test_malformed_field_recovers() {
        let source = "namespace app:\n  entity bad:\n    : string\n    good: integer\n";
        let outcome = parse(source).unwrap();
        assert!(!outcome.errors.is_empty());
        let ItemNode::Entity(entity) = &outcome.cst.namespaces[0].items[0] else {
            panic!("expected entity");
        };
        // The sibling field after the malformed one is still parsed.
        assert!(entity.fields.iter().any(|f| f.name.text == "good"));
    }

    #[test]
    fn test_trailing_entity_header_is_legal() {
        let doc = parse_ok("namespace app:\n  entity Empty:\n");
        let ItemNode::Entity(entity) = &doc.namespaces[0].items[0] else {
            panic!("expected entity");
        };
        assert_eq!(entity.name.text, "Empty");
        assert!(entity.fields.is_empty());
    }

    #[test]
    fn test_missing_field_type_is_an_error() {
        let outcome = parse("namespace app:\n  entity bad:\n    name:\n").unwrap();
        assert!(!outcome.errors.is_empty());
    }
}
