//! Content assist for editors.
//!
//! Suggestions come from running the real parser over the truncated input in
//! probing mode: every token-category check the parser makes at the cut-off
//! point is recorded, so the predictions always agree with what the grammar
//! actually accepts. There is no separate suggestion table to maintain.

use crate::lexer::{significant, tokenize, LexError, Token, TokenCategory};

use super::parser::Parser;
use super::Rule;

/// What may legally come next at the end of a truncated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    /// Token categories the grammar would accept next, in probe order.
    pub next: Vec<TokenCategory>,
    /// The grammar rules active at the cut-off point, outermost first.
    pub context: Vec<Rule>,
}

impl Suggestions {
    /// Returns true if the category is among the predictions.
    #[must_use]
    pub fn accepts(&self, category: TokenCategory) -> bool {
        self.next.contains(&category)
    }
}

/// Predicts the next tokens for a truncated source text.
///
/// # Errors
///
/// Returns a [`LexError`] if the prefix cannot be tokenized.
pub fn suggest(prefix: &str) -> Result<Suggestions, LexError> {
    Ok(suggest_tokens(significant(tokenize(prefix)?)))
}

/// Predicts the next tokens for a pre-lexed, trivia-free token prefix.
#[must_use]
pub fn suggest_tokens(tokens: Vec<Token>) -> Suggestions {
    let (_, _, probe) = Parser::new(tokens, true).run();
    let probe = probe.unwrap_or_default();
    Suggestions {
        next: probe.kinds,
        context: probe.context,
    }
}
