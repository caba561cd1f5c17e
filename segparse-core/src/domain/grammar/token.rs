//! Grammar tokens and how they match lexical tokens

use crate::domain::category::{Category, CategoryFactory};
use crate::domain::text::NORMALIZED_ATTRIBUTE;
use crate::domain::tokenizer::LexicalToken;
use crate::error::{ConfigError, Result};
use std::fmt;
use std::sync::Arc;

const NEGATED_PREFIX: char = '!';
const PEEK_PREFIX: char = '&';
const LITERAL_PREFIX: char = '_';
const GUESSABLE_PREFIX: char = '?';

/// One symbol on either side of a grammar rule
///
/// Written as a label with optional prefixes, in any order: `!` negated,
/// `&` peek (match without consuming), `_` literal text, `?` guessable.
#[derive(Debug, Clone)]
pub struct GrammarToken {
    label: Arc<str>,
    category: Option<Category>,
    negated: bool,
    peek: bool,
    literal: bool,
    guessable: bool,
}

impl GrammarToken {
    /// Parse `text` from grammar line `line`
    ///
    /// Non-literal labels must name a category known to `factory`.
    pub fn parse(text: &str, factory: &CategoryFactory, line: usize) -> Result<Self> {
        let mut negated = false;
        let mut peek = false;
        let mut literal = false;
        let mut marked_guessable = false;

        let mut label = text.trim();
        while let Some(c) = label.chars().next() {
            match c {
                NEGATED_PREFIX => negated = true,
                PEEK_PREFIX => peek = true,
                LITERAL_PREFIX => literal = true,
                GUESSABLE_PREFIX => marked_guessable = true,
                _ => break,
            }
            label = &label[c.len_utf8()..];
        }

        if label.is_empty() {
            return Err(ConfigError::GrammarSyntax {
                line,
                reason: format!("token '{text}' has no label"),
            });
        }

        let category = if literal {
            None
        } else {
            Some(factory.category(label)?)
        };
        let guessable = !literal
            && !negated
            && (marked_guessable || category.as_ref().is_some_and(Category::can_guess));

        Ok(Self {
            label: Arc::from(label),
            category,
            negated,
            peek,
            literal,
            guessable,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn label_arc(&self) -> Arc<str> {
        self.label.clone()
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_peek(&self) -> bool {
        self.peek
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn is_guessable(&self) -> bool {
        self.guessable
    }

    /// Whether this token carries no prefixes
    pub fn is_plain(&self) -> bool {
        !(self.negated || self.peek || self.literal || self.guessable)
    }

    /// Match `token`, returning the lexical token that realizes this symbol
    ///
    /// A guessable symbol that does not match directly may accept the token
    /// as a guess, in which case the returned token is the guessed one.
    pub fn matches(&self, token: &LexicalToken) -> Option<LexicalToken> {
        if self.literal {
            return (self.matches_text(token) != self.negated).then(|| token.clone());
        }

        let category = self.category.as_ref()?;
        let direct = token.substring().has_category(category);
        if self.negated {
            return (!direct).then(|| token.clone());
        }
        if direct {
            return Some(token.clone());
        }
        if self.guessable {
            return token.guess();
        }
        None
    }

    fn matches_text(&self, token: &LexicalToken) -> bool {
        let label = self.label.to_lowercase();
        token.text().to_lowercase() == label
            || token
                .substring()
                .attribute(NORMALIZED_ATTRIBUTE)
                .is_some_and(|normalized| normalized.to_lowercase() == label)
    }
}

impl fmt::Display for GrammarToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "{NEGATED_PREFIX}")?;
        }
        if self.peek {
            write!(f, "{PEEK_PREFIX}")?;
        }
        if self.literal {
            write!(f, "{LITERAL_PREFIX}")?;
        }
        f.write_str(&self.label)
    }
}
