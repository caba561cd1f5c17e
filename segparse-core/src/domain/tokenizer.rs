//! Lexical token stream consumed by the grammar

use crate::domain::breaks::BreakStrategy;
use crate::domain::category::Categories;
use crate::domain::lexicon::Lexicon;
use crate::domain::text::{StringWrapper, SubString};
use crate::domain::token::{TokenPointer, TokenizationStrategy};
use std::sync::Arc;

/// Produces the first [`LexicalEntry`] of one input
#[derive(Clone)]
pub struct LexicalTokenizer {
    wrapper: StringWrapper,
    lexicon: Arc<dyn Lexicon>,
    strategy: TokenizationStrategy,
    skip_up_to: usize,
}

impl LexicalTokenizer {
    pub fn new(
        wrapper: StringWrapper,
        lexicon: Arc<dyn Lexicon>,
        strategy: TokenizationStrategy,
        skip_up_to: usize,
    ) -> Self {
        Self {
            wrapper,
            lexicon,
            strategy,
            skip_up_to,
        }
    }

    /// Tokenizer over `text` broken with `break_strategy`
    pub fn from_text(
        text: &str,
        break_strategy: Arc<dyn BreakStrategy>,
        lexicon: Arc<dyn Lexicon>,
        strategy: TokenizationStrategy,
        skip_up_to: usize,
    ) -> Self {
        Self::new(
            StringWrapper::with_strategy(text, break_strategy),
            lexicon,
            strategy,
            skip_up_to,
        )
    }

    pub fn wrapper(&self) -> &StringWrapper {
        &self.wrapper
    }

    pub fn input(&self) -> &str {
        self.wrapper.text()
    }

    pub fn strategy(&self) -> TokenizationStrategy {
        self.strategy
    }

    pub fn skip_up_to(&self) -> usize {
        self.skip_up_to
    }

    /// Entry for the first token, `None` for input without tokens
    pub fn first_entry(&self) -> Option<LexicalEntry> {
        TokenPointer::first(
            &self.wrapper,
            self.lexicon.clone(),
            self.strategy,
            self.skip_up_to,
        )
        .map(LexicalEntry::new)
    }

    /// Preferred tokens from start to end, without revision or skipping
    pub fn entries(&self) -> impl Iterator<Item = LexicalEntry> {
        std::iter::successors(self.first_entry(), |entry| entry.next(false))
    }
}

impl std::fmt::Debug for LexicalTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalTokenizer")
            .field("input", &self.input())
            .field("strategy", &self.strategy)
            .field("skip_up_to", &self.skip_up_to)
            .finish()
    }
}

/// One token boundary in the stream
#[derive(Debug, Clone)]
pub struct LexicalEntry {
    pointer: TokenPointer,
}

impl LexicalEntry {
    pub fn new(pointer: TokenPointer) -> Self {
        Self { pointer }
    }

    pub fn pointer(&self) -> &TokenPointer {
        &self.pointer
    }

    pub fn substring(&self) -> &SubString {
        self.pointer.substring()
    }

    /// Word position of the token start
    pub fn position(&self) -> usize {
        self.pointer.position()
    }

    pub fn next(&self, allow_skip: bool) -> Option<LexicalEntry> {
        self.pointer.next(allow_skip).map(LexicalEntry::new)
    }

    pub fn revise(&self) -> Option<LexicalEntry> {
        self.pointer.revise().map(LexicalEntry::new)
    }

    pub fn guess(&self) -> Option<LexicalEntry> {
        self.pointer.guess().map(LexicalEntry::new)
    }
}

/// A lexical entry as seen by the grammar
///
/// Records whether the token was accepted on a guess rather than on a
/// lexicon definition.
#[derive(Debug, Clone)]
pub struct LexicalToken {
    entry: LexicalEntry,
    guessed: bool,
}

impl LexicalToken {
    pub fn new(entry: LexicalEntry) -> Self {
        Self {
            entry,
            guessed: false,
        }
    }

    pub fn entry(&self) -> &LexicalEntry {
        &self.entry
    }

    pub fn substring(&self) -> &SubString {
        self.entry.substring()
    }

    pub fn text(&self) -> &str {
        self.substring().text()
    }

    pub fn categories(&self) -> Categories {
        self.substring().categories()
    }

    pub fn position(&self) -> usize {
        self.entry.position()
    }

    pub fn is_guessed(&self) -> bool {
        self.guessed
    }

    /// Following token; never skips
    pub fn next(&self) -> Option<LexicalToken> {
        self.entry.next(false).map(LexicalToken::new)
    }

    pub fn revise(&self) -> Option<LexicalToken> {
        self.entry.revise().map(LexicalToken::new)
    }

    /// This token as a guess, if its text is unknown to the lexicon
    pub fn guess(&self) -> Option<LexicalToken> {
        self.entry.guess().map(|entry| LexicalToken {
            entry,
            guessed: true,
        })
    }
}
