//! Domain layer: text analysis, lexicons, token boundaries and grammars
//!
//! Everything here is independent of how sentences are fed to the parser.
//! Shared services (category factories, lexicons, grammars) are immutable
//! after construction; the per-input [`text::StringWrapper`] memoizes its
//! break table and substrings behind single-writer initialization.

pub mod breaks;
pub mod category;
pub mod grammar;
pub mod lexicon;
pub(crate) mod sync;
pub mod text;
pub mod token;
pub mod tokenizer;
pub mod tree;

pub use breaks::{Break, BreakStrategy, DateTimeBreakStrategy, GeneralBreakStrategy};
pub use category::{Categories, Category, CategoryFactory};
pub use grammar::{Acceptance, Advance, Grammar, GrammarState, GrammarToken, RuleGrammar, RuleState};
pub use lexicon::{
    GeneralNormalizer, GenericLexicon, Lexicon, LexiconPipeline, Normalizer, PatternLexicon,
};
pub use text::{StringWrapper, SubString};
pub use token::{TokenPointer, TokenizationStrategy};
pub use tokenizer::{LexicalEntry, LexicalToken, LexicalTokenizer};
pub use tree::{LeafSource, ParseNode, ParseTree};
