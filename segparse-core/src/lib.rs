//! Lexical ambiguity resolving tokenizer and finite-state grammar parser
//!
//! Short text is broken into words and delimiters, and every contiguous run
//! of words is a candidate token. Lexicons attach categories to candidates;
//! a token pointer picks one boundary at a time according to a
//! [`TokenizationStrategy`] and can revise it when the grammar rejects it.
//! The parser explores every grammar hypothesis that still accepts input and
//! keeps the parses no other parse subsumes.
//!
//! # Architecture
//!
//! - **Domain layer**: breaks, text wrappers, categories, lexicons, token
//!   pointers, grammars and parse trees
//! - **Application layer**: the parser and its configuration
//!
//! # Example
//!
//! ```rust
//! use segparse_core::{
//!     CategoryFactory, DateTimeBreakStrategy, GenericLexicon, LexiconPipeline, Parser,
//!     PatternLexicon, RuleGrammar,
//! };
//! use std::sync::Arc;
//!
//! let factory = CategoryFactory::from_definitions("time number ampm").unwrap();
//! let number =
//!     PatternLexicon::new("number", factory.category("number").unwrap(), "[0-9]+").unwrap();
//! let ampm = GenericLexicon::builder("ampm", factory.category("ampm").unwrap())
//!     .terms(["am", "pm"])
//!     .build()
//!     .unwrap();
//! let lexicon = LexiconPipeline::new().with(Arc::new(number)).with(Arc::new(ampm));
//! let grammar = RuleGrammar::parse("TIME <- NUMBER AMPM", &factory).unwrap();
//!
//! let parser = Parser::new(Arc::new(grammar), Arc::new(lexicon))
//!     .with_break_strategy(Arc::new(DateTimeBreakStrategy::new()));
//!
//! let parses = parser.parse("5pm");
//! assert_eq!(parses.len(), 1);
//! assert_eq!(parses[0].to_string(), "(TIME (NUMBER '5') (AMPM 'pm'))");
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub use application::{Parse, Parser, ParserConfig, ParserConfigBuilder};
pub use domain::*;
pub use error::{ConfigError, ParseError, Result};
