//! Application layer for parsing sentences
//!
//! This module coordinates the domain pieces: a [`parser::Parser`] breaks a
//! sentence, walks its lexical tokens through a grammar and prunes the
//! resulting parses. [`config::ParserConfig`] holds the options that shape
//! tokenization and which parses survive.
//!
//! # Example
//!
//! ```rust
//! use segparse_core::application::{Parser, ParserConfig};
//! use segparse_core::domain::{CategoryFactory, GenericLexicon, LexiconPipeline, RuleGrammar};
//! use std::sync::Arc;
//!
//! let factory = CategoryFactory::from_definitions("np det noun").unwrap();
//! let det = GenericLexicon::builder("det", factory.category("det").unwrap())
//!     .terms(["the", "a"])
//!     .build()
//!     .unwrap();
//! let noun = GenericLexicon::builder("noun", factory.category("noun").unwrap())
//!     .terms(["boy", "fish"])
//!     .build()
//!     .unwrap();
//! let lexicon = LexiconPipeline::new().with(Arc::new(det)).with(Arc::new(noun));
//! let grammar = RuleGrammar::parse("NP <- det noun", &factory).unwrap();
//!
//! let parser = Parser::with_config(
//!     Arc::new(grammar),
//!     Arc::new(lexicon),
//!     ParserConfig::default(),
//! )
//! .unwrap();
//! let parses = parser.parse("the boy");
//! assert_eq!(parses[0].to_string(), "(NP (det 'the') (noun 'boy'))");
//! ```

pub mod config;
pub mod parser;

pub use config::{ParserConfig, ParserConfigBuilder};
pub use parser::{insert_parse, prune_subsumed, Parse, Parser};
