//! Public API for segparse sentence parsing
//!
//! This crate wraps the core tokenizer and parser behind a configuration
//! document and serializable outputs, and adds batch parsing over a worker
//! pool.
//!
//! ```rust
//! use segparse_api::SentenceParser;
//!
//! let parser = SentenceParser::from_toml_str(r#"
//! categories = ["TIME", "NUMBER", "AMPM"]
//! grammar = "TIME <- NUMBER AMPM"
//!
//! [options]
//! break_strategy = "date-time"
//!
//! [[lexicons]]
//! kind = "pattern"
//! category = "NUMBER"
//! pattern = "[0-9]+"
//!
//! [[lexicons]]
//! category = "AMPM"
//! terms = ["am", "pm"]
//! "#).unwrap();
//!
//! let output = parser.parse_to_output("5pm").unwrap();
//! assert_eq!(output.parses[0].tree, "(TIME (NUMBER '5') (AMPM 'pm'))");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod error;

use dto::{Metadata, ParseDTO};
use error::Result;
use segparse_core::{Category, CategoryFactory, Parse, Parser};
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::Arc;

// Re-export key types
pub use config::{Config, ConfigBuilder, LexiconKind, LexiconSpec, NormalizerKind, ParserSpec};
pub use dto::{Input, LeafDTO, Output};
pub use error::ApiError;

/// Main entry point for parsing sentences
///
/// Built once from a [`Config`]; parsing takes `&self` and may run on many
/// threads at once.
pub struct SentenceParser {
    parser: Parser,
    factory: CategoryFactory,
    config: Config,
    #[cfg(feature = "parallel")]
    pool: Arc<rayon::ThreadPool>,
}

impl SentenceParser {
    /// Create a parser from a validated configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let (factory, parser) = config.build_parser()?;

        #[cfg(feature = "parallel")]
        let pool = {
            let threads = config.options.threads.unwrap_or_else(num_cpus::get);
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("segparse-{i}"))
                .build()
                .map_err(|e| ApiError::ThreadPool(e.to_string()))?
        };

        Ok(Self {
            parser,
            factory,
            config,
            #[cfg(feature = "parallel")]
            pool: Arc::new(pool),
        })
    }

    /// Create a parser from a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::with_config(Config::from_toml_str(text)?)
    }

    /// Create a parser from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(Config::from_file(path)?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Categories defined by the configuration
    pub fn categories(&self) -> Vec<Category> {
        self.factory.categories()
    }

    /// The underlying core parser
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Parse one sentence into core parses
    pub fn parse(&self, sentence: &str) -> Vec<Parse> {
        self.parser.parse(sentence)
    }

    /// Parse one sentence into a serializable output
    pub fn parse_to_output(&self, sentence: &str) -> Result<Output> {
        let start = Instant::now();
        let parses = self
            .parser
            .parse(sentence)
            .iter()
            .map(ParseDTO::from_parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Output {
            sentence: sentence.to_string(),
            metadata: Metadata {
                parse_count: parses.len(),
                total_chars: sentence.chars().count(),
                processing_time_us: start.elapsed().as_micros() as u64,
            },
            parses,
        })
    }

    /// Parse every non-blank line of `input`
    pub fn process(&self, input: Input) -> Result<Vec<Output>> {
        let sentences = input.read_sentences()?;
        Ok(self.parse_batch(&sentences))
    }

    /// Parse many sentences
    ///
    /// Output order follows input order. A sentence whose parses cannot be
    /// converted yields an empty output rather than failing the batch.
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, sentences: &[S]) -> Vec<Output> {
        #[cfg(feature = "parallel")]
        {
            if sentences.len() > 1 {
                return self.pool.install(|| {
                    sentences
                        .par_iter()
                        .map(|sentence| self.output_or_empty(sentence.as_ref()))
                        .collect()
                });
            }
        }

        sentences
            .iter()
            .map(|sentence| self.output_or_empty(sentence.as_ref()))
            .collect()
    }

    fn output_or_empty(&self, sentence: &str) -> Output {
        self.parse_to_output(sentence).unwrap_or_else(|e| {
            log::warn!("Dropping parses of '{sentence}': {e}");
            Output::empty(sentence)
        })
    }
}

impl std::fmt::Debug for SentenceParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceParser")
            .field("categories", &self.factory)
            .field("grammar", self.parser.grammar())
            .finish()
    }
}

// Convenience functions

/// Parse one sentence with a parser described by the TOML file at `path`
pub fn parse_with_file<P: AsRef<Path>>(path: P, sentence: &str) -> Result<Output> {
    SentenceParser::from_file(path)?.parse_to_output(sentence)
}
