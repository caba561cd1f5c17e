//! High-level configuration API
//!
//! A parser is described by one TOML document: the category list, the
//! grammar text, tokenizer options and the lexicons to consult.
//!
//! ```toml
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
//! ```

use crate::error::{ApiError, Result};
use segparse_core::breaks::break_strategy_by_name;
use segparse_core::{
    CategoryFactory, GeneralNormalizer, GenericLexicon, Lexicon, LexiconPipeline, Normalizer,
    Parser, ParserConfig, PatternLexicon, RuleGrammar, TokenizationStrategy,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Default option values
pub mod defaults {
    /// Token boundary strategy
    pub const STRATEGY: &str = "longest-to-shortest";
    /// Break strategy
    pub const BREAK_STRATEGY: &str = "general";
    /// Accept parses that leave trailing input
    pub const IGNORE_EXTRA_INPUT: bool = true;
    /// Leading word positions that may be skipped
    pub const SKIP_UP_TO: usize = 0;
    /// Whether tokens after a false start may skip
    pub const ALLOW_SKIP_AFTER_FIRST: bool = true;
}

/// Parser description loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Category names; a `?` prefix marks a category as guessable
    pub categories: Vec<String>,
    /// Grammar rules, one per line
    pub grammar: String,
    /// Tokenizer and parser options
    pub options: ParseOptions,
    /// Lexicons, consulted in order
    pub lexicons: Vec<LexiconSpec>,
}

/// Name of the TOML document type
pub type ParserSpec = Config;

/// Tokenizer and parser options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Token boundary strategy name
    pub strategy: String,
    /// Break strategy name (`general` or `date-time`)
    pub break_strategy: String,
    /// Accept parses that leave trailing input unconsumed
    pub ignore_extra_input: bool,
    /// Leading word positions that may be skipped
    pub skip_up_to: usize,
    /// Whether tokens after a false start may themselves skip
    pub allow_skip_after_first: bool,
    /// Keep only parses rooted in these categories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level: Option<Vec<String>>,
    /// Worker threads for batch parsing (default: number of CPUs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strategy: defaults::STRATEGY.to_string(),
            break_strategy: defaults::BREAK_STRATEGY.to_string(),
            ignore_extra_input: defaults::IGNORE_EXTRA_INPUT,
            skip_up_to: defaults::SKIP_UP_TO,
            allow_skip_after_first: defaults::ALLOW_SKIP_AFTER_FIRST,
            top_level: None,
            threads: None,
        }
    }
}

/// How a lexicon matches text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LexiconKind {
    /// Table of terms
    #[default]
    Terms,
    /// Regular expression over the whole span
    Pattern,
}

/// Normalization applied before matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizerKind {
    /// Squash symbols and whitespace, lowercase unless case sensitive
    #[default]
    General,
    /// Match the raw text
    None,
}

/// One `[[lexicons]]` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconSpec {
    /// Matching style
    pub kind: LexiconKind,
    /// Provenance name (defaults to the lowercased category)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Category assigned to matches
    pub category: String,
    /// Terms, optionally followed by `,key=value` attributes
    pub terms: Vec<String>,
    /// Pattern for `kind = "pattern"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Compare terms case-sensitively
    pub case_sensitive: bool,
    /// Parse attributes after the first comma of each term
    pub has_attributes: bool,
    /// Attributes added to every match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_attributes: Option<String>,
    /// Stop consulting later lexicons after a match
    pub definitive: bool,
    /// Normalizer applied to terms and looked-up text
    pub normalizer: NormalizerKind,
    /// Maximum words per term (0 = unlimited)
    pub max_num_words: usize,
}

impl LexiconSpec {
    /// A term lexicon for `category`
    pub fn from_terms<I, S>(category: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category: category.into(),
            terms: terms.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// A pattern lexicon for `category`
    pub fn from_pattern(category: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            kind: LexiconKind::Pattern,
            category: category.into(),
            pattern: Some(pattern.into()),
            ..Default::default()
        }
    }

    /// Name recorded as the source of matched categories
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.category.trim().trim_start_matches('?').to_lowercase())
    }

    fn normalizer(&self) -> Option<Arc<dyn Normalizer>> {
        match self.normalizer {
            NormalizerKind::General => Some(Arc::new(GeneralNormalizer::new(!self.case_sensitive))),
            NormalizerKind::None => None,
        }
    }

    fn build(&self, factory: &CategoryFactory) -> Result<Arc<dyn Lexicon>> {
        let category = factory.category(&self.category)?;
        let name = self.display_name();

        match self.kind {
            LexiconKind::Terms => {
                let mut builder = GenericLexicon::builder(name, category)
                    .terms(self.terms.iter().cloned())
                    .case_sensitive(self.case_sensitive)
                    .has_attributes(self.has_attributes)
                    .definitive(self.definitive)
                    .max_num_words(self.max_num_words);
                if let Some(common) = &self.common_attributes {
                    builder = builder.common_attributes(common.clone());
                }
                if let Some(normalizer) = self.normalizer() {
                    builder = builder.normalizer(normalizer);
                }
                Ok(Arc::new(builder.build()?))
            }
            LexiconKind::Pattern => {
                let pattern = self.pattern.as_deref().ok_or_else(|| {
                    ApiError::Config(format!("pattern lexicon '{name}' has no pattern"))
                })?;
                let mut lexicon = PatternLexicon::new(name, category, pattern)?
                    .with_definitive(self.definitive)
                    .with_max_num_words(self.max_num_words);
                if let Some(normalizer) = self.normalizer() {
                    lexicon = lexicon.with_normalizer(normalizer);
                }
                Ok(Arc::new(lexicon))
            }
        }
    }
}

impl Config {
    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Decode and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::Config(format!("Failed to read file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// The configured token boundary strategy
    pub fn tokenization_strategy(&self) -> Result<TokenizationStrategy> {
        Ok(self.options.strategy.parse()?)
    }

    /// Check the document without building lexicons or grammar
    pub fn validate(&self) -> Result<()> {
        if self.grammar.trim().is_empty() {
            return Err(ApiError::Config("grammar must not be empty".to_string()));
        }
        if self.categories.is_empty() {
            return Err(ApiError::Config("at least one category is required".to_string()));
        }
        self.tokenization_strategy()?;
        break_strategy_by_name(&self.options.break_strategy)?;

        if self.options.top_level.as_ref().is_some_and(Vec::is_empty) {
            return Err(ApiError::Config("top_level must not be empty when given".to_string()));
        }
        if self.options.threads == Some(0) {
            return Err(ApiError::Config("threads must be at least 1".to_string()));
        }
        for lexicon in &self.lexicons {
            if lexicon.category.trim().is_empty() {
                return Err(ApiError::Config("every lexicon needs a category".to_string()));
            }
            if lexicon.kind == LexiconKind::Pattern && lexicon.pattern.is_none() {
                return Err(ApiError::Config(format!(
                    "pattern lexicon '{}' has no pattern",
                    lexicon.display_name()
                )));
            }
        }

        Ok(())
    }

    /// Build the category factory and parser described by this document
    pub fn build_parser(&self) -> Result<(CategoryFactory, Parser)> {
        self.validate()?;

        let factory = CategoryFactory::new();
        factory.define_all(self.categories.iter().map(String::as_str))?;

        let mut pipeline = LexiconPipeline::new();
        for spec in &self.lexicons {
            pipeline.push(spec.build(&factory)?);
        }

        let grammar = RuleGrammar::parse(&self.grammar, &factory)?;
        let accept_categories = match &self.options.top_level {
            Some(names) => Some(
                names
                    .iter()
                    .map(|name| factory.category(name))
                    .collect::<segparse_core::Result<Vec<_>>>()?,
            ),
            None => None,
        };

        let parser_config = ParserConfig {
            strategy: self.tokenization_strategy()?,
            ignore_extra_input: self.options.ignore_extra_input,
            skip_up_to: self.options.skip_up_to,
            allow_skip_after_first: self.options.allow_skip_after_first,
            accept_categories,
        };
        let parser = Parser::with_config(Arc::new(grammar), Arc::new(pipeline), parser_config)?
            .with_break_strategy(break_strategy_by_name(&self.options.break_strategy)?);

        log::info!(
            "Built parser: {} categories, {} lexicons, strategy {}",
            factory.len(),
            self.lexicons.len(),
            self.options.strategy
        );
        Ok((factory, parser))
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Add category names
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .categories
            .extend(categories.into_iter().map(Into::into));
        self
    }

    /// Add a lexicon
    pub fn lexicon(mut self, lexicon: LexiconSpec) -> Self {
        self.config.lexicons.push(lexicon);
        self
    }

    /// Set the grammar text
    pub fn grammar(mut self, grammar: impl Into<String>) -> Self {
        self.config.grammar = grammar.into();
        self
    }

    /// Set the token boundary strategy
    pub fn strategy(mut self, strategy: TokenizationStrategy) -> Self {
        self.config.options.strategy = strategy.name().to_string();
        self
    }

    /// Set the break strategy by name
    pub fn break_strategy(mut self, name: impl Into<String>) -> Self {
        self.config.options.break_strategy = name.into();
        self
    }

    /// Set how many leading word positions may be skipped
    pub fn skip_up_to(mut self, positions: usize) -> Self {
        self.config.options.skip_up_to = positions;
        self
    }

    /// Accept parses that leave trailing input
    pub fn ignore_extra_input(mut self, ignore: bool) -> Self {
        self.config.options.ignore_extra_input = ignore;
        self
    }

    /// Allow tokens after a false start to skip
    pub fn allow_skip_after_first(mut self, allow: bool) -> Self {
        self.config.options.allow_skip_after_first = allow;
        self
    }

    /// Restrict root categories
    pub fn top_level<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.options.top_level = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Set worker thread count for batch parsing
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.config.options.threads = threads;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIME_SPEC: &str = r#"
categories = ["TIME", "NUMBER", "AMPM", "?NOUN"]
grammar = """
TIME <- NUMBER AMPM
"""

[options]
strategy = "longest-to-shortest-to-longer"
break_strategy = "date-time"
skip_up_to = 1
top_level = ["TIME"]

[[lexicons]]
kind = "pattern"
category = "NUMBER"
pattern = "^[0-9]+$"

[[lexicons]]
name = "markers"
category = "AMPM"
terms = ["am", "pm"]
"#;

    #[test]
    fn test_decode_toml() {
        let config = Config::from_toml_str(TIME_SPEC).unwrap();

        assert_eq!(config.categories.len(), 4);
        assert_eq!(
            config.tokenization_strategy().unwrap(),
            TokenizationStrategy::LongestToShortestToLonger
        );
        assert_eq!(config.options.break_strategy, "date-time");
        assert_eq!(config.options.skip_up_to, 1);
        assert!(config.options.ignore_extra_input);
        assert_eq!(config.lexicons[0].kind, LexiconKind::Pattern);
        assert_eq!(config.lexicons[1].kind, LexiconKind::Terms);
        assert_eq!(config.lexicons[0].display_name(), "number");
        assert_eq!(config.lexicons[1].display_name(), "markers");
    }

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.strategy, defaults::STRATEGY);
        assert_eq!(options.break_strategy, defaults::BREAK_STRATEGY);
        assert_eq!(options.skip_up_to, 0);
        assert!(options.allow_skip_after_first);
        assert!(options.top_level.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_grammar() {
        let result = Config::from_toml_str("categories = [\"S\"]\ngrammar = \"  \"\n");
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_strategy() {
        let result = Config::builder()
            .categories(["S", "NOUN"])
            .grammar("S <- NOUN")
            .break_strategy("sentence")
            .build();
        assert!(matches!(result, Err(ApiError::Setup(_))));

        let mut config = Config::from_toml_str(TIME_SPEC).unwrap();
        config.options.strategy = "widest-first".to_string();
        assert!(matches!(config.validate(), Err(ApiError::Setup(_))));
    }

    #[test]
    fn test_builder_round_trips_through_parser() {
        let config = Config::builder()
            .categories(["NP", "DET", "NOUN"])
            .lexicon(LexiconSpec::from_terms("DET", ["the"]))
            .lexicon(LexiconSpec::from_terms("NOUN", ["boy"]))
            .grammar("NP <- det noun")
            .strategy(TokenizationStrategy::ShortestOnly)
            .build()
            .unwrap();

        let (factory, parser) = config.build_parser().unwrap();
        assert_eq!(factory.len(), 3);
        assert_eq!(parser.config().strategy, TokenizationStrategy::ShortestOnly);
        assert_eq!(parser.parse("The boy").len(), 1);
    }

    #[test]
    fn test_unknown_lexicon_category() {
        let config = Config::builder()
            .categories(["S", "NOUN"])
            .lexicon(LexiconSpec::from_terms("CITY", ["paris"]))
            .grammar("S <- NOUN")
            .build()
            .unwrap();
        assert!(matches!(config.build_parser(), Err(ApiError::Setup(_))));
    }

    #[test]
    fn test_pattern_lexicon_requires_pattern() {
        let mut spec = LexiconSpec::from_pattern("NUMBER", "[0-9]+");
        spec.pattern = None;
        let result = Config::builder()
            .categories(["NUMBER"])
            .lexicon(spec)
            .grammar("NUMBER <- _x")
            .build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
