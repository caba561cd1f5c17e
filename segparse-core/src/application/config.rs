//! Parser configuration
//!
//! Options that shape how a sentence is tokenized and which parses are kept.

use crate::domain::category::Category;
use crate::domain::token::TokenizationStrategy;
use crate::error::{ConfigError, Result};

/// Configuration options for the parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Token boundary search strategy
    pub strategy: TokenizationStrategy,

    /// Accept parses that leave trailing input unconsumed
    pub ignore_extra_input: bool,

    /// Leading word positions that may be skipped to find a valid start
    pub skip_up_to: usize,

    /// Whether tokens after a false start may themselves skip
    pub allow_skip_after_first: bool,

    /// Keep only parses rooted in one of these categories (None = all)
    pub accept_categories: Option<Vec<Category>>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strategy: TokenizationStrategy::LongestToShortest,
            ignore_extra_input: true,
            skip_up_to: 0,
            allow_skip_after_first: true,
            accept_categories: None,
        }
    }
}

impl ParserConfig {
    /// Creates a new builder for ParserConfig
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::new()
    }

    /// Configuration that only accepts parses covering the whole input
    pub fn strict() -> Self {
        Self {
            ignore_extra_input: false,
            allow_skip_after_first: false,
            ..Default::default()
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(categories) = &self.accept_categories {
            if categories.is_empty() {
                return Err(ConfigError::InvalidConfig {
                    reason: "Accepted categories must not be empty when given".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Builder for ParserConfig with fluent API
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: TokenizationStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn ignore_extra_input(mut self, ignore: bool) -> Self {
        self.config.ignore_extra_input = ignore;
        self
    }

    pub fn skip_up_to(mut self, positions: usize) -> Self {
        self.config.skip_up_to = positions;
        self
    }

    pub fn allow_skip_after_first(mut self, allow: bool) -> Self {
        self.config.allow_skip_after_first = allow;
        self
    }

    pub fn accept_categories(mut self, categories: Vec<Category>) -> Self {
        self.config.accept_categories = Some(categories);
        self
    }

    /// Builds the configuration, validating it
    pub fn build(self) -> Result<ParserConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
