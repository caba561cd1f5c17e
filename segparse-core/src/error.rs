//! Error types for the parsing core
//!
//! Setup problems (categories, lexicons, grammars, options) surface as
//! [`ConfigError`] at construction time. Parsing itself never fails: a sentence
//! without an accepting lineage yields an empty parse list. The only runtime
//! error is [`ParseError`], raised when a caller asks a parse for something
//! its leaves cannot provide.

use thiserror::Error;

/// Errors raised while building categories, lexicons, grammars or parsers
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A category with the same (upper-cased) name already exists
    #[error("Category '{0}' is already defined")]
    DuplicateCategory(String),

    /// A category name was requested that the factory never minted
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A grammar rule line could not be parsed
    #[error("Grammar syntax error on line {line}: {reason}")]
    GrammarSyntax { line: usize, reason: String },

    /// The grammar contains no rules
    #[error("Grammar contains no rules")]
    EmptyGrammar,

    /// A rule can reach itself without consuming input
    #[error("Rule '{label}' is left-recursive")]
    LeftRecursion { label: String },

    /// A peek token carries a repeating quantifier
    #[error("Peek token '{label}' cannot repeat")]
    RepeatedPeek { label: String },

    /// A repeating element expands to a rule that may complete without consuming input
    #[error("Repeated element '{label}' can match without consuming input")]
    NonProgressingRepeat { label: String },

    /// A lexicon pattern failed to compile
    #[error("Invalid lexicon pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A lexicon term carried an attribute without `=`
    #[error("Malformed lexicon term '{0}'")]
    MalformedTerm(String),

    /// Unrecognized tokenization strategy name
    #[error("Unknown tokenization strategy: {0}")]
    UnknownStrategy(String),

    /// Unrecognized break strategy name
    #[error("Unknown break strategy: {0}")]
    UnknownBreakStrategy(String),

    /// Inconsistent parser options
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Errors raised when inspecting a finished parse
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A leaf was produced by a grammar without a backing input token
    #[error("Leaf '{label}' is not backed by an input substring")]
    DetachedLeaf { label: String },
}

/// Result type for setup operations
pub type Result<T> = std::result::Result<T, ConfigError>;
