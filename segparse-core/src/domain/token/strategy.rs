//! Token boundary strategies
//!
//! Each strategy is a pair of functions: where a token starts (the initial
//! boundary at a position) and how an undefined token is revised (shrunk or
//! grown) while searching for a lexicon match.

use crate::domain::text::{StringWrapper, SubString};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How token boundaries are searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenizationStrategy {
    /// Start with the longest span and shrink one word at a time
    #[default]
    LongestToShortest,
    /// Start with the longest span, then try the shortest and grow from there
    LongestToShortestToLonger,
    /// Only ever consider single words
    ShortestOnly,
    /// Only ever consider the longest span
    LongestOnly,
    /// Start with a single word and grow one word at a time
    ShortestToLongest,
    /// Like `LongestToShortest`, but never shrink a span that already matched
    LongestDefined,
}

/// Inputs to a revise step
pub(crate) struct ReviseContext<'a> {
    pub sub: &'a SubString,
    /// End of the longest span considered from this start
    pub ceiling: usize,
}

type ReviseFn = fn(&ReviseContext<'_>) -> Option<SubString>;
type StartFn = fn(&StringWrapper, usize, usize) -> Option<SubString>;

impl TokenizationStrategy {
    pub const ALL: [TokenizationStrategy; 6] = [
        TokenizationStrategy::LongestToShortest,
        TokenizationStrategy::LongestToShortestToLonger,
        TokenizationStrategy::ShortestOnly,
        TokenizationStrategy::LongestOnly,
        TokenizationStrategy::ShortestToLongest,
        TokenizationStrategy::LongestDefined,
    ];

    /// Configuration name
    pub fn name(self) -> &'static str {
        match self {
            TokenizationStrategy::LongestToShortest => "longest-to-shortest",
            TokenizationStrategy::LongestToShortestToLonger => "longest-to-shortest-to-longer",
            TokenizationStrategy::ShortestOnly => "shortest-only",
            TokenizationStrategy::LongestOnly => "longest-only",
            TokenizationStrategy::ShortestToLongest => "shortest-to-longest",
            TokenizationStrategy::LongestDefined => "longest-defined",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TokenizationStrategy::LongestToShortest => {
                "Longest span first, shrinking one word at a time"
            }
            TokenizationStrategy::LongestToShortestToLonger => {
                "Longest span, then the shortest, then growing back"
            }
            TokenizationStrategy::ShortestOnly => "Single words only",
            TokenizationStrategy::LongestOnly => "Longest span only",
            TokenizationStrategy::ShortestToLongest => {
                "Single word first, growing one word at a time"
            }
            TokenizationStrategy::LongestDefined => {
                "Longest span first; matched spans are never shrunk"
            }
        }
    }

    /// Whether a span that matched must not be revised further
    pub fn keeps_defined(self) -> bool {
        self == TokenizationStrategy::LongestDefined
    }

    pub(crate) fn revise(self, ctx: &ReviseContext<'_>) -> Option<SubString> {
        let revise: ReviseFn = match self {
            TokenizationStrategy::LongestToShortest => shrink,
            TokenizationStrategy::LongestToShortestToLonger => shrink_then_grow,
            TokenizationStrategy::ShortestOnly | TokenizationStrategy::LongestOnly => never,
            TokenizationStrategy::ShortestToLongest => grow,
            TokenizationStrategy::LongestDefined => shrink_undefined,
        };
        revise(ctx)
    }

    /// Initial token at the first word at/after `from`
    pub(crate) fn start(
        self,
        wrapper: &StringWrapper,
        from: usize,
        max_words: usize,
    ) -> Option<SubString> {
        let start: StartFn = match self {
            TokenizationStrategy::ShortestOnly | TokenizationStrategy::ShortestToLongest => {
                shortest
            }
            _ => longest,
        };
        start(wrapper, from, max_words)
    }
}

fn longest(wrapper: &StringWrapper, from: usize, max_words: usize) -> Option<SubString> {
    wrapper.longest_substring(from, max_words)
}

fn shortest(wrapper: &StringWrapper, from: usize, _max_words: usize) -> Option<SubString> {
    wrapper.shortest_substring(from)
}

fn shrink(ctx: &ReviseContext<'_>) -> Option<SubString> {
    ctx.sub.shorter()
}

fn never(_ctx: &ReviseContext<'_>) -> Option<SubString> {
    None
}

// Bounded by the longest span so both directions agree on word counts
fn grow(ctx: &ReviseContext<'_>) -> Option<SubString> {
    ctx.sub.longer().filter(|longer| longer.end() <= ctx.ceiling)
}

fn shrink_undefined(ctx: &ReviseContext<'_>) -> Option<SubString> {
    if ctx.sub.has_categories() {
        None
    } else {
        shrink(ctx)
    }
}

// longest -> shortest -> grow until just below the longest
fn shrink_then_grow(ctx: &ReviseContext<'_>) -> Option<SubString> {
    if ctx.sub.end() >= ctx.ceiling {
        let shortest = ctx.sub.wrapper().shortest_substring(ctx.sub.start())?;
        (shortest.end() < ctx.sub.end()).then_some(shortest)
    } else {
        ctx.sub.longer().filter(|longer| longer.end() < ctx.ceiling)
    }
}

impl fmt::Display for TokenizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenizationStrategy {
    type Err = ConfigError;

    /// Accepts kebab-case, snake_case and CamelCase spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().replace('-', "") == key)
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}
