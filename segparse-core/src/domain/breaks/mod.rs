//! Break model
//!
//! Every codepoint of an input is classified with the strength of the
//! boundary it introduces. Token boundaries are only ever placed at breaking
//! positions, and skipping delimiters is driven by the same table.

mod date_time;
mod general;

pub use date_time::DateTimeBreakStrategy;
pub use general::GeneralBreakStrategy;

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Strength of the boundary at a codepoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Break {
    /// Never split here
    #[default]
    None,
    /// Split only when scanning words (camelCase, letter to digit); not a delimiter
    SoftSplit,
    /// Split, and the codepoint itself is a delimiter (space, single dash)
    SoftFull,
    /// Always split; ends any larger token
    Hard,
}

impl Break {
    /// Whether a token boundary may fall on this codepoint
    pub fn breaks(self) -> bool {
        !matches!(self, Break::None)
    }

    /// Whether the codepoint is a delimiter that tokens never include
    pub fn skip(self) -> bool {
        matches!(self, Break::SoftFull | Break::Hard)
    }
}

/// Classifies codepoints into [`Break`] values
///
/// Implementations are consulted once per codepoint in a left-to-right scan.
/// `partial` holds the classifications already made for `0..index`. Returning
/// `Some(next)` assigns the same break to every codepoint in `index..next`
/// and resumes the scan at `next`.
pub trait BreakStrategy: Send + Sync {
    /// Short identifier used in configuration and diagnostics
    fn name(&self) -> &'static str;

    /// Classify the codepoint at `index`
    fn classify(&self, index: usize, codepoints: &[char], partial: &[Break])
        -> (Break, Option<usize>);

    /// Compute the full break table for `codepoints`
    fn compute_breaks(&self, codepoints: &[char]) -> Vec<Break> {
        let len = codepoints.len();
        let mut result = Vec::with_capacity(len);
        let mut index = 0;

        while index < len {
            let (brk, through) = self.classify(index, codepoints, &result);
            let end = through.map_or(index + 1, |next| next.clamp(index + 1, len));
            result.resize(end, brk);
            index = end;
        }

        result
    }
}

/// Look up a built-in break strategy by its configuration name
pub fn break_strategy_by_name(name: &str) -> Result<Arc<dyn BreakStrategy>> {
    match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "general" => Ok(Arc::new(GeneralBreakStrategy)),
        "date-time" | "datetime" => Ok(Arc::new(DateTimeBreakStrategy::new())),
        _ => Err(ConfigError::UnknownBreakStrategy(name.to_string())),
    }
}

/// Names accepted by [`break_strategy_by_name`]
pub const BREAK_STRATEGY_NAMES: &[&str] = &["general", "date-time"];

#[inline]
pub(crate) fn char_at(codepoints: &[char], index: isize) -> Option<char> {
    if index < 0 {
        None
    } else {
        codepoints.get(index as usize).copied()
    }
}

#[inline]
pub(crate) fn is_digit_at(codepoints: &[char], index: isize) -> bool {
    char_at(codepoints, index).is_some_and(|c| c.is_ascii_digit())
}

#[inline]
pub(crate) fn is_letter_at(codepoints: &[char], index: isize) -> bool {
    char_at(codepoints, index).is_some_and(|c| c.is_alphabetic())
}

#[inline]
pub(crate) fn is_alnum_at(codepoints: &[char], index: isize) -> bool {
    char_at(codepoints, index).is_some_and(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_predicates() {
        assert!(!Break::None.breaks());
        assert!(!Break::None.skip());

        // Soft splits break words but are never delimiters
        assert!(Break::SoftSplit.breaks());
        assert!(!Break::SoftSplit.skip());

        assert!(Break::SoftFull.breaks() && Break::SoftFull.skip());
        assert!(Break::Hard.breaks() && Break::Hard.skip());
    }

    #[test]
    fn test_strategy_by_name() {
        assert_eq!(break_strategy_by_name("general").unwrap().name(), "general");
        assert_eq!(break_strategy_by_name("Date_Time").unwrap().name(), "date-time");

        match break_strategy_by_name("klingon") {
            Err(ConfigError::UnknownBreakStrategy(name)) => assert_eq!(name, "klingon"),
            _ => panic!("Expected UnknownBreakStrategy"),
        }
    }

    #[test]
    fn test_compute_breaks_spans() {
        struct Pairs;
        impl BreakStrategy for Pairs {
            fn name(&self) -> &'static str {
                "pairs"
            }
            fn classify(&self, index: usize, _: &[char], _: &[Break]) -> (Break, Option<usize>) {
                (Break::Hard, Some(index + 2))
            }
        }

        let chars: Vec<char> = "abcde".chars().collect();
        let breaks = Pairs.compute_breaks(&chars);
        assert_eq!(breaks.len(), 5);
        assert!(breaks.iter().all(|b| *b == Break::Hard));
    }
}
