//! Break classification for date and time expressions
//!
//! Field separators between digits (`10:30`, `1/2/2024`, `2024-01-02`) become
//! hard breaks so each numeric field is its own token, and a digit followed by
//! a letter soft-splits so `5pm` can be read as `5` + `pm`. Everything else
//! is delegated to [`GeneralBreakStrategy`].

use super::{is_digit_at, Break, BreakStrategy, GeneralBreakStrategy};

/// Break strategy for numeric dates and times
#[derive(Debug, Clone)]
pub struct DateTimeBreakStrategy {
    separators: Vec<char>,
    fallback: GeneralBreakStrategy,
}

impl DateTimeBreakStrategy {
    /// Default separators `:`, `/` and `-`
    pub fn new() -> Self {
        Self::with_separators([':', '/', '-'])
    }

    /// Use a custom set of field separators
    pub fn with_separators(separators: impl IntoIterator<Item = char>) -> Self {
        Self {
            separators: separators.into_iter().collect(),
            fallback: GeneralBreakStrategy,
        }
    }
}

impl Default for DateTimeBreakStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakStrategy for DateTimeBreakStrategy {
    fn name(&self) -> &'static str {
        "date-time"
    }

    fn classify(
        &self,
        index: usize,
        codepoints: &[char],
        partial: &[Break],
    ) -> (Break, Option<usize>) {
        let i = index as isize;
        let cp = codepoints[index];

        if self.separators.contains(&cp)
            && is_digit_at(codepoints, i - 1)
            && is_digit_at(codepoints, i + 1)
        {
            return (Break::Hard, None);
        }

        if cp.is_alphabetic() && is_digit_at(codepoints, i - 1) {
            return (Break::SoftSplit, None);
        }

        self.fallback.classify(index, codepoints, partial)
    }
}
