//! General-purpose break classification
//!
//! Rules, applied per codepoint:
//! - letters and digits never break, except lower-to-upper (camelCase) and
//!   letter-to-digit transitions which soft-split; digit-to-letter does not
//!   break so ordinals like "1st" stay whole
//! - whitespace, `+` and `&` are soft-full delimiters
//! - a single `-` is soft-full, a run of two or more dashes is hard
//! - `:` is hard before a space, soft-full otherwise
//! - `.` is hard before a space (soft-full if a dash follows the space),
//!   non-breaking between digits or at a word start before a digit,
//!   soft-full otherwise
//! - `'` is non-breaking between letters, hard otherwise
//! - `/` and `\` are non-breaking next to a digit or between two single
//!   letters, soft-full otherwise
//! - any other symbol is soft-full between word characters, hard otherwise

use super::{is_alnum_at, is_digit_at, Break, BreakStrategy};

/// Default break strategy for running text
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralBreakStrategy;

impl GeneralBreakStrategy {
    /// A preceding codepoint counts as a word character when it was not classified as a delimiter
    fn is_word_before(codepoints: &[char], partial: &[Break], index: isize) -> bool {
        if index < 0 {
            return false;
        }
        match partial.get(index as usize) {
            Some(brk) if !brk.skip() => true,
            _ => is_alnum_at(codepoints, index),
        }
    }

    fn is_letter_before(codepoints: &[char], partial: &[Break], index: isize) -> bool {
        if index < 0 {
            return false;
        }
        match partial.get(index as usize) {
            Some(brk) if !brk.skip() => true,
            _ => super::is_letter_at(codepoints, index),
        }
    }

    fn is_break_around(codepoints: &[char], partial: &[Break], index: isize) -> bool {
        if index < 0 || index as usize >= codepoints.len() {
            return true;
        }
        if partial.get(index as usize).is_some_and(|b| b.breaks()) {
            return true;
        }
        !is_alnum_at(codepoints, index)
    }

    fn classify_word_char(index: usize, codepoints: &[char], partial: &[Break]) -> Break {
        if index == 0 || partial.get(index - 1) != Some(&Break::None) {
            return Break::None;
        }

        let cur = codepoints[index];
        let prev = codepoints[index - 1];
        if cur.is_uppercase() && prev.is_lowercase() {
            Break::SoftSplit
        } else if cur.is_ascii_digit() && prev.is_alphabetic() {
            Break::SoftSplit
        } else {
            Break::None
        }
    }
}

impl BreakStrategy for GeneralBreakStrategy {
    fn name(&self) -> &'static str {
        "general"
    }

    fn classify(
        &self,
        index: usize,
        codepoints: &[char],
        partial: &[Break],
    ) -> (Break, Option<usize>) {
        let i = index as isize;
        let cp = codepoints[index];
        let next_is = |offset: isize, c: char| super::char_at(codepoints, i + offset) == Some(c);

        let brk = match cp {
            c if c.is_whitespace() => Break::SoftFull,
            '+' | '&' => Break::SoftFull,
            '-' => {
                if next_is(1, '-') {
                    let run_end = codepoints[index..]
                        .iter()
                        .position(|c| *c != '-')
                        .map_or(codepoints.len(), |offset| index + offset);
                    return (Break::Hard, Some(run_end));
                }
                Break::SoftFull
            }
            ':' => {
                if next_is(1, ' ') {
                    Break::Hard
                } else {
                    Break::SoftFull
                }
            }
            '.' => {
                let word_start = index == 0 || partial.get(index - 1).is_some_and(|b| b.breaks());
                if next_is(1, ' ') {
                    if next_is(2, '-') {
                        Break::SoftFull
                    } else {
                        Break::Hard
                    }
                } else if (word_start && is_digit_at(codepoints, i + 1))
                    || (is_digit_at(codepoints, i - 1) && is_digit_at(codepoints, i + 1))
                {
                    Break::None
                } else {
                    Break::SoftFull
                }
            }
            '\'' => {
                if Self::is_letter_before(codepoints, partial, i - 1)
                    && super::is_letter_at(codepoints, i + 1)
                {
                    Break::None
                } else {
                    Break::Hard
                }
            }
            '/' | '\\' => {
                let digit_adjacent =
                    is_digit_at(codepoints, i - 1) || is_digit_at(codepoints, i + 1);
                let single_letters = Self::is_letter_before(codepoints, partial, i - 1)
                    && super::is_letter_at(codepoints, i + 1)
                    && Self::is_break_around(codepoints, partial, i - 2)
                    && Self::is_break_around(codepoints, &[], i + 2);
                if digit_adjacent || single_letters {
                    Break::None
                } else {
                    Break::SoftFull
                }
            }
            c if c.is_alphanumeric() => Self::classify_word_char(index, codepoints, partial),
            _ => {
                if Self::is_word_before(codepoints, partial, i - 1) && is_alnum_at(codepoints, i + 1)
                {
                    Break::SoftFull
                } else {
                    Break::Hard
                }
            }
        };

        (brk, None)
    }
}
