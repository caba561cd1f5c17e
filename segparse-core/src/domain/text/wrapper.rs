//! Break-aware navigation over one input string

use super::substring::SubStringCell;
use super::SubString;
use crate::domain::sync::lock;
use crate::domain::breaks::{Break, BreakStrategy, GeneralBreakStrategy};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::{Arc, Mutex, OnceLock};

/// Shared handle to one input string and its memoized analysis
///
/// Cloning is cheap; clones observe the same break table and the same
/// interned substrings. All positions are codepoint indexes.
#[derive(Clone)]
pub struct StringWrapper {
    inner: Arc<WrapperInner>,
}

struct WrapperInner {
    text: String,
    codepoints: Vec<char>,
    /// Byte offset of each codepoint, plus `text.len()` as a sentinel
    byte_offsets: Vec<usize>,
    strategy: Arc<dyn BreakStrategy>,
    breaks: OnceLock<Vec<Break>>,
    word_starts: OnceLock<Vec<usize>>,
    substrings: Mutex<HashMap<(usize, usize), Arc<SubStringCell>>>,
}

impl StringWrapper {
    /// Wrap `text` using the [`GeneralBreakStrategy`]
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_strategy(text, Arc::new(GeneralBreakStrategy))
    }

    /// Wrap `text` using a specific break strategy
    pub fn with_strategy(text: impl Into<String>, strategy: Arc<dyn BreakStrategy>) -> Self {
        let text = text.into();
        let (mut byte_offsets, codepoints): (Vec<usize>, Vec<char>) = text.char_indices().unzip();
        byte_offsets.push(text.len());

        Self {
            inner: Arc::new(WrapperInner {
                text,
                codepoints,
                byte_offsets,
                strategy,
                breaks: OnceLock::new(),
                word_starts: OnceLock::new(),
                substrings: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The wrapped text
    pub fn text(&self) -> &str {
        &self.inner.text
    }

    /// Number of codepoints
    pub fn len(&self) -> usize {
        self.inner.codepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.codepoints.is_empty()
    }

    pub fn codepoints(&self) -> &[char] {
        &self.inner.codepoints
    }

    /// Name of the break strategy in use
    pub fn break_strategy_name(&self) -> &'static str {
        self.inner.strategy.name()
    }

    /// The break table, computed on first access
    pub fn breaks(&self) -> &[Break] {
        self.inner
            .breaks
            .get_or_init(|| self.inner.strategy.compute_breaks(&self.inner.codepoints))
    }

    pub fn break_at(&self, index: usize) -> Option<Break> {
        self.breaks().get(index).copied()
    }

    /// Byte range of the codepoint range `start..end`
    pub fn byte_range(&self, start: usize, end: usize) -> Range<usize> {
        let offsets = &self.inner.byte_offsets;
        let last = offsets.len() - 1;
        offsets[start.min(last)]..offsets[end.min(last)]
    }

    /// Text of the codepoint range `start..end`
    pub fn slice(&self, start: usize, end: usize) -> &str {
        &self.inner.text[self.byte_range(start, end)]
    }

    /// Whether two handles refer to the same wrapped input
    pub fn ptr_eq(&self, other: &StringWrapper) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The interned substring for `start..end`
    ///
    /// Returns `None` for empty or out-of-range requests. Repeated calls with
    /// the same range return the same substring (see [`SubString::ptr_eq`]).
    pub fn substring(&self, start: usize, end: usize) -> Option<SubString> {
        if start >= end || end > self.len() {
            return None;
        }

        let cell = {
            let mut substrings = lock(&self.inner.substrings);
            Arc::clone(
                substrings
                    .entry((start, end))
                    .or_insert_with(|| Arc::new(SubStringCell::new(start, end))),
            )
        };

        Some(SubString::new(self.clone(), cell))
    }

    /// The substring from `start` to the end of input
    pub fn substring_from(&self, start: usize) -> Option<SubString> {
        self.substring(start, self.len())
    }

    /// Number of substrings interned so far
    pub fn num_interned(&self) -> usize {
        lock(&self.inner.substrings).len()
    }

    /// First non-delimiter position at or after `from`
    pub fn next_start_index(&self, from: usize) -> Option<usize> {
        let breaks = self.breaks();
        let len = breaks.len();
        if from >= len {
            return None;
        }

        let mut index = from;
        while index < len && breaks[index].skip() {
            index += 1;
        }
        (index < len).then_some(index)
    }

    /// End of the token immediately preceding position `from`
    ///
    /// Walks back over the word ending at `from`, then over any delimiters.
    /// A soft split directly before a delimiter keeps the split position as
    /// part of the preceding token.
    pub fn prev_end_index(&self, from: usize) -> Option<usize> {
        let breaks = self.breaks();
        if from <= 1 || from > breaks.len() {
            return None;
        }

        let mut index = from as isize - 1;
        while index >= 0 && breaks[index as usize] == Break::None {
            index -= 1;
        }
        if index < 0 {
            return None;
        }

        let mut last = Break::None;
        while index >= 0 {
            let cur = breaks[index as usize];
            if cur == Break::SoftSplit && last == Break::SoftFull {
                return Some(index as usize + 1);
            }
            if !cur.skip() {
                break;
            }
            last = cur;
            index -= 1;
        }
        if index < 0 {
            return None;
        }

        let index = index as usize;
        Some(if breaks[index] == Break::SoftSplit {
            index
        } else {
            index + 1
        })
    }

    /// Longest substring starting at the first token at/after `from`
    ///
    /// Grows across soft delimiters until a hard break or the end of input.
    /// With `max_words > 0`, at most that many delimiter-separated words are
    /// included; `0` means unlimited.
    pub fn longest_substring(&self, from: usize, max_words: usize) -> Option<SubString> {
        let start = self.next_start_index(from)?;
        let breaks = self.breaks();
        let len = breaks.len();

        let mut words = 1;
        let mut end = start + 1;
        while end < len {
            match breaks[end] {
                Break::Hard => break,
                Break::SoftFull => {
                    let mut next = end;
                    while next < len && breaks[next] == Break::SoftFull {
                        next += 1;
                    }
                    if next >= len || breaks[next] == Break::Hard {
                        break;
                    }
                    if max_words > 0 && words >= max_words {
                        break;
                    }
                    words += 1;
                    end = next + 1;
                }
                _ => end += 1,
            }
        }

        self.substring(start, end)
    }

    /// Single word starting at the first token at/after `from`
    pub fn shortest_substring(&self, from: usize) -> Option<SubString> {
        let start = self.next_start_index(from)?;
        self.substring(start, self.word_end(start))
    }

    /// `sub` grown by one more word
    ///
    /// Fails at the end of input or when a hard break follows `sub`.
    pub fn longer_substring(&self, sub: &SubString) -> Option<SubString> {
        let breaks = self.breaks();
        let len = breaks.len();
        let mut next = sub.end();
        if next >= len {
            return None;
        }

        while next < len && breaks[next].skip() {
            if breaks[next] == Break::Hard {
                return None;
            }
            next += 1;
        }
        if next >= len {
            return None;
        }

        self.substring(sub.start(), self.word_end(next))
    }

    /// `sub` shrunk by its last word
    pub fn shorter_substring(&self, sub: &SubString) -> Option<SubString> {
        let end = self.prev_end_index(sub.end())?;
        if end > sub.start() {
            self.substring(sub.start(), end)
        } else {
            None
        }
    }

    /// Delimiters between the end of `sub` and the next token
    pub fn post_delims(&self, sub: &SubString) -> &str {
        let end = sub.end();
        match self.break_at(end) {
            None => "",
            Some(Break::Hard) => self.slice(end, end + 1),
            Some(_) => match self.next_start_index(end) {
                Some(next) => self.slice(end, next),
                None => "",
            },
        }
    }

    /// Whether any codepoint in `start..end` is a hard break
    pub fn has_hard_break(&self, start: usize, end: usize) -> bool {
        let breaks = self.breaks();
        breaks[start.min(breaks.len())..end.min(breaks.len())]
            .iter()
            .any(|b| *b == Break::Hard)
    }

    /// Start position of every word in the input
    pub fn word_starts(&self) -> &[usize] {
        self.inner.word_starts.get_or_init(|| {
            let mut starts = Vec::new();
            let mut from = 0;
            while let Some(start) = self.next_start_index(from) {
                starts.push(start);
                from = self.word_end(start);
            }
            starts
        })
    }

    pub fn num_words(&self) -> usize {
        self.word_starts().len()
    }

    /// Number of words that start before `index`
    pub fn word_position(&self, index: usize) -> usize {
        self.word_starts().partition_point(|start| *start < index)
    }

    fn word_end(&self, start: usize) -> usize {
        let breaks = self.breaks();
        let mut end = start + 1;
        while end < breaks.len() && !breaks[end].breaks() {
            end += 1;
        }
        end
    }
}

impl fmt::Debug for StringWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringWrapper")
            .field("text", &self.inner.text)
            .field("strategy", &self.inner.strategy.name())
            .finish()
    }
}
