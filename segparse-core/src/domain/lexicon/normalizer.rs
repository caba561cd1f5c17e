//! Text normalization before lexicon matching

use crate::domain::text::{StringWrapper, SubString};
use std::fmt;

/// Maps a substring to the form a lexicon stores its terms in
pub trait Normalizer: Send + Sync {
    /// Key under which normalized projections are memoized on substrings
    fn id(&self) -> &str;

    fn normalize(&self, sub: &SubString) -> String;

    /// Normalize free text, such as a term read from configuration
    fn normalize_text(&self, text: &str) -> String {
        let wrapper = StringWrapper::new(text);
        match wrapper.substring_from(0) {
            Some(sub) => self.normalize(&sub),
            None => String::new(),
        }
    }
}

impl fmt::Debug for dyn Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Normalizer({})", self.id())
    }
}

/// Default normalizer
///
/// Keeps letters, digits, `+`, `&` and dashes; keeps `'` between letters and
/// `.`/`:` between digits. Every other run of symbols or whitespace becomes a
/// single space, and leading/trailing separators are dropped.
#[derive(Debug, Clone)]
pub struct GeneralNormalizer {
    case_insensitive: bool,
}

impl GeneralNormalizer {
    pub fn new(case_insensitive: bool) -> Self {
        Self { case_insensitive }
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn keeps(chars: &[char], index: usize) -> bool {
        let c = chars[index];
        let prev = index.checked_sub(1).and_then(|i| chars.get(i)).copied();
        let next = chars.get(index + 1).copied();
        let between = |test: fn(&char) -> bool| prev.as_ref().is_some_and(test) && next.as_ref().is_some_and(test);

        match c {
            c if c.is_alphanumeric() => true,
            '+' | '&' | '-' => true,
            '\'' => between(|c| c.is_alphabetic()),
            '.' | ':' => between(|c| c.is_ascii_digit()),
            _ => false,
        }
    }
}

impl Default for GeneralNormalizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Normalizer for GeneralNormalizer {
    fn id(&self) -> &str {
        if self.case_insensitive {
            "general:ci"
        } else {
            "general:cs"
        }
    }

    fn normalize(&self, sub: &SubString) -> String {
        let chars = sub.chars();
        let mut result = String::with_capacity(chars.len());
        let mut pending_space = false;

        for (index, c) in chars.iter().enumerate() {
            if !Self::keeps(chars, index) {
                pending_space = true;
                continue;
            }
            if pending_space && !result.is_empty() {
                result.push(' ');
            }
            pending_space = false;

            if self.case_insensitive {
                result.extend(c.to_lowercase());
            } else {
                result.push(*c);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squashes_symbols_and_whitespace() {
        let normalizer = GeneralNormalizer::new(true);
        assert_eq!(normalizer.normalize_text("  New   York,  City!! "), "new york city");
        assert_eq!(normalizer.normalize_text("(555)"), "555");
    }

    #[test]
    fn test_keeps_meaningful_punctuation() {
        let normalizer = GeneralNormalizer::new(true);
        assert_eq!(normalizer.normalize_text("Don't"), "don't");
        assert_eq!(normalizer.normalize_text("10:30"), "10:30");
        assert_eq!(normalizer.normalize_text("3.14"), "3.14");
        assert_eq!(normalizer.normalize_text("AT&T"), "at&t");
        assert_eq!(normalizer.normalize_text("a.m."), "a m");
        assert_eq!(normalizer.normalize_text("'tis"), "tis");
    }

    #[test]
    fn test_case_sensitive() {
        let normalizer = GeneralNormalizer::new(false);
        assert_eq!(normalizer.normalize_text("Paris!"), "Paris");
        assert_ne!(normalizer.id(), GeneralNormalizer::new(true).id());
    }
}
