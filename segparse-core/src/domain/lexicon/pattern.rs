//! Regular-expression lexicon

use super::{Lexicon, Normalizer};
use crate::domain::category::{Categories, Category};
use crate::domain::text::{SubString, NORMALIZED_ATTRIBUTE};
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::sync::Arc;

/// Lexicon that categorizes any substring whose text matches a pattern
///
/// The pattern must match the whole lookup text. Named capture groups are
/// recorded as attributes of the matched substring.
#[derive(Debug, Clone)]
pub struct PatternLexicon {
    name: String,
    category: Category,
    regex: Regex,
    definitive: bool,
    max_num_words: usize,
    normalizer: Option<Arc<dyn Normalizer>>,
}

impl PatternLexicon {
    pub fn new(name: impl Into<String>, category: Category, pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            name: name.into(),
            category,
            regex,
            definitive: false,
            max_num_words: 0,
            normalizer: None,
        })
    }

    pub fn with_definitive(mut self, definitive: bool) -> Self {
        self.definitive = definitive;
        self
    }

    pub fn with_max_num_words(mut self, max_num_words: usize) -> Self {
        self.max_num_words = max_num_words;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Lexicon for PatternLexicon {
    fn name(&self) -> &str {
        &self.name
    }

    fn define(&self, sub: &SubString) {
        let text = self.lookup_text(sub);
        let Some(captures) = self.regex.captures(&text) else {
            return;
        };

        sub.add_category(&self.category, Some(&self.name));
        sub.set_attribute(NORMALIZED_ATTRIBUTE, &*text);
        for name in self.regex.capture_names().flatten() {
            if let Some(value) = captures.name(name) {
                sub.add_attribute(name, value.as_str());
            }
        }
        if self.definitive {
            sub.set_definitive(true);
        }
    }

    fn already_has_types(&self, categories: &Categories) -> bool {
        categories.has_type(&self.category)
    }

    fn max_num_words(&self) -> usize {
        self.max_num_words
    }

    fn normalizer(&self) -> Option<&dyn Normalizer> {
        self.normalizer.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryFactory;
    use crate::domain::text::StringWrapper;

    #[test]
    fn test_whole_text_match() {
        let factory = CategoryFactory::from_definitions("number").unwrap();
        let number = factory.category("number").unwrap();
        let lexicon = PatternLexicon::new("digits", number.clone(), "[0-9]+").unwrap();

        let wrapper = StringWrapper::new("42 x42");
        let digits = wrapper.substring(0, 2).unwrap();
        let mixed = wrapper.substring(3, 6).unwrap();
        lexicon.lookup(&digits);
        lexicon.lookup(&mixed);

        assert!(digits.has_category(&number));
        assert!(!mixed.has_categories());
    }

    #[test]
    fn test_named_groups_become_attributes() {
        let factory = CategoryFactory::from_definitions("time").unwrap();
        let lexicon = PatternLexicon::new(
            "clock",
            factory.category("time").unwrap(),
            r"(?P<hour>\d{1,2}):(?P<minute>\d{2})",
        )
        .unwrap();

        let wrapper = StringWrapper::new("10:30");
        let sub = wrapper.substring_from(0).unwrap();
        lexicon.lookup(&sub);

        assert_eq!(sub.attribute("hour").as_deref(), Some("10"));
        assert_eq!(sub.attribute("minute").as_deref(), Some("30"));
    }

    #[test]
    fn test_invalid_pattern() {
        let factory = CategoryFactory::from_definitions("x").unwrap();
        match PatternLexicon::new("bad", factory.category("x").unwrap(), "(") {
            Err(ConfigError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "("),
            other => panic!("Expected InvalidPattern, got {other:?}"),
        }
    }
}
