//! Lexicons attach categories to substrings
//!
//! A [`Lexicon`] is consulted with a [`SubString`] and, when it recognizes
//! the (normalized) text, adds one or more categories and attributes to it.
//! Lookups are side-effecting on the substring's accumulator only; lexicons
//! themselves are immutable after construction and safe to share.

mod generic;
mod normalizer;
mod pattern;

pub use generic::{GenericLexicon, GenericLexiconBuilder};
pub use normalizer::{GeneralNormalizer, Normalizer};
pub use pattern::PatternLexicon;

use crate::domain::category::Categories;
use crate::domain::text::SubString;
use std::fmt;
use std::sync::Arc;

/// A source of category definitions
pub trait Lexicon: Send + Sync {
    /// Identifier recorded as the provenance of categories this lexicon adds
    fn name(&self) -> &str;

    /// Attempt to define `sub`
    ///
    /// Skips the work when `sub` is already definitive or already carries
    /// every category this lexicon could contribute.
    fn lookup(&self, sub: &SubString) {
        if sub.is_definitive() || self.already_has_types(&sub.categories()) {
            return;
        }
        self.define(sub);
    }

    /// Match `sub` and attach categories/attributes on success
    fn define(&self, sub: &SubString);

    /// Whether `categories` already includes everything this lexicon contributes
    fn already_has_types(&self, categories: &Categories) -> bool;

    /// Upper bound on words in a single term; `0` means unlimited
    fn max_num_words(&self) -> usize {
        0
    }

    /// Normalizer applied to substrings before matching
    fn normalizer(&self) -> Option<&dyn Normalizer> {
        None
    }

    /// Text this lexicon matches against for `sub`
    fn lookup_text(&self, sub: &SubString) -> Arc<str> {
        match self.normalizer() {
            Some(normalizer) => sub.normalized(normalizer),
            None => Arc::from(sub.text()),
        }
    }
}

/// Several lexicons consulted in order
///
/// Stops as soon as one of them marks the substring definitive.
#[derive(Clone, Default)]
pub struct LexiconPipeline {
    lexicons: Vec<Arc<dyn Lexicon>>,
}

impl LexiconPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lexicon
    pub fn with(mut self, lexicon: Arc<dyn Lexicon>) -> Self {
        self.lexicons.push(lexicon);
        self
    }

    pub fn push(&mut self, lexicon: Arc<dyn Lexicon>) {
        self.lexicons.push(lexicon);
    }

    pub fn len(&self) -> usize {
        self.lexicons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicons.is_empty()
    }

    pub fn lexicons(&self) -> &[Arc<dyn Lexicon>] {
        &self.lexicons
    }
}

impl Lexicon for LexiconPipeline {
    fn name(&self) -> &str {
        "pipeline"
    }

    fn lookup(&self, sub: &SubString) {
        for lexicon in &self.lexicons {
            if sub.is_definitive() {
                break;
            }
            lexicon.lookup(sub);
        }
    }

    fn define(&self, sub: &SubString) {
        for lexicon in &self.lexicons {
            if sub.is_definitive() {
                break;
            }
            lexicon.define(sub);
        }
    }

    fn already_has_types(&self, categories: &Categories) -> bool {
        self.lexicons
            .iter()
            .all(|lexicon| lexicon.already_has_types(categories))
    }

    /// Largest member bound, or unlimited if any member is unlimited
    fn max_num_words(&self) -> usize {
        let mut max = 0;
        for lexicon in &self.lexicons {
            match lexicon.max_num_words() {
                0 => return 0,
                n => max = max.max(n),
            }
        }
        max
    }
}

impl fmt::Debug for LexiconPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.lexicons.iter().map(|l| l.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryFactory;
    use crate::domain::text::StringWrapper;

    fn terms(factory: &CategoryFactory, name: &str, category: &str, words: &[&str]) -> GenericLexicon {
        GenericLexicon::builder(name, factory.category(category).unwrap())
            .terms(words.iter().copied())
            .build()
            .unwrap()
    }

    #[test]
    fn test_pipeline_collects_from_all_members() {
        let factory = CategoryFactory::from_definitions("noun verb").unwrap();
        let pipeline = LexiconPipeline::new()
            .with(Arc::new(terms(&factory, "nouns", "noun", &["fish"])))
            .with(Arc::new(terms(&factory, "verbs", "verb", &["fish"])));

        let wrapper = StringWrapper::new("fish");
        let sub = wrapper.substring(0, 4).unwrap();
        pipeline.lookup(&sub);

        assert_eq!(sub.categories().names(), vec!["NOUN", "VERB"]);
        assert_eq!(sub.categories().sources_of(&factory.category("verb").unwrap()), vec!["verbs"]);
    }

    #[test]
    fn test_pipeline_stops_at_definitive() {
        let factory = CategoryFactory::from_definitions("noun verb").unwrap();
        let nouns = GenericLexicon::builder("nouns", factory.category("noun").unwrap())
            .term("fish")
            .definitive(true)
            .build()
            .unwrap();
        let pipeline = LexiconPipeline::new()
            .with(Arc::new(nouns))
            .with(Arc::new(terms(&factory, "verbs", "verb", &["fish"])));

        let wrapper = StringWrapper::new("fish");
        let sub = wrapper.substring(0, 4).unwrap();
        pipeline.lookup(&sub);

        assert!(sub.is_definitive());
        assert_eq!(sub.categories().names(), vec!["NOUN"]);
    }

    #[test]
    fn test_pipeline_max_num_words() {
        let factory = CategoryFactory::from_definitions("a").unwrap();
        let bounded = GenericLexicon::builder("bounded", factory.category("a").unwrap())
            .max_num_words(3)
            .build()
            .unwrap();
        let unbounded = terms(&factory, "unbounded", "a", &[]);

        let pipeline = LexiconPipeline::new().with(Arc::new(bounded.clone()));
        assert_eq!(pipeline.max_num_words(), 3);

        let pipeline = pipeline.with(Arc::new(unbounded));
        assert_eq!(pipeline.max_num_words(), 0);
    }
}
