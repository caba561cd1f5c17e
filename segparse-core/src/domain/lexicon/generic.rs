//! Term-list lexicon

use super::{Lexicon, Normalizer};
use crate::domain::category::{Categories, Category};
use crate::domain::text::{SubString, NORMALIZED_ATTRIBUTE};
use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Attributes = Vec<(String, String)>;

/// Lexicon backed by an explicit list of terms, all of one category
///
/// Terms are stored in normalized form. With attributes enabled a term line
/// reads `term,key=value,key2=value2`; common attributes are added to every
/// match.
#[derive(Clone)]
pub struct GenericLexicon {
    name: String,
    category: Category,
    normalizer: Option<Arc<dyn Normalizer>>,
    case_sensitive: bool,
    definitive: bool,
    max_num_words: usize,
    common_attributes: Attributes,
    terms: HashMap<String, Attributes>,
}

impl GenericLexicon {
    pub fn builder(name: impl Into<String>, category: Category) -> GenericLexiconBuilder {
        GenericLexiconBuilder::new(name, category)
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `text` (already in lookup form) is a known term
    pub fn contains(&self, text: &str) -> bool {
        self.terms.contains_key(&self.fold(text))
    }

    fn fold(&self, text: &str) -> String {
        if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }
}

impl Lexicon for GenericLexicon {
    fn name(&self) -> &str {
        &self.name
    }

    fn define(&self, sub: &SubString) {
        let key = self.fold(&self.lookup_text(sub));
        let Some(attributes) = self.terms.get(&key) else {
            return;
        };

        sub.add_category(&self.category, Some(&self.name));
        sub.set_attribute(NORMALIZED_ATTRIBUTE, key.as_str());
        for (name, value) in self.common_attributes.iter().chain(attributes) {
            sub.add_attribute(name.as_str(), value.as_str());
        }
        if self.definitive {
            sub.set_definitive(true);
        }
        log::trace!("{} defined '{}' as {}", self.name, sub.text(), self.category);
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

impl fmt::Debug for GenericLexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericLexicon")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("terms", &self.terms.len())
            .field("case_sensitive", &self.case_sensitive)
            .field("definitive", &self.definitive)
            .finish()
    }
}

/// Builder for [`GenericLexicon`]
pub struct GenericLexiconBuilder {
    name: String,
    category: Category,
    normalizer: Option<Arc<dyn Normalizer>>,
    case_sensitive: bool,
    definitive: bool,
    has_attributes: bool,
    max_num_words: usize,
    common_attributes: Option<String>,
    terms: Vec<String>,
}

impl GenericLexiconBuilder {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            normalizer: None,
            case_sensitive: false,
            definitive: false,
            has_attributes: false,
            max_num_words: 0,
            common_attributes: None,
            terms: Vec::new(),
        }
    }

    /// Normalize both stored terms and looked-up substrings
    pub fn normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Mark matches definitive so later lexicons are not consulted
    pub fn definitive(mut self, definitive: bool) -> Self {
        self.definitive = definitive;
        self
    }

    /// Parse `key=value` pairs after the first comma of each term
    pub fn has_attributes(mut self, has_attributes: bool) -> Self {
        self.has_attributes = has_attributes;
        self
    }

    pub fn max_num_words(mut self, max_num_words: usize) -> Self {
        self.max_num_words = max_num_words;
        self
    }

    /// Attributes (`key=value,...`) added to every match
    pub fn common_attributes(mut self, attributes: impl Into<String>) -> Self {
        self.common_attributes = Some(attributes.into());
        self
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.terms.push(term.into());
        self
    }

    pub fn terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms.extend(terms.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<GenericLexicon> {
        let common_attributes = match &self.common_attributes {
            Some(spec) => parse_attributes(spec.split(','), spec)?,
            None => Vec::new(),
        };

        let mut lexicon = GenericLexicon {
            name: self.name,
            category: self.category,
            normalizer: self.normalizer,
            case_sensitive: self.case_sensitive,
            definitive: self.definitive,
            max_num_words: self.max_num_words,
            common_attributes,
            terms: HashMap::with_capacity(self.terms.len()),
        };

        for line in &self.terms {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (term, attributes) = if self.has_attributes {
                let mut pieces = line.split(',');
                let term = pieces.next().unwrap_or_default();
                (term, parse_attributes(pieces, line)?)
            } else {
                (line, Vec::new())
            };

            let term = match &lexicon.normalizer {
                Some(normalizer) => normalizer.normalize_text(term),
                None => term.trim().to_string(),
            };
            if term.is_empty() {
                continue;
            }

            let key = lexicon.fold(&term);
            lexicon.terms.entry(key).or_default().extend(attributes);
        }

        log::info!(
            "Loaded lexicon '{}' with {} {} terms",
            lexicon.name,
            lexicon.terms.len(),
            lexicon.category
        );
        Ok(lexicon)
    }
}

fn parse_attributes<'a>(pieces: impl Iterator<Item = &'a str>, line: &str) -> Result<Attributes> {
    pieces
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| match piece.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(ConfigError::MalformedTerm(line.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryFactory;
    use crate::domain::lexicon::GeneralNormalizer;
    use crate::domain::text::StringWrapper;

    fn city(factory: &CategoryFactory) -> Category {
        factory.category("city").unwrap()
    }

    #[test]
    fn test_case_insensitive_match() {
        let factory = CategoryFactory::from_definitions("city").unwrap();
        let lexicon = GenericLexicon::builder("cities", city(&factory))
            .term("New York City")
            .build()
            .unwrap();

        let wrapper = StringWrapper::new("NEW YORK CITY");
        let sub = wrapper.substring_from(0).unwrap();
        lexicon.lookup(&sub);

        assert!(sub.has_category(&city(&factory)));
        assert_eq!(sub.attribute(NORMALIZED_ATTRIBUTE).as_deref(), Some("new york city"));
    }

    #[test]
    fn test_case_sensitive_miss() {
        let factory = CategoryFactory::from_definitions("city").unwrap();
        let lexicon = GenericLexicon::builder("cities", city(&factory))
            .case_sensitive(true)
            .term("Paris")
            .build()
            .unwrap();

        let wrapper = StringWrapper::new("paris Paris");
        let lower = wrapper.substring(0, 5).unwrap();
        let upper = wrapper.substring(6, 11).unwrap();
        lexicon.lookup(&lower);
        lexicon.lookup(&upper);

        assert!(!lower.has_categories());
        assert!(upper.has_categories());
    }

    #[test]
    fn test_normalized_terms_and_attributes() {
        let factory = CategoryFactory::from_definitions("city").unwrap();
        let lexicon = GenericLexicon::builder("cities", city(&factory))
            .normalizer(Arc::new(GeneralNormalizer::new(true)))
            .has_attributes(true)
            .common_attributes("source=gazetteer")
            .term("St. Louis,state=mo,country=us")
            .build()
            .unwrap();

        let wrapper = StringWrapper::new("st louis");
        let sub = wrapper.substring_from(0).unwrap();
        lexicon.lookup(&sub);

        assert!(sub.has_categories());
        assert_eq!(sub.attribute("state").as_deref(), Some("mo"));
        assert_eq!(sub.attribute("source").as_deref(), Some("gazetteer"));
    }

    #[test]
    fn test_malformed_attribute() {
        let factory = CategoryFactory::from_definitions("city").unwrap();
        let result = GenericLexicon::builder("cities", city(&factory))
            .has_attributes(true)
            .term("paris,capital")
            .build();

        match result {
            Err(ConfigError::MalformedTerm(line)) => assert_eq!(line, "paris,capital"),
            other => panic!("Expected MalformedTerm, got {other:?}"),
        }
    }

    #[test]
    fn test_lookup_skips_when_already_typed() {
        let factory = CategoryFactory::from_definitions("city").unwrap();
        let lexicon = GenericLexicon::builder("cities", city(&factory))
            .has_attributes(true)
            .term("paris,n=1")
            .build()
            .unwrap();

        let wrapper = StringWrapper::new("paris");
        let sub = wrapper.substring_from(0).unwrap();
        lexicon.lookup(&sub);
        lexicon.lookup(&sub);

        // A second lookup must not append the attribute again
        assert_eq!(sub.attribute("n").as_deref(), Some("1"));
        assert_eq!(lexicon.len(), 1);
        assert!(lexicon.contains("PARIS"));
    }
}
