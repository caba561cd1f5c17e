//! Cursor over lexicon-defined token boundaries

use super::strategy::{ReviseContext, TokenizationStrategy};
use crate::domain::category::Categories;
use crate::domain::lexicon::Lexicon;
use crate::domain::text::{StringWrapper, SubString};
use std::fmt;
use std::sync::Arc;

/// A narrowed token boundary plus the means to move it
///
/// Construction narrows eagerly: the substring held is either the first span
/// the lexicon defined while revising, or the smallest span tried. Pointers
/// are immutable; [`TokenPointer::revise`], [`TokenPointer::next`] and
/// [`TokenPointer::guess`] return new pointers.
#[derive(Clone)]
pub struct TokenPointer {
    strategy: TokenizationStrategy,
    lexicon: Arc<dyn Lexicon>,
    substring: SubString,
    ceiling: usize,
    skip_up_to: usize,
}

impl TokenPointer {
    /// Pointer at the first token of `wrapper`
    ///
    /// `skip_up_to` is the number of word positions that may be passed over
    /// while looking for a defined token.
    pub fn first(
        wrapper: &StringWrapper,
        lexicon: Arc<dyn Lexicon>,
        strategy: TokenizationStrategy,
        skip_up_to: usize,
    ) -> Option<Self> {
        let raw = strategy.start(wrapper, 0, lexicon.max_num_words())?;
        Some(Self::narrowed(strategy, lexicon, raw, skip_up_to))
    }

    fn narrowed(
        strategy: TokenizationStrategy,
        lexicon: Arc<dyn Lexicon>,
        mut raw: SubString,
        mut budget: usize,
    ) -> Self {
        let max_words = lexicon.max_num_words();
        loop {
            let ceiling = ceiling_of(&raw, max_words);
            let substring = narrow(strategy, lexicon.as_ref(), &raw, ceiling);

            let next = if substring.has_categories() || budget == 0 {
                None
            } else {
                strategy.start(substring.wrapper(), substring.end(), max_words)
            };

            match next {
                Some(next) => {
                    let traveled = next.start_word_position() - substring.start_word_position();
                    budget = budget.saturating_sub(traveled.max(1));
                    log::trace!("Skipping undefined '{}' to '{}'", substring, next);
                    raw = next;
                }
                None => {
                    return Self {
                        strategy,
                        lexicon,
                        substring,
                        ceiling,
                        skip_up_to: budget,
                    }
                }
            }
        }
    }

    pub fn strategy(&self) -> TokenizationStrategy {
        self.strategy
    }

    pub fn lexicon(&self) -> &Arc<dyn Lexicon> {
        &self.lexicon
    }

    pub fn substring(&self) -> &SubString {
        &self.substring
    }

    pub fn text(&self) -> &str {
        self.substring.text()
    }

    pub fn categories(&self) -> Categories {
        self.substring.categories()
    }

    pub fn is_defined(&self) -> bool {
        self.substring.has_categories()
    }

    /// Remaining skip budget
    pub fn skip_up_to(&self) -> usize {
        self.skip_up_to
    }

    /// Word position at which this token starts
    pub fn position(&self) -> usize {
        self.substring.start_word_position()
    }

    /// The next alternative boundary at the same start
    pub fn revise(&self) -> Option<TokenPointer> {
        let revised = self.strategy.revise(&self.context())?;
        log::trace!("Revising '{}' to '{}'", self.substring, revised);
        Some(Self::narrowed(self.strategy, self.lexicon.clone(), revised, 0))
    }

    /// The token following this one
    ///
    /// With `allow_skip` the remaining budget, reduced by the distance
    /// traveled, carries over; otherwise the next pointer may not skip.
    pub fn next(&self, allow_skip: bool) -> Option<TokenPointer> {
        let wrapper = self.substring.wrapper();
        let raw = self
            .strategy
            .start(wrapper, self.substring.end(), self.lexicon.max_num_words())?;

        let budget = if allow_skip {
            let traveled = raw.start_word_position() - self.position();
            self.skip_up_to.saturating_sub(traveled)
        } else {
            0
        };
        Some(Self::narrowed(self.strategy, self.lexicon.clone(), raw, budget))
    }

    /// A pointer at the single word here, if it may be guessed
    ///
    /// Guessing applies only once revision is exhausted and the lexicon knows
    /// nothing about the shortest span at this start.
    pub fn guess(&self) -> Option<TokenPointer> {
        let defined = self.is_defined();
        if defined && self.strategy.keeps_defined() {
            return None;
        }
        if defined && self.strategy.revise(&self.context()).is_some() {
            return None;
        }

        let shortest = self
            .substring
            .wrapper()
            .shortest_substring(self.substring.start())?;
        self.lexicon.lookup(&shortest);
        if shortest.has_categories() {
            return None;
        }

        Some(Self {
            substring: shortest,
            ..self.clone()
        })
    }

    /// Input from the beginning through the end of this token
    pub fn input_through(&self) -> Option<SubString> {
        self.substring.wrapper().substring(0, self.substring.end())
    }

    /// Input after this token
    pub fn input_beyond(&self) -> Option<SubString> {
        self.substring.remaining_after()
    }

    fn context(&self) -> ReviseContext<'_> {
        ReviseContext {
            sub: &self.substring,
            ceiling: self.ceiling,
        }
    }
}

impl fmt::Debug for TokenPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPointer")
            .field("strategy", &self.strategy)
            .field("substring", &self.substring)
            .field("skip_up_to", &self.skip_up_to)
            .finish()
    }
}

fn ceiling_of(raw: &SubString, max_words: usize) -> usize {
    raw.wrapper()
        .longest_substring(raw.start(), max_words)
        .map_or(raw.end(), |longest| longest.end().max(raw.end()))
}

/// Revise `raw` until the lexicon defines it
///
/// Returns the defined span, or the smallest span tried when none matched.
fn narrow(
    strategy: TokenizationStrategy,
    lexicon: &dyn Lexicon,
    raw: &SubString,
    ceiling: usize,
) -> SubString {
    let mut smallest = raw.clone();
    let mut current = raw.clone();
    loop {
        lexicon.lookup(&current);
        if current.has_categories() {
            return current;
        }
        if current.len() < smallest.len() {
            smallest = current.clone();
        }

        let context = ReviseContext {
            sub: &current,
            ceiling,
        };
        match strategy.revise(&context) {
            Some(revised) => current = revised,
            None => return smallest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryFactory;
    use crate::domain::lexicon::{GenericLexicon, LexiconPipeline};

    fn lexicon(factory: &CategoryFactory, entries: &[(&str, &[&str])]) -> Arc<dyn Lexicon> {
        let mut pipeline = LexiconPipeline::new();
        for (category, terms) in entries {
            let lexicon = GenericLexicon::builder(*category, factory.category(category).unwrap())
                .terms(terms.iter().copied())
                .build()
                .unwrap();
            pipeline.push(Arc::new(lexicon));
        }
        Arc::new(pipeline)
    }

    fn city_lexicon() -> (CategoryFactory, Arc<dyn Lexicon>) {
        let factory = CategoryFactory::from_definitions("city adj ?noun").unwrap();
        let lexicon = lexicon(
            &factory,
            &[("city", &["new york city"]), ("adj", &["new"]), ("noun", &["york"])],
        );
        (factory, lexicon)
    }

    #[test]
    fn test_longest_match_preferred() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("New York City");
        let pointer =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::LongestToShortest, 0)
                .unwrap();

        assert_eq!(pointer.text(), "New York City");
        assert_eq!(pointer.categories().names(), vec!["CITY"]);
    }

    #[test]
    fn test_revise_finds_shorter_definition() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("New York City");
        let pointer =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::LongestToShortest, 0)
                .unwrap();

        let revised = pointer.revise().unwrap();
        assert_eq!(revised.text(), "New");
        assert_eq!(revised.categories().names(), vec!["ADJ"]);
        assert!(revised.revise().is_none());

        let next = revised.next(false).unwrap();
        assert_eq!(next.text(), "York");
    }

    #[test]
    fn test_longest_defined_keeps_match() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("New York City");
        let pointer =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::LongestDefined, 0)
                .unwrap();

        assert_eq!(pointer.text(), "New York City");
        assert!(pointer.revise().is_none());
        assert!(pointer.guess().is_none());
    }

    #[test]
    fn test_undefined_narrows_to_smallest() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("blue sky");
        for strategy in TokenizationStrategy::ALL {
            let pointer = TokenPointer::first(&wrapper, lexicon.clone(), strategy, 0).unwrap();
            assert!(!pointer.is_defined(), "{strategy}");
            assert_eq!(pointer.text(), if strategy == TokenizationStrategy::LongestOnly {
                "blue sky"
            } else {
                "blue"
            });
        }
    }

    #[test]
    fn test_guess_unknown_word() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("blue sky");
        let pointer =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::LongestToShortest, 0)
                .unwrap();

        let guessed = pointer.guess().unwrap();
        assert_eq!(guessed.text(), "blue");
        assert!(!guessed.is_defined());
    }

    #[test]
    fn test_guess_refused_for_known_word() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("york");
        let pointer =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::LongestToShortest, 0)
                .unwrap();
        assert!(pointer.is_defined());
        assert!(pointer.guess().is_none());
    }

    #[test]
    fn test_skip_over_undefined_leading_words() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("um er york");

        let strict = TokenPointer::first(
            &wrapper,
            lexicon.clone(),
            TokenizationStrategy::ShortestOnly,
            0,
        )
        .unwrap();
        assert_eq!(strict.text(), "um");

        let skipping =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::ShortestOnly, 3).unwrap();
        assert_eq!(skipping.text(), "york");
        assert_eq!(skipping.position(), 2);
        assert_eq!(skipping.skip_up_to(), 1);
    }

    #[test]
    fn test_skip_budget_exhausts() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("um er york");
        let pointer =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::ShortestOnly, 1).unwrap();
        assert_eq!(pointer.text(), "er");
        assert_eq!(pointer.skip_up_to(), 0);
    }

    #[test]
    fn test_next_budget_decays() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("a b c d");
        let first =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::ShortestOnly, 0).unwrap();

        let no_skip = first.next(true).unwrap();
        assert_eq!(no_skip.skip_up_to(), 0);
        assert_eq!(first.next(false).unwrap().skip_up_to(), 0);
        assert!(no_skip.next(true).unwrap().next(true).unwrap().next(true).is_none());
    }

    #[test]
    fn test_input_spans() {
        let (_, lexicon) = city_lexicon();
        let wrapper = StringWrapper::new("york rocks");
        let pointer =
            TokenPointer::first(&wrapper, lexicon, TokenizationStrategy::LongestToShortest, 0)
                .unwrap();
        assert_eq!(pointer.text(), "york");
        assert_eq!(pointer.input_through().unwrap().text(), "york");
        assert_eq!(pointer.input_beyond().unwrap().text(), " rocks");
    }

    #[test]
    fn test_word_limit_agrees_across_strategies() {
        let factory = CategoryFactory::from_definitions("name").unwrap();
        let names = GenericLexicon::builder("name", factory.category("name").unwrap())
            .terms(["foobar baz"])
            .max_num_words(2)
            .build()
            .unwrap();
        let lexicon: Arc<dyn Lexicon> = Arc::new(names);
        let wrapper = StringWrapper::new("fooBar baz qux");

        for strategy in TokenizationStrategy::ALL {
            let pointer = TokenPointer::first(&wrapper, lexicon.clone(), strategy, 0).unwrap();
            if strategy == TokenizationStrategy::ShortestOnly {
                assert_eq!(pointer.text(), "foo");
                assert!(!pointer.is_defined());
            } else {
                assert_eq!(pointer.text(), "fooBar baz", "{strategy}");
                assert_eq!(pointer.categories().names(), vec!["NAME"], "{strategy}");
            }
        }
    }
}
