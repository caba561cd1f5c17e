//! Property-based tests for breaks, interning, token revision and pruning

use proptest::prelude::*;
use segparse_core::application::prune_subsumed;
use segparse_core::{
    CategoryFactory, LeafSource, Lexicon, LexiconPipeline, Parse, ParseNode, ParseTree,
    PatternLexicon, StringWrapper, TokenPointer, TokenizationStrategy,
};
use std::sync::Arc;

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,6}", 1..8).prop_map(|words| words.join(" "))
}

fn everything_lexicon() -> Arc<dyn Lexicon> {
    let factory = CategoryFactory::from_definitions("any").unwrap();
    Arc::new(PatternLexicon::new("any", factory.category("any").unwrap(), ".+").unwrap())
}

fn word_spans(wrapper: &StringWrapper) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some(word) = wrapper.shortest_substring(from) {
        spans.push((word.start(), word.end()));
        from = word.end();
    }
    spans
}

proptest! {
    #[test]
    fn prop_breaks_are_deterministic(text in "[a-zA-Z0-9 ,.:'-]{0,40}") {
        let first = StringWrapper::new(text.clone());
        let second = StringWrapper::new(text.clone());
        prop_assert_eq!(first.breaks(), second.breaks());
        prop_assert_eq!(first.breaks().len(), text.chars().count());
    }

    #[test]
    fn prop_substrings_are_interned(text in sentence(), a in 0usize..40, b in 0usize..40) {
        let wrapper = StringWrapper::new(text);
        let (start, end) = (a.min(b), a.max(b));
        match (wrapper.substring(start, end), wrapper.substring(start, end)) {
            (Some(x), Some(y)) => prop_assert!(x.ptr_eq(&y)),
            (None, None) => prop_assert!(start == end || end > wrapper.len()),
            _ => prop_assert!(false, "interning returned mixed results"),
        }
    }

    #[test]
    fn prop_revision_shrinks_from_the_same_start(text in sentence()) {
        let wrapper = StringWrapper::new(text);
        let mut pointer = TokenPointer::first(
            &wrapper,
            everything_lexicon(),
            TokenizationStrategy::LongestToShortest,
            0,
        )
        .unwrap();
        let start = pointer.substring().start();

        while let Some(revised) = pointer.revise() {
            prop_assert_eq!(revised.substring().start(), start);
            prop_assert!(revised.substring().end() < pointer.substring().end());
            pointer = revised;
        }
        prop_assert_eq!(pointer.substring().num_words(), 1);
    }

    #[test]
    fn prop_skip_budget_never_grows(text in sentence(), skip in 0usize..6) {
        let wrapper = StringWrapper::new(text);
        let lexicon: Arc<dyn Lexicon> = Arc::new(LexiconPipeline::new());
        let mut pointer = TokenPointer::first(
            &wrapper,
            lexicon,
            TokenizationStrategy::ShortestOnly,
            skip,
        );

        let mut budget = skip;
        while let Some(current) = pointer {
            prop_assert!(current.skip_up_to() <= budget);
            budget = current.skip_up_to();
            pointer = current.next(true);
        }
    }

    #[test]
    fn prop_pruning_is_idempotent(
        text in sentence(),
        shapes in prop::collection::vec((0usize..3, 1usize..8), 1..6),
    ) {
        let wrapper = StringWrapper::new(text);
        let spans = word_spans(&wrapper);
        let labels = ["S", "NP", "VP"];

        let parses: Vec<Parse> = shapes
            .iter()
            .map(|&(label, leaves)| {
                let children = spans
                    .iter()
                    .take(leaves)
                    .map(|&(start, end)| ParseNode::Leaf {
                        label: Arc::from("word"),
                        category: None,
                        source: LeafSource::Span {
                            substring: wrapper.substring(start, end).unwrap(),
                            guessed: false,
                        },
                    })
                    .collect();
                Parse::new(
                    ParseTree::new(ParseNode::Branch {
                        label: Arc::from(labels[label]),
                        category: None,
                        children,
                    }),
                    wrapper.clone(),
                )
            })
            .collect();

        let once = prune_subsumed(parses);
        let twice = prune_subsumed(once.clone());
        prop_assert_eq!(once.len(), twice.len());
        for (i, a) in once.iter().enumerate() {
            for (j, b) in once.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.subsumes(b));
                }
            }
        }
    }
}
