//! Finished parses

use crate::domain::category::Category;
use crate::domain::text::{StringWrapper, SubString};
use crate::domain::tree::{ParseNode, ParseTree};
use crate::error::ParseError;
use std::fmt;

/// One accepted reading of a sentence
#[derive(Debug, Clone)]
pub struct Parse {
    tree: ParseTree,
    wrapper: StringWrapper,
}

impl Parse {
    pub fn new(tree: ParseTree, wrapper: StringWrapper) -> Self {
        Self { tree, wrapper }
    }

    pub fn tree(&self) -> &ParseTree {
        &self.tree
    }

    /// Category of the root rule
    pub fn category(&self) -> Option<&Category> {
        self.tree.category()
    }

    /// The whole input sentence
    pub fn input(&self) -> &str {
        self.wrapper.text()
    }

    pub fn leaves(&self) -> Vec<&ParseNode> {
        self.tree.leaves()
    }

    /// Input span realizing each leaf
    ///
    /// Fails if a leaf was produced without a backing input token.
    pub fn leaf_substrings(&self) -> Result<Vec<SubString>, ParseError> {
        self.leaves()
            .into_iter()
            .map(|leaf| match leaf {
                ParseNode::Leaf { source, label, .. } => {
                    source
                        .substring()
                        .cloned()
                        .ok_or_else(|| ParseError::DetachedLeaf {
                            label: label.to_string(),
                        })
                }
                ParseNode::Branch { label, .. } => Err(ParseError::DetachedLeaf {
                    label: label.to_string(),
                }),
            })
            .collect()
    }

    /// Tree shape independent of leaf text
    pub fn parse_key(&self) -> String {
        self.tree.parse_key()
    }

    /// Whether any leaf was accepted on a guess
    pub fn has_guesses(&self) -> bool {
        self.leaves().into_iter().any(|leaf| match leaf {
            ParseNode::Leaf { source, .. } => source.is_guessed(),
            ParseNode::Branch { .. } => false,
        })
    }

    fn span(&self) -> Option<(usize, usize)> {
        let spans: Vec<(usize, usize)> = self.tree.leaf_spans().into_iter().flatten().collect();
        Some((spans.first()?.0, spans.last()?.1))
    }

    /// Input from the first leaf through the last
    pub fn parsed_input(&self) -> Option<SubString> {
        let (start, end) = self.span()?;
        self.wrapper.substring(start, end)
    }

    /// Input before the first leaf, without trailing delimiters
    pub fn unparsed_prior_input(&self) -> Option<SubString> {
        let (start, _) = self.span()?;
        let end = self.wrapper.prev_end_index(start)?;
        self.wrapper.substring(0, end)
    }

    /// Input after the last leaf, without leading delimiters
    pub fn unparsed_post_input(&self) -> Option<SubString> {
        let (_, end) = self.span()?;
        let start = self.wrapper.next_start_index(end)?;
        self.wrapper.substring_from(start)
    }

    /// Whether this parse covers `other`
    ///
    /// True when the leaf spans of `other` are a prefix of this parse's and
    /// this parse has more leaves, or when the spans are identical and
    /// `other`'s tree appears within this one.
    pub fn subsumes(&self, other: &Parse) -> bool {
        let mine = self.tree.leaf_spans();
        let theirs = other.tree.leaf_spans();
        if theirs.len() > mine.len() || mine[..theirs.len()] != theirs[..] {
            return false;
        }
        mine.len() > theirs.len() || self.tree.contains(&other.tree)
    }
}

impl fmt::Display for Parse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt(f)
    }
}

/// Add `parse` unless an existing parse covers it, dropping any it covers
pub fn insert_parse(parses: &mut Vec<Parse>, parse: Parse) {
    if parses.iter().any(|existing| existing.subsumes(&parse)) {
        return;
    }
    parses.retain(|existing| !parse.subsumes(existing));
    parses.push(parse);
}

/// Keep only the parses no other parse covers
pub fn prune_subsumed(parses: impl IntoIterator<Item = Parse>) -> Vec<Parse> {
    let mut kept = Vec::new();
    for parse in parses {
        insert_parse(&mut kept, parse);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::LeafSource;
    use std::sync::Arc;

    fn leaf(wrapper: &StringWrapper, label: &str, start: usize, end: usize) -> ParseNode {
        ParseNode::Leaf {
            label: Arc::from(label),
            category: None,
            source: LeafSource::Span {
                substring: wrapper.substring(start, end).unwrap(),
                guessed: false,
            },
        }
    }

    fn parse(wrapper: &StringWrapper, label: &str, children: Vec<ParseNode>) -> Parse {
        Parse::new(
            ParseTree::new(ParseNode::Branch {
                label: Arc::from(label),
                category: None,
                children,
            }),
            wrapper.clone(),
        )
    }

    #[test]
    fn test_longer_prefix_subsumes() {
        let wrapper = StringWrapper::new("the boy ate");
        let two = parse(&wrapper, "NP", vec![leaf(&wrapper, "det", 0, 3), leaf(&wrapper, "noun", 4, 7)]);
        let three = parse(
            &wrapper,
            "S",
            vec![
                leaf(&wrapper, "det", 0, 3),
                leaf(&wrapper, "noun", 4, 7),
                leaf(&wrapper, "verb", 8, 11),
            ],
        );

        assert!(three.subsumes(&two));
        assert!(!two.subsumes(&three));

        let kept = prune_subsumed(vec![two, three]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].tree().root().label(), "S");
    }

    #[test]
    fn test_same_spans_different_shape_survive() {
        let wrapper = StringWrapper::new("time flies");
        let nouns = parse(&wrapper, "NP", vec![leaf(&wrapper, "noun", 0, 4), leaf(&wrapper, "noun", 5, 10)]);
        let clause = parse(&wrapper, "S", vec![leaf(&wrapper, "noun", 0, 4), leaf(&wrapper, "verb", 5, 10)]);

        let kept = prune_subsumed(vec![nouns.clone(), clause.clone()]);
        assert_eq!(kept.len(), 2);

        // Idempotent, duplicates collapse
        assert_eq!(prune_subsumed(kept.clone()).len(), 2);
        assert_eq!(prune_subsumed(vec![nouns.clone(), nouns]).len(), 1);
    }

    #[test]
    fn test_containing_tree_subsumes() {
        let wrapper = StringWrapper::new("boy");
        let inner = parse(&wrapper, "NP", vec![leaf(&wrapper, "noun", 0, 3)]);
        let outer = Parse::new(
            ParseTree::new(ParseNode::Branch {
                label: Arc::from("S"),
                category: None,
                children: vec![inner.tree().root().clone()],
            }),
            wrapper.clone(),
        );
        assert!(outer.subsumes(&inner));
        assert!(!inner.subsumes(&outer));
    }

    #[test]
    fn test_input_spans() {
        let wrapper = StringWrapper::new("um, the boy ate fish");
        let np = parse(&wrapper, "NP", vec![leaf(&wrapper, "det", 4, 7), leaf(&wrapper, "noun", 8, 11)]);

        assert_eq!(np.parsed_input().unwrap().text(), "the boy");
        assert_eq!(np.unparsed_prior_input().unwrap().text(), "um");
        assert_eq!(np.unparsed_post_input().unwrap().text(), "ate fish");
        assert_eq!(np.leaf_substrings().unwrap().len(), 2);
        assert!(!np.has_guesses());
    }

    #[test]
    fn test_detached_leaf_is_an_error() {
        let wrapper = StringWrapper::new("x");
        let detached = parse(
            &wrapper,
            "S",
            vec![ParseNode::Leaf {
                label: Arc::from("x"),
                category: None,
                source: LeafSource::Detached("x".to_string()),
            }],
        );
        assert_eq!(
            detached.leaf_substrings(),
            Err(ParseError::DetachedLeaf {
                label: "x".to_string()
            })
        );
        assert!(detached.parsed_input().is_none());
    }
}
