//! Parse trees built from accepted grammar states

use crate::domain::category::Category;
use crate::domain::text::SubString;
use std::fmt;
use std::sync::Arc;

/// Text a leaf node was realized from
#[derive(Debug, Clone)]
pub enum LeafSource {
    /// A span of the parsed input, possibly guessed into its category
    Span { substring: SubString, guessed: bool },
    /// Text with no backing span in the input
    Detached(String),
}

impl LeafSource {
    pub fn text(&self) -> &str {
        match self {
            LeafSource::Span { substring, .. } => substring.text(),
            LeafSource::Detached(text) => text,
        }
    }

    pub fn substring(&self) -> Option<&SubString> {
        match self {
            LeafSource::Span { substring, .. } => Some(substring),
            LeafSource::Detached(_) => None,
        }
    }

    pub fn span(&self) -> Option<(usize, usize)> {
        self.substring().map(|s| (s.start(), s.end()))
    }

    pub fn is_guessed(&self) -> bool {
        matches!(self, LeafSource::Span { guessed: true, .. })
    }
}

impl PartialEq for LeafSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LeafSource::Span { substring: a, .. }, LeafSource::Span { substring: b, .. }) => {
                a.start() == b.start() && a.end() == b.end()
            }
            (LeafSource::Detached(a), LeafSource::Detached(b)) => a == b,
            _ => false,
        }
    }
}

/// One node of a parse tree
///
/// Equality is structural: labels, categories and leaf spans.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    Branch {
        label: Arc<str>,
        category: Option<Category>,
        children: Vec<ParseNode>,
    },
    Leaf {
        label: Arc<str>,
        category: Option<Category>,
        source: LeafSource,
    },
}

impl ParseNode {
    pub fn label(&self) -> &str {
        match self {
            ParseNode::Branch { label, .. } | ParseNode::Leaf { label, .. } => label,
        }
    }

    pub fn category(&self) -> Option<&Category> {
        match self {
            ParseNode::Branch { category, .. } | ParseNode::Leaf { category, .. } => {
                category.as_ref()
            }
        }
    }

    pub fn children(&self) -> &[ParseNode] {
        match self {
            ParseNode::Branch { children, .. } => children,
            ParseNode::Leaf { .. } => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ParseNode::Leaf { .. })
    }

    /// Whether `other` equals this node or one of its descendants
    pub fn contains(&self, other: &ParseNode) -> bool {
        self == other || self.children().iter().any(|child| child.contains(other))
    }

    /// Leaves in left-to-right order
    pub fn leaves(&self) -> Vec<&ParseNode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a ParseNode>) {
        match self {
            ParseNode::Leaf { .. } => leaves.push(self),
            ParseNode::Branch { children, .. } => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    fn write_key(&self, out: &mut String) {
        match self {
            ParseNode::Leaf { label, .. } => out.push_str(label),
            ParseNode::Branch { label, children, .. } => {
                out.push('(');
                out.push_str(label);
                for child in children {
                    out.push(' ');
                    child.write_key(out);
                }
                out.push(')');
            }
        }
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseNode::Leaf { label, source, .. } => write!(f, "({} '{}')", label, source.text()),
            ParseNode::Branch {
                label, children, ..
            } => {
                write!(f, "({label}")?;
                for child in children {
                    write!(f, " {child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A complete parse tree
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    root: ParseNode,
}

impl ParseTree {
    pub fn new(root: ParseNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ParseNode {
        &self.root
    }

    /// Category of the root node
    pub fn category(&self) -> Option<&Category> {
        self.root.category()
    }

    pub fn leaves(&self) -> Vec<&ParseNode> {
        self.root.leaves()
    }

    /// Input span of every leaf, `None` for detached leaves
    pub fn leaf_spans(&self) -> Vec<Option<(usize, usize)>> {
        self.leaves()
            .into_iter()
            .map(|leaf| match leaf {
                ParseNode::Leaf { source, .. } => source.span(),
                ParseNode::Branch { .. } => None,
            })
            .collect()
    }

    /// Tree shape as nested labels, independent of the leaf text
    pub fn parse_key(&self) -> String {
        let mut key = String::new();
        self.root.write_key(&mut key);
        key
    }

    /// Whether `other` appears as a subtree of this tree
    pub fn contains(&self, other: &ParseTree) -> bool {
        self.root.contains(&other.root)
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
