//! Parse states of a [`RuleGrammar`](super::RuleGrammar)

use super::GrammarState;
use crate::domain::category::Category;
use crate::domain::tokenizer::LexicalToken;
use crate::domain::tree::{LeafSource, ParseNode, ParseTree};
use std::fmt;
use std::sync::Arc;

/// Position within one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub rule: usize,
    pub pos: usize,
    /// Matches of the element at `pos` so far
    pub reps: usize,
}

/// Tree-building step recorded by a transition
#[derive(Clone)]
pub(crate) enum TreeEvent {
    Open {
        label: Arc<str>,
        category: Option<Category>,
    },
    Leaf {
        label: Arc<str>,
        category: Option<Category>,
        token: LexicalToken,
    },
    Close,
}

/// A rule-stack position plus the tree events that led to it
///
/// States form a persistent chain back to the first token; branches share
/// their common prefix.
#[derive(Clone)]
pub struct RuleState {
    node: Arc<StateNode>,
}

struct StateNode {
    stack: Vec<Frame>,
    events: Vec<TreeEvent>,
    terminal: bool,
    prev: Option<RuleState>,
}

impl RuleState {
    pub(crate) fn new(
        stack: Vec<Frame>,
        events: Vec<TreeEvent>,
        terminal: bool,
        prev: Option<RuleState>,
    ) -> Self {
        Self {
            node: Arc::new(StateNode {
                stack,
                events,
                terminal,
                prev,
            }),
        }
    }

    pub(crate) fn stack(&self) -> &[Frame] {
        &self.node.stack
    }

    /// Rule nesting depth
    pub fn depth(&self) -> usize {
        self.node.stack.len()
    }

    fn events(&self) -> Vec<&TreeEvent> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(state) = current {
            chain.push(state);
            current = state.node.prev.as_ref();
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|state| state.node.events.iter())
            .collect()
    }
}

struct OpenNode {
    label: Arc<str>,
    category: Option<Category>,
    children: Vec<ParseNode>,
}

impl OpenNode {
    fn close(self) -> ParseNode {
        ParseNode::Branch {
            label: self.label,
            category: self.category,
            children: self.children,
        }
    }
}

impl GrammarState for RuleState {
    fn is_terminal(&self) -> bool {
        self.node.terminal
    }

    fn build_tree(&self) -> ParseTree {
        let mut open: Vec<OpenNode> = Vec::new();
        let mut root = None;

        let mut attach = |open: &mut Vec<OpenNode>, node: ParseNode| match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => root = Some(node),
        };

        for event in self.events() {
            match event {
                TreeEvent::Open { label, category } => open.push(OpenNode {
                    label: label.clone(),
                    category: category.clone(),
                    children: Vec::new(),
                }),
                TreeEvent::Leaf {
                    label,
                    category,
                    token,
                } => {
                    let leaf = ParseNode::Leaf {
                        label: label.clone(),
                        category: category.clone(),
                        source: LeafSource::Span {
                            substring: token.substring().clone(),
                            guessed: token.is_guessed(),
                        },
                    };
                    attach(&mut open, leaf);
                }
                TreeEvent::Close => {
                    if let Some(node) = open.pop() {
                        attach(&mut open, node.close());
                    }
                }
            }
        }
        while let Some(node) = open.pop() {
            attach(&mut open, node.close());
        }

        ParseTree::new(root.unwrap_or_else(|| ParseNode::Branch {
            label: Arc::from(""),
            category: None,
            children: Vec::new(),
        }))
    }

    fn same_position(&self, other: &Self) -> bool {
        self.node.stack == other.node.stack
    }
}

impl fmt::Debug for RuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleState")
            .field("stack", &self.node.stack)
            .field("terminal", &self.node.terminal)
            .finish()
    }
}
