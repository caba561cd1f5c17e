//! Parse hypotheses as persistent lineage chains

use crate::domain::grammar::GrammarState;
use crate::domain::tokenizer::LexicalToken;
use std::sync::Arc;

/// One step of one hypothesis: the state reached, the token to feed next,
/// and the step before it
///
/// Branches share their common prefix; cloning is cheap.
pub(crate) struct Transition<S> {
    node: Arc<TransitionNode<S>>,
}

struct TransitionNode<S> {
    state: Option<S>,
    next_token: Option<LexicalToken>,
    /// Reached by matching without consuming
    peeked: bool,
    prev: Option<Transition<S>>,
}

impl<S> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<S: GrammarState> Transition<S> {
    /// Start of a lineage, before any token is accepted
    pub fn root(token: LexicalToken) -> Self {
        Self {
            node: Arc::new(TransitionNode {
                state: None,
                next_token: Some(token),
                peeked: false,
                prev: None,
            }),
        }
    }

    pub fn extend(&self, state: S, next_token: Option<LexicalToken>, peeked: bool) -> Self {
        Self {
            node: Arc::new(TransitionNode {
                state: Some(state),
                next_token,
                peeked,
                prev: Some(self.clone()),
            }),
        }
    }

    pub fn state(&self) -> Option<&S> {
        self.node.state.as_ref()
    }

    pub fn next_token(&self) -> Option<&LexicalToken> {
        self.node.next_token.as_ref()
    }

    /// Whether there is input left to feed
    pub fn is_active(&self) -> bool {
        self.node.next_token.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_some_and(GrammarState::is_terminal)
    }

    pub fn prev(&self) -> Option<&Transition<S>> {
        self.node.prev.as_ref()
    }

    /// Whether `earlier` is this transition or one of its ancestors
    pub fn descends_from(&self, earlier: &Transition<S>) -> bool {
        let mut current = Some(self);
        while let Some(transition) = current {
            if Arc::ptr_eq(&transition.node, &earlier.node) {
                return true;
            }
            current = transition.prev();
        }
        false
    }

    /// Whether a peek into `state` would return to a position already held
    /// on the current token
    pub fn peek_revisits(&self, state: &S) -> bool {
        let mut current = Some(self);
        while let Some(transition) = current {
            if transition.state().is_some_and(|s| s.same_position(state)) {
                return true;
            }
            if !transition.node.peeked {
                break;
            }
            current = transition.prev();
        }
        false
    }

    /// Number of accepted steps in the lineage
    pub fn len(&self) -> usize {
        let mut len = 0;
        let mut current = self.prev();
        while let Some(transition) = current {
            len += 1;
            current = transition.prev();
        }
        len
    }
}

/// New transitions of one round, split by whether input remains
pub(crate) struct Round<S> {
    pub finished: Vec<Transition<S>>,
    pub active: Vec<Transition<S>>,
}

impl<S: GrammarState> Round<S> {
    pub fn new() -> Self {
        Self {
            finished: Vec::new(),
            active: Vec::new(),
        }
    }

    pub fn push(&mut self, transition: Transition<S>) {
        if transition.is_active() {
            self.active.push(transition);
        } else {
            self.finished.push(transition);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.finished.is_empty() && self.active.is_empty()
    }

    pub fn absorb(&mut self, other: Round<S>) {
        self.finished.extend(other.finished);
        self.active.extend(other.active);
    }
}

/// Add `transition`, dropping entries it is a continuation of
pub(crate) fn add_transition<S: GrammarState>(
    transitions: &mut Vec<Transition<S>>,
    transition: Transition<S>,
) {
    transitions.retain(|earlier| !transition.descends_from(earlier));
    transitions.push(transition);
}
