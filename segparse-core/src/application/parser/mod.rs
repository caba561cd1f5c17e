//! Finite-state parsing over ambiguous token streams
//!
//! The parser feeds lexical tokens through a [`Grammar`], tracking every
//! hypothesis that is still accepting input. A hypothesis that cannot
//! accept its current token retries with the token's revised (alternative)
//! boundary before it is dropped. When the first token leads nowhere the
//! parser may skip ahead, within the configured budget, and start again.

mod parse;
mod transition;


pub use parse::{insert_parse, prune_subsumed, Parse};

use crate::application::config::ParserConfig;
use crate::domain::breaks::{BreakStrategy, GeneralBreakStrategy};
use crate::domain::category::Category;
use crate::domain::grammar::{Advance, Grammar, GrammarState, RuleGrammar};
use crate::domain::lexicon::Lexicon;
use crate::domain::text::StringWrapper;
use crate::domain::tokenizer::{LexicalToken, LexicalTokenizer};
use crate::error::Result;
use std::sync::Arc;
use transition::{add_transition, Round, Transition};

/// Sentence parser over a shared grammar and lexicon
///
/// Grammar, lexicon and break strategy are shared read-only; one parser may
/// serve concurrent `parse` calls.
pub struct Parser<G: Grammar = RuleGrammar> {
    grammar: Arc<G>,
    lexicon: Arc<dyn Lexicon>,
    break_strategy: Arc<dyn BreakStrategy>,
    config: ParserConfig,
}

impl<G: Grammar> Parser<G> {
    /// Creates a parser with default configuration
    pub fn new(grammar: Arc<G>, lexicon: Arc<dyn Lexicon>) -> Self {
        Self {
            grammar,
            lexicon,
            break_strategy: Arc::new(GeneralBreakStrategy),
            config: ParserConfig::default(),
        }
    }

    /// Creates a parser with custom configuration
    pub fn with_config(
        grammar: Arc<G>,
        lexicon: Arc<dyn Lexicon>,
        config: ParserConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(grammar, lexicon)
        })
    }

    /// Use `strategy` to break sentences
    pub fn with_break_strategy(mut self, strategy: Arc<dyn BreakStrategy>) -> Self {
        self.break_strategy = strategy;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn grammar(&self) -> &Arc<G> {
        &self.grammar
    }

    pub fn lexicon(&self) -> &Arc<dyn Lexicon> {
        &self.lexicon
    }

    pub fn break_strategy(&self) -> &Arc<dyn BreakStrategy> {
        &self.break_strategy
    }

    /// Tokenizer for `sentence` under this parser's configuration
    pub fn tokenizer(&self, sentence: &str) -> LexicalTokenizer {
        LexicalTokenizer::new(
            StringWrapper::with_strategy(sentence, self.break_strategy.clone()),
            self.lexicon.clone(),
            self.config.strategy,
            self.config.skip_up_to,
        )
    }

    /// Parse one sentence
    ///
    /// Returns every maximal parse; an empty list when nothing is accepted.
    pub fn parse(&self, sentence: &str) -> Vec<Parse> {
        let tokenizer = self.tokenizer(sentence);
        self.parse_tokens(
            &tokenizer,
            self.config.accept_categories.as_deref(),
            self.config.allow_skip_after_first,
        )
    }

    /// Parse the tokens of `tokenizer`
    ///
    /// `accept` restricts root categories. After a false start the next
    /// entry is taken with `allow_skip_after_first` as its skip permission.
    pub fn parse_tokens(
        &self,
        tokenizer: &LexicalTokenizer,
        accept: Option<&[Category]>,
        allow_skip_after_first: bool,
    ) -> Vec<Parse> {
        let mut entry = tokenizer.first_entry();

        while let Some(first) = entry {
            let finals = self.execute(LexicalToken::new(first.clone()));
            if !finals.is_empty() {
                let parses = build_parses(&finals, tokenizer.wrapper(), accept);
                log::debug!(
                    "Parsed '{}': {} parses from {} final states",
                    tokenizer.input(),
                    parses.len(),
                    finals.len()
                );
                return parses;
            }

            if first.position() >= self.config.skip_up_to {
                break;
            }
            log::debug!(
                "False start at '{}' (position {}), skipping ahead",
                first.substring(),
                first.position()
            );
            entry = first.next(allow_skip_after_first);
        }

        log::debug!("No parse for '{}'", tokenizer.input());
        Vec::new()
    }

    /// Run the machine from `first`, returning terminal transitions
    fn execute(&self, first: LexicalToken) -> Vec<Transition<G::State>> {
        let mut round = self.successors(&Transition::root(first));
        let mut finals: Vec<Transition<G::State>> = Vec::new();
        let mut potential: Vec<Transition<G::State>> = Vec::new();
        let mut rounds = 0;

        while !round.is_empty() {
            rounds += 1;
            log::trace!(
                "Round {}: {} active, {} finished",
                rounds,
                round.active.len(),
                round.finished.len()
            );
            finals.extend(round.finished.iter().cloned());

            let mut next = Round::new();
            for transition in &round.active {
                next.absorb(self.successors(transition));
            }

            if self.config.ignore_extra_input {
                for transition in round.active.iter().filter(|t| t.is_terminal()) {
                    add_transition(&mut potential, transition.clone());
                }
                if next.is_empty() && !potential.is_empty() {
                    for transition in finals.iter().filter(|t| t.is_terminal()) {
                        add_transition(&mut potential, transition.clone());
                    }
                    finals = std::mem::take(&mut potential);
                }
            }

            round = next;
        }

        finals.retain(Transition::is_terminal);
        for transition in &finals {
            log::trace!("Final lineage of {} steps", transition.len());
        }
        finals
    }

    /// Transitions reachable from `transition` by accepting its token
    fn successors(&self, transition: &Transition<G::State>) -> Round<G::State> {
        let mut round = Round::new();
        let Some(mut token) = transition.next_token().cloned() else {
            return round;
        };

        let accepted = loop {
            let accepted = self.grammar.accept(&token, transition.state());
            if !accepted.is_empty() {
                break accepted;
            }
            match token.revise() {
                Some(revised) => {
                    log::trace!("No match for '{}', retrying as '{}'", token.text(), revised.text());
                    token = revised;
                }
                None => return round,
            }
        };

        for acceptance in accepted {
            let peeked = acceptance.advance == Advance::Peek;
            if peeked && transition.peek_revisits(&acceptance.state) {
                continue;
            }
            let next_token = match acceptance.advance {
                Advance::Peek => Some(acceptance.token.clone()),
                Advance::Consume => acceptance.token.next(),
            };
            round.push(transition.extend(acceptance.state, next_token, peeked));
        }
        round
    }
}

/// Trees of the final states, filtered by root category and pruned
fn build_parses<S: GrammarState>(
    finals: &[Transition<S>],
    wrapper: &StringWrapper,
    accept: Option<&[Category]>,
) -> Vec<Parse> {
    let mut parses = Vec::new();
    for state in finals.iter().filter_map(Transition::state) {
        let tree = state.build_tree();
        if let Some(accept) = accept {
            if !tree.category().is_some_and(|category| accept.contains(category)) {
                continue;
            }
        }
        insert_parse(&mut parses, Parse::new(tree, wrapper.clone()));
    }
    parses
}
