//! Grammar rules and their text format
//!
//! One rule per line:
//!
//! ```text
//! # comment
//! S <- Subject Direct_Object
//! NP <- det? adj* noun+
//! VP <- verb . NP        # '.' : the rule may end after 'verb'
//! ```
//!
//! `->` is accepted in place of `<-`. Quantifiers may be written as a suffix
//! or as a separate token.

use super::token::GrammarToken;
use crate::domain::category::CategoryFactory;
use crate::error::{ConfigError, Result};
use std::fmt;

const END_MARK: &str = ".";

/// How many times an element may repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantifier {
    #[default]
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Quantifier {
    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '?' => Some(Quantifier::Optional),
            '*' => Some(Quantifier::ZeroOrMore),
            '+' => Some(Quantifier::OneOrMore),
            _ => None,
        }
    }

    pub fn min(self) -> usize {
        match self {
            Quantifier::One | Quantifier::OneOrMore => 1,
            Quantifier::Optional | Quantifier::ZeroOrMore => 0,
        }
    }

    /// Upper bound; `None` means unbounded
    pub fn max(self) -> Option<usize> {
        match self {
            Quantifier::One | Quantifier::Optional => Some(1),
            Quantifier::ZeroOrMore | Quantifier::OneOrMore => None,
        }
    }

    pub fn is_repeated(self) -> bool {
        self.max().is_none()
    }

    fn symbol(self) -> &'static str {
        match self {
            Quantifier::One => "",
            Quantifier::Optional => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        }
    }
}

/// A right-hand-side position
#[derive(Debug, Clone)]
pub struct Element {
    token: GrammarToken,
    quantifier: Quantifier,
    may_end: bool,
}

impl Element {
    pub fn token(&self) -> &GrammarToken {
        &self.token
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// Whether the rule may end right after this element
    pub fn may_end(&self) -> bool {
        self.may_end
    }

    /// Whether matching this element always consumes input
    pub(crate) fn consumes(&self) -> bool {
        self.quantifier.min() > 0 && !self.token.is_peek()
    }
}

/// `lhs <- elements...`
#[derive(Debug, Clone)]
pub struct Rule {
    lhs: GrammarToken,
    elements: Vec<Element>,
    /// Elements that may be passed over because they expand into a rule
    /// that matches nothing
    skippable: Vec<bool>,
}

impl Rule {
    pub fn lhs(&self) -> &GrammarToken {
        &self.lhs
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Whether the rule can be satisfied from position `pos` after `reps`
    /// matches of the element there
    pub(crate) fn can_finish(&self, mut pos: usize, mut reps: usize) -> bool {
        while let Some(element) = self.elements.get(pos) {
            if reps < element.quantifier.min() && !self.skippable[pos] {
                return false;
            }
            if element.may_end {
                return true;
            }
            pos += 1;
            reps = 0;
        }
        true
    }

    /// Positions where the next token may be matched, with prior repetitions
    pub(crate) fn candidates(&self, mut pos: usize, mut reps: usize) -> Vec<(usize, usize)> {
        let mut candidates = Vec::new();
        while let Some(element) = self.elements.get(pos) {
            if element.quantifier.max().map_or(true, |max| reps < max) {
                candidates.push((pos, reps));
            }
            if reps < element.quantifier.min() && !self.skippable[pos] {
                break;
            }
            pos += 1;
            reps = 0;
        }
        candidates
    }

    /// Elements that may be matched first
    pub(crate) fn leading(&self) -> impl Iterator<Item = &Element> {
        self.candidates(0, 0)
            .into_iter()
            .map(move |(pos, _)| &self.elements[pos])
    }

    pub(crate) fn is_skippable(&self, pos: usize) -> bool {
        self.skippable.get(pos).copied().unwrap_or(false)
    }

    pub(crate) fn mark_skippable(&mut self, pos: usize) {
        if let Some(flag) = self.skippable.get_mut(pos) {
            *flag = true;
        }
    }

    /// Whether the rule can match an empty token sequence
    pub(crate) fn derives_empty(&self) -> bool {
        (0..self.elements.len())
            .all(|pos| self.elements[pos].quantifier.min() == 0 || self.skippable[pos])
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-", self.lhs)?;
        for element in &self.elements {
            write!(f, " {}{}", element.token, element.quantifier.symbol())?;
            if element.may_end {
                write!(f, " {END_MARK}")?;
            }
        }
        Ok(())
    }
}

/// Parse every rule in `text`
pub fn parse_rules(text: &str, factory: &CategoryFactory) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        rules.push(parse_rule(line, index + 1, factory)?);
    }
    Ok(rules)
}

fn parse_rule(text: &str, line: usize, factory: &CategoryFactory) -> Result<Rule> {
    let syntax = |reason: String| ConfigError::GrammarSyntax { line, reason };

    let (lhs, rhs) = text
        .split_once("<-")
        .or_else(|| text.split_once("->"))
        .ok_or_else(|| syntax("expected '<-' between rule name and body".to_string()))?;

    let lhs = lhs.trim();
    if lhs.split_whitespace().count() != 1 {
        return Err(syntax(format!("rule name '{lhs}' must be a single token")));
    }
    let lhs = GrammarToken::parse(lhs, factory, line)?;
    if !lhs.is_plain() {
        return Err(syntax(format!("rule name '{lhs}' must not carry prefixes")));
    }

    let mut elements: Vec<Element> = Vec::new();
    for piece in rhs.split_whitespace() {
        if piece == END_MARK {
            let last = elements
                .last_mut()
                .ok_or_else(|| syntax("'.' must follow an element".to_string()))?;
            last.may_end = true;
            continue;
        }

        let mut chars = piece.chars();
        if let (Some(symbol), None) = (chars.next(), chars.next()) {
            if let Some(quantifier) = Quantifier::from_symbol(symbol) {
                let last = elements
                    .last_mut()
                    .filter(|last| last.quantifier == Quantifier::One && !last.may_end)
                    .ok_or_else(|| syntax(format!("misplaced quantifier '{piece}'")))?;
                last.quantifier = quantifier;
                continue;
            }
        }

        let (label, quantifier) = match piece
            .chars()
            .last()
            .and_then(Quantifier::from_symbol)
        {
            Some(quantifier) => (&piece[..piece.len() - 1], quantifier),
            None => (piece, Quantifier::One),
        };
        elements.push(Element {
            token: GrammarToken::parse(label, factory, line)?,
            quantifier,
            may_end: false,
        });
    }

    if elements.is_empty() {
        return Err(syntax(format!("rule '{lhs}' has an empty body")));
    }

    Ok(Rule {
        lhs,
        skippable: vec![false; elements.len()],
        elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> CategoryFactory {
        CategoryFactory::from_definitions("s np vp det adj noun verb").unwrap()
    }

    #[test]
    fn test_parse_quantifiers_and_marks() {
        let rules = parse_rules(
            "# noun phrases\nNP <- det? adj * noun+\n\nVP -> verb . NP  # trailing comment\n",
            &factory(),
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        let np = &rules[0];
        assert_eq!(np.lhs().label(), "NP");
        let quantifiers: Vec<_> = np.elements().iter().map(Element::quantifier).collect();
        assert_eq!(
            quantifiers,
            vec![Quantifier::Optional, Quantifier::ZeroOrMore, Quantifier::OneOrMore]
        );

        let vp = &rules[1];
        assert!(vp.elements()[0].may_end());
        assert_eq!(vp.to_string(), "VP <- verb . NP");
    }

    #[test]
    fn test_syntax_errors() {
        let factory = factory();
        for (text, line) in [
            ("NP det noun", 1),
            ("\nNP <-", 2),
            ("NP NP <- det", 1),
            ("_np <- det", 1),
            ("NP <- . det", 1),
            ("NP <- * det", 1),
            ("NP <- det? ?", 1),
        ] {
            match parse_rules(text, &factory) {
                Err(ConfigError::GrammarSyntax { line: got, .. }) => assert_eq!(got, line, "{text}"),
                other => panic!("Expected GrammarSyntax for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_can_finish_and_candidates() {
        let rules = parse_rules("NP <- det? adj* noun . adj", &factory()).unwrap();
        let np = &rules[0];

        assert_eq!(np.candidates(0, 0), vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!(np.candidates(1, 2), vec![(1, 2), (2, 0)]);
        assert!(!np.can_finish(1, 1));
        assert!(np.can_finish(2, 1));
        assert!(np.can_finish(3, 1));
        assert!(!np.derives_empty());
    }

    #[test]
    fn test_skippable_element() {
        let mut rules = parse_rules("S <- NP verb\nNP <- det?", &factory()).unwrap();
        assert!(rules[1].derives_empty());
        assert!(!rules[0].derives_empty());
        assert_eq!(rules[0].candidates(0, 0), vec![(0, 0)]);

        rules[0].mark_skippable(0);
        assert!(rules[0].is_skippable(0));
        assert_eq!(rules[0].candidates(0, 0), vec![(0, 0), (1, 0)]);
        assert!(!rules[0].can_finish(0, 0));
        assert!(rules[0].can_finish(1, 1));
    }

    #[test]
    fn test_peek_does_not_derive_empty() {
        let rules = parse_rules("NP <- det? &noun", &factory()).unwrap();
        assert!(!rules[0].derives_empty());
    }
}
