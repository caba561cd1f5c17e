//! Interned substring views

use super::StringWrapper;
use crate::domain::sync::{lock, read, write};
use crate::domain::category::{Categories, Category};
use crate::domain::lexicon::Normalizer;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::{Arc, Mutex, RwLock};

/// Attribute recording the normalized form a lexicon matched
pub const NORMALIZED_ATTRIBUTE: &str = "normalized";

/// Per-range accumulator shared by every handle to the same range
pub(crate) struct SubStringCell {
    start: usize,
    end: usize,
    definition: RwLock<Definition>,
    projections: Mutex<HashMap<String, Projection>>,
}

#[derive(Default)]
struct Definition {
    categories: Categories,
    attributes: BTreeMap<String, String>,
    definitive: bool,
}

#[derive(Clone)]
struct Projection {
    text: Arc<str>,
    chars: Arc<[char]>,
}

impl SubStringCell {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            definition: RwLock::new(Definition::default()),
            projections: Mutex::new(HashMap::new()),
        }
    }
}

/// Half-open codepoint range `[start, end)` over a [`StringWrapper`]
///
/// Structurally identical ranges obtained from the same wrapper share one
/// accumulator, so categories and attributes added through one handle are
/// visible through all of them. Definitions only ever grow.
#[derive(Clone)]
pub struct SubString {
    wrapper: StringWrapper,
    cell: Arc<SubStringCell>,
}

impl SubString {
    pub(crate) fn new(wrapper: StringWrapper, cell: Arc<SubStringCell>) -> Self {
        Self { wrapper, cell }
    }

    pub fn wrapper(&self) -> &StringWrapper {
        &self.wrapper
    }

    pub fn start(&self) -> usize {
        self.cell.start
    }

    pub fn end(&self) -> usize {
        self.cell.end
    }

    /// Length in codepoints
    pub fn len(&self) -> usize {
        self.cell.end - self.cell.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Original text of the range
    pub fn text(&self) -> &str {
        self.wrapper.slice(self.start(), self.end())
    }

    pub fn chars(&self) -> &[char] {
        &self.wrapper.codepoints()[self.start()..self.end()]
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.wrapper.byte_range(self.start(), self.end())
    }

    /// Identity comparison: true when both handles share one interned range
    pub fn ptr_eq(&self, other: &SubString) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Number of words in the range
    pub fn num_words(&self) -> usize {
        self.wrapper.word_position(self.end()) - self.wrapper.word_position(self.start())
    }

    /// Number of words in the input before this range starts
    pub fn start_word_position(&self) -> usize {
        self.wrapper.word_position(self.start())
    }

    pub fn has_hard_break(&self) -> bool {
        self.wrapper.has_hard_break(self.start(), self.end())
    }

    pub fn post_delims(&self) -> &str {
        self.wrapper.post_delims(self)
    }

    pub fn shorter(&self) -> Option<SubString> {
        self.wrapper.shorter_substring(self)
    }

    pub fn longer(&self) -> Option<SubString> {
        self.wrapper.longer_substring(self)
    }

    /// Longest substring starting at the token after this one
    pub fn next_longest(&self, max_words: usize) -> Option<SubString> {
        self.wrapper.longest_substring(self.end(), max_words)
    }

    /// Single word following this one
    pub fn next_shortest(&self) -> Option<SubString> {
        self.wrapper.shortest_substring(self.end())
    }

    /// Everything after this range, delimiters included
    pub fn remaining_after(&self) -> Option<SubString> {
        self.wrapper.substring_from(self.end())
    }

    /// Snapshot of the categories attached so far
    pub fn categories(&self) -> Categories {
        read(&self.cell.definition).categories.clone()
    }

    pub fn has_categories(&self) -> bool {
        !read(&self.cell.definition).categories.is_empty()
    }

    pub fn has_category(&self, category: &Category) -> bool {
        read(&self.cell.definition).categories.has_type(category)
    }

    /// Attach a category, optionally recording which lexicon supplied it
    ///
    /// Returns `false` if the same category and source were already present.
    pub fn add_category(&self, category: &Category, source: Option<&str>) -> bool {
        write(&self.cell.definition).categories.add(category, source)
    }

    pub fn add_categories(&self, categories: &Categories) {
        let mut definition = write(&self.cell.definition);
        for entry in categories.entries() {
            definition.categories.add(entry.category(), entry.source());
        }
    }

    /// Whether a lexicon declared this range fully defined
    pub fn is_definitive(&self) -> bool {
        read(&self.cell.definition).definitive
    }

    pub fn set_definitive(&self, definitive: bool) {
        write(&self.cell.definition).definitive = definitive;
    }

    pub fn attribute(&self, key: &str) -> Option<String> {
        read(&self.cell.definition).attributes.get(key).cloned()
    }

    pub fn attributes(&self) -> BTreeMap<String, String> {
        read(&self.cell.definition).attributes.clone()
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        write(&self.cell.definition)
            .attributes
            .insert(key.into(), value.into());
    }

    /// Add an attribute value, comma-joining it onto any existing value
    pub fn add_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let mut definition = write(&self.cell.definition);
        definition
            .attributes
            .entry(key.into())
            .and_modify(|cur| {
                cur.push(',');
                cur.push_str(&value);
            })
            .or_insert_with(|| value.clone());
    }

    /// Text as seen through `normalizer`, memoized per normalizer id
    pub fn normalized(&self, normalizer: &dyn Normalizer) -> Arc<str> {
        self.projection(normalizer).text
    }

    /// Codepoints of [`SubString::normalized`]
    pub fn normalized_chars(&self, normalizer: &dyn Normalizer) -> Arc<[char]> {
        self.projection(normalizer).chars
    }

    fn projection(&self, normalizer: &dyn Normalizer) -> Projection {
        if let Some(cached) = lock(&self.cell.projections).get(normalizer.id()) {
            return cached.clone();
        }

        let text = normalizer.normalize(self);
        let projection = Projection {
            chars: text.chars().collect(),
            text: Arc::from(text),
        };

        lock(&self.cell.projections)
            .entry(normalizer.id().to_string())
            .or_insert(projection)
            .clone()
    }
}

impl PartialEq for SubString {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for SubString {}

impl Hash for SubString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start().hash(state);
        self.end().hash(state);
    }
}

impl fmt::Debug for SubString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubString")
            .field("range", &(self.start()..self.end()))
            .field("text", &self.text())
            .field("categories", &self.categories().names())
            .finish()
    }
}

impl fmt::Display for SubString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
