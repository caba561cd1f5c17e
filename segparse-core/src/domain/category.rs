//! Categories and the factory that mints them
//!
//! A [`Category`] is an identity-compared label. Names are upper-cased, so
//! `noun` and `NOUN` resolve to the same category. A [`Categories`] set
//! records which categories a substring matched and, optionally, which
//! lexicon supplied each one.

use crate::error::{ConfigError, Result};
use crate::domain::sync::{read, write};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

/// Prefix marking a category as guessable in category lists
pub const GUESSABLE_PREFIX: char = '?';

/// An immutable label minted by a [`CategoryFactory`]
#[derive(Clone)]
pub struct Category {
    inner: Arc<CategoryInner>,
}

struct CategoryInner {
    id: usize,
    name: String,
    can_guess: bool,
}

impl Category {
    /// Factory-unique identifier
    pub fn id(&self) -> usize {
        self.inner.id
    }

    /// Upper-cased name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether unknown terms may be guessed into this category
    pub fn can_guess(&self) -> bool {
        self.inner.can_guess
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
        self.inner.name.hash(state);
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.can_guess() {
            write!(f, "{}{}#{}", GUESSABLE_PREFIX, self.name(), self.id())
        } else {
            write!(f, "{}#{}", self.name(), self.id())
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Append-only registry of categories
///
/// Definitions are serialized behind a lock; lookups may run concurrently.
#[derive(Default)]
pub struct CategoryFactory {
    registry: RwLock<Registry>,
}

#[derive(Default)]
struct Registry {
    categories: Vec<Category>,
    by_name: HashMap<String, usize>,
}

impl CategoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a factory from a comma or whitespace separated list
    ///
    /// Names prefixed with `?` are guessable: `"?noun, verb, adj"`.
    pub fn from_definitions(definitions: &str) -> Result<Self> {
        let factory = Self::new();
        factory.define_all(
            definitions
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty()),
        )?;
        Ok(factory)
    }

    /// Mint a new category
    ///
    /// Fails if the upper-cased name is already registered.
    pub fn define_category(&self, name: &str, can_guess: bool) -> Result<Category> {
        let name = name.trim().to_uppercase();
        if name.is_empty() {
            return Err(ConfigError::InvalidConfig {
                reason: "Category name must not be empty".to_string(),
            });
        }

        let mut registry = write(&self.registry);
        if registry.by_name.contains_key(&name) {
            return Err(ConfigError::DuplicateCategory(name));
        }

        let category = Category {
            inner: Arc::new(CategoryInner {
                id: registry.categories.len(),
                name: name.clone(),
                can_guess,
            }),
        };
        let index = registry.categories.len();
        registry.categories.push(category.clone());
        registry.by_name.insert(name, index);

        Ok(category)
    }

    /// Define a category from a list entry such as `?noun`
    pub fn define(&self, definition: &str) -> Result<Category> {
        let definition = definition.trim();
        match definition.strip_prefix(GUESSABLE_PREFIX) {
            Some(name) => self.define_category(name, true),
            None => self.define_category(definition, false),
        }
    }

    /// Define every entry of `definitions`
    pub fn define_all<'a>(
        &self,
        definitions: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<Category>> {
        definitions.into_iter().map(|d| self.define(d)).collect()
    }

    /// Look up a category by name (case-insensitive)
    pub fn category(&self, name: &str) -> Result<Category> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownCategory(name.trim().to_uppercase()))
    }

    pub fn get(&self, name: &str) -> Option<Category> {
        let registry = read(&self.registry);
        registry
            .by_name
            .get(&name.trim().to_uppercase())
            .map(|index| registry.categories[*index].clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        read(&self.registry).categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All categories in definition order
    pub fn categories(&self) -> Vec<Category> {
        read(&self.registry).categories.clone()
    }
}

impl fmt::Debug for CategoryFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.categories()).finish()
    }
}

/// One matched category and the lexicon that supplied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    category: Category,
    source: Option<Arc<str>>,
}

impl CategoryEntry {
    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Set of matched categories with optional provenance
#[derive(Debug, Clone, Default)]
pub struct Categories {
    entries: SmallVec<[CategoryEntry; 4]>,
}

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category; returns `false` if this category/source pair was present
    pub fn add(&mut self, category: &Category, source: Option<&str>) -> bool {
        let exists = self
            .entries
            .iter()
            .any(|e| e.category == *category && e.source() == source);
        if !exists {
            self.entries.push(CategoryEntry {
                category: category.clone(),
                source: source.map(Arc::from),
            });
        }
        !exists
    }

    pub fn entries(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.entries.iter()
    }

    /// Distinct categories in insertion order
    pub fn types(&self) -> Vec<Category> {
        let mut types: Vec<Category> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !types.contains(&entry.category) {
                types.push(entry.category.clone());
            }
        }
        types
    }

    pub fn has_type(&self, category: &Category) -> bool {
        self.entries.iter().any(|e| e.category == *category)
    }

    pub fn has_any(&self, categories: &[Category]) -> bool {
        categories.iter().any(|c| self.has_type(c))
    }

    pub fn contains_all(&self, categories: &[Category]) -> bool {
        categories.iter().all(|c| self.has_type(c))
    }

    /// Whether every category type in `other` is also present here
    pub fn subsumes(&self, other: &Categories) -> bool {
        other.entries.iter().all(|e| self.has_type(&e.category))
    }

    /// Lexicons that supplied `category`
    pub fn sources_of(&self, category: &Category) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.category == *category)
            .filter_map(|e| e.source())
            .collect()
    }

    /// Number of distinct category types
    pub fn len(&self) -> usize {
        self.types().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.types().iter().map(|c| c.name().to_string()).collect()
    }
}
