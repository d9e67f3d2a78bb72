//! Message catalogs and the per-locale catalog store.
//!
//! A [`Catalog`] is a tree: leaves are template strings, inner nodes are
//! named sub-trees. Keys address leaves with dot-separated paths, so
//! `"chat.settings.title"` walks `chat` → `settings` → `title`.
//!
//! # Invariants
//!
//! 1. **Lookups never fail loudly**: a missing segment, a leaf where a
//!    sub-tree was expected, or a sub-tree where a leaf was expected all
//!    resolve to `None`.
//!
//! 2. **Registration deep-merges**: registering a second catalog for a
//!    locale overwrites leaves at equal paths and merges sub-trees
//!    recursively. Siblings are never dropped.
//!
//! 3. **Merge is idempotent**: merging the same catalog twice yields the
//!    same tree as merging it once.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Locale;

/// A nested tree of message templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Catalog {
    /// A template string, possibly containing `{name}` placeholders.
    Leaf(String),
    /// Named sub-trees.
    Node(BTreeMap<String, Catalog>),
}

impl Catalog {
    /// Create an empty catalog (an inner node without children).
    pub fn new() -> Self {
        Self::Node(BTreeMap::new())
    }

    /// Insert a template at a dotted path, creating sub-trees as needed.
    ///
    /// Inserting below an existing leaf replaces that leaf with a sub-tree.
    pub fn insert(&mut self, key: &str, template: impl Into<String>) {
        let branch = key
            .rsplit('.')
            .fold(Self::Leaf(template.into()), |child, segment| {
                Self::Node(BTreeMap::from([(segment.to_string(), child)]))
            });
        self.merge(branch);
    }

    /// Builder form of [`Catalog::insert`].
    pub fn with(mut self, key: &str, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    /// Resolve a dotted key to its template.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut node = self;
        for segment in key.split('.') {
            match node {
                Self::Node(children) => node = children.get(segment)?,
                Self::Leaf(_) => return None,
            }
        }

        match node {
            Self::Leaf(template) => Some(template.as_str()),
            Self::Node(_) => None,
        }
    }

    /// Deep-merge `incoming` into this catalog.
    ///
    /// Sub-trees merge key by key; anything else is replaced by the
    /// incoming value.
    pub fn merge(&mut self, incoming: Catalog) {
        match (self, incoming) {
            (Self::Node(base), Self::Node(extra)) => {
                for (key, value) in extra {
                    match base.get_mut(&key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
            }
            (slot, incoming) => *slot = incoming,
        }
    }

    /// All leaf paths, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Self::Node(children) = self {
            for (name, child) in children {
                collect_keys(child, name.clone(), &mut keys);
            }
        }
        keys.sort_unstable();
        keys
    }

    /// Number of leaf templates.
    pub fn len(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Node(children) => children.values().map(Self::len).sum(),
        }
    }

    /// Whether the catalog holds no templates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_keys(node: &Catalog, path: String, out: &mut Vec<String>) {
    match node {
        Catalog::Leaf(_) => out.push(path),
        Catalog::Node(children) => {
            for (name, child) in children {
                collect_keys(child, format!("{path}.{name}"), out);
            }
        }
    }
}

/// Catalogs keyed by locale. At most one catalog per locale.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalogs: HashMap<Locale, Catalog>,
}

impl CatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog, deep-merging into any catalog already held for
    /// the locale.
    pub fn register(&mut self, locale: impl Into<Locale>, catalog: Catalog) {
        let locale = locale.into();
        debug!(locale = %locale, templates = catalog.len(), "registering catalog");

        match self.catalogs.entry(locale) {
            Entry::Occupied(mut entry) => entry.get_mut().merge(catalog),
            Entry::Vacant(entry) => {
                entry.insert(catalog);
            }
        }
    }

    /// Look up a template for a locale.
    pub fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.catalogs.get(locale)?.get(key)
    }

    /// The catalog held for a locale.
    pub fn catalog(&self, locale: &str) -> Option<&Catalog> {
        self.catalogs.get(locale)
    }

    /// Locales with a registered catalog, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.catalogs.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}
