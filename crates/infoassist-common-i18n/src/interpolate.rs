//! `{name}` placeholder substitution.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Named values substituted into message templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    /// Create an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable. The value is stored in its display form.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        self.values.insert(name.into(), value.to_string());
    }

    /// Builder form of [`Variables::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}

impl<K: Into<String>, V: Display, const N: usize> From<[(K, V); N]> for Variables {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"))
}

/// Replace every `{name}` in `template` with the matching variable.
///
/// Placeholders without a matching variable are kept verbatim, so a
/// forgotten argument shows up as `{name}` in the UI instead of vanishing.
/// Substitution is a single pass; inserted values are never rescanned.
pub fn interpolate(template: &str, vars: &Variables) -> String {
    if vars.is_empty() || !template.contains('{') {
        return template.to_string();
    }

    placeholder()
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
