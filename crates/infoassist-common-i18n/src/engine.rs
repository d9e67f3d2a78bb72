//! The translation engine.

use tracing::{debug, trace};

use crate::catalog::{Catalog, CatalogStore};
use crate::detect::base_language;
use crate::format::{self, DateInput, DateTimeFormatOptions, NumberFormatOptions};
use crate::interpolate::{interpolate, Variables};
use crate::Locale;

/// Construction options for [`I18n`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nOptions {
    pub default_locale: Locale,
    /// Locales the engine may switch to. `None` means only the default.
    pub supported_locales: Option<Vec<Locale>>,
}

impl I18nOptions {
    pub fn new(default_locale: impl Into<Locale>) -> Self {
        Self {
            default_locale: default_locale.into(),
            supported_locales: None,
        }
    }

    pub fn with_supported<I, L>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Locale>,
    {
        self.supported_locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }
}

impl Default for I18nOptions {
    fn default() -> Self {
        Self::new("en")
    }
}

/// Resolves message keys for the current locale.
///
/// The supported set always contains the default locale, and the current
/// locale is always a member of the supported set.
#[derive(Debug, Clone)]
pub struct I18n {
    current: Locale,
    default_locale: Locale,
    supported: Vec<Locale>,
    store: CatalogStore,
}

impl I18n {
    /// Create an engine. The current locale starts at the default.
    pub fn new(options: I18nOptions) -> Self {
        let I18nOptions {
            default_locale,
            supported_locales,
        } = options;

        let mut supported = vec![default_locale.clone()];
        for locale in supported_locales.unwrap_or_default() {
            if !supported.contains(&locale) {
                supported.push(locale);
            }
        }

        Self {
            current: default_locale.clone(),
            default_locale,
            supported,
            store: CatalogStore::new(),
        }
    }

    /// Shorthand for [`I18n::new`] with an explicit supported set.
    pub fn with_locales<I, L>(default_locale: impl Into<Locale>, supported: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Locale>,
    {
        Self::new(I18nOptions::new(default_locale).with_supported(supported))
    }

    /// Current locale.
    pub fn locale(&self) -> &str {
        &self.current
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Supported locales, default first.
    pub fn supported_locales(&self) -> Vec<Locale> {
        self.supported.clone()
    }

    pub fn is_supported(&self, locale: &str) -> bool {
        self.supported.iter().any(|s| s == locale)
    }

    /// Switch the current locale. Unsupported locales are ignored and
    /// `false` is returned.
    pub fn set_locale(&mut self, locale: &str) -> bool {
        if !self.is_supported(locale) {
            debug!(locale, supported = ?self.supported, "ignoring unsupported locale");
            return false;
        }
        self.current = locale.to_string();
        true
    }

    /// Register a catalog for a locale, merging with any existing one.
    pub fn add_catalog(&mut self, locale: impl Into<Locale>, catalog: Catalog) {
        self.store.register(locale, catalog);
    }

    /// The catalog store.
    pub fn catalogs(&self) -> &CatalogStore {
        &self.store
    }

    /// Locales consulted for a lookup, in order, without repeats.
    pub fn fallback_chain(&self) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::with_capacity(3);
        for locale in [
            self.current.as_str(),
            base_language(&self.current),
            self.default_locale.as_str(),
        ] {
            if !chain.contains(&locale) {
                chain.push(locale);
            }
        }
        chain
    }

    /// Translate a key without variables.
    pub fn translate(&self, key: &str) -> String {
        self.translate_with(key, &Variables::new())
    }

    /// Translate a key and fill its `{name}` placeholders.
    ///
    /// Returns the key itself when no locale in the fallback chain has it.
    pub fn translate_with(&self, key: &str, vars: &Variables) -> String {
        match self.resolve(key) {
            Some(template) => interpolate(template, vars),
            None => {
                trace!(key, locale = %self.current, "no template found");
                key.to_string()
            }
        }
    }

    fn resolve(&self, key: &str) -> Option<&str> {
        self.fallback_chain().into_iter().find_map(|locale| {
            let template = self.store.lookup(locale, key)?;
            if locale != self.current {
                trace!(key, from = %self.current, to = locale, "fell back");
            }
            Some(template)
        })
    }

    /// Keys of the default catalog that `locale` cannot resolve without
    /// falling back to the default locale.
    pub fn missing_keys(&self, locale: &str) -> Vec<String> {
        if locale == self.default_locale {
            return Vec::new();
        }
        let Some(reference) = self.store.catalog(&self.default_locale) else {
            return Vec::new();
        };

        let base = base_language(locale);
        reference
            .keys()
            .into_iter()
            .filter(|key| {
                self.store.lookup(locale, key).is_none() && self.store.lookup(base, key).is_none()
            })
            .collect()
    }

    pub fn format_number(&self, value: f64, options: &NumberFormatOptions) -> String {
        format::format_number(&self.current, value, options)
    }

    pub fn format_date(
        &self,
        value: impl Into<DateInput>,
        options: &DateTimeFormatOptions,
    ) -> String {
        format::format_date(&self.current, value, options)
    }

    pub fn format_time(
        &self,
        value: impl Into<DateInput>,
        options: &DateTimeFormatOptions,
    ) -> String {
        format::format_time(&self.current, value, options)
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(I18nOptions::default())
    }
}
