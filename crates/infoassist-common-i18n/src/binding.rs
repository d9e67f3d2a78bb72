//! Binding layer between the engine and its consumers.
//!
//! An [`I18nProvider`] owns the engine together with three collaborators:
//! a [`LocaleStore`] that persists the user's choice, a
//! [`LanguageDetector`] consulted once at startup, and a [`LangAttribute`]
//! sink that mirrors the active locale (the document `lang` attribute in a
//! UI host). Consumers reach the provider through an [`I18nScope`]; asking
//! for a context outside a provider is the one hard failure of the crate.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::detect::{detect_language, normalize_tag, pick_initial_locale};
use crate::engine::{I18n, I18nOptions};
use crate::format::{DateInput, DateTimeFormatOptions, NumberFormatOptions};
use crate::interpolate::Variables;
use crate::loader::{builtin_catalogs, load_catalog_dir};
use crate::{I18nError, Locale};

/// Key under which the selected locale is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "info-assistant-locale";

/// Persistent key/value storage for the locale preference.
pub trait LocaleStore {
    fn get(&self, key: &str) -> Result<Option<String>, I18nError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), I18nError>;
}

/// Source of the user's preferred language tag.
pub trait LanguageDetector {
    /// A dash-delimited tag such as `"es-MX"`, if one is available.
    fn detect(&self) -> Option<String>;
}

/// Sink receiving the active locale after every change.
pub trait LangAttribute {
    fn set_lang(&mut self, locale: &str);
}

/// In-memory [`LocaleStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLocaleStore {
    values: HashMap<String, String>,
}

impl MemoryLocaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.values.insert(key.into(), value.into());
        store
    }
}

impl LocaleStore for MemoryLocaleStore {
    fn get(&self, key: &str) -> Result<Option<String>, I18nError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), I18nError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// [`LocaleStore`] backed by a JSON object on disk.
///
/// Every `set` writes the whole file. An unreadable or corrupt file is
/// logged and treated as empty; it is replaced on the next write.
#[derive(Debug, Clone)]
pub struct FileLocaleStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileLocaleStore {
    /// Open a store at `path`. The file need not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, I18nError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| I18nError::Io {
                path: path.clone(),
                source,
            })?;
            match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring corrupt locale state file");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), I18nError> {
        let io_error = |source| I18nError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(&self.values)
            .map_err(|e| I18nError::StoreError(e.to_string()))?;
        fs::write(&self.path, content).map_err(io_error)
    }
}

impl LocaleStore for FileLocaleStore {
    fn get(&self, key: &str) -> Result<Option<String>, I18nError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), I18nError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Detects the language from `INFOASSIST_LOCALE`, `LC_ALL`, `LC_MESSAGES`
/// and `LANG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLanguageDetector;

impl LanguageDetector for EnvLanguageDetector {
    fn detect(&self) -> Option<String> {
        detect_language()
    }
}

/// Always reports the same tag.
#[derive(Debug, Clone, Default)]
pub struct FixedLanguageDetector {
    tag: Option<String>,
}

impl FixedLanguageDetector {
    /// Detector reporting `tag`. Malformed tags report nothing.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: normalize_tag(tag),
        }
    }

    /// Detector that never reports a language.
    pub fn none() -> Self {
        Self::default()
    }
}

impl LanguageDetector for FixedLanguageDetector {
    fn detect(&self) -> Option<String> {
        self.tag.clone()
    }
}

/// Discards language updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLangAttribute;

impl LangAttribute for NoopLangAttribute {
    fn set_lang(&mut self, _locale: &str) {}
}

/// Records every language update. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingLangAttribute {
    history: Rc<RefCell<Vec<String>>>,
}

impl RecordingLangAttribute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value received, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    /// The most recent value.
    pub fn current(&self) -> Option<String> {
        self.history.borrow().last().cloned()
    }
}

impl LangAttribute for RecordingLangAttribute {
    fn set_lang(&mut self, locale: &str) {
        self.history.borrow_mut().push(locale.to_string());
    }
}

/// Provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOptions {
    pub default_locale: Locale,
    pub supported_locales: Vec<Locale>,
    /// Key the locale is persisted under.
    pub storage_key: String,
    /// Extra catalogs merged over the built-in ones.
    pub catalog_dir: Option<PathBuf>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            supported_locales: vec!["en".to_string(), "es".to_string()],
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            catalog_dir: None,
        }
    }
}

struct ProviderState {
    i18n: RefCell<I18n>,
    store: RefCell<Box<dyn LocaleStore>>,
    attribute: RefCell<Box<dyn LangAttribute>>,
    storage_key: String,
}

impl ProviderState {
    // Persist before touching the engine so a failed write leaves the
    // provider on its previous locale.
    fn set_locale(&self, locale: &str) -> Result<bool, I18nError> {
        if !self.i18n.borrow().is_supported(locale) {
            return Ok(false);
        }
        self.store.borrow_mut().set(&self.storage_key, locale)?;
        self.i18n.borrow_mut().set_locale(locale);
        self.attribute.borrow_mut().set_lang(locale);
        debug!(locale, "locale changed");
        Ok(true)
    }
}

/// Owns the engine and its collaborators.
pub struct I18nProvider {
    state: Rc<ProviderState>,
}

impl I18nProvider {
    /// Build the engine, register built-in and directory catalogs, pick the
    /// initial locale and publish it to `attribute`.
    ///
    /// The initial locale is the persisted one if still supported, else the
    /// detected language's base tag if supported, else the default. An
    /// unreadable persisted value counts as absent.
    pub fn new(
        options: ProviderOptions,
        store: Box<dyn LocaleStore>,
        detector: &dyn LanguageDetector,
        mut attribute: Box<dyn LangAttribute>,
    ) -> Result<Self, I18nError> {
        let mut i18n = I18n::new(
            I18nOptions::new(options.default_locale.clone())
                .with_supported(options.supported_locales.iter().cloned()),
        );

        for (locale, catalog) in builtin_catalogs()? {
            i18n.add_catalog(locale, catalog);
        }
        if let Some(dir) = &options.catalog_dir {
            for (locale, catalog) in load_catalog_dir(dir)? {
                i18n.add_catalog(locale, catalog);
            }
        }

        let stored = store.get(&options.storage_key).unwrap_or_else(|e| {
            warn!(error = %e, "could not read persisted locale");
            None
        });
        let detected = detector.detect();
        let initial = pick_initial_locale(
            stored.as_deref(),
            detected.as_deref(),
            &i18n.supported_locales(),
            i18n.default_locale(),
        );

        i18n.set_locale(&initial);
        attribute.set_lang(i18n.locale());
        info!(
            locale = %i18n.locale(),
            stored = ?stored,
            detected = ?detected,
            "i18n provider ready"
        );

        Ok(Self {
            state: Rc::new(ProviderState {
                i18n: RefCell::new(i18n),
                store: RefCell::new(store),
                attribute: RefCell::new(attribute),
                storage_key: options.storage_key,
            }),
        })
    }

    /// A scope through which consumers reach this provider.
    pub fn scope(&self) -> I18nScope {
        I18nScope {
            provider: Some(Rc::clone(&self.state)),
        }
    }

    /// Context for direct use by the owner.
    pub fn context(&self) -> I18nContext {
        I18nContext {
            state: Rc::clone(&self.state),
        }
    }

    pub fn locale(&self) -> Locale {
        self.state.i18n.borrow().locale().to_string()
    }

    /// Switch locale, persist it and update the language attribute.
    /// Unsupported locales change nothing and return `Ok(false)`.
    pub fn set_locale(&self, locale: &str) -> Result<bool, I18nError> {
        self.state.set_locale(locale)
    }

    /// Switch locale for this session only. Nothing is persisted; the
    /// language attribute is still updated.
    pub fn set_session_locale(&self, locale: &str) -> bool {
        if !self.state.i18n.borrow_mut().set_locale(locale) {
            return false;
        }
        self.state.attribute.borrow_mut().set_lang(locale);
        true
    }

    /// Run `f` against the engine.
    ///
    /// The engine stays borrowed while `f` runs, so `f` must not switch
    /// locale through this provider or any of its contexts; doing so panics.
    pub fn with_engine<R>(&self, f: impl FnOnce(&I18n) -> R) -> R {
        f(&self.state.i18n.borrow())
    }
}

impl std::fmt::Debug for I18nProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18nProvider")
            .field("locale", &self.locale())
            .field("storage_key", &self.state.storage_key)
            .finish()
    }
}

/// Where a consumer looks for its provider.
#[derive(Clone, Default)]
pub struct I18nScope {
    provider: Option<Rc<ProviderState>>,
}

impl I18nScope {
    /// A scope with no provider.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }
}

impl std::fmt::Debug for I18nScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18nScope")
            .field("has_provider", &self.has_provider())
            .finish()
    }
}

/// Obtain the i18n context of the enclosing provider.
///
/// ```
/// use infoassist_common_i18n::{use_i18n, I18nError, I18nScope};
///
/// let result = use_i18n(&I18nScope::empty());
/// assert!(matches!(result, Err(I18nError::MissingProvider)));
/// ```
pub fn use_i18n(scope: &I18nScope) -> Result<I18nContext, I18nError> {
    scope
        .provider
        .as_ref()
        .map(|state| I18nContext {
            state: Rc::clone(state),
        })
        .ok_or(I18nError::MissingProvider)
}

/// Consumer handle onto a provider. Cheap to clone.
#[derive(Clone)]
pub struct I18nContext {
    state: Rc<ProviderState>,
}

impl I18nContext {
    pub fn locale(&self) -> Locale {
        self.state.i18n.borrow().locale().to_string()
    }

    pub fn default_locale(&self) -> Locale {
        self.state.i18n.borrow().default_locale().to_string()
    }

    pub fn supported_locales(&self) -> Vec<Locale> {
        self.state.i18n.borrow().supported_locales()
    }

    pub fn translate(&self, key: &str) -> String {
        self.state.i18n.borrow().translate(key)
    }

    pub fn translate_with(&self, key: &str, vars: &Variables) -> String {
        self.state.i18n.borrow().translate_with(key, vars)
    }

    /// See [`I18nProvider::set_locale`].
    pub fn set_locale(&self, locale: &str) -> Result<bool, I18nError> {
        self.state.set_locale(locale)
    }

    pub fn format_number(&self, value: f64, options: &NumberFormatOptions) -> String {
        self.state.i18n.borrow().format_number(value, options)
    }

    pub fn format_date(
        &self,
        value: impl Into<DateInput>,
        options: &DateTimeFormatOptions,
    ) -> String {
        self.state.i18n.borrow().format_date(value, options)
    }

    pub fn format_time(
        &self,
        value: impl Into<DateInput>,
        options: &DateTimeFormatOptions,
    ) -> String {
        self.state.i18n.borrow().format_time(value, options)
    }
}

impl std::fmt::Debug for I18nContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18nContext")
            .field("locale", &self.locale())
            .finish()
    }
}
