//! Internationalization support for Information Assistant.
//!
//! The engine resolves dotted message keys (`"chat.clearChat"`) against
//! per-locale catalogs, walking a fixed fallback chain:
//!
//! 1. the current locale (`"es-MX"`),
//! 2. its base language (`"es"`),
//! 3. the default locale (`"en"`).
//!
//! A key that no catalog provides is returned verbatim, so lookups never
//! fail. Templates may contain `{name}` placeholders which are filled from
//! caller-supplied [`Variables`]; unknown placeholders are left in place.
//!
//! The binding layer ([`binding`]) wires the engine to a persisted locale
//! preference, a language detector and a document language attribute.

use std::path::PathBuf;

pub mod binding;
pub mod catalog;
pub mod detect;
pub mod engine;
pub mod format;
pub mod interpolate;
pub mod loader;
pub mod switcher;

/// Locale identifier (e.g., `"en"`, `"es"`, `"en-US"`).
pub type Locale = String;

/// i18n errors.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("failed to persist locale: {0}")]
    StoreError(String),

    #[error("use_i18n must be used within an I18nProvider")]
    MissingProvider,
}

/// Translation macro.
///
/// Works with anything exposing `translate` / `translate_with`, i.e. the
/// [`I18n`] engine and an [`I18nContext`].
///
/// ```
/// use infoassist_common_i18n::{catalog::Catalog, t, I18n};
///
/// let mut i18n = I18n::with_locales("en", ["en"]);
/// i18n.add_catalog("en", Catalog::new().with("user.greeting", "Hello, {name}!"));
///
/// assert_eq!(t!(i18n, "user.greeting", name = "Ada"), "Hello, Ada!");
/// assert_eq!(t!(i18n, "missing.key"), "missing.key");
/// ```
#[macro_export]
macro_rules! t {
    ($i18n:expr, $key:expr) => {
        $i18n.translate($key)
    };
    ($i18n:expr, $key:expr, $($name:ident = $value:expr),+ $(,)?) => {{
        let mut vars = $crate::Variables::new();
        $(
            vars.insert(stringify!($name), $value);
        )+
        $i18n.translate_with($key, &vars)
    }};
}

// Re-exports for convenience
pub use binding::{
    use_i18n, EnvLanguageDetector, FileLocaleStore, FixedLanguageDetector, I18nContext,
    I18nProvider, I18nScope, LangAttribute, LanguageDetector, LocaleStore, MemoryLocaleStore,
    NoopLangAttribute, ProviderOptions, RecordingLangAttribute, DEFAULT_STORAGE_KEY,
};
pub use catalog::{Catalog, CatalogStore};
pub use detect::{base_language, detect_language, normalize_tag, pick_initial_locale};
pub use engine::{I18n, I18nOptions};
pub use format::{
    DateInput, DateTimeFormatOptions, MonthWidth, NumberFormatOptions, NumberStyle,
    NumericWidth, TextWidth,
};
pub use interpolate::{interpolate, Variables};
pub use loader::{builtin_catalogs, load_catalog_dir, load_catalog_file, CatalogFormat};
pub use switcher::{LocaleOption, LocaleSwitcher};
