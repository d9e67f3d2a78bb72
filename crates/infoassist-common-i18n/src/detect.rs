//! Language detection and initial locale selection.
//!
//! Detection is permissive: malformed tags are skipped rather than
//! reported, so a bad environment value never blocks startup.

use std::env;

use crate::Locale;

/// Environment variables consulted by [`detect_language`], in priority
/// order.
pub const LANGUAGE_ENV_VARS: [&str; 4] = ["INFOASSIST_LOCALE", "LC_ALL", "LC_MESSAGES", "LANG"];

/// Base language of a tag: everything before the first `-`.
///
/// ```
/// use infoassist_common_i18n::base_language;
///
/// assert_eq!(base_language("es-MX"), "es");
/// assert_eq!(base_language("en"), "en");
/// ```
pub fn base_language(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

/// Normalize a POSIX or BCP 47 style tag (`"es_MX.UTF-8"`, `"en-US"`) to
/// dash-delimited form.
///
/// Returns `None` for empty tags, the `C`/`POSIX` pseudo-locales and tags
/// containing anything other than ASCII letters, digits and separators.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim();
    let tag = tag.split('.').next().unwrap_or(tag);
    let tag = tag.split('@').next().unwrap_or(tag);

    if tag.is_empty() || tag.eq_ignore_ascii_case("c") || tag.eq_ignore_ascii_case("posix") {
        return None;
    }

    let mut parts = Vec::new();
    for part in tag.split(['-', '_']) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        parts.push(part);
    }

    let (language, regions) = parts.split_first()?;
    if !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut normalized = language.to_ascii_lowercase();
    for region in regions {
        normalized.push('-');
        normalized.push_str(region);
    }
    Some(normalized)
}

/// Detect the user's language from the environment.
pub fn detect_language() -> Option<String> {
    detect_language_with(|var| env::var(var).ok())
}

/// Detect a language using a custom variable lookup.
pub fn detect_language_with(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    LANGUAGE_ENV_VARS
        .into_iter()
        .filter_map(|var| lookup(var))
        .find_map(|value| normalize_tag(&value))
}

/// Choose the locale a session starts in.
///
/// Priority: a persisted choice that is still supported, then the base
/// language of the detected tag if supported, then the default.
pub fn pick_initial_locale(
    stored: Option<&str>,
    detected: Option<&str>,
    supported: &[Locale],
    default_locale: &str,
) -> Locale {
    let is_supported = |locale: &str| supported.iter().any(|s| s == locale);

    if let Some(stored) = stored.filter(|s| is_supported(*s)) {
        return stored.to_string();
    }

    if let Some(language) = detected.map(base_language).filter(|l| is_supported(*l)) {
        return language.to_string();
    }

    default_locale.to_string()
}
