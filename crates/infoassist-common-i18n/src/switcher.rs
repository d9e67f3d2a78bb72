//! Locale switcher consumer.

use crate::binding::{use_i18n, I18nContext, I18nScope};
use crate::{I18nError, Locale};

/// Endonym labels for known locales.
const LOCALE_LABELS: [(&str, &str); 2] = [("en", "English"), ("es", "Español")];

/// One entry of the switcher's option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleOption {
    pub key: Locale,
    pub text: String,
}

/// Lists supported locales and applies the user's selection.
#[derive(Debug, Clone)]
pub struct LocaleSwitcher {
    ctx: I18nContext,
}

impl LocaleSwitcher {
    /// Fails with [`I18nError::MissingProvider`] outside a provider.
    pub fn new(scope: &I18nScope) -> Result<Self, I18nError> {
        Ok(Self {
            ctx: use_i18n(scope)?,
        })
    }

    /// One option per supported locale, labelled with its endonym or with
    /// the locale itself when no label is known.
    pub fn options(&self) -> Vec<LocaleOption> {
        self.ctx
            .supported_locales()
            .into_iter()
            .map(|key| {
                let text = label_for(&key).map_or_else(|| key.clone(), str::to_string);
                LocaleOption { key, text }
            })
            .collect()
    }

    /// Key of the currently selected option.
    pub fn selected_key(&self) -> Locale {
        self.ctx.locale()
    }

    /// Accessible label, translated.
    pub fn aria_label(&self) -> String {
        self.ctx.translate("locale.switchLanguage")
    }

    /// Apply a selection. An empty selection does nothing.
    pub fn select(&self, key: Option<&str>) -> Result<bool, I18nError> {
        match key {
            Some(key) if !key.is_empty() => self.ctx.set_locale(key),
            _ => Ok(false),
        }
    }
}

fn label_for(locale: &str) -> Option<&'static str> {
    LOCALE_LABELS
        .iter()
        .find(|(key, _)| *key == locale)
        .map(|(_, label)| *label)
}
