//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoAssistConfig {
    /// Localization settings.
    pub i18n: I18nConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Localization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale used when nothing else applies, and the last fallback for
    /// missing keys.
    pub default_locale: String,
    /// Locales a user may switch to.
    pub supported_locales: Vec<String>,
    /// Directory of `<locale>.yaml` / `<locale>.json` catalogs merged over
    /// the built-in ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_dir: Option<PathBuf>,
    /// Key the chosen locale is persisted under.
    pub storage_key: String,
    /// File holding persisted state, relative to the project directory.
    pub state_file: PathBuf,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            supported_locales: vec!["en".to_string(), "es".to_string()],
            catalog_dir: None,
            storage_key: "info-assistant-locale".to_string(),
            state_file: PathBuf::from(".infoassist/state.json"),
        }
    }
}

/// Log output settings. Environment variables take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    pub format: LogFormatSetting,
    /// Also write logs to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormatSetting::Pretty,
            file: None,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormatSetting {
    #[default]
    Pretty,
    Compact,
    Json,
}
