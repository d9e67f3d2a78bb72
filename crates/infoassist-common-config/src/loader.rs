//! Configuration file loading and parsing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::types::InfoAssistConfig;

/// Directory holding the config file, relative to the project directory.
pub const CONFIG_DIR: &str = ".infoassist";
/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

fn env_reference() -> &'static Regex {
    static ENV_REFERENCE: OnceLock<Regex> = OnceLock::new();
    ENV_REFERENCE.get_or_init(|| Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").unwrap())
}

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_path: PathBuf,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        let base_path = project_dir.as_ref().to_path_buf();
        let config_path = base_path.join(CONFIG_DIR).join(CONFIG_FILE);
        Self {
            base_path,
            config_path,
        }
    }

    /// Loader reading an explicit file. Relative paths inside the config
    /// resolve against the file's grandparent, matching the default layout.
    pub fn with_file(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let base_path = config_path
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            base_path,
            config_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Resolve a path from the config against the project directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Load configuration. A missing file yields the defaults.
    pub fn load(&self) -> Result<InfoAssistConfig, ConfigError> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(InfoAssistConfig::default());
        }

        let contents = std::fs::read_to_string(&self.config_path)?;
        let config = Self::parse(&contents)?;
        debug!(path = %self.config_path.display(), "loaded config");
        Ok(config)
    }

    /// Load configuration, failing if the file is absent.
    pub fn load_required(&self) -> Result<InfoAssistConfig, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound {
                path: self.config_path.clone(),
            });
        }
        self.load()
    }

    /// Expand, parse and validate config text.
    pub fn parse(contents: &str) -> Result<InfoAssistConfig, ConfigError> {
        let expanded = expand_env_vars(contents)?;

        let config: InfoAssistConfig = if is_blank_document(&expanded) {
            InfoAssistConfig::default()
        } else {
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        };

        validate(&config)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand `${VAR}` and `${VAR:-default}` from the process environment.
pub fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    expand_with(content, |var| std::env::var(var).ok())
}

/// Expand `${VAR}` and `${VAR:-default}` using `lookup`.
///
/// Expansion is a single pass over the input; substituted values are not
/// expanded again.
pub fn expand_with(
    content: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(content.len());
    let mut last = 0;

    for cap in env_reference().captures_iter(content) {
        let Some(full) = cap.get(0) else { continue };
        let var_name = &cap[1];

        let value = match (lookup(var_name), cap.get(2)) {
            (Some(value), _) => value,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                })
            }
        };

        result.push_str(&content[last..full.start()]);
        result.push_str(&value);
        last = full.end();
    }

    result.push_str(&content[last..]);
    Ok(result)
}

fn is_blank_document(contents: &str) -> bool {
    contents
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

/// Validate configuration values.
pub fn validate(config: &InfoAssistConfig) -> Result<(), ConfigError> {
    let i18n = &config.i18n;

    if i18n.default_locale.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            message: "i18n.default_locale must not be empty".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for locale in &i18n.supported_locales {
        if locale.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "i18n.supported_locales must not contain empty entries".to_string(),
            });
        }
        if !seen.insert(locale.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!("i18n.supported_locales lists '{locale}' twice"),
            });
        }
    }

    if !seen.contains(i18n.default_locale.as_str()) {
        return Err(ConfigError::ValidationError {
            message: format!(
                "i18n.default_locale '{}' is not in i18n.supported_locales",
                i18n.default_locale
            ),
        });
    }

    if i18n.storage_key.is_empty() {
        return Err(ConfigError::ValidationError {
            message: "i18n.storage_key must not be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogFormatSetting;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());
        let config = loader.load().unwrap();
        assert_eq!(config, InfoAssistConfig::default());
    }

    #[test]
    fn test_load_required_reports_missing_file() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());
        assert!(matches!(
            loader.load_required(),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();

        let config_content = r#"
i18n:
  default_locale: es
  supported_locales: [es, en, fr]
  catalog_dir: locales
logging:
  level: debug
  format: compact
"#;
        fs::write(config_dir.join(CONFIG_FILE), config_content).unwrap();

        let loader = ConfigLoader::new(dir.path());
        let config = loader.load().unwrap();

        assert_eq!(config.i18n.default_locale, "es");
        assert_eq!(config.i18n.supported_locales, vec!["es", "en", "fr"]);
        assert_eq!(config.i18n.catalog_dir, Some(PathBuf::from("locales")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormatSetting::Compact);

        assert_eq!(config.i18n.storage_key, "info-assistant-locale");
        assert_eq!(
            loader.resolve(config.i18n.catalog_dir.as_deref().unwrap()),
            dir.path().join("locales")
        );
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            ConfigLoader::parse("\n# nothing here\n").unwrap(),
            InfoAssistConfig::default()
        );
    }

    #[test]
    fn test_env_var_expansion() {
        let lookup = lookup_from(&[("LOCALE", "es"), ("PREFIX", "info"), ("SUFFIX", "assist")]);

        assert_eq!(expand_with("key: ${LOCALE}", &lookup).unwrap(), "key: es");
        assert_eq!(
            expand_with("key: ${PREFIX}-${SUFFIX}", &lookup).unwrap(),
            "key: info-assist"
        );
        assert_eq!(
            expand_with("key: ${NONEXISTENT:-default}", &lookup).unwrap(),
            "key: default"
        );
    }

    #[test]
    fn test_env_var_values_not_rescanned() {
        let lookup = lookup_from(&[("A", "${B}"), ("B", "nope")]);
        assert_eq!(expand_with("x: ${A}", lookup).unwrap(), "x: ${B}");
    }

    #[test]
    fn test_env_var_missing_error() {
        let result = expand_with("key: ${MISSING_VAR}", |_| None);
        match result.unwrap_err() {
            ConfigError::EnvVarNotFound { var } => assert_eq!(var, "MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_var_expansion_from_process_env() {
        std::env::set_var("INFOASSIST_TEST_DEFAULT_LOCALE", "es");
        let config = ConfigLoader::parse(
            "i18n:\n  default_locale: ${INFOASSIST_TEST_DEFAULT_LOCALE}\n  storage_key: ${INFOASSIST_TEST_KEY:-custom-key}\n",
        )
        .unwrap();
        std::env::remove_var("INFOASSIST_TEST_DEFAULT_LOCALE");

        assert_eq!(config.i18n.default_locale, "es");
        assert_eq!(config.i18n.storage_key, "custom-key");
    }

    #[test]
    fn test_validation_errors() {
        let expect_validation = |config: &InfoAssistConfig, needle: &str| match validate(config) {
            Err(ConfigError::ValidationError { message }) => {
                assert!(message.contains(needle), "{message}")
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        };

        let mut config = InfoAssistConfig::default();
        config.i18n.default_locale = " ".to_string();
        expect_validation(&config, "default_locale must not be empty");

        let mut config = InfoAssistConfig::default();
        config.i18n.default_locale = "fr".to_string();
        expect_validation(&config, "is not in i18n.supported_locales");

        let mut config = InfoAssistConfig::default();
        config.i18n.supported_locales.push("es".to_string());
        expect_validation(&config, "'es' twice");

        let mut config = InfoAssistConfig::default();
        config.i18n.supported_locales.push(String::new());
        expect_validation(&config, "empty entries");

        let mut config = InfoAssistConfig::default();
        config.i18n.storage_key.clear();
        expect_validation(&config, "storage_key");

        assert!(validate(&InfoAssistConfig::default()).is_ok());
    }

    #[test]
    fn test_parse_error_with_line_number() {
        let bad_yaml = r#"
i18n:
  default_locale: en
  supported_locales: [unclosed
"#;
        match ConfigLoader::parse(bad_yaml).unwrap_err() {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("Expected ParseError with line number, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_file_location() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("custom.yaml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "i18n:\n  state_file: state.json\n").unwrap();

        let loader = ConfigLoader::with_file(&path);
        let config = loader.load().unwrap();
        assert_eq!(loader.config_path(), path.as_path());
        assert_eq!(loader.resolve(&config.i18n.state_file), dir.path().join("state.json"));
    }
}
