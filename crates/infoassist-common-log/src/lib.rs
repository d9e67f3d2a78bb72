//! Logging setup for Information Assistant.
//!
//! Installs a global `tracing` subscriber writing to stderr and, optionally,
//! appending to a file. Settings come from [`LogConfig`], usually built by
//! [`LogConfig::from_env`]:
//!
//! | variable                | effect                                  |
//! |-------------------------|-----------------------------------------|
//! | `INFOASSIST_LOG_LEVEL`  | minimum level                           |
//! | `RUST_LOG`              | level or full filter directives         |
//! | `INFOASSIST_LOG_FORMAT` | `pretty`, `compact` or `json`           |
//! | `INFOASSIST_LOG_FILE`   | also append to this file                |
//! | `INFOASSIST_LOG_SOURCE` | include file and line (`true` / `1`)    |

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Filter directives (`"infoassist=debug,warn"`); override `level`.
    pub directives: Option<String>,
    /// Output format.
    pub format: LogFormat,
    /// Log file path (if file logging enabled).
    pub file_path: Option<PathBuf>,
    /// Include source location.
    pub source_location: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Level for command-line verbosity flags: each `-v` lowers the level
    /// by one step from `base`, `-q` raises it to errors only.
    pub fn from_verbosity(base: LogLevel, verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Error;
        }
        let mut level = base;
        for _ in 0..verbose {
            level = match level {
                Self::Error => Self::Warn,
                Self::Warn => Self::Info,
                Self::Info => Self::Debug,
                Self::Debug | Self::Trace => Self::Trace,
            };
        }
        level
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON structured format.
    Json,
}

impl LogFormat {
    /// Parse from string. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(level) = get("INFOASSIST_LOG_LEVEL").as_deref().and_then(LogLevel::parse) {
            config.level = level;
        } else if let Some(rust_log) = get("RUST_LOG") {
            match LogLevel::parse(&rust_log) {
                Some(level) => config.level = level,
                None => config.directives = Some(rust_log),
            }
        }

        if let Some(format) = get("INFOASSIST_LOG_FORMAT").as_deref().and_then(LogFormat::parse) {
            config.format = format;
        }

        if let Some(file_path) = get("INFOASSIST_LOG_FILE") {
            config.file_path = Some(PathBuf::from(file_path));
        }

        if let Some(source) = get("INFOASSIST_LOG_SOURCE") {
            config.source_location = source.eq_ignore_ascii_case("true") || source == "1";
        }

        config
    }

    fn filter(&self) -> Result<EnvFilter, LogError> {
        match &self.directives {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|e| LogError::InitError(e.to_string()))
            }
            None => Ok(EnvFilter::new(self.level.as_str())),
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn stderr_layer(config: &LogConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Pretty => layer.with_ansi(true).with_target(true).boxed(),
        LogFormat::Compact => layer.compact().with_ansi(true).boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn file_layer(config: &LogConfig, file: std::fs::File) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Pretty => layer.with_target(true).boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Initialize logging with the given configuration.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter = config.filter()?;

    let mut layers = vec![stderr_layer(&config)];
    if let Some(path) = &config.file_path {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        layers.push(file_layer(&config, file));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

/// Convenience macros re-exported from tracing.
pub use tracing::{debug, error, info, trace, warn};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("Warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("invalid"), None);
    }

    #[test]
    fn test_log_level_into_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(LogLevel::from_verbosity(LogLevel::Warn, 0, false), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(LogLevel::Warn, 1, false), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(LogLevel::Warn, 2, false), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(LogLevel::Warn, 9, false), LogLevel::Trace);
        assert_eq!(LogLevel::from_verbosity(LogLevel::Debug, 3, true), LogLevel::Error);
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.directives.is_none());
        assert!(config.file_path.is_none());
        assert!(!config.source_location);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LogConfig::from_lookup(lookup(&[
            ("INFOASSIST_LOG_LEVEL", "debug"),
            ("INFOASSIST_LOG_FORMAT", "json"),
            ("INFOASSIST_LOG_FILE", "/tmp/infoassist.log"),
            ("INFOASSIST_LOG_SOURCE", "1"),
            ("RUST_LOG", "error"),
        ]));

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/infoassist.log")));
        assert!(config.source_location);
    }

    #[test]
    fn test_rust_log_fallback() {
        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "warn")]));
        assert_eq!(config.level, LogLevel::Warn);
        assert!(config.directives.is_none());

        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "infoassist_common_i18n=trace")]));
        assert_eq!(config.directives.as_deref(), Some("infoassist_common_i18n=trace"));
        assert!(config.filter().is_ok());
    }

    #[test]
    fn test_unknown_values_keep_defaults() {
        let config = LogConfig::from_lookup(lookup(&[
            ("INFOASSIST_LOG_LEVEL", "loud"),
            ("INFOASSIST_LOG_FORMAT", "xml"),
            ("INFOASSIST_LOG_FILE", ""),
        ]));
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("INFOASSIST_LOG_FORMAT", "compact");
        let config = LogConfig::from_env();
        std::env::remove_var("INFOASSIST_LOG_FORMAT");
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_init_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            level: LogLevel::Debug,
            file_path: Some(dir.path().join("infoassist.log")),
            ..LogConfig::default()
        };

        // Another test may already own the global subscriber.
        match init(config) {
            Ok(()) | Err(LogError::InitError(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
        assert!(dir.path().join("infoassist.log").exists());
    }
}
