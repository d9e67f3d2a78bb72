//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use infoassist_common_config::{
    vars, ConfigLoader, Environment, InfoAssistConfig, LogFormatSetting, LoggingConfig,
};
use infoassist_common_i18n::{
    EnvLanguageDetector, FileLocaleStore, I18nProvider, NoopLangAttribute, ProviderOptions,
};
use infoassist_common_log::{LogConfig, LogLevel};
use tracing::{debug, warn};

use crate::commands::{
    CoverageCommand, FormatCommand, LocalesCommand, TranslateCommand, UseCommand,
};
use crate::error::CliError;

/// Information Assistant localization tool
///
/// Translate message keys, switch the persisted locale and check catalog
/// coverage.
#[derive(Debug, Parser)]
#[command(
    name = "infoassist",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error logging"
    )]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = vars::INFOASSIST_CONFIG,
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Locale for this invocation only
    #[arg(
        short,
        long,
        global = true,
        help = "Use this locale for this invocation without persisting it"
    )]
    pub locale: Option<String>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_enum,
        help = "Output format (text, json)"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate a message key
    #[command(visible_alias = "t")]
    Translate(TranslateCommand),

    /// List supported locales
    Locales(LocalesCommand),

    /// Switch and persist the active locale
    Use(UseCommand),

    /// Format numbers, dates and times in the active locale
    Format(FormatCommand),

    /// Report keys a locale resolves only through the default locale
    Coverage(CoverageCommand),
}

/// Everything a command needs to run.
pub struct CommandContext {
    pub config: InfoAssistConfig,
    pub provider: I18nProvider,
    pub format: OutputFormat,
}

impl Cli {
    /// Config loader for the `--config` flag or the working directory.
    pub fn loader(&self) -> ConfigLoader {
        match &self.config {
            Some(path) => ConfigLoader::with_file(path),
            None => ConfigLoader::default(),
        }
    }

    /// Load configuration. An explicit `--config` file must exist.
    pub fn load_config(&self) -> Result<(ConfigLoader, InfoAssistConfig), CliError> {
        if let Err(e) = Environment::init() {
            warn!(error = %e, "failed to load .env files");
        }

        let loader = self.loader();
        let config = if self.config.is_some() {
            loader.load_required()?
        } else {
            loader.load()?
        };
        Ok((loader, config))
    }

    /// Logging settings: environment first, then the config file, then
    /// `RUST_LOG`. Verbosity flags adjust the resulting level.
    pub fn log_config(&self, settings: &LoggingConfig) -> LogConfig {
        let format = match settings.format {
            LogFormatSetting::Pretty => "pretty",
            LogFormatSetting::Compact => "compact",
            LogFormatSetting::Json => "json",
        };

        let mut config = LogConfig::from_lookup(|var| {
            if let Some(value) = Environment::get(var) {
                return Some(value);
            }
            match var {
                vars::INFOASSIST_LOG_LEVEL if Environment::get(vars::RUST_LOG).is_none() => {
                    Some(settings.level.clone())
                }
                vars::INFOASSIST_LOG_FORMAT => Some(format.to_string()),
                vars::INFOASSIST_LOG_FILE => settings.file.as_ref().map(|p| p.display().to_string()),
                _ => None,
            }
        });

        if self.verbose > 0 || self.quiet {
            config.directives = None;
            config.level = LogLevel::from_verbosity(config.level, self.verbose, self.quiet);
        }
        config
    }

    /// Build the i18n provider described by the configuration.
    pub fn context(
        &self,
        loader: &ConfigLoader,
        config: InfoAssistConfig,
    ) -> Result<CommandContext, CliError> {
        let i18n = &config.i18n;
        let state_file = loader.resolve(&i18n.state_file);
        let options = ProviderOptions {
            default_locale: i18n.default_locale.clone(),
            supported_locales: i18n.supported_locales.clone(),
            storage_key: i18n.storage_key.clone(),
            catalog_dir: i18n.catalog_dir.as_deref().map(|dir| loader.resolve(dir)),
        };
        debug!(state_file = %state_file.display(), ?options, "building i18n provider");

        let provider = I18nProvider::new(
            options,
            Box::new(FileLocaleStore::open(state_file)?),
            &EnvLanguageDetector,
            Box::new(NoopLangAttribute),
        )?;

        if let Some(locale) = &self.locale {
            if !provider.set_session_locale(locale) {
                return Err(unsupported_locale(locale, &provider));
            }
        }

        Ok(CommandContext {
            config,
            provider,
            format: self.format,
        })
    }

    /// Run the selected command.
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        match &self.command {
            Command::Translate(cmd) => cmd.execute(ctx),
            Command::Locales(cmd) => cmd.execute(ctx),
            Command::Use(cmd) => cmd.execute(ctx),
            Command::Format(cmd) => cmd.execute(ctx),
            Command::Coverage(cmd) => cmd.execute(ctx),
        }
    }
}

/// Error for a locale outside the supported set.
pub fn unsupported_locale(locale: &str, provider: &I18nProvider) -> CliError {
    let supported = provider.with_engine(|i18n| i18n.supported_locales().join(", "));
    CliError::validation(format!("unsupported locale '{locale}'"))
        .with_hint(format!("supported locales: {supported}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_translate_with_vars() {
        let cli = Cli::try_parse_from([
            "infoassist",
            "translate",
            "user.greeting",
            "--var",
            "name=Ada",
            "--var",
            "count=3",
        ])
        .unwrap();

        match cli.command {
            Command::Translate(cmd) => {
                assert_eq!(cmd.key, "user.greeting");
                assert_eq!(
                    cmd.vars,
                    vec![
                        ("name".to_string(), "Ada".to_string()),
                        ("count".to_string(), "3".to_string())
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["infoassist", "locales", "-vv", "--locale", "es", "--format", "json"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.locale.as_deref(), Some("es"));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["infoassist", "locales", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_verbosity_overrides_level() {
        let cli = Cli::try_parse_from(["infoassist", "locales", "-vv"]).unwrap();
        let settings = LoggingConfig {
            level: "error".to_string(),
            ..LoggingConfig::default()
        };
        let config = cli.log_config(&settings);
        assert!(config.level <= LogLevel::Info);
        assert!(config.directives.is_none());

        let cli = Cli::try_parse_from(["infoassist", "locales", "-q"]).unwrap();
        assert_eq!(cli.log_config(&settings).level, LogLevel::Error);
    }
}
