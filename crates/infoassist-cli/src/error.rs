//! CLI error handling.

use std::process::ExitCode;

use infoassist_common_config::ConfigError;
use infoassist_common_i18n::I18nError;
use thiserror::Error;

/// Application exit codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    ValidationError = 5,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    I18n(#[from] I18nError),

    #[error("{message}")]
    Validation {
        message: String,
        hint: Option<String>,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            Self::Validation { message, .. } => Self::Validation {
                message,
                hint: Some(hint.into()),
            },
            other => other,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Validation { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Exit status reported for this error.
    pub fn exit(&self) -> Exit {
        match self {
            Self::Config(_) => Exit::ConfigError,
            Self::I18n(I18nError::Io { .. }) => Exit::IoError,
            Self::I18n(_) | Self::Output(_) => Exit::GeneralError,
            Self::Validation { .. } => Exit::ValidationError,
        }
    }
}
