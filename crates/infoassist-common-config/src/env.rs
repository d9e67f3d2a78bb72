//! Environment variable handling.

use std::env;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    /// Explicit config file path.
    pub const INFOASSIST_CONFIG: &str = "INFOASSIST_CONFIG";
    pub const INFOASSIST_LOG_LEVEL: &str = "INFOASSIST_LOG_LEVEL";
    pub const INFOASSIST_LOG_FORMAT: &str = "INFOASSIST_LOG_FORMAT";
    pub const INFOASSIST_LOG_FILE: &str = "INFOASSIST_LOG_FILE";

    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Environment configuration.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Load `.env` then `.env.local` from the working directory. Missing
    /// files are fine; later files override earlier ones.
    pub fn init() -> Result<Self, EnvError> {
        for file in [".env", ".env.local"] {
            match dotenvy::from_filename_override(file) {
                Ok(_) => {}
                Err(e) if e.not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Self { _guard: () })
    }

    /// Get an optional, non-empty string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.is_empty())
    }
}
