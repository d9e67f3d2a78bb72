//! Information Assistant CLI library.
//!
//! Argument definitions, command implementations and error handling for the
//! `infoassist` binary.

pub mod cli;
pub mod commands;
pub mod error;

pub use error::CliError;
