//! Information Assistant localization CLI
//!
//! Main entry point for the `infoassist` binary.

use std::process::ExitCode;

use clap::Parser;
use infoassist_cli::cli::Cli;
use infoassist_cli::error::{CliError, Exit};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            if let Some(hint) = e.hint() {
                eprintln!("  hint: {hint}");
            }
            e.exit().into()
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let (loader, config) = cli.load_config()?;

    if let Err(e) = infoassist_common_log::init(cli.log_config(&config.logging)) {
        eprintln!("warning: {e}");
    }

    let ctx = cli.context(&loader, config)?;
    cli.execute(&ctx)
}
