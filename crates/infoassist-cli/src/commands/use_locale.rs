//! Use command implementation.

use clap::Parser;
use infoassist_common_i18n::LocaleSwitcher;
use tracing::info;

use crate::cli::{unsupported_locale, CommandContext, OutputFormat};
use crate::error::CliError;

/// Switch and persist the active locale
#[derive(Debug, Parser)]
pub struct UseCommand {
    /// Locale to switch to, e.g. `es`
    #[arg(value_name = "LOCALE")]
    pub target: String,
}

impl UseCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let switcher = LocaleSwitcher::new(&ctx.provider.scope())?;
        if !switcher.select(Some(self.target.as_str()))? {
            return Err(unsupported_locale(&self.target, &ctx.provider));
        }
        info!(locale = %self.target, "persisted locale");

        let label = switcher
            .options()
            .into_iter()
            .find(|option| option.key == self.target)
            .map_or_else(|| self.target.clone(), |option| option.text);

        match ctx.format {
            OutputFormat::Text => println!("{label}"),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string(&serde_json::json!({
                    "locale": self.target,
                    "label": label,
                }))?
            ),
        }
        Ok(())
    }
}
