//! Locales command implementation.

use clap::Parser;
use infoassist_common_i18n::LocaleSwitcher;
use serde::Serialize;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// List supported locales
#[derive(Debug, Parser)]
pub struct LocalesCommand {}

#[derive(Debug, Serialize)]
struct LocaleRow {
    key: String,
    label: String,
    current: bool,
    default: bool,
}

impl LocalesCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let switcher = LocaleSwitcher::new(&ctx.provider.scope())?;
        let selected = switcher.selected_key();
        let default_locale = &ctx.config.i18n.default_locale;

        let rows: Vec<LocaleRow> = switcher
            .options()
            .into_iter()
            .map(|option| LocaleRow {
                current: option.key == selected,
                default: &option.key == default_locale,
                key: option.key,
                label: option.text,
            })
            .collect();

        match ctx.format {
            OutputFormat::Text => {
                println!("{}", switcher.aria_label());
                for row in &rows {
                    let marker = if row.current { '*' } else { ' ' };
                    let default = if row.default { " (default)" } else { "" };
                    println!("{marker} {:<8} {}{default}", row.key, row.label);
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        }
        Ok(())
    }
}
