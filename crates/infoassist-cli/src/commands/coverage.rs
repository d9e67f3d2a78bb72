//! Coverage command implementation.

use std::collections::BTreeMap;

use clap::Parser;

use crate::cli::{unsupported_locale, CommandContext, OutputFormat};
use crate::error::CliError;

/// Report keys a locale resolves only through the default locale
#[derive(Debug, Parser)]
pub struct CoverageCommand {
    /// Locale to check; all non-default locales when omitted
    #[arg(value_name = "LOCALE")]
    pub target: Option<String>,

    /// Exit with an error when any key is missing
    #[arg(long)]
    pub strict: bool,
}

impl CoverageCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let report: BTreeMap<String, Vec<String>> = ctx.provider.with_engine(|i18n| {
            let locales: Vec<String> = match &self.target {
                Some(locale) => vec![locale.clone()],
                None => i18n
                    .supported_locales()
                    .into_iter()
                    .filter(|locale| locale != i18n.default_locale())
                    .collect(),
            };
            locales
                .into_iter()
                .filter(|locale| i18n.is_supported(locale))
                .map(|locale| {
                    let missing = i18n.missing_keys(&locale);
                    (locale, missing)
                })
                .collect()
        });

        if let Some(target) = &self.target {
            if !report.contains_key(target) {
                return Err(unsupported_locale(target, &ctx.provider));
            }
        }

        match ctx.format {
            OutputFormat::Text => {
                for (locale, missing) in &report {
                    println!("{locale}: {} missing", missing.len());
                    for key in missing {
                        println!("  {key}");
                    }
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        let total: usize = report.values().map(Vec::len).sum();
        if self.strict && total > 0 {
            return Err(CliError::validation(format!(
                "{total} key(s) missing a translation"
            )));
        }
        Ok(())
    }
}
