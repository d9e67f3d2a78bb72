//! Translate command implementation.

use clap::Parser;
use infoassist_common_i18n::Variables;
use serde_json::json;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Translate a message key
#[derive(Debug, Parser)]
pub struct TranslateCommand {
    /// Dotted message key, e.g. `chat.clearChat`
    pub key: String,

    /// Placeholder value as `name=value` (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

/// Parse a `name=value` pair. The value may itself contain `=`.
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

impl TranslateCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let i18n = ctx.provider.context();
        let vars: Variables = self.vars.iter().cloned().collect();
        let text = i18n.translate_with(&self.key, &vars);

        match ctx.format {
            OutputFormat::Text => println!("{text}"),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string(&json!({
                    "key": self.key,
                    "locale": i18n.locale(),
                    "text": text,
                }))?
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var() {
        assert_eq!(parse_var("name=Ada"), Ok(("name".into(), "Ada".into())));
        assert_eq!(parse_var("expr=a=b"), Ok(("expr".into(), "a=b".into())));
        assert_eq!(parse_var("empty="), Ok(("empty".into(), String::new())));
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }
}
