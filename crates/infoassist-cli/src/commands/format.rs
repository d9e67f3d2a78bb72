//! Format command implementation.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use clap::{Args, Parser, Subcommand};
use infoassist_common_i18n::{DateInput, DateTimeFormatOptions, NumberFormatOptions, TextWidth};
use serde_json::json;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Format numbers, dates and times in the active locale
#[derive(Debug, Parser)]
pub struct FormatCommand {
    #[command(subcommand)]
    pub target: FormatTarget,
}

#[derive(Debug, Subcommand)]
pub enum FormatTarget {
    /// Format a number
    Number(NumberArgs),
    /// Format a calendar date
    Date(DateArgs),
    /// Format a time of day
    Time(TimeArgs),
}

#[derive(Debug, Args)]
pub struct NumberArgs {
    #[arg(allow_negative_numbers = true)]
    pub value: f64,

    /// Treat the value as a ratio and render a percentage
    #[arg(long)]
    pub percent: bool,

    /// Minimum fraction digits
    #[arg(long, value_name = "N")]
    pub min_fraction: Option<usize>,

    /// Maximum fraction digits
    #[arg(long, value_name = "N")]
    pub max_fraction: Option<usize>,

    /// Disable digit grouping
    #[arg(long)]
    pub no_grouping: bool,
}

#[derive(Debug, Args)]
pub struct DateArgs {
    /// RFC 3339 timestamp, `YYYY-MM-DD`, epoch milliseconds or `now`
    #[arg(default_value = "now", allow_negative_numbers = true)]
    pub value: String,

    /// Spell out the month name
    #[arg(long)]
    pub long: bool,

    /// Include the weekday
    #[arg(long)]
    pub weekday: bool,

    /// Display offset such as `+02:00` (local time when omitted)
    #[arg(long, value_name = "OFFSET", value_parser = parse_offset)]
    pub utc_offset: Option<FixedOffset>,
}

#[derive(Debug, Args)]
pub struct TimeArgs {
    /// RFC 3339 timestamp, `YYYY-MM-DD`, epoch milliseconds or `now`
    #[arg(default_value = "now", allow_negative_numbers = true)]
    pub value: String,

    /// Force a 12-hour clock
    #[arg(long, conflicts_with = "h24")]
    pub hour12: bool,

    /// Force a 24-hour clock
    #[arg(long = "24h", id = "h24")]
    pub h24: bool,

    /// Display offset such as `+02:00` (local time when omitted)
    #[arg(long, value_name = "OFFSET", value_parser = parse_offset)]
    pub utc_offset: Option<FixedOffset>,
}

impl NumberArgs {
    fn options(&self) -> Result<NumberFormatOptions, CliError> {
        let mut options = if self.percent {
            NumberFormatOptions::percent()
        } else {
            NumberFormatOptions::default()
        };
        if let (Some(min), Some(max)) = (self.min_fraction, self.max_fraction) {
            if min > max {
                return Err(CliError::validation(format!(
                    "--min-fraction ({min}) exceeds --max-fraction ({max})"
                )));
            }
        }
        options.minimum_fraction_digits = self.min_fraction;
        options.maximum_fraction_digits = self.max_fraction;
        Ok(options.with_grouping(!self.no_grouping))
    }
}

impl DateArgs {
    fn options(&self) -> DateTimeFormatOptions {
        let mut options = if self.long {
            DateTimeFormatOptions::long_date()
        } else {
            DateTimeFormatOptions::numeric_date()
        };
        if self.weekday {
            options = options.with_weekday(TextWidth::Long);
        }
        if let Some(offset) = self.utc_offset {
            options = options.with_utc_offset(offset);
        }
        options
    }
}

impl TimeArgs {
    fn options(&self) -> DateTimeFormatOptions {
        let mut options = DateTimeFormatOptions::default();
        if self.hour12 || self.h24 {
            options = options.with_hour12(self.hour12);
        }
        if let Some(offset) = self.utc_offset {
            options = options.with_utc_offset(offset);
        }
        options
    }
}

impl FormatCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let i18n = ctx.provider.context();
        let (input, text) = match &self.target {
            FormatTarget::Number(args) => (
                args.value.to_string(),
                i18n.format_number(args.value, &args.options()?),
            ),
            FormatTarget::Date(args) => (
                args.value.clone(),
                i18n.format_date(parse_date_input(&args.value)?, &args.options()),
            ),
            FormatTarget::Time(args) => (
                args.value.clone(),
                i18n.format_time(parse_date_input(&args.value)?, &args.options()),
            ),
        };

        match ctx.format {
            OutputFormat::Text => println!("{text}"),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string(&json!({
                    "input": input,
                    "locale": i18n.locale(),
                    "text": text,
                }))?
            ),
        }
        Ok(())
    }
}

/// Parse `now`, epoch milliseconds, an RFC 3339 timestamp or a bare date
/// (midnight UTC).
pub fn parse_date_input(raw: &str) -> Result<DateInput, CliError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("now") {
        return Ok(DateInput::Instant(Utc::now()));
    }
    if let Ok(millis) = raw.parse::<i64>() {
        return Ok(DateInput::EpochMillis(millis));
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.into());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(DateInput::Instant(midnight.and_utc()));
    }
    Err(CliError::validation(format!("cannot parse '{raw}' as a date"))
        .with_hint("use RFC 3339 (2024-03-05T14:30:00Z), YYYY-MM-DD, epoch milliseconds or 'now'"))
}

/// Parse `Z`, `UTC`, `+HH`, `+HH:MM` or `+HHMM`.
pub fn parse_offset(raw: &str) -> Result<FixedOffset, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let invalid = || format!("invalid UTC offset '{raw}'");
    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        4 => (
            digits[..2].parse::<i32>().map_err(|_| invalid())?,
            digits[2..].parse::<i32>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("+02:00").unwrap().local_minus_utc(), 7200);
        assert_eq!(parse_offset("-0530").unwrap().local_minus_utc(), -(5 * 3600 + 30 * 60));
        assert_eq!(parse_offset("+9").unwrap().local_minus_utc(), 9 * 3600);
        assert!(parse_offset("02:00").is_err());
        assert!(parse_offset("+25:00").is_err());
        assert!(parse_offset("+ab").is_err());
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("0").unwrap(), DateInput::EpochMillis(0));
        assert_eq!(
            parse_date_input("2024-03-05").unwrap().to_utc().unwrap().to_rfc3339(),
            "2024-03-05T00:00:00+00:00"
        );
        assert_eq!(
            parse_date_input("2024-03-05T14:30:00+02:00")
                .unwrap()
                .to_utc()
                .unwrap()
                .to_rfc3339(),
            "2024-03-05T12:30:00+00:00"
        );
        assert!(matches!(parse_date_input("now").unwrap(), DateInput::Instant(_)));

        let err = parse_date_input("yesterday").unwrap_err();
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_number_options() {
        let args = NumberArgs {
            value: 0.25,
            percent: true,
            min_fraction: Some(1),
            max_fraction: None,
            no_grouping: true,
        };
        let options = args.options().unwrap();
        assert_eq!(options.minimum_fraction_digits, Some(1));
        assert!(!options.use_grouping);

        let args = NumberArgs {
            value: 1.0,
            percent: false,
            min_fraction: Some(4),
            max_fraction: Some(2),
            no_grouping: false,
        };
        assert!(args.options().is_err());
    }
}
