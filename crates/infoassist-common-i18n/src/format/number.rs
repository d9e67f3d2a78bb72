//! Locale-aware number formatting.

use fixed_decimal::{Decimal, FloatPrecision, SignedRoundingMode, UnsignedRoundingMode};
use icu::decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu::decimal::DecimalFormatter;
use tracing::warn;

use super::icu_locale;

/// Upper bound on fraction digits.
const MAX_FRACTION_DIGITS: usize = 20;

/// Number presentation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberStyle {
    /// Plain decimal number (`1,234.5`).
    #[default]
    Decimal,
    /// Ratio rendered as a percentage (`0.25` → `25%`).
    Percent,
}

/// Options for [`format_number`].
///
/// Unset fraction limits follow the style: decimals show up to three
/// fraction digits, percentages none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormatOptions {
    pub style: NumberStyle,
    pub minimum_fraction_digits: Option<usize>,
    pub maximum_fraction_digits: Option<usize>,
    pub use_grouping: bool,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            style: NumberStyle::Decimal,
            minimum_fraction_digits: None,
            maximum_fraction_digits: None,
            use_grouping: true,
        }
    }
}

impl NumberFormatOptions {
    /// Percentage style with default digits.
    pub fn percent() -> Self {
        Self {
            style: NumberStyle::Percent,
            ..Self::default()
        }
    }

    /// Show exactly `digits` fraction digits.
    pub fn fixed(digits: usize) -> Self {
        Self {
            minimum_fraction_digits: Some(digits),
            maximum_fraction_digits: Some(digits),
            ..Self::default()
        }
    }

    pub fn with_grouping(mut self, use_grouping: bool) -> Self {
        self.use_grouping = use_grouping;
        self
    }

    pub fn with_fraction_digits(mut self, min: usize, max: usize) -> Self {
        self.minimum_fraction_digits = Some(min);
        self.maximum_fraction_digits = Some(max);
        self
    }

    /// Effective `(min, max)` fraction digits, with `max >= min`.
    fn fraction_digits(&self) -> (i16, i16) {
        let default_max = match self.style {
            NumberStyle::Decimal => 3,
            NumberStyle::Percent => 0,
        };
        let min = self
            .minimum_fraction_digits
            .unwrap_or(0)
            .min(MAX_FRACTION_DIGITS);
        let max = self
            .maximum_fraction_digits
            .unwrap_or(default_max)
            .clamp(min, MAX_FRACTION_DIGITS);
        // Both are at most MAX_FRACTION_DIGITS.
        (min as i16, max as i16)
    }

    fn formatter_options(&self) -> DecimalFormatterOptions {
        let mut options = DecimalFormatterOptions::default();
        if !self.use_grouping {
            options.grouping_strategy = Some(GroupingStrategy::Never);
        }
        options
    }
}

/// Format `value` using the conventions of `locale`.
///
/// Rounds half away from zero to the maximum fraction digits, drops
/// trailing zeros down to the minimum, then applies the locale's decimal
/// and grouping symbols.
pub fn format_number(locale: &str, value: f64, options: &NumberFormatOptions) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    let scaled = match options.style {
        NumberStyle::Decimal => value,
        NumberStyle::Percent => value * 100.0,
    };
    let suffix = match options.style {
        NumberStyle::Decimal => "",
        NumberStyle::Percent => "%",
    };

    if scaled.is_infinite() {
        let sign = if scaled < 0.0 { "-" } else { "" };
        return format!("{sign}∞{suffix}");
    }

    let mut decimal = match Decimal::try_from_f64(scaled, FloatPrecision::RoundTrip) {
        Ok(decimal) => decimal,
        Err(e) => {
            warn!(value = scaled, error = ?e, "number not representable as a decimal");
            return format!("{scaled}{suffix}");
        }
    };

    let (min, max) = options.fraction_digits();
    decimal.round_with_mode(
        -max,
        SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfExpand),
    );
    decimal.trim_end();
    decimal.pad_end(-min);

    let icu = icu_locale(locale);
    let formatted = match DecimalFormatter::try_new(icu.into(), options.formatter_options()) {
        Ok(formatter) => formatter.format(&decimal).to_string(),
        Err(e) => {
            warn!(locale, error = ?e, "no decimal data for locale");
            decimal.to_string()
        }
    };
    format!("{formatted}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal() -> NumberFormatOptions {
        NumberFormatOptions::default()
    }

    #[test]
    fn test_english_grouping_and_decimals() {
        assert_eq!(format_number("en", 1234567.891, &decimal()), "1,234,567.891");
        assert_eq!(format_number("en", 1234.5, &decimal()), "1,234.5");
        assert_eq!(format_number("en", 999.0, &decimal()), "999");
        assert_eq!(format_number("en", 0.0, &decimal()), "0");
    }

    #[test]
    fn test_default_max_three_fraction_digits() {
        assert_eq!(format_number("en", 3.14159, &decimal()), "3.142");
        assert_eq!(format_number("en", 2.0004, &decimal()), "2");
    }

    #[test]
    fn test_european_separators() {
        assert_eq!(format_number("de", 1234567.891, &decimal()), "1.234.567,891");
        assert_eq!(format_number("fr", 1234.5, &decimal()), "1\u{202f}234,5");
        assert_eq!(format_number("ru", 1234567.5, &decimal()), "1\u{a0}234\u{a0}567,5");
    }

    #[test]
    fn test_regional_variants_differ() {
        assert_eq!(format_number("pt-BR", 1234567.5, &decimal()), "1.234.567,5");
        assert_ne!(
            format_number("pt-PT", 1234567.5, &decimal()),
            format_number("pt-BR", 1234567.5, &decimal())
        );
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_number("hi", 1234567.5, &decimal()), "12,34,567.5");
        assert_eq!(format_number("en-IN", 1234567.0, &decimal()), "12,34,567");
    }

    #[test]
    fn test_spanish_minimum_grouping() {
        assert_eq!(format_number("es", 1234.0, &decimal()), "1234");
        assert_eq!(format_number("es", 12345.5, &decimal()), "12.345,5");
        assert_ne!(
            format_number("es-MX", 1234567.5, &decimal()),
            format_number("es", 1234567.5, &decimal())
        );
    }

    #[test]
    fn test_fraction_digit_options() {
        assert_eq!(format_number("en", 1.5, &NumberFormatOptions::fixed(2)), "1.50");
        assert_eq!(format_number("en", 1.0, &NumberFormatOptions::fixed(0)), "1");
        assert_eq!(
            format_number("en", 1.23456, &decimal().with_fraction_digits(1, 4)),
            "1.2346"
        );
        assert_eq!(
            format_number("en", 1.0, &decimal().with_fraction_digits(1, 4)),
            "1.0"
        );
        // max below min is raised to min
        let options = NumberFormatOptions {
            minimum_fraction_digits: Some(2),
            maximum_fraction_digits: Some(1),
            ..decimal()
        };
        assert_eq!(format_number("en", 1.234, &options), "1.23");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_number("en", 2.5, &NumberFormatOptions::fixed(0)), "3");
        assert_eq!(format_number("en", -2.5, &NumberFormatOptions::fixed(0)), "-3");
        assert_eq!(format_number("en", 0.125, &NumberFormatOptions::fixed(2)), "0.13");
    }

    #[test]
    fn test_without_grouping() {
        let options = decimal().with_grouping(false);
        assert_eq!(format_number("en", 1234567.5, &options), "1234567.5");
        assert_eq!(format_number("de", 1234567.5, &options), "1234567,5");
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(format_number("en", -1234.5, &decimal()), "-1,234.5");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_number("en", 0.25, &NumberFormatOptions::percent()), "25%");
        assert_eq!(format_number("en", 0.1234, &NumberFormatOptions::percent()), "12%");
        assert_eq!(
            format_number("en", 0.1234, &NumberFormatOptions::percent().with_fraction_digits(1, 1)),
            "12.3%"
        );
        assert_eq!(format_number("de", 12.5, &NumberFormatOptions::percent()), "1.250%");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number("en", f64::NAN, &decimal()), "NaN");
        assert_eq!(format_number("en", f64::INFINITY, &decimal()), "∞");
        assert_eq!(format_number("en", f64::NEG_INFINITY, &decimal()), "-∞");
    }

    #[test]
    fn test_unknown_locale_uses_root_conventions() {
        assert_eq!(format_number("zz", 1234.5, &decimal()), "1,234.5");
    }
}
