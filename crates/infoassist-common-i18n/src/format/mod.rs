//! Locale-aware number, date and time formatting.
//!
//! Rendering is delegated to ICU4X, which carries the CLDR data for
//! separators, digit grouping, field order and the 12/24-hour clock. The
//! option structs here map the engine's Intl-style options onto ICU4X
//! formatters.

pub mod datetime;
pub mod number;

use icu::locale::{locale, Locale as IcuLocale};
use tracing::debug;

pub use datetime::{
    format_date, format_time, DateInput, DateTimeFormatOptions, MonthWidth, NumericWidth,
    TextWidth, INVALID_DATE,
};
pub use number::{format_number, NumberFormatOptions, NumberStyle};

/// Parse a locale tag for ICU4X. Unparsable tags format as English.
pub(crate) fn icu_locale(tag: &str) -> IcuLocale {
    tag.replace('_', "-").parse().unwrap_or_else(|e| {
        debug!(tag, error = ?e, "unparsable locale tag, formatting as English");
        locale!("en")
    })
}
