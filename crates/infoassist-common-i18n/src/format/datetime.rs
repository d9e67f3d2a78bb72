//! Locale-aware date and time formatting.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDateTime, Timelike, Utc};
use icu::datetime::fieldsets::{self, enums::DateFieldSet};
use icu::datetime::input::{Date, Time};
use icu::datetime::options::{Alignment, Length, YearStyle};
use icu::datetime::{DateTimeFormatter, NoCalendarFormatter};
use icu::locale::extensions::unicode::{key, value};
use icu::locale::Locale as IcuLocale;
use tracing::warn;

use super::icu_locale;

/// Rendered for instants outside the representable range.
pub const INVALID_DATE: &str = "Invalid Date";

/// A point in time, or its epoch-milliseconds representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Instant(DateTime<Utc>),
    EpochMillis(i64),
    /// A system time chrono cannot represent. Formats as [`INVALID_DATE`].
    OutOfRange,
}

impl DateInput {
    /// The instant in UTC, or `None` when the value is out of range.
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(instant) => Some(instant),
            Self::EpochMillis(millis) => DateTime::<Utc>::from_timestamp_millis(millis),
            Self::OutOfRange => None,
        }
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Self::Instant(instant.with_timezone(&Utc))
    }
}

impl From<SystemTime> for DateInput {
    fn from(time: SystemTime) -> Self {
        let instant = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_secs())
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, after.subsec_nanos())),
            Err(e) => {
                let before = e.duration();
                let (secs, nanos) = match before.subsec_nanos() {
                    0 => (before.as_secs(), 0),
                    n => (before.as_secs().saturating_add(1), 1_000_000_000 - n),
                };
                i64::try_from(secs)
                    .ok()
                    .and_then(|secs| DateTime::from_timestamp(-secs, nanos))
            }
        };
        instant.map_or(Self::OutOfRange, Self::Instant)
    }
}

impl From<i64> for DateInput {
    fn from(millis: i64) -> Self {
        Self::EpochMillis(millis)
    }
}

/// Width of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericWidth {
    /// `5`
    Numeric,
    /// `05`
    TwoDigit,
}

/// Width of the month field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthWidth {
    Numeric,
    TwoDigit,
    /// Abbreviated name (`Jan`).
    Short,
    /// Full name (`January`).
    Long,
}

/// Width of a spelled-out field such as the weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextWidth {
    Short,
    Long,
}

/// Which fields to render and how.
///
/// Fields left as `None` are omitted, except that a year or month always
/// brings the day along (the calendar field sets are year-month-day,
/// month-day and day, each optionally with the weekday) and an hour
/// always brings the minute. [`format_date`]
/// falls back to a numeric year/month/day when no field is set;
/// [`format_time`] always fills in hour, minute and second unless the
/// caller set them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeFormatOptions {
    pub weekday: Option<TextWidth>,
    pub year: Option<NumericWidth>,
    pub month: Option<MonthWidth>,
    pub day: Option<NumericWidth>,
    pub hour: Option<NumericWidth>,
    pub minute: Option<NumericWidth>,
    pub second: Option<NumericWidth>,
    /// Force a 12-hour (`true`) or 24-hour (`false`) clock.
    pub hour12: Option<bool>,
    /// Offset the instant is displayed in. Defaults to the host's local
    /// time zone.
    pub utc_offset: Option<FixedOffset>,
}

impl DateTimeFormatOptions {
    /// Numeric year, month and day.
    pub fn numeric_date() -> Self {
        Self {
            year: Some(NumericWidth::Numeric),
            month: Some(MonthWidth::Numeric),
            day: Some(NumericWidth::Numeric),
            ..Self::default()
        }
    }

    /// Year, full month name and day.
    pub fn long_date() -> Self {
        Self {
            month: Some(MonthWidth::Long),
            ..Self::numeric_date()
        }
    }

    pub fn with_weekday(mut self, width: TextWidth) -> Self {
        self.weekday = Some(width);
        self
    }

    pub fn with_hour12(mut self, hour12: bool) -> Self {
        self.hour12 = Some(hour12);
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    fn has_date_fields(&self) -> bool {
        self.weekday.is_some() || self.year.is_some() || self.month.is_some() || self.day.is_some()
    }

    fn has_time_fields(&self) -> bool {
        self.hour.is_some() || self.minute.is_some() || self.second.is_some()
    }

    fn with_date_defaults(mut self) -> Self {
        if !self.has_date_fields() && !self.has_time_fields() {
            self.year = Some(NumericWidth::Numeric);
            self.month = Some(MonthWidth::Numeric);
            self.day = Some(NumericWidth::Numeric);
        }
        self
    }

    fn with_time_defaults(mut self) -> Self {
        self.hour.get_or_insert(NumericWidth::Numeric);
        self.minute.get_or_insert(NumericWidth::Numeric);
        self.second.get_or_insert(NumericWidth::Numeric);
        self
    }

    fn length(&self) -> Length {
        match (self.month, self.weekday) {
            (Some(MonthWidth::Long), _) => Length::Long,
            (Some(MonthWidth::Short), _) => Length::Medium,
            (None, Some(TextWidth::Long)) if self.day.is_none() && self.year.is_none() => {
                Length::Long
            }
            (None, Some(TextWidth::Short)) if self.day.is_none() && self.year.is_none() => {
                Length::Medium
            }
            _ => Length::Short,
        }
    }

    fn date_field_set(&self) -> DateFieldSet {
        let length = self.length();
        let alignment = if self.month == Some(MonthWidth::TwoDigit)
            || self.day == Some(NumericWidth::TwoDigit)
        {
            Alignment::Column
        } else {
            Alignment::Auto
        };
        let year_style = match self.year {
            Some(NumericWidth::TwoDigit) => YearStyle::Auto,
            _ => YearStyle::Full,
        };
        let weekday = self.weekday.is_some();

        if self.year.is_some() {
            if weekday {
                DateFieldSet::YMDE(
                    fieldsets::YMDE::for_length(length)
                        .with_alignment(alignment)
                        .with_year_style(year_style),
                )
            } else {
                DateFieldSet::YMD(
                    fieldsets::YMD::for_length(length)
                        .with_alignment(alignment)
                        .with_year_style(year_style),
                )
            }
        } else if self.month.is_some() {
            if weekday {
                DateFieldSet::MDE(fieldsets::MDE::for_length(length).with_alignment(alignment))
            } else {
                DateFieldSet::MD(fieldsets::MD::for_length(length).with_alignment(alignment))
            }
        } else if self.day.is_some() {
            if weekday {
                DateFieldSet::DE(fieldsets::DE::for_length(length).with_alignment(alignment))
            } else {
                DateFieldSet::D(fieldsets::D::for_length(length).with_alignment(alignment))
            }
        } else {
            DateFieldSet::E(fieldsets::E::for_length(length))
        }
    }

    fn time_field_set(&self) -> fieldsets::T {
        let time = if self.second.is_some() {
            fieldsets::T::hms()
        } else {
            fieldsets::T::hm()
        };
        if self.hour == Some(NumericWidth::TwoDigit) {
            time.with_alignment(Alignment::Column)
        } else {
            time
        }
    }

    /// The locale with the requested hour cycle applied.
    fn locale(&self, tag: &str) -> IcuLocale {
        let mut locale = icu_locale(tag);
        if let Some(hour12) = self.hour12 {
            let cycle = if hour12 { value!("h12") } else { value!("h23") };
            locale.extensions.unicode.keywords.set(key!("hc"), cycle);
        }
        locale
    }
}

/// Format a date in `locale`.
pub fn format_date(
    locale: &str,
    value: impl Into<DateInput>,
    options: &DateTimeFormatOptions,
) -> String {
    render(locale, value.into(), &options.with_date_defaults())
}

/// Format a time of day in `locale`.
pub fn format_time(
    locale: &str,
    value: impl Into<DateInput>,
    options: &DateTimeFormatOptions,
) -> String {
    render(locale, value.into(), &options.with_time_defaults())
}

fn render(tag: &str, input: DateInput, options: &DateTimeFormatOptions) -> String {
    let Some(instant) = input.to_utc() else {
        return INVALID_DATE.to_string();
    };
    let local = match options.utc_offset {
        Some(offset) => instant.with_timezone(&offset).naive_local(),
        None => instant.with_timezone(&Local).naive_local(),
    };
    let locale = options.locale(tag);

    let date = options
        .has_date_fields()
        .then(|| date_part(&locale, &local, options));
    let time = options
        .has_time_fields()
        .then(|| time_part(&locale, &local, options));

    match (date, time) {
        (Some(date), Some(time)) => format!("{date}, {time}"),
        (Some(date), None) => date,
        (None, Some(time)) => time,
        (None, None) => String::new(),
    }
}

fn date_part(locale: &IcuLocale, local: &NaiveDateTime, options: &DateTimeFormatOptions) -> String {
    let fallback = || local.format("%Y-%m-%d").to_string();

    // chrono months and days always fit in a u8
    let Ok(date) = Date::try_new_iso(local.year(), local.month() as u8, local.day() as u8) else {
        return fallback();
    };

    match DateTimeFormatter::try_new(locale.clone().into(), options.date_field_set()) {
        Ok(formatter) => formatter.format(&date).to_string(),
        Err(e) => {
            warn!(%locale, error = ?e, "no date format data");
            fallback()
        }
    }
}

fn time_part(locale: &IcuLocale, local: &NaiveDateTime, options: &DateTimeFormatOptions) -> String {
    let fallback = || local.format("%H:%M:%S").to_string();

    let Ok(time) = Time::try_new(
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
        0,
    ) else {
        return fallback();
    };

    match NoCalendarFormatter::try_new(locale.clone().into(), options.time_field_set()) {
        Ok(formatter) => formatter.format(&time).to_string(),
        Err(e) => {
            warn!(%locale, error = ?e, "no time format data");
            fallback()
        }
    }
}
