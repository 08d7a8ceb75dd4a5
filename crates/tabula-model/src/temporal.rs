//! Date/time parsing and rendering.
//!
//! Values are parsed into a [`NaiveDateTime`] together with a flag recording
//! whether the source carried a time component, so date-only columns stay
//! date-only after arithmetic or truncation.
//!
//! Auto detection tries, in order: RFC 3339 (offsets normalized to UTC),
//! ISO 8601 date-times, common slash/dash date-times, then date-only
//! patterns. `MM/DD/YYYY` is tried before `DD/MM/YYYY`, so an ambiguous value
//! such as `03/04/2024` reads as March 4th.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const TIME_PATTERNS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// A parsed date or date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub value: NaiveDateTime,
    pub has_time: bool,
}

impl ParsedDateTime {
    pub fn date(date: NaiveDate) -> Self {
        Self {
            value: date.and_time(NaiveTime::MIN),
            has_time: false,
        }
    }

    pub fn datetime(value: NaiveDateTime) -> Self {
        Self {
            value,
            has_time: true,
        }
    }

    /// Renders as `%Y-%m-%d`, or `%Y-%m-%d %H:%M:%S` when a time is present.
    pub fn render(&self) -> String {
        if self.has_time {
            self.value.format("%Y-%m-%d %H:%M:%S").to_string()
        } else {
            self.value.format("%Y-%m-%d").to_string()
        }
    }
}

/// Parses a date or date-time using the auto-detection pattern list.
pub fn parse_datetime(text: &str) -> Option<ParsedDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ParsedDateTime::datetime(dt.naive_utc()));
    }
    for pattern in DATETIME_PATTERNS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Some(ParsedDateTime::datetime(value));
        }
    }
    for pattern in DATE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            return Some(ParsedDateTime::date(date));
        }
    }
    None
}

/// Parses a time of day (`HH:MM[:SS]`, optionally 12-hour with AM/PM).
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let trimmed = text.trim();
    TIME_PATTERNS
        .iter()
        .find_map(|pattern| NaiveTime::parse_from_str(trimmed, pattern).ok())
}

/// Fixed vocabulary of user-selectable date formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "YYYY-MM-DD")]
    IsoDate,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYearSlash,
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYearSlash,
    #[serde(rename = "YYYY/MM/DD")]
    YearMonthDaySlash,
    #[serde(rename = "DD-MM-YYYY")]
    DayMonthYearDash,
    #[serde(rename = "MM-DD-YYYY")]
    MonthDayYearDash,
    #[serde(rename = "YYYY-MM-DD HH:mm:ss")]
    IsoDateTime,
    #[serde(rename = "YYYY-MM-DDTHH:mm:ss")]
    Iso8601,
    #[serde(rename = "DD MMM YYYY")]
    DayShortMonthYear,
    #[serde(rename = "MMMM D, YYYY")]
    LongMonthDayYear,
    #[serde(rename = "HH:mm:ss")]
    Time,
}

impl DateFormat {
    pub const ALL: [DateFormat; 11] = [
        Self::IsoDate,
        Self::DayMonthYearSlash,
        Self::MonthDayYearSlash,
        Self::YearMonthDaySlash,
        Self::DayMonthYearDash,
        Self::MonthDayYearDash,
        Self::IsoDateTime,
        Self::Iso8601,
        Self::DayShortMonthYear,
        Self::LongMonthDayYear,
        Self::Time,
    ];

    /// The wire name, e.g. `YYYY-MM-DD`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsoDate => "YYYY-MM-DD",
            Self::DayMonthYearSlash => "DD/MM/YYYY",
            Self::MonthDayYearSlash => "MM/DD/YYYY",
            Self::YearMonthDaySlash => "YYYY/MM/DD",
            Self::DayMonthYearDash => "DD-MM-YYYY",
            Self::MonthDayYearDash => "MM-DD-YYYY",
            Self::IsoDateTime => "YYYY-MM-DD HH:mm:ss",
            Self::Iso8601 => "YYYY-MM-DDTHH:mm:ss",
            Self::DayShortMonthYear => "DD MMM YYYY",
            Self::LongMonthDayYear => "MMMM D, YYYY",
            Self::Time => "HH:mm:ss",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::IsoDate => "%Y-%m-%d",
            Self::DayMonthYearSlash => "%d/%m/%Y",
            Self::MonthDayYearSlash => "%m/%d/%Y",
            Self::YearMonthDaySlash => "%Y/%m/%d",
            Self::DayMonthYearDash => "%d-%m-%Y",
            Self::MonthDayYearDash => "%m-%d-%Y",
            Self::IsoDateTime => "%Y-%m-%d %H:%M:%S",
            Self::Iso8601 => "%Y-%m-%dT%H:%M:%S",
            Self::DayShortMonthYear => "%d %b %Y",
            Self::LongMonthDayYear => "%B %d, %Y",
            Self::Time => "%H:%M:%S",
        }
    }

    pub fn has_time(self) -> bool {
        matches!(self, Self::IsoDateTime | Self::Iso8601 | Self::Time)
    }

    /// Parses `text` strictly in this format.
    pub fn parse(self, text: &str) -> Option<ParsedDateTime> {
        let trimmed = text.trim();
        match self {
            Self::Time => NaiveTime::parse_from_str(trimmed, self.pattern())
                .ok()
                .map(|time| ParsedDateTime::datetime(NaiveDate::default().and_time(time))),
            _ if self.has_time() => NaiveDateTime::parse_from_str(trimmed, self.pattern())
                .ok()
                .map(ParsedDateTime::datetime),
            _ => NaiveDate::parse_from_str(trimmed, self.pattern())
                .ok()
                .map(ParsedDateTime::date),
        }
    }

    pub fn render(self, value: &NaiveDateTime) -> String {
        match self {
            Self::LongMonthDayYear => value.format("%B %-d, %Y").to_string(),
            _ => value.format(self.pattern()).to_string(),
        }
    }
}
