//! Day-first date resolution.
//!
//! Only two literal shapes are accepted: `DD/MM/YYYY` and `DD/MM/YYYY HH:MM`
//! (1–2 digit day, month, hour and minute; 4-digit year).
//!
//! # Ambiguity policy
//!
//! Given the two leading components `(a, b)` in left-to-right order:
//!
//! - `a <= 12 && b > 12` → the string is classified as American `MM/DD/YYYY`
//!   and **rejected**;
//! - `a > 12`, or both `a <= 12 && b <= 12` (e.g. `01/01/2025`) → accepted and
//!   read as `DD/MM/YYYY`.
//!
//! This is an asymmetric heuristic, not a guess at what the user meant: a string
//! that is genuinely ambiguous is always read day-first.
//!
//! ```ignore
//! use tablegate::date;
//!
//! assert_eq!(date::to_canonical("31/10/2025")?, "2025-10-31");
//! assert!(date::is_ambiguous_american_format("10/31/2025"));
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Why a date string was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Wrong shape, out-of-range component, or calendar-invalid date.
    #[error("invalid date '{0}', expected DD/MM/YYYY or DD/MM/YYYY HH:MM")]
    Invalid(String),
    /// Unambiguous `MM/DD/YYYY` input.
    #[error("'{0}' is in MM/DD/YYYY format, use DD/MM/YYYY")]
    AmericanFormat(String),
}

impl DateError {
    pub fn is_american(&self) -> bool {
        matches!(self, Self::AmericanFormat(_))
    }
}

/// A successfully resolved day-first date, with or without a time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayFirst {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl DayFirst {
    pub fn has_time(&self) -> bool {
        matches!(self, Self::DateTime(_))
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(d) => *d,
            Self::DateTime(dt) => dt.date(),
        }
    }

    /// The value as a point in time; date-only values sit at midnight.
    pub fn as_datetime(&self) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.and_time(NaiveTime::MIN),
            Self::DateTime(dt) => *dt,
        }
    }

    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:00`.
    pub fn to_canonical(&self) -> String {
        match self {
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:00").to_string(),
        }
    }

    /// Zero-padded `DD/MM/YYYY` or `DD/MM/YYYY HH:MM`.
    pub fn to_day_first(&self) -> String {
        match self {
            Self::Date(d) => d.format("%d/%m/%Y").to_string(),
            Self::DateTime(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        }
    }
}

impl fmt::Display for DayFirst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_day_first())
    }
}

struct Components {
    first: u32,
    second: u32,
    year: i32,
    time: Option<(u32, u32)>,
}

fn shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})(?: (\d{1,2}):(\d{1,2}))?$")
            .expect("invalid built-in date regex")
    })
}

fn split(input: &str) -> Option<Components> {
    let caps = shape().captures(input.trim())?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let time = match (num(4), num(5)) {
        (Some(h), Some(m)) => Some((h, m)),
        _ => None,
    };
    Some(Components {
        first: num(1)?,
        second: num(2)?,
        year: caps.get(3)?.as_str().parse().ok()?,
        time,
    })
}

fn american(c: &Components) -> bool {
    c.first <= 12 && c.second > 12
}

/// `true` only when the leading components unambiguously read as `MM/DD`.
pub fn is_ambiguous_american_format(input: &str) -> bool {
    split(input).is_some_and(|c| american(&c))
}

/// Parse a day-first date or date-time.
pub fn parse(input: &str) -> Result<DayFirst, DateError> {
    let invalid = || DateError::Invalid(input.to_string());
    let c = split(input).ok_or_else(invalid)?;
    if american(&c) {
        return Err(DateError::AmericanFormat(input.to_string()));
    }

    let (day, month, year) = (c.first, c.second, c.year);
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return Err(invalid());
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(invalid());
    }

    // from_ymd_opt only succeeds when the calendar date round-trips (no 31/02).
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    debug_assert!(date.day() == day && date.month() == month && date.year() == year);

    match c.time {
        None => Ok(DayFirst::Date(date)),
        Some((hour, minute)) => {
            if hour > 23 || minute > 59 {
                return Err(invalid());
            }
            let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;
            debug_assert!(time.hour() == hour && time.minute() == minute);
            Ok(DayFirst::DateTime(date.and_time(time)))
        }
    }
}

/// Normalize a day-first string to its ISO form.
pub fn to_canonical(input: &str) -> Result<String, DateError> {
    if is_ambiguous_american_format(input) {
        return Err(DateError::AmericanFormat(input.to_string()));
    }
    parse(input).map(|d| d.to_canonical())
}

/// Parse the output of [`to_canonical`] (or any plain ISO date / date-time).
pub fn parse_canonical(input: &str) -> Result<DayFirst, DateError> {
    let s = input.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(DayFirst::Date(d));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(DayFirst::DateTime(dt));
        }
    }
    Err(DateError::Invalid(input.to_string()))
}

/// Accept either a day-first or an ISO string. Used for admin-authored bounds.
pub fn parse_any(input: &str) -> Result<DayFirst, DateError> {
    match parse(input) {
        Ok(d) => Ok(d),
        Err(DateError::AmericanFormat(s)) => Err(DateError::AmericanFormat(s)),
        Err(DateError::Invalid(_)) => parse_canonical(input),
    }
}
