//! Calendar-day resolution
//!
//! Streaks and grid buckets compare calendar days, so every record date has to
//! be mapped to exactly one day before analysis. That mapping depends on which
//! timezone decides where a day starts. [`DayBoundary`] makes that choice
//! explicit:
//!
//! - Date-only strings (`2024-01-01`) are taken verbatim.
//! - Date-times with an offset are converted into the boundary's zone first.
//! - Date-times without an offset are treated as UTC, matching how the LMS
//!   backend stores timestamps.
//!
//! The default boundary is UTC.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Naive date-time layouts accepted on the wire (interpreted as UTC).
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset date-time layouts not covered by RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Which timezone decides calendar-day boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    /// Bucket by UTC calendar day
    #[default]
    Utc,
    /// Bucket by the machine's local timezone
    Local,
    /// Bucket by a fixed UTC offset
    Fixed(FixedOffset),
}

impl DayBoundary {
    /// Calendar day of an instant under this boundary.
    pub fn day_of<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> NaiveDate {
        match self {
            DayBoundary::Utc => instant.with_timezone(&Utc).date_naive(),
            DayBoundary::Local => instant.with_timezone(&Local).date_naive(),
            DayBoundary::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// The current calendar day under this boundary.
    ///
    /// Only callers read the clock; analytics take the reference day as input.
    pub fn today(&self) -> NaiveDate {
        self.day_of(&Utc::now())
    }

    /// Parse an ISO-8601 date or date-time string into a calendar day.
    pub fn parse_day(&self, value: &str) -> std::result::Result<NaiveDate, String> {
        let value = value.trim();
        if value.is_empty() {
            return Err("empty date".to_string());
        }

        if value.len() == 10 {
            return NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map_err(|e| format!("invalid date '{}': {}", value, e));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(self.day_of(&dt));
        }

        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(value, format) {
                return Ok(self.day_of(&dt));
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(self.day_of(&naive.and_utc()));
            }
        }

        Err(format!("unrecognized date '{}'", value))
    }
}

impl fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayBoundary::Utc => f.write_str("utc"),
            DayBoundary::Local => f.write_str("local"),
            DayBoundary::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for DayBoundary {
    type Err = String;

    /// Accepts `utc`, `local`, or an offset like `+05:30` / `-0800`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "utc" | "z" => return Ok(DayBoundary::Utc),
            "local" => return Ok(DayBoundary::Local),
            _ => {}
        }

        let (sign, rest) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => return Err(format!("invalid timezone '{}': expected utc, local or ±HH:MM", s)),
        };

        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid UTC offset '{}'", s));
        }
        let hours: i32 = digits[..2].parse().map_err(|_| format!("invalid UTC offset '{}'", s))?;
        let minutes: i32 = digits[2..].parse().map_err(|_| format!("invalid UTC offset '{}'", s))?;
        if minutes >= 60 {
            return Err(format!("invalid UTC offset '{}'", s));
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(DayBoundary::Fixed)
            .ok_or_else(|| format!("UTC offset out of range '{}'", s))
    }
}
