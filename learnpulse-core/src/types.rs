//! Core domain types for learnpulse
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Record** | One attendance entry as stored by the LMS (one lesson attended, one course completed) |
//! | **Calendar day** | A date with time-of-day discarded; the unit for streaks and grid buckets |
//! | **Streak** | A maximal run of consecutive calendar days each having at least one record |
//! | **Activity grid** | The trailing 365-day sequence of per-day record counts |
//!
//! Raw records ([`RawAttendanceRecord`]) carry the date exactly as the API sent
//! it. Analytics only ever see validated [`AttendanceRecord`]s, whose `date` is
//! already a calendar day (see [`crate::calendar::DayBoundary`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status assumed when a record does not carry one.
pub const DEFAULT_STATUS: &str = "present";

/// Opaque record identifier.
///
/// The LMS backend uses integer primary keys, document stores use strings.
/// Neither is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// An attendance entry exactly as received from a record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAttendanceRecord {
    pub id: RecordId,
    /// ISO-8601 date (`2024-01-01`) or date-time (`2024-01-01T09:00:00Z`)
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<i64>,
}

impl RawAttendanceRecord {
    /// Convenience constructor for a record with only an id and a date.
    pub fn new(id: impl Into<RecordId>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            status: None,
            course_id: None,
            lesson_id: None,
        }
    }

    /// Set the status label.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// A validated attendance record, bucketed to a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: RecordId,
    /// Calendar day the record falls on
    pub date: NaiveDate,
    /// Free-form label ("present", "absent", "late", ...); never used for streaks
    pub status: String,
    pub course_id: Option<i64>,
    pub lesson_id: Option<i64>,
}

impl AttendanceRecord {
    /// A "present" record on the given day.
    pub fn new(id: impl Into<RecordId>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            status: DEFAULT_STATUS.to_string(),
            course_id: None,
            lesson_id: None,
        }
    }

    /// Set the status label.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}
