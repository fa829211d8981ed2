//! Record ingestion
//!
//! Turns what a record source returns into validated [`AttendanceRecord`]s.
//!
//! ## Design Principles
//!
//! 1. **Complete snapshots**: sources hand over the full record list; analytics
//!    never run against a partial fetch
//! 2. **Validation before analysis**: malformed dates are caught here, as
//!    [`Error::InvalidRecord`], never inside analytics
//! 3. **One calendar**: every date is resolved under a single [`DayBoundary`]

mod source;

pub use source::{ApiRecordSource, FileRecordSource, RecordSnapshot, RecordSource};

use crate::calendar::DayBoundary;
use crate::error::{Error, Result};
use crate::types::{AttendanceRecord, RawAttendanceRecord, DEFAULT_STATUS};

/// How to treat records whose date cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Reject the whole batch on the first malformed record
    #[default]
    Strict,
    /// Drop malformed records and report them as warnings
    Lenient,
}

/// Result of validating a batch of raw records.
#[derive(Debug, Default)]
pub struct ValidatedRecords {
    /// Records that passed validation, in input order
    pub records: Vec<AttendanceRecord>,
    /// One entry per dropped record (lenient mode only)
    pub warnings: Vec<String>,
}

/// Validate raw records and resolve each date to a calendar day.
pub fn validate_records(
    raw: &[RawAttendanceRecord],
    boundary: DayBoundary,
    mode: ValidationMode,
) -> Result<ValidatedRecords> {
    let mut result = ValidatedRecords {
        records: Vec::with_capacity(raw.len()),
        warnings: Vec::new(),
    };

    for (index, record) in raw.iter().enumerate() {
        match boundary.parse_day(&record.date) {
            Ok(date) => result.records.push(AttendanceRecord {
                id: record.id.clone(),
                date,
                status: record
                    .status
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                course_id: record.course_id,
                lesson_id: record.lesson_id,
            }),
            Err(message) => {
                let err = Error::InvalidRecord {
                    index,
                    id: record.id.to_string(),
                    message,
                };
                match mode {
                    ValidationMode::Strict => return Err(err),
                    ValidationMode::Lenient => {
                        tracing::warn!("Skipping record: {}", err);
                        result.warnings.push(err.to_string());
                    }
                }
            }
        }
    }

    tracing::debug!(
        accepted = result.records.len(),
        skipped = result.warnings.len(),
        boundary = %boundary,
        "Validated attendance records"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_resolves_days_and_default_status() {
        let raw = vec![
            RawAttendanceRecord::new(1, "2024-01-01T23:30:00-05:00"),
            RawAttendanceRecord::new(2, "2024-01-03").with_status("late"),
        ];
        let validated = validate_records(&raw, DayBoundary::Utc, ValidationMode::Strict).unwrap();

        assert_eq!(validated.records.len(), 2);
        assert!(validated.warnings.is_empty());
        assert_eq!(
            validated.records[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(validated.records[0].status, "present");
        assert_eq!(validated.records[1].status, "late");
    }

    #[test]
    fn test_strict_mode_rejects_malformed_date() {
        let raw = vec![
            RawAttendanceRecord::new(1, "2024-01-01"),
            RawAttendanceRecord::new("x9", "not-a-date"),
        ];
        let err = validate_records(&raw, DayBoundary::Utc, ValidationMode::Strict).unwrap_err();

        assert!(err.is_validation());
        match err {
            Error::InvalidRecord { index, id, .. } => {
                assert_eq!(index, 1);
                assert_eq!(id, "x9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_mode_skips_malformed_date() {
        let raw = vec![
            RawAttendanceRecord::new(1, ""),
            RawAttendanceRecord::new(2, "2024-01-05"),
        ];
        let validated =
            validate_records(&raw, DayBoundary::Utc, ValidationMode::Lenient).unwrap();

        assert_eq!(validated.records.len(), 1);
        assert_eq!(validated.warnings.len(), 1);
        assert!(validated.warnings[0].contains("#0"));
    }
}
