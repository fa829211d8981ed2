//! Attendance counts by status.

use serde::Serialize;

use crate::types::AttendanceRecord;

/// Per-status record counts.
///
/// Status matching is case-insensitive. Anything other than present,
/// absent or late lands in `other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub other: u32,
}

impl AttendanceSummary {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.total += 1;
            match record.status.trim().to_ascii_lowercase().as_str() {
                "present" => summary.present += 1,
                "absent" => summary.absent += 1,
                "late" => summary.late += 1,
                _ => summary.other += 1,
            }
        }
        summary
    }

    /// Percentage of records where the learner showed up (present or late).
    pub fn attendance_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.present + self.late) as f64 / self.total as f64 * 100.0
        }
    }
}
