//! Activity grid for calendar heatmaps.
//!
//! The grid always covers [`GRID_DAYS`] consecutive days ending at (and
//! including) a caller-supplied reference day, oldest first, with no gaps.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::types::AttendanceRecord;

/// Length of the trailing activity window in days.
pub const GRID_DAYS: usize = 365;

/// Record count for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: u32,
}

impl DayBucket {
    /// Heatmap intensity for this day.
    pub fn level(&self) -> IntensityLevel {
        IntensityLevel::from_count(self.count)
    }
}

/// Coarse heatmap shade (0-4) derived from a day's record count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum IntensityLevel {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Max = 4,
}

impl IntensityLevel {
    /// All levels, lowest first.
    pub const ALL: [IntensityLevel; 5] = [
        IntensityLevel::None,
        IntensityLevel::Low,
        IntensityLevel::Medium,
        IntensityLevel::High,
        IntensityLevel::Max,
    ];

    /// Classify a per-day record count.
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => IntensityLevel::None,
            1 => IntensityLevel::Low,
            2..=3 => IntensityLevel::Medium,
            4..=5 => IntensityLevel::High,
            _ => IntensityLevel::Max,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Legend label for the count range this level covers.
    pub fn range_label(self) -> &'static str {
        match self {
            IntensityLevel::None => "0",
            IntensityLevel::Low => "1",
            IntensityLevel::Medium => "2-3",
            IntensityLevel::High => "4-5",
            IntensityLevel::Max => "6+",
        }
    }
}

impl From<IntensityLevel> for u8 {
    fn from(level: IntensityLevel) -> Self {
        level.as_u8()
    }
}

/// A fixed-length, chronologically ordered window of day buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityGrid {
    buckets: Vec<DayBucket>,
}

/// First day of the window ending at `reference`, or `None` if that day
/// would fall before [`NaiveDate::MIN`].
pub fn window_start(reference: NaiveDate) -> Option<NaiveDate> {
    reference.checked_sub_signed(Duration::days(GRID_DAYS as i64 - 1))
}

/// Count records per day over the [`GRID_DAYS`] days ending at `reference`.
///
/// Records outside the window are ignored. Status is ignored. A `reference`
/// without a full window before it (see [`window_start`]) gets a window
/// clamped to start at [`NaiveDate::MIN`].
pub fn build_activity_grid(records: &[AttendanceRecord], reference: NaiveDate) -> ActivityGrid {
    let start = window_start(reference).unwrap_or(NaiveDate::MIN);

    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for record in records {
        if record.date >= start && record.date <= reference {
            *counts.entry(record.date).or_insert(0) += 1;
        }
    }

    let buckets = start
        .iter_days()
        .take(GRID_DAYS)
        .map(|date| DayBucket {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect();

    ActivityGrid { buckets }
}

impl ActivityGrid {
    /// All buckets, oldest first.
    pub fn buckets(&self) -> &[DayBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// First (oldest) day in the window.
    pub fn start(&self) -> NaiveDate {
        self.buckets[0].date
    }

    /// Last day in the window (the reference day).
    pub fn end(&self) -> NaiveDate {
        self.buckets[self.buckets.len() - 1].date
    }

    /// Bucket for a specific day, if it is inside the window.
    pub fn get(&self, date: NaiveDate) -> Option<&DayBucket> {
        let offset = (date - self.start()).num_days();
        if offset < 0 {
            return None;
        }
        self.buckets.get(offset as usize)
    }

    /// Total records inside the window.
    pub fn total_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count as u64).sum()
    }

    /// Days inside the window with at least one record.
    pub fn active_days(&self) -> usize {
        self.buckets.iter().filter(|b| b.count > 0).count()
    }

    /// Busiest single day count inside the window.
    pub fn max_count(&self) -> u32 {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Buckets arranged as Monday-first week columns.
    ///
    /// Row 0 is Monday, row 6 is Sunday. The first and last columns are
    /// padded with `None` for days outside the window.
    pub fn weeks(&self) -> Vec<[Option<DayBucket>; 7]> {
        let mut weeks = Vec::with_capacity(GRID_DAYS / 7 + 2);
        let mut column: [Option<DayBucket>; 7] = [None; 7];

        for bucket in &self.buckets {
            let row = bucket.date.weekday().num_days_from_monday() as usize;
            if row == 0 && column.iter().any(Option::is_some) {
                weeks.push(column);
                column = [None; 7];
            }
            column[row] = Some(*bucket);
        }
        if column.iter().any(Option::is_some) {
            weeks.push(column);
        }

        weeks
    }
}
