//! Attendance streaks.
//!
//! All functions here are pure: they take a complete snapshot of validated
//! records (and, where needed, a reference day) and never read the clock.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{AttendanceRecord, DayRange};

/// Streak statistics over a full record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    /// Distinct calendar days with at least one record
    pub total_active_days: u32,
    /// Longest run of consecutive active days
    pub max_streak: u32,
    /// First and last day of the (earliest) longest run
    pub longest_run: Option<DayRange>,
}

/// Distinct calendar days, ascending.
pub fn active_days(records: &[AttendanceRecord]) -> BTreeSet<NaiveDate> {
    records.iter().map(|r| r.date).collect()
}

/// Compute active-day count and the longest consecutive-day run.
///
/// Depends only on the set of distinct days: record order, per-day
/// multiplicity and status are irrelevant.
pub fn compute_stats(records: &[AttendanceRecord]) -> StreakStats {
    let days = active_days(records);

    let mut max_streak = 0u32;
    let mut longest_run = None;
    let mut run = 0u32;
    let mut run_start: Option<NaiveDate> = None;
    let mut prev: Option<NaiveDate> = None;

    for &day in &days {
        match prev {
            Some(p) if (day - p).num_days() == 1 => run += 1,
            _ => {
                run = 1;
                run_start = Some(day);
            }
        }

        if run > max_streak {
            max_streak = run;
            longest_run = run_start.map(|start| DayRange { start, end: day });
        }
        prev = Some(day);
    }

    StreakStats {
        total_active_days: days.len() as u32,
        max_streak,
        longest_run,
    }
}

/// Current streak as of `reference`.
///
/// A streak is alive only if the most recent active day is `reference` or the
/// day before it; otherwise it is 0. A day after `reference` counts as the
/// most recent day and therefore breaks the streak. From the most recent day
/// the run is counted backwards.
pub fn current_streak(records: &[AttendanceRecord], reference: NaiveDate) -> u32 {
    let days = active_days(records);

    let Some(&latest) = days.last() else {
        return 0;
    };
    if latest != reference && Some(latest) != reference.pred_opt() {
        return 0;
    }

    let mut streak = 0u32;
    let mut expected = Some(latest);
    for &day in days.iter().rev() {
        if Some(day) != expected {
            break;
        }
        streak += 1;
        expected = day.pred_opt();
    }
    streak
}
