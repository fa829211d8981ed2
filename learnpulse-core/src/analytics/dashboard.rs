//! Dashboard analytics.
//!
//! Bundles streaks, the activity grid and attendance counts for one record
//! snapshot, plus the check of a server-reported streak against the local
//! computation.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::grid::{build_activity_grid, ActivityGrid};
use super::streak::{compute_stats, current_streak, StreakStats};
use super::summary::AttendanceSummary;
use crate::types::AttendanceRecord;

/// Server-reported current streak compared with the local computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakCheck {
    pub server: u32,
    pub local: u32,
}

impl StreakCheck {
    pub fn matches(&self) -> bool {
        self.server == self.local
    }
}

/// Everything the dashboard shows for one learner.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Day the window and current streak are anchored to
    pub reference_date: NaiveDate,
    /// Active days and longest streak over all records
    pub stats: StreakStats,
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    /// Trailing 365-day activity grid
    pub grid: ActivityGrid,
    /// Counts by status
    pub summary: AttendanceSummary,
    /// Weekday with the most records
    pub busiest_weekday: Option<Weekday>,
    /// Present only when the source reported a streak
    pub streak_check: Option<StreakCheck>,
}

impl DashboardStats {
    /// Compute all dashboard figures from one complete snapshot.
    pub fn compute(
        records: &[AttendanceRecord],
        reference_date: NaiveDate,
        server_streak: Option<u32>,
    ) -> Self {
        let stats = compute_stats(records);
        let current = current_streak(records, reference_date);
        let grid = build_activity_grid(records, reference_date);
        let summary = AttendanceSummary::from_records(records);

        let streak_check = server_streak.map(|server| StreakCheck {
            server,
            local: current,
        });
        if let Some(check) = &streak_check {
            if !check.matches() {
                tracing::warn!(
                    server = check.server,
                    local = check.local,
                    "Server streak disagrees with local computation"
                );
            }
        }

        tracing::debug!(
            records = records.len(),
            active_days = stats.total_active_days,
            max_streak = stats.max_streak,
            current_streak = current,
            "Computed dashboard stats"
        );

        Self {
            reference_date,
            stats,
            current_streak: current,
            grid,
            summary,
            busiest_weekday: busiest_weekday(records),
            streak_check,
        }
    }

    /// Format the busiest weekday for display.
    pub fn format_busiest_day(&self) -> &'static str {
        match self.busiest_weekday {
            Some(Weekday::Mon) => "Monday",
            Some(Weekday::Tue) => "Tuesday",
            Some(Weekday::Wed) => "Wednesday",
            Some(Weekday::Thu) => "Thursday",
            Some(Weekday::Fri) => "Friday",
            Some(Weekday::Sat) => "Saturday",
            Some(Weekday::Sun) => "Sunday",
            None => "Unknown",
        }
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weekday with the most records; ties go to the earlier day of the week.
fn busiest_weekday(records: &[AttendanceRecord]) -> Option<Weekday> {
    let mut counts = [0u32; 7];
    for record in records {
        counts[record.date.weekday().num_days_from_monday() as usize] += 1;
    }

    let mut best: Option<(usize, u32)> = None;
    for (idx, &count) in counts.iter().enumerate() {
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((idx, count));
        }
    }

    best.map(|(idx, _)| WEEKDAYS[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::GRID_DAYS;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dashboard_empty() {
        let stats = DashboardStats::compute(&[], day(2024, 1, 10), None);
        assert_eq!(stats.stats.max_streak, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.grid.len(), GRID_DAYS);
        assert_eq!(stats.summary.total, 0);
        assert!(stats.busiest_weekday.is_none());
        assert_eq!(stats.format_busiest_day(), "Unknown");
        assert!(stats.streak_check.is_none());
    }

    #[test]
    fn test_dashboard_streak_check() {
        let records = vec![
            AttendanceRecord::new(1, day(2024, 1, 9)),
            AttendanceRecord::new(2, day(2024, 1, 10)),
        ];

        let stats = DashboardStats::compute(&records, day(2024, 1, 10), Some(2));
        let check = stats.streak_check.unwrap();
        assert_eq!(check.local, 2);
        assert!(check.matches());

        let stats = DashboardStats::compute(&records, day(2024, 1, 10), Some(5));
        assert!(!stats.streak_check.unwrap().matches());
    }

    #[test]
    fn test_busiest_weekday() {
        // 2024-01-01 is a Monday, 2024-01-03 a Wednesday
        let records = vec![
            AttendanceRecord::new(1, day(2024, 1, 1)),
            AttendanceRecord::new(2, day(2024, 1, 3)),
            AttendanceRecord::new(3, day(2024, 1, 10)),
        ];
        let stats = DashboardStats::compute(&records, day(2024, 1, 10), None);
        assert_eq!(stats.busiest_weekday, Some(Weekday::Wed));
        assert_eq!(stats.format_busiest_day(), "Wednesday");
    }

    #[test]
    fn test_busiest_weekday_tie_goes_to_earlier_day() {
        let records = vec![
            AttendanceRecord::new(1, day(2024, 1, 3)),
            AttendanceRecord::new(2, day(2024, 1, 1)),
        ];
        assert_eq!(busiest_weekday(&records), Some(Weekday::Mon));
    }
}
