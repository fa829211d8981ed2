//! Analytics module for learnpulse
//!
//! Provides the derived views over a validated record snapshot:
//! - Streaks (active days, longest run, current run)
//! - Activity grid for calendar heatmaps (trailing 365 days)
//! - Attendance counts by status
//! - Dashboard statistics bundling all of the above
//!
//! Everything here is recomputed from scratch per snapshot. None of it reads
//! the clock or performs I/O; the reference day is always passed in.

pub mod dashboard;
pub mod grid;
pub mod streak;
pub mod summary;

pub use dashboard::{DashboardStats, StreakCheck};
pub use grid::{
    build_activity_grid, window_start, ActivityGrid, DayBucket, IntensityLevel, GRID_DAYS,
};
pub use streak::{active_days, compute_stats, current_streak, StreakStats};
pub use summary::AttendanceSummary;
