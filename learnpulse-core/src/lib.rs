//! # learnpulse-core
//!
//! Core library for learnpulse - attendance streaks and activity heatmaps
//! for learning-management platforms.
//!
//! This library provides:
//! - Domain types for attendance records
//! - Validation of raw API records into calendar-day records
//! - Record sources (JSON snapshot files, the LMS HTTP API)
//! - Streak, activity-grid and attendance analytics
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Layer 0 (Raw):** Records as returned by the LMS API or a snapshot file
//! - **Layer 1 (Validated):** [`AttendanceRecord`]s with a resolved calendar day
//! - **Layer 2 (Derived):** Streaks, activity grid and summaries (recomputed on every fetch)
//!
//! ## Example
//!
//! ```rust,no_run
//! use learnpulse_core::analytics::DashboardStats;
//! use learnpulse_core::ingest::{validate_records, FileRecordSource, RecordSource, ValidationMode};
//! use learnpulse_core::{Config, DayBoundary};
//!
//! let config = Config::load().expect("failed to load config");
//! let source = FileRecordSource::new("attendance.json");
//! let snapshot = source.fetch().expect("failed to read records");
//!
//! let boundary = config.calendar.boundary().expect("invalid calendar config");
//! let validated = validate_records(&snapshot.records, boundary, ValidationMode::Strict)
//!     .expect("malformed records");
//!
//! let stats = DashboardStats::compute(&validated.records, boundary.today(), snapshot.server_streak);
//! println!("longest streak: {} days", stats.stats.max_streak);
//! # let _ = DayBoundary::Utc;
//! ```

// Re-export commonly used items at the crate root
pub use calendar::DayBoundary;
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod calendar;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod types;
