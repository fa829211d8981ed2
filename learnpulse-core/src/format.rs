//! Formatting helpers shared across reports.

use chrono::NaiveDate;

use crate::types::DayRange;

/// Format a day count with the right plural (e.g., "1 day", "3 days").
pub fn format_days(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Format a day relative to a reference day (e.g., "yesterday", "5d ago").
pub fn format_relative_day(day: NaiveDate, reference: NaiveDate) -> String {
    let days = (reference - day).num_days();

    if days < 0 {
        "upcoming".to_string()
    } else if days == 0 {
        "today".to_string()
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        day.format("%b %d").to_string()
    }
}

/// Format a day range for display (e.g., "Jan 05 - Jan 07, 2024").
pub fn format_day_range(range: &DayRange) -> String {
    if range.start == range.end {
        range.start.format("%b %d, %Y").to_string()
    } else {
        format!(
            "{} - {}",
            range.start.format("%b %d"),
            range.end.format("%b %d, %Y")
        )
    }
}

/// Format an optional day range, or an em dash if missing.
pub fn format_day_range_opt(range: Option<&DayRange>) -> String {
    match range {
        Some(range) => format_day_range(range),
        None => "—".to_string(),
    }
}
