//! Report output for the `stats` and `grid` commands.

use anyhow::Result;
use learnpulse_core::analytics::DashboardStats;
use learnpulse_core::format::{
    format_day_range, format_day_range_opt, format_days, format_relative_day,
};

use crate::heatmap::render_heatmap;

pub fn print_terminal(stats: &DashboardStats, source: &str) {
    let title = format!("Attendance as of {}", stats.reference_date.format("%b %d, %Y"));

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!("  Source: {}", source);
    println!();

    if stats.summary.total == 0 {
        println!("  No attendance records found.");
        println!();
        return;
    }

    println!("STREAKS");
    println!("   Current:  {}", format_days(stats.current_streak));
    let longest_dates = stats
        .stats
        .longest_run
        .as_ref()
        .map(|run| format!(" ({})", format_day_range(run)))
        .unwrap_or_default();
    println!(
        "   Longest:  {}{}",
        format_days(stats.stats.max_streak),
        longest_dates
    );
    println!("   Active:   {}", format_days(stats.stats.total_active_days));
    if let Some(last) = stats.grid.buckets().iter().rev().find(|b| b.count > 0) {
        println!(
            "   Last:     {}",
            format_relative_day(last.date, stats.reference_date)
        );
    }
    if let Some(check) = &stats.streak_check {
        println!(
            "   Server:   {}{}",
            format_days(check.server),
            if check.matches() { "" } else { "  (mismatch)" }
        );
    }
    println!();

    println!("ATTENDANCE");
    println!(
        "   Records:  {:<10} Rate: {:.1}%",
        stats.summary.total,
        stats.summary.attendance_rate()
    );
    println!(
        "   Present:  {:<10} Late: {}",
        stats.summary.present, stats.summary.late
    );
    println!(
        "   Absent:   {:<10} Other: {}",
        stats.summary.absent, stats.summary.other
    );
    println!("   Busiest:  {}", stats.format_busiest_day());
    println!();

    println!("LAST 365 DAYS");
    println!(
        "   {} records on {} across {} - {}",
        stats.grid.total_count(),
        format_days(stats.grid.active_days() as u32),
        stats.grid.start().format("%b %d, %Y"),
        stats.grid.end().format("%b %d, %Y")
    );
    println!();
}

pub fn print_markdown(stats: &DashboardStats, source: &str) {
    println!(
        "# Attendance as of {}",
        stats.reference_date.format("%Y-%m-%d")
    );
    println!();
    println!("*Source: {}*", source);
    println!();

    if stats.summary.total == 0 {
        println!("*No attendance records found.*");
        return;
    }

    println!("## Streaks");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Current streak | {} |", format_days(stats.current_streak));
    println!("| Longest streak | {} |", format_days(stats.stats.max_streak));
    println!(
        "| Longest run | {} |",
        format_day_range_opt(stats.stats.longest_run.as_ref())
    );
    println!(
        "| Active days | {} |",
        stats.stats.total_active_days
    );
    if let Some(check) = &stats.streak_check {
        println!(
            "| Server streak | {}{} |",
            format_days(check.server),
            if check.matches() { "" } else { " (mismatch)" }
        );
    }
    println!();

    println!("## Attendance");
    println!();
    println!("| Status | Records |");
    println!("|--------|---------|");
    println!("| Present | {} |", stats.summary.present);
    println!("| Late | {} |", stats.summary.late);
    println!("| Absent | {} |", stats.summary.absent);
    println!("| Other | {} |", stats.summary.other);
    println!();
    println!(
        "- **Attendance rate:** {:.1}%",
        stats.summary.attendance_rate()
    );
    println!("- **Busiest day:** {}", stats.format_busiest_day());
    println!();

    println!("## Last 365 Days");
    println!();
    println!("```");
    for line in render_heatmap(&stats.grid) {
        println!("{}", line);
    }
    println!("```");
    println!();

    println!("---");
    println!("*Generated by learnpulse*");
}

pub fn print_json(stats: &DashboardStats) -> Result<()> {
    let json = serde_json::json!({
        "reference_date": stats.reference_date.to_string(),
        "streaks": {
            "current": stats.current_streak,
            "longest": stats.stats.max_streak,
            "longest_start": stats.stats.longest_run.map(|r| r.start.to_string()),
            "longest_end": stats.stats.longest_run.map(|r| r.end.to_string()),
            "active_days": stats.stats.total_active_days,
        },
        "server_check": stats.streak_check.map(|c| serde_json::json!({
            "server": c.server,
            "local": c.local,
            "matches": c.matches(),
        })),
        "attendance": {
            "total": stats.summary.total,
            "present": stats.summary.present,
            "absent": stats.summary.absent,
            "late": stats.summary.late,
            "other": stats.summary.other,
            "rate": stats.summary.attendance_rate(),
        },
        "busiest_day": stats.busiest_weekday.map(|_| stats.format_busiest_day()),
        "window": {
            "start": stats.grid.start().to_string(),
            "end": stats.grid.end().to_string(),
            "records": stats.grid.total_count(),
            "active_days": stats.grid.active_days(),
            "max_count": stats.grid.max_count(),
        },
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

pub fn print_grid_terminal(stats: &DashboardStats) {
    println!();
    println!(
        "{} records in the last 365 days  │  Streak: {}  │  Longest: {}",
        stats.grid.total_count(),
        format_days(stats.current_streak),
        format_days(stats.stats.max_streak)
    );
    println!();
    for line in render_heatmap(&stats.grid) {
        println!("{}", line);
    }
    println!();
}

pub fn print_grid_json(stats: &DashboardStats) -> Result<()> {
    let days: Vec<serde_json::Value> = stats
        .grid
        .buckets()
        .iter()
        .map(|b| {
            serde_json::json!({
                "date": b.date.to_string(),
                "count": b.count,
                "level": b.level().as_u8(),
            })
        })
        .collect();

    let json = serde_json::json!({
        "start": stats.grid.start().to_string(),
        "end": stats.grid.end().to_string(),
        "days": days,
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
