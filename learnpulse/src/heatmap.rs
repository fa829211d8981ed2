//! Text rendering of the activity grid as a calendar heatmap.
//!
//! Columns are weeks (oldest on the left), rows are weekdays Monday to Sunday.

use chrono::Datelike;
use learnpulse_core::analytics::{ActivityGrid, DayBucket, IntensityLevel};

/// Width of one week column, including the trailing gap.
const CELL_WIDTH: usize = 2;

/// Row labels, Monday first. Only every other row is labelled.
const ROW_LABELS: [&str; 7] = ["Mon", "", "Wed", "", "Fri", "", "Sun"];

const LABEL_WIDTH: usize = 4;

/// Glyph for an intensity level.
///
/// · (none), ░ (1), ▒ (2-3), ▓ (4-5), █ (6+)
pub fn level_glyph(level: IntensityLevel) -> char {
    match level {
        IntensityLevel::None => '·',
        IntensityLevel::Low => '░',
        IntensityLevel::Medium => '▒',
        IntensityLevel::High => '▓',
        IntensityLevel::Max => '█',
    }
}

fn cell(bucket: Option<DayBucket>) -> char {
    match bucket {
        Some(b) => level_glyph(b.level()),
        None => ' ',
    }
}

/// Month names above the first column of each month.
fn month_header(weeks: &[[Option<DayBucket>; 7]]) -> String {
    let width = weeks.len() * CELL_WIDTH;
    let mut header: Vec<char> = vec![' '; width];
    let mut next_free = 0usize;
    let mut prev_month: Option<u32> = None;

    for (col, week) in weeks.iter().enumerate() {
        let Some(first) = week.iter().flatten().next() else {
            continue;
        };
        let month = first.date.month();
        if prev_month != Some(month) {
            let pos = col * CELL_WIDTH;
            let label = first.date.format("%b").to_string();
            if pos >= next_free && pos + label.len() <= width {
                for (i, ch) in label.chars().enumerate() {
                    header[pos + i] = ch;
                }
                next_free = pos + label.len() + 1;
            }
            prev_month = Some(month);
        }
    }

    let header: String = header.into_iter().collect();
    format!("{:width$}{}", "", header.trim_end(), width = LABEL_WIDTH)
}

/// Render the grid as lines: month header, seven weekday rows, legend.
pub fn render_heatmap(grid: &ActivityGrid) -> Vec<String> {
    let weeks = grid.weeks();
    let mut lines = Vec::with_capacity(9);

    lines.push(month_header(&weeks));

    for (row, label) in ROW_LABELS.iter().enumerate() {
        let mut line = format!("{:<width$}", label, width = LABEL_WIDTH);
        for week in &weeks {
            line.push(cell(week[row]));
            line.push(' ');
        }
        lines.push(line.trim_end().to_string());
    }

    lines.push(legend());
    lines
}

/// One-line legend mapping glyphs to count ranges.
pub fn legend() -> String {
    let entries: Vec<String> = IntensityLevel::ALL
        .iter()
        .map(|&level| format!("{} {}", level_glyph(level), level.range_label()))
        .collect();
    format!("{:width$}Less  {}  More", "", entries.join("  "), width = LABEL_WIDTH)
}
