//! Output formatting for analysis reports.
//!
//! Supports the sectioned console report, JSON serialization, and raw
//! record pages.

use std::fmt::Write as _;

use anyhow::Result;

use crate::analysis::Report;
use crate::model::{TripRecord, month_name, weekday_name};
use crate::stats::types::{DurationStats, StationStats, TimeStats, UserStats, ValueCount};

const RULE_WIDTH: usize = 50;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n--- {title} ---\n");
}

/// Most common month, day and hour.
pub fn render_time(stats: &TimeStats) -> String {
    let mut out = String::new();
    heading(&mut out, "Most Frequent Times of Travel");
    let _ = writeln!(
        out,
        "Most Common Month: {} ({} trips)",
        month_name(stats.most_common_month.value),
        stats.most_common_month.count
    );
    let _ = writeln!(
        out,
        "Most Common Day: {} ({} trips)",
        weekday_name(stats.most_common_day.value),
        stats.most_common_day.count
    );
    let _ = writeln!(
        out,
        "Most Common Start Hour: {} ({} trips)",
        stats.most_common_hour.value, stats.most_common_hour.count
    );
    out.push_str(&rule());
    out.push('\n');
    out
}

/// Most popular stations and start/end combination.
pub fn render_stations(stats: &StationStats) -> String {
    let mut out = String::new();
    heading(&mut out, "Most Popular Stations and Trips");
    let _ = writeln!(
        out,
        "Most Common Start Station: {} ({} trips)",
        stats.most_common_start.value, stats.most_common_start.count
    );
    let _ = writeln!(
        out,
        "Most Common End Station: {} ({} trips)",
        stats.most_common_end.value, stats.most_common_end.count
    );
    let trip = &stats.most_common_trip;
    let _ = writeln!(
        out,
        "Most Common Trip: {} to {} ({} trips)",
        trip.value.start, trip.value.end, trip.count
    );
    out.push_str(&rule());
    out.push('\n');
    out
}

/// Total duration as hours/minutes/seconds and mean as minutes/seconds.
pub fn render_durations(stats: &DurationStats) -> String {
    let mut out = String::new();
    heading(&mut out, "Trip Duration Statistics");
    let total = stats.total_breakdown();
    let _ = writeln!(
        out,
        "Total Trip Duration: {}h {}m {}s",
        total.hours, total.minutes, total.seconds
    );
    let mean = stats.mean_breakdown();
    let _ = writeln!(out, "Mean Trip Duration: {}m {}s", mean.minutes, mean.seconds);
    out.push_str(&rule());
    out.push('\n');
    out
}

fn counts(out: &mut String, title: &str, values: &[ValueCount]) {
    let _ = writeln!(out, "{title}:");
    for v in values {
        let _ = writeln!(out, "{}: {}", v.value, v.count);
    }
}

/// User type, gender and birth-year sections; absent sections are skipped.
pub fn render_users(stats: &UserStats) -> String {
    let mut out = String::new();
    heading(&mut out, "User Statistics");
    counts(&mut out, "Counts by User Type", &stats.user_types);

    if let Some(genders) = &stats.genders {
        out.push('\n');
        counts(&mut out, "Counts by Gender", genders);
    }

    if let Some(years) = &stats.birth_years {
        out.push('\n');
        let _ = writeln!(out, "Birth Year Stats:");
        let _ = writeln!(out, "Earliest Year: {}", years.earliest);
        let _ = writeln!(out, "Most Recent Year: {}", years.most_recent);
        let _ = writeln!(out, "Most Common Year: {}", years.most_common.value);
    }

    out.push_str(&rule());
    out.push('\n');
    out
}

/// The full console report, one section per statistics module.
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | month: {} | day: {} | {} trips",
        report.request.city, report.request.month, report.request.day, report.trip_count
    );
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&render_time(&report.time));
    out.push_str(&render_stations(&report.stations));
    out.push_str(&render_durations(&report.durations));
    out.push_str(&render_users(&report.users));
    out
}

/// Report as pretty-printed JSON.
pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn render_record(record: &TripRecord) -> String {
    let end_time = record
        .end_time
        .map(|t| t.to_string())
        .unwrap_or_default();
    let mut line = format!(
        "{} | {} | {}s | {} -> {} | {}",
        record.start_time,
        end_time,
        record.trip_duration,
        record.start_station,
        record.end_station,
        record.user_type.as_deref().unwrap_or("")
    );
    if let Some(gender) = &record.gender {
        let _ = write!(line, " | {gender}");
    }
    if let Some(year) = record.birth_year {
        let _ = write!(line, " | {year}");
    }
    line
}

/// One page of raw records, one line each, numbered from `offset`.
pub fn render_page(offset: usize, records: &[TripRecord]) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "{:>6}  {}", offset + i + 1, render_record(record));
    }
    out
}
