//! Days command: one line per logical day.

use std::io::Write;

use anyhow::Result;
use sleeplog_core::DailyStat;

use super::util::{format_instant, format_minutes};

/// Writes the most recent `limit` days (all when `None`), oldest first.
pub fn run<W: Write>(
    writer: &mut W,
    days: &[DailyStat],
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let shown = match limit {
        Some(n) => &days[days.len().saturating_sub(n)..],
        None => days,
    };

    if json {
        serde_json::to_writer_pretty(&mut *writer, shown)?;
        writeln!(writer)?;
        return Ok(());
    }

    if shown.is_empty() {
        writeln!(writer, "No sleep logged.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<10}  {:<11}  {:<11}  {:>7}  {:>7}  {:>7}  {:>7}  Sessions",
        "Date", "Start", "End", "Sleep", "Day", "Night", "Awake"
    )?;
    for day in shown {
        writeln!(
            writer,
            "{:<10}  {:<11}  {:<11}  {:>7}  {:>7}  {:>7}  {:>7}  {}{}",
            day.logical_date.to_string(),
            format_instant(day.start_datetime),
            format_instant(day.end_datetime),
            format_minutes(day.total_sleep_minutes),
            format_minutes(day.day_sleep_minutes),
            format_minutes(day.night_sleep_minutes),
            format_minutes(day.awake_minutes),
            day.session_count,
            if day.has_active_sleep { " (active)" } else { "" },
        )?;
    }

    Ok(())
}
