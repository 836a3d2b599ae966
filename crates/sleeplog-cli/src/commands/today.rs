//! Today command: the logical day in progress.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use sleeplog_core::DailyStat;

use super::util::{format_instant, format_minutes};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayJson<'a> {
    #[serde(flatten)]
    day: &'a DailyStat,
    live_awake_minutes: i64,
}

/// Writes the most recent logical day with awake time measured up to `now`.
pub fn run<W: Write>(
    writer: &mut W,
    days: &[DailyStat],
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let Some(day) = days.last() else {
        if json {
            writeln!(writer, "null")?;
        } else {
            writeln!(writer, "No sleep logged.")?;
        }
        return Ok(());
    };
    let live_awake_minutes = day.live_awake_minutes(now);

    if json {
        serde_json::to_writer_pretty(
            &mut *writer,
            &TodayJson {
                day,
                live_awake_minutes,
            },
        )?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(
        writer,
        "Logical day {} (started {})",
        day.logical_date,
        format_instant(day.start_datetime)
    )?;
    writeln!(
        writer,
        "Sleep:    {} (day {}, night {})",
        format_minutes(day.total_sleep_minutes),
        format_minutes(day.day_sleep_minutes),
        format_minutes(day.night_sleep_minutes)
    )?;
    writeln!(writer, "Awake:    {}", format_minutes(live_awake_minutes))?;
    writeln!(writer, "Sessions: {}", day.session_count)?;

    match day.entries.last() {
        Some(entry) if day.has_active_sleep => writeln!(
            writer,
            "Status:   asleep since {}",
            entry.real_datetime().format("%H:%M")
        )?,
        _ => writeln!(writer, "Status:   awake")?,
    }

    Ok(())
}
