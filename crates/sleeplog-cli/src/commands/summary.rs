//! Summary command: averages over recent completed days.

use std::io::Write;

use anyhow::Result;
use sleeplog_core::{DailyStat, summarize};

use super::util::format_minutes;

pub fn run<W: Write>(writer: &mut W, days: &[DailyStat], last_n: usize, json: bool) -> Result<()> {
    let summary = summarize(days, last_n);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &summary)?;
        writeln!(writer)?;
        return Ok(());
    }

    let Some(summary) = summary else {
        writeln!(writer, "Not enough completed days to summarize.")?;
        return Ok(());
    };

    writeln!(
        writer,
        "Averages over {} completed day{}",
        summary.days,
        if summary.days == 1 { "" } else { "s" }
    )?;
    writeln!(
        writer,
        "Sleep:        {}",
        format_minutes(summary.avg_total_sleep_minutes)
    )?;
    writeln!(
        writer,
        "  Day:        {}",
        format_minutes(summary.avg_day_sleep_minutes)
    )?;
    writeln!(
        writer,
        "  Night:      {}",
        format_minutes(summary.avg_night_sleep_minutes)
    )?;
    writeln!(
        writer,
        "Awake:        {}",
        format_minutes(summary.avg_awake_minutes)
    )?;
    writeln!(writer, "Sessions/day: {:.1}", summary.avg_sessions)?;

    Ok(())
}
