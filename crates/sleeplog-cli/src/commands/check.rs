//! Check command: rows that need correcting in the sheet.

use std::io::Write;

use anyhow::Result;
use sleeplog_core::{DailyStat, ParsedLog};

/// Lists skipped rows and capped open sessions by sheet row.
pub fn run<W: Write>(writer: &mut W, log: &ParsedLog, days: &[DailyStat]) -> Result<()> {
    writeln!(writer, "Entries: {}", log.entries.len())?;

    writeln!(writer, "Skipped rows: {}", log.skipped.len())?;
    for skipped in &log.skipped {
        writeln!(writer, "- row {}: {}", skipped.row_index, skipped.error)?;
    }

    let capped: Vec<u32> = days
        .iter()
        .flat_map(|day| day.capped_rows.iter().copied())
        .collect();
    writeln!(writer, "Capped open sessions: {}", capped.len())?;
    for row in capped {
        writeln!(writer, "- row {row}: still open after the active window, counted as capped")?;
    }

    let open = log.entries.iter().filter(|e| e.is_open()).count();
    if open > 1 {
        writeln!(writer, "Warning: {open} entries have no end time")?;
    }

    Ok(())
}
