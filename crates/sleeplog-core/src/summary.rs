//! Averages over completed logical days.

use serde::Serialize;

use crate::segment::DailyStat;

/// Per-day averages, in whole minutes rounded to nearest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    /// Number of days averaged.
    pub days: usize,
    pub avg_total_sleep_minutes: i64,
    pub avg_day_sleep_minutes: i64,
    pub avg_night_sleep_minutes: i64,
    pub avg_awake_minutes: i64,
    pub avg_sessions: f64,
}

/// Summarizes up to `last_n` of the most recent completed days.
///
/// The last day in `days` is still being lived (nothing has closed it yet), so it
/// is never included, and neither is any day holding an active sleep. Returns
/// `None` when there is nothing to average.
#[allow(clippy::cast_precision_loss)]
pub fn summarize(days: &[DailyStat], last_n: usize) -> Option<SleepSummary> {
    let finished = days.split_last().map_or(&[][..], |(_, rest)| rest);
    let completed: Vec<&DailyStat> = finished.iter().filter(|d| !d.has_active_sleep).collect();
    let window = &completed[completed.len().saturating_sub(last_n)..];
    if window.is_empty() {
        return None;
    }

    let count = i64::try_from(window.len()).ok()?;
    let average = |f: &dyn Fn(&DailyStat) -> i64| -> i64 {
        let sum: i64 = window.iter().map(|d| f(d)).sum();
        (sum + count / 2).div_euclid(count)
    };
    let sessions: usize = window.iter().map(|d| d.session_count).sum();

    Some(SleepSummary {
        days: window.len(),
        avg_total_sleep_minutes: average(&|d| d.total_sleep_minutes),
        avg_day_sleep_minutes: average(&|d| d.day_sleep_minutes),
        avg_night_sleep_minutes: average(&|d| d.night_sleep_minutes),
        avg_awake_minutes: average(&|d| d.awake_minutes),
        avg_sessions: sessions as f64 / window.len() as f64,
    })
}
