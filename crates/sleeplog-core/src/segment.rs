//! Logical-day segmentation.
//!
//! Partitions a chronologically sorted sleep log into wake-to-wake "logical
//! days" and aggregates each one.
//!
//! # Algorithm Summary
//!
//! 1. Resolve each entry's effective end (recorded wake time, or `now` for an
//!    open session, capped when abandoned)
//! 2. Start a new day on a night-to-day transition, or after a gap longer than
//!    `new_day_gap_minutes` that also crosses a calendar date
//! 3. A day started by a night-to-day transition begins at the moment the night
//!    session ended, not when the first nap began
//! 4. Each day's awake time is computed once, when the day is closed

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::awake::awake_minutes;
use crate::cycle::Cycle;
use crate::entry::SleepEntry;
use crate::session::{ResolvedSession, resolve_session};
use crate::types::{MINUTES_PER_DAY, ValidationError};

/// Upper bound for every threshold in [`SegmentConfig`] (10 days).
pub const MAX_THRESHOLD_MINUTES: i64 = 10 * MINUTES_PER_DAY;

/// Thresholds used by segmentation and open-session resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// A gap between session starts longer than this, across different
    /// calendar dates, starts a new day.
    /// Default: 720 (12 hours).
    pub new_day_gap_minutes: i64,

    /// An open session older than this is treated as abandoned.
    /// Default: 1440 (24 hours).
    pub active_max_minutes: i64,

    /// Length assigned to an abandoned open session.
    /// Default: 960 (16 hours).
    pub active_cap_minutes: i64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            new_day_gap_minutes: 720,
            active_max_minutes: 1440,
            active_cap_minutes: 960,
        }
    }
}

impl SegmentConfig {
    /// Checks every threshold is in `1..=MAX_THRESHOLD_MINUTES`.
    ///
    /// Segmentation assumes a validated config; out-of-range values can
    /// overflow instant arithmetic or produce negative durations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let thresholds = [
            ("new_day_gap_minutes", self.new_day_gap_minutes),
            ("active_max_minutes", self.active_max_minutes),
            ("active_cap_minutes", self.active_cap_minutes),
        ];
        for (field, value) in thresholds {
            if !(1..=MAX_THRESHOLD_MINUTES).contains(&value) {
                return Err(ValidationError::ThresholdOutOfRange {
                    field,
                    value,
                    max: MAX_THRESHOLD_MINUTES,
                });
            }
        }
        Ok(())
    }
}

/// Aggregate for one logical (wake-to-wake) day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    /// Calendar date of `start_datetime`.
    pub logical_date: NaiveDate,
    pub start_datetime: NaiveDateTime,
    /// Effective end of the most recently added session.
    pub end_datetime: NaiveDateTime,
    pub total_sleep_minutes: i64,
    pub day_sleep_minutes: i64,
    pub night_sleep_minutes: i64,
    pub awake_minutes: i64,
    pub session_count: usize,
    /// The last session of the day is still in progress.
    pub has_active_sleep: bool,
    /// Sheet rows of open sessions in this day that were capped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capped_rows: Vec<u32>,
    pub entries: Vec<SleepEntry>,
}

impl DailyStat {
    fn begin(start: NaiveDateTime, entry: &SleepEntry, resolved: ResolvedSession) -> Self {
        let mut stat = Self {
            logical_date: start.date(),
            start_datetime: start,
            end_datetime: resolved.end,
            total_sleep_minutes: 0,
            day_sleep_minutes: 0,
            night_sleep_minutes: 0,
            awake_minutes: 0,
            session_count: 0,
            has_active_sleep: false,
            capped_rows: Vec::new(),
            entries: Vec::new(),
        };
        stat.add(entry, resolved);
        stat
    }

    fn add(&mut self, entry: &SleepEntry, resolved: ResolvedSession) {
        self.end_datetime = resolved.end;
        self.total_sleep_minutes += resolved.duration_minutes;
        match entry.cycle() {
            Cycle::Day => self.day_sleep_minutes += resolved.duration_minutes,
            Cycle::Night => self.night_sleep_minutes += resolved.duration_minutes,
        }
        self.session_count += 1;
        self.has_active_sleep = resolved.is_active;
        if resolved.was_capped {
            if let Some(row) = entry.sheet_row_index() {
                self.capped_rows.push(row);
            }
        }
        self.entries.push(entry.clone());
    }

    fn finalize(mut self) -> Self {
        self.awake_minutes = awake_minutes(
            self.start_datetime,
            self.end_datetime,
            self.total_sleep_minutes,
        );
        self
    }

    /// Awake time for a day that is still being lived, measured up to `now`.
    ///
    /// Not stored; callers recompute it whenever they render.
    pub fn live_awake_minutes(&self, now: NaiveDateTime) -> i64 {
        awake_minutes(self.start_datetime, now, self.total_sleep_minutes)
    }
}

/// Why a new logical day was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayBoundary {
    /// First entry of the log.
    First,
    /// A night session was followed by a day session.
    Wake,
    /// A long unlogged gap across calendar dates.
    Gap,
}

fn day_boundary(
    previous: Option<&SleepEntry>,
    entry: &SleepEntry,
    config: &SegmentConfig,
) -> Option<DayBoundary> {
    let Some(previous) = previous else {
        return Some(DayBoundary::First);
    };

    if previous.cycle() == Cycle::Night && entry.cycle() == Cycle::Day {
        return Some(DayBoundary::Wake);
    }

    let gap = entry.real_datetime() - previous.real_datetime();
    let crosses_date = entry.real_datetime().date() != previous.real_datetime().date();
    if gap > Duration::minutes(config.new_day_gap_minutes) && crosses_date {
        return Some(DayBoundary::Gap);
    }

    None
}

/// Fold state: finished days plus the day being accumulated.
#[derive(Debug, Default)]
struct Segmenter<'a> {
    days: Vec<DailyStat>,
    current: Option<DailyStat>,
    previous: Option<(&'a SleepEntry, ResolvedSession)>,
    open_entries: usize,
}

impl<'a> Segmenter<'a> {
    fn step(mut self, entry: &'a SleepEntry, now: NaiveDateTime, config: &SegmentConfig) -> Self {
        let resolved = resolve_session(entry, now, config);
        if entry.is_open() {
            self.open_entries += 1;
        }

        let previous_entry = self.previous.map(|(previous, _)| previous);
        match day_boundary(previous_entry, entry, config) {
            Some(boundary) => {
                let start = match (boundary, self.previous) {
                    (DayBoundary::Wake, Some((_, previous))) => previous.end,
                    _ => entry.real_datetime(),
                };
                tracing::debug!(?boundary, %start, "starting logical day");
                if let Some(done) = self.current.take() {
                    self.days.push(done.finalize());
                }
                self.current = Some(DailyStat::begin(start, entry, resolved));
            }
            None => {
                if let Some(current) = self.current.as_mut() {
                    current.add(entry, resolved);
                }
            }
        }

        self.previous = Some((entry, resolved));
        self
    }

    fn finish(mut self) -> Vec<DailyStat> {
        if let Some(done) = self.current.take() {
            self.days.push(done.finalize());
        }
        if self.open_entries > 1 {
            tracing::warn!(
                open_entries = self.open_entries,
                "sleep log has more than one open session"
            );
        }
        self.days
    }
}

/// Segments sorted entries into logical days.
///
/// Entries must be sorted by [`SleepEntry::real_datetime`] ascending (see
/// [`crate::sort_chronologically`]); the result is unspecified otherwise.
/// `now` is used only to resolve open sessions. The input is not modified and
/// every entry appears in exactly one returned day, in input order.
pub fn segment_days(
    entries: &[SleepEntry],
    now: NaiveDateTime,
    config: &SegmentConfig,
) -> Vec<DailyStat> {
    entries
        .iter()
        .fold(Segmenter::default(), |state, entry| {
            state.step(entry, now, config)
        })
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryEnd;
    use crate::types::MinuteOfDay;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).expect("valid test date")
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        date(day).and_hms_opt(hour, minute, 0).expect("valid test time")
    }

    fn hm(hour: u16, minute: u16) -> MinuteOfDay {
        MinuteOfDay::from_hm(hour, minute).expect("valid test minute")
    }

    fn closed(day: u32, start: (u16, u16), end: (u16, u16), cycle: Cycle) -> SleepEntry {
        SleepEntry::new(
            at(day, 0, 0),
            date(day),
            hm(start.0, start.1),
            EntryEnd::Closed(hm(end.0, end.1)),
            cycle,
        )
    }

    fn open(day: u32, start: (u16, u16), cycle: Cycle) -> SleepEntry {
        SleepEntry::new(
            at(day, 0, 0),
            date(day),
            hm(start.0, start.1),
            EntryEnd::Open,
            cycle,
        )
    }

    fn segment(entries: &[SleepEntry], now: NaiveDateTime) -> Vec<DailyStat> {
        segment_days(entries, now, &SegmentConfig::default())
    }

    fn assert_partition(entries: &[SleepEntry], days: &[DailyStat]) {
        let flattened: Vec<_> = days.iter().flat_map(|d| d.entries.clone()).collect();
        assert_eq!(flattened, entries, "days must partition the input");
    }

    fn assert_sums(days: &[DailyStat]) {
        for day in days {
            let sum: i64 = day
                .entries
                .iter()
                .map(|e| resolve_session(e, at(28, 0, 0), &SegmentConfig::default()))
                .map(|r| r.duration_minutes)
                .sum();
            if !day.has_active_sleep {
                assert_eq!(day.total_sleep_minutes, sum);
            }
            assert_eq!(
                day.day_sleep_minutes + day.night_sleep_minutes,
                day.total_sleep_minutes
            );
            assert_eq!(day.session_count, day.entries.len());
            assert!(day.awake_minutes >= 0);
        }
    }

    #[test]
    fn empty_log_has_no_days() {
        assert!(segment(&[], at(1, 0, 0)).is_empty());
    }

    #[test]
    fn single_open_entry_is_active() {
        let entries = vec![open(1, (22, 0), Cycle::Night)];

        let days = segment(&entries, at(2, 3, 0));

        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.total_sleep_minutes, 300);
        assert_eq!(day.night_sleep_minutes, 300);
        assert!(day.has_active_sleep);
        assert_eq!(day.start_datetime, at(1, 22, 0));
        assert_eq!(day.end_datetime, at(2, 3, 0));
        assert_eq!(day.awake_minutes, 0);
        assert_eq!(day.logical_date, date(1));
    }

    #[test]
    fn night_then_day_splits_at_wake_time() {
        let entries = vec![
            closed(1, (22, 0), (6, 0), Cycle::Night),
            closed(2, (9, 0), (10, 0), Cycle::Day),
        ];

        let days = segment(&entries, at(2, 12, 0));

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].night_sleep_minutes, 480);
        assert_eq!(days[0].end_datetime, at(2, 6, 0));
        assert_eq!(days[1].start_datetime, at(2, 6, 0));
        assert_eq!(days[1].logical_date, date(2));
        assert_eq!(days[1].day_sleep_minutes, 60);
        assert_eq!(days[1].end_datetime, at(2, 10, 0));
        // 06:00 -> 10:00 with one hour asleep.
        assert_eq!(days[1].awake_minutes, 180);
        assert_partition(&entries, &days);
    }

    #[test]
    fn wake_anchor_uses_night_end_on_same_date() {
        // Logged against the evening's date but started after midnight.
        let entries = vec![
            closed(1, (2, 0), (6, 0), Cycle::Night),
            closed(2, (9, 0), (9, 45), Cycle::Day),
        ];

        let days = segment(&entries, at(2, 12, 0));

        assert_eq!(days.len(), 2);
        assert_eq!(days[1].start_datetime, at(2, 6, 0));
    }

    #[test]
    fn same_date_long_gap_does_not_split() {
        let entries = vec![
            closed(1, (1, 0), (2, 0), Cycle::Day),
            closed(1, (21, 0), (21, 30), Cycle::Day),
        ];

        let days = segment(&entries, at(2, 0, 0));

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].session_count, 2);
        assert_eq!(days[0].day_sleep_minutes, 90);
    }

    #[test]
    fn long_gap_across_dates_splits_at_entry_start() {
        let entries = vec![
            closed(1, (13, 0), (14, 0), Cycle::Day),
            closed(2, (13, 30), (14, 0), Cycle::Day),
        ];

        let days = segment(&entries, at(3, 0, 0));

        assert_eq!(days.len(), 2);
        assert_eq!(days[1].start_datetime, at(2, 13, 30));
        assert_eq!(days[0].awake_minutes, 0);
        assert_partition(&entries, &days);
    }

    #[test]
    fn short_gap_across_dates_does_not_split() {
        let entries = vec![
            closed(1, (20, 0), (21, 0), Cycle::Day),
            closed(2, (7, 0), (8, 0), Cycle::Day),
        ];

        let days = segment(&entries, at(3, 0, 0));

        assert_eq!(days.len(), 1);
    }

    #[test]
    fn gap_of_exactly_twelve_hours_does_not_split() {
        let entries = vec![
            closed(1, (14, 0), (15, 0), Cycle::Day),
            closed(2, (2, 0), (3, 0), Cycle::Day),
        ];

        let days = segment(&entries, at(3, 0, 0));

        assert_eq!(days.len(), 1);
    }

    #[test]
    fn wake_transition_with_long_gap_still_anchors_to_wake() {
        let entries = vec![
            closed(1, (22, 0), (7, 0), Cycle::Night),
            closed(2, (15, 0), (16, 0), Cycle::Day),
        ];

        let days = segment(&entries, at(3, 0, 0));

        assert_eq!(days.len(), 2);
        assert_eq!(days[1].start_datetime, at(2, 7, 0));
    }

    #[test]
    fn day_then_night_stays_in_same_day() {
        let entries = vec![
            closed(1, (22, 0), (6, 30), Cycle::Night),
            closed(2, (10, 0), (11, 0), Cycle::Day),
            closed(2, (14, 0), (15, 30), Cycle::Day),
            closed(2, (21, 30), (1, 0), Cycle::Night),
            // Second night session, logged against the evening's date.
            closed(2, (2, 0), (6, 0), Cycle::Night),
            closed(3, (9, 0), (10, 0), Cycle::Day),
        ];

        let days = segment(&entries, at(3, 12, 0));

        assert_eq!(days.len(), 3);
        let full = &days[1];
        assert_eq!(full.start_datetime, at(2, 6, 30));
        assert_eq!(full.session_count, 4);
        assert_eq!(full.day_sleep_minutes, 150);
        assert_eq!(full.night_sleep_minutes, 210 + 240);
        assert_eq!(full.end_datetime, at(3, 6, 0));
        assert_eq!(days[2].start_datetime, at(3, 6, 0));
        assert_partition(&entries, &days);
        assert_sums(&days);
    }

    #[test]
    fn awake_time_for_full_day() {
        let entries = vec![
            closed(1, (21, 0), (6, 0), Cycle::Night),
            closed(2, (13, 0), (15, 0), Cycle::Day),
            closed(2, (21, 0), (6, 0), Cycle::Night),
            closed(3, (13, 0), (14, 0), Cycle::Day),
        ];

        let days = segment(&entries, at(3, 20, 0));

        let day = &days[1];
        assert_eq!(day.start_datetime, at(2, 6, 0));
        assert_eq!(day.end_datetime, at(3, 6, 0));
        assert_eq!(day.total_sleep_minutes, 120 + 540);
        assert_eq!(day.awake_minutes, 1440 - 660);
    }

    #[test]
    fn trailing_open_night_is_active() {
        let entries = vec![
            closed(1, (22, 0), (6, 0), Cycle::Night),
            closed(2, (12, 0), (13, 0), Cycle::Day),
            open(2, (21, 0), Cycle::Night),
        ];

        let now = at(2, 23, 30);
        let days = segment(&entries, now);

        let today = days.last().unwrap();
        assert!(today.has_active_sleep);
        assert_eq!(today.night_sleep_minutes, 150);
        assert_eq!(today.end_datetime, now);
        assert_eq!(today.live_awake_minutes(now), 17 * 60 + 30 - 210);
    }

    #[test]
    fn active_flag_follows_last_entry_only() {
        let entries = vec![
            open(1, (13, 0), Cycle::Day),
            closed(1, (18, 0), (18, 30), Cycle::Day),
        ];

        let days = segment(&entries, at(1, 20, 0));

        assert_eq!(days.len(), 1);
        assert!(!days[0].has_active_sleep);
    }

    #[test]
    fn abandoned_open_entry_is_capped_and_reported() {
        let entries = vec![
            open(1, (13, 0), Cycle::Day).with_row_index(7),
            closed(3, (13, 0), (14, 0), Cycle::Day).with_row_index(8),
        ];

        let days = segment(&entries, at(5, 0, 0));

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].total_sleep_minutes, 960);
        assert!(!days[0].has_active_sleep);
        assert_eq!(days[0].capped_rows, vec![7]);
        assert!(days[1].capped_rows.is_empty());
    }

    #[test]
    fn custom_gap_threshold() {
        let config = SegmentConfig {
            new_day_gap_minutes: 360,
            ..SegmentConfig::default()
        };
        let entries = vec![
            closed(1, (20, 0), (21, 0), Cycle::Day),
            closed(2, (7, 0), (8, 0), Cycle::Day),
        ];

        let days = segment_days(&entries, at(3, 0, 0), &config);

        assert_eq!(days.len(), 2);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SegmentConfig::default().validate(), Ok(()));
    }

    #[test]
    fn config_rejects_out_of_range_thresholds() {
        let negative_cap = SegmentConfig {
            active_cap_minutes: -60,
            ..SegmentConfig::default()
        };
        assert_eq!(
            negative_cap.validate(),
            Err(ValidationError::ThresholdOutOfRange {
                field: "active_cap_minutes",
                value: -60,
                max: MAX_THRESHOLD_MINUTES,
            })
        );

        let huge_cap = SegmentConfig {
            active_cap_minutes: i64::MAX / 2,
            active_max_minutes: 1,
            ..SegmentConfig::default()
        };
        assert!(huge_cap.validate().is_err());

        let zero_gap = SegmentConfig {
            new_day_gap_minutes: 0,
            ..SegmentConfig::default()
        };
        let err = zero_gap.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "new_day_gap_minutes must be between 1 and 14400 minutes, got 0"
        );

        let longest = SegmentConfig {
            new_day_gap_minutes: MAX_THRESHOLD_MINUTES,
            active_max_minutes: MAX_THRESHOLD_MINUTES,
            active_cap_minutes: MAX_THRESHOLD_MINUTES,
        };
        assert_eq!(longest.validate(), Ok(()));
    }

    #[test]
    fn segmentation_is_deterministic() {
        let entries = vec![
            closed(1, (22, 0), (6, 0), Cycle::Night),
            closed(2, (9, 0), (10, 0), Cycle::Day),
            open(2, (22, 0), Cycle::Night),
        ];
        let now = at(3, 1, 0);

        assert_eq!(segment(&entries, now), segment(&entries, now));
    }

    #[test]
    fn week_of_logs_partitions_cleanly() {
        let mut entries = Vec::new();
        for day in 1..=7 {
            entries.push(closed(day, (22, 0), (6, 15), Cycle::Night));
            entries.push(closed(day + 1, (13, 0), (14, 20), Cycle::Day));
        }

        let days = segment(&entries, at(9, 0, 0));

        assert_eq!(days.len(), 8);
        assert_partition(&entries, &days);
        assert_sums(&days);
        for day in &days[1..days.len() - 1] {
            assert_eq!(day.night_sleep_minutes, 495);
            assert_eq!(day.day_sleep_minutes, 80);
            assert_eq!(day.awake_minutes, 1440 - 575);
        }
    }
}
