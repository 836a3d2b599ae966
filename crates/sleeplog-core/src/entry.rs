//! Sleep log entries and the row parser that produces them.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::cycle::Cycle;
use crate::serial::{date_from_serial, datetime_from_serial, minute_of_day_from_serial};
use crate::types::MinuteOfDay;

/// Night sessions that start before this minute belong to the previous evening.
const NIGHT_ROLLOVER_MINUTE: u16 = 6 * 60;

/// How a logged sleep session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "time", rename_all = "lowercase")]
pub enum EntryEnd {
    /// The session has a recorded wake time.
    Closed(MinuteOfDay),
    /// Still sleeping as of the last read.
    Open,
}

impl EntryEnd {
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// One logged sleep period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    added_at: NaiveDateTime,
    date: NaiveDate,
    start: MinuteOfDay,
    end: EntryEnd,
    cycle: Cycle,
    real_datetime: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    sheet_row_index: Option<u32>,
}

impl SleepEntry {
    /// Creates an entry and derives the instant sleep actually began.
    pub fn new(
        added_at: NaiveDateTime,
        date: NaiveDate,
        start: MinuteOfDay,
        end: EntryEnd,
        cycle: Cycle,
    ) -> Self {
        Self {
            added_at,
            date,
            start,
            end,
            cycle,
            real_datetime: real_datetime(date, start, cycle),
            sheet_row_index: None,
        }
    }

    /// Attaches the 1-based sheet row this entry was read from.
    #[must_use]
    pub const fn with_row_index(mut self, row: u32) -> Self {
        self.sheet_row_index = Some(row);
        self
    }

    pub const fn added_at(&self) -> NaiveDateTime {
        self.added_at
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn start(&self) -> MinuteOfDay {
        self.start
    }

    pub const fn end(&self) -> EntryEnd {
        self.end
    }

    pub const fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// The instant sleep began, after the night rollover rule.
    pub const fn real_datetime(&self) -> NaiveDateTime {
        self.real_datetime
    }

    pub const fn sheet_row_index(&self) -> Option<u32> {
        self.sheet_row_index
    }

    pub const fn is_open(&self) -> bool {
        self.end.is_open()
    }
}

/// `date` at midnight plus `start`, pushed one day later for a night session
/// logged with an early-morning clock time.
fn real_datetime(date: NaiveDate, start: MinuteOfDay, cycle: Cycle) -> NaiveDateTime {
    let begin = date.and_time(NaiveTime::MIN) + start.as_duration();
    if cycle == Cycle::Night && start.minutes() < NIGHT_ROLLOVER_MINUTE {
        begin + Duration::days(1)
    } else {
        begin
    }
}

/// Sorts entries by the instant sleep began. The sort is stable, so entries
/// starting at the same instant keep their log order.
pub fn sort_chronologically(entries: &mut [SleepEntry]) {
    entries.sort_by_key(SleepEntry::real_datetime);
}

/// Columns of a raw log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    AddedAt,
    Date,
    Start,
    End,
    Cycle,
}

impl Column {
    const fn index(self) -> usize {
        match self {
            Self::AddedAt => 0,
            Self::Date => 1,
            Self::Start => 2,
            Self::End => 3,
            Self::Cycle => 4,
        }
    }

    const fn letter(self) -> char {
        match self {
            Self::AddedAt => 'A',
            Self::Date => 'B',
            Self::Start => 'C',
            Self::End => 'D',
            Self::Cycle => 'E',
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::AddedAt => "added at",
            Self::Date => "date",
            Self::Start => "start time",
            Self::End => "end time",
            Self::Cycle => "cycle",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {} ({})", self.letter(), self.label())
    }
}

/// Why a raw row was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RowError {
    /// A required cell is absent or blank.
    #[error("{column} is missing")]
    Missing { column: Column },

    /// A serial cell holds something other than a number.
    #[error("{column} is not a number: {value}")]
    NotANumber { column: Column, value: String },

    /// A serial cell holds a number that cannot be decoded.
    #[error("{column} is out of range: {value}")]
    OutOfRange { column: Column, value: f64 },

    /// The cycle cell is neither `Day` nor `Night`.
    #[error("{column} has unknown value: {value}")]
    UnknownCycle { column: Column, value: String },
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell(row: &[Value], column: Column) -> Option<&Value> {
    row.get(column.index()).filter(|value| !is_blank(value))
}

fn number(row: &[Value], column: Column) -> Result<f64, RowError> {
    let value = cell(row, column).ok_or(RowError::Missing { column })?;
    let n = value.as_f64().ok_or_else(|| RowError::NotANumber {
        column,
        value: value.to_string(),
    })?;
    if n.is_finite() {
        Ok(n)
    } else {
        Err(RowError::OutOfRange { column, value: n })
    }
}

fn minute(row: &[Value], column: Column) -> Result<MinuteOfDay, RowError> {
    let n = number(row, column)?;
    minute_of_day_from_serial(n).ok_or(RowError::OutOfRange { column, value: n })
}

/// Parses one raw row (`A..F`) into an entry.
///
/// Column F (legacy length) is never read. An empty end-time cell means the
/// session is still open; a zero end time is midnight.
pub fn parse_row(row: &[Value]) -> Result<SleepEntry, RowError> {
    let added_serial = number(row, Column::AddedAt)?;
    let added_at = datetime_from_serial(added_serial).ok_or(RowError::OutOfRange {
        column: Column::AddedAt,
        value: added_serial,
    })?;

    let date_serial = number(row, Column::Date)?;
    let date = date_from_serial(date_serial).ok_or(RowError::OutOfRange {
        column: Column::Date,
        value: date_serial,
    })?;

    let start = minute(row, Column::Start)?;

    let end = if cell(row, Column::End).is_some() {
        EntryEnd::Closed(minute(row, Column::End)?)
    } else {
        EntryEnd::Open
    };

    let cycle_value = cell(row, Column::Cycle).ok_or(RowError::Missing {
        column: Column::Cycle,
    })?;
    let cycle = cycle_value
        .as_str()
        .and_then(|s| s.parse::<Cycle>().ok())
        .ok_or_else(|| RowError::UnknownCycle {
            column: Column::Cycle,
            value: cycle_value.to_string(),
        })?;

    Ok(SleepEntry::new(added_at, date, start, end, cycle))
}

/// A row that could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based sheet row.
    pub row_index: u32,
    pub error: RowError,
}

/// Result of parsing a whole log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    /// Entries in log order (not yet sorted).
    pub entries: Vec<SleepEntry>,
    pub skipped: Vec<SkippedRow>,
}

/// Parses every row, skipping the ones that fail.
///
/// `first_row` is the 1-based sheet row of the first element in `rows`; each
/// entry carries its own row index for write-back. Fully blank rows are ignored
/// without being reported.
pub fn parse_rows<I, R>(rows: I, first_row: u32) -> ParsedLog
where
    I: IntoIterator<Item = R>,
    R: AsRef<[Value]>,
{
    let mut log = ParsedLog::default();
    for (row_index, row) in (first_row..).zip(rows) {
        let row = row.as_ref();
        if row.iter().all(is_blank) {
            continue;
        }
        match parse_row(row) {
            Ok(entry) => log.entries.push(entry.with_row_index(row_index)),
            Err(error) => {
                tracing::debug!(row_index, %error, "skipping sleep log row");
                log.skipped.push(SkippedRow { row_index, error });
            }
        }
    }
    log
}
