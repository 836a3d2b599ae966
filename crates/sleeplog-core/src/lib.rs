//! Sleep-log aggregation engine.
//!
//! This crate turns raw sleep log rows into wake-to-wake logical days:
//! - Row parsing: spreadsheet serial rows into validated entries
//! - Session resolution: effective end of closed and open sessions
//! - Segmentation: partitioning sorted entries into daily aggregates
//! - Awake time and summaries over the resulting days
//!
//! Everything here is a pure function of its inputs; the current time is always
//! passed in explicitly.

mod awake;
pub mod cycle;
mod duration;
mod entry;
mod segment;
pub mod serial;
mod session;
mod summary;
mod types;

pub use awake::{awake_minutes, minutes_between};
pub use cycle::{Cycle, UnknownCycle};
pub use duration::duration_minutes;
pub use entry::{
    Column, EntryEnd, ParsedLog, RowError, SkippedRow, SleepEntry, parse_row, parse_rows,
    sort_chronologically,
};
pub use segment::{DailyStat, MAX_THRESHOLD_MINUTES, SegmentConfig, segment_days};
pub use session::{ResolvedSession, resolve_active_sleep_end, resolve_session};
pub use summary::{SleepSummary, summarize};
pub use types::{MINUTES_PER_DAY, MinuteOfDay, ValidationError};
