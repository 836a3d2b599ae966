//! Awake time within a logical day.

use chrono::NaiveDateTime;

/// Whole minutes from `start` to `end`; negative when `end` is earlier.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}

/// Time between `start` and `end` not spent asleep, never below zero.
///
/// For a finished day `end` is the day's end instant. For the day still in
/// progress the caller passes the current instant instead.
pub fn awake_minutes(start: NaiveDateTime, end: NaiveDateTime, total_sleep_minutes: i64) -> i64 {
    (minutes_between(start, end) - total_sleep_minutes).max(0)
}
