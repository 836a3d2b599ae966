//! Effective end resolution for logged sessions.
//!
//! Closed sessions end where their recorded wake time says. Open sessions end
//! at `now`, unless they have been open so long that they are almost certainly
//! a forgotten toggle, in which case they are capped.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::duration::duration_minutes;
use crate::entry::{EntryEnd, SleepEntry};
use crate::segment::SegmentConfig;

/// Where a session effectively ends and how long it lasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSession {
    pub end: NaiveDateTime,
    pub duration_minutes: i64,
    /// The session is open and still within the active window.
    pub is_active: bool,
    /// The session was open too long and its length was replaced by the cap.
    pub was_capped: bool,
}

/// Resolves the end of an open session that began at `start`.
///
/// Up to `active_max_minutes` after `start` the session is ongoing and ends at
/// `now`. Past that it is treated as abandoned and given a fixed length of
/// `active_cap_minutes`. A `now` earlier than `start` yields a zero-length
/// active session.
pub fn resolve_active_sleep_end(
    start: NaiveDateTime,
    now: NaiveDateTime,
    config: &SegmentConfig,
) -> ResolvedSession {
    let elapsed = (now - start).num_minutes();

    if elapsed > config.active_max_minutes {
        tracing::warn!(
            %start,
            elapsed_minutes = elapsed,
            cap_minutes = config.active_cap_minutes,
            "open sleep session exceeded active window, capping"
        );
        return ResolvedSession {
            end: start + Duration::minutes(config.active_cap_minutes),
            duration_minutes: config.active_cap_minutes,
            is_active: false,
            was_capped: true,
        };
    }

    ResolvedSession {
        end: now.max(start),
        duration_minutes: elapsed.max(0),
        is_active: true,
        was_capped: false,
    }
}

/// Resolves any entry, open or closed.
///
/// A closed entry ends `duration_minutes(start, end)` after its real start, which
/// moves the end onto the next calendar day when the sleep crossed midnight.
pub fn resolve_session(
    entry: &SleepEntry,
    now: NaiveDateTime,
    config: &SegmentConfig,
) -> ResolvedSession {
    match entry.end() {
        EntryEnd::Closed(end) => {
            let minutes = duration_minutes(entry.start(), end);
            ResolvedSession {
                end: entry.real_datetime() + Duration::minutes(minutes),
                duration_minutes: minutes,
                is_active: false,
                was_capped: false,
            }
        }
        EntryEnd::Open => resolve_active_sleep_end(entry.real_datetime(), now, config),
    }
}
