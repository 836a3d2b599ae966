//! Midnight-safe duration between two times of day.

use crate::types::{MINUTES_PER_DAY, MinuteOfDay};

/// Minutes from `start` forward to `end`.
///
/// Sleep always runs forward in time, so an `end` earlier than `start` means the
/// session crossed midnight. An `end` of 24:00 is the end of the start's day, so
/// 00:00 to 24:00 is a full day rather than zero.
pub fn duration_minutes(start: MinuteOfDay, end: MinuteOfDay) -> i64 {
    let (start, end) = (i64::from(start), i64::from(end));
    if end == MINUTES_PER_DAY {
        return end - start;
    }
    (end - start).rem_euclid(MINUTES_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u16, minute: u16) -> MinuteOfDay {
        MinuteOfDay::from_hm(hour, minute).unwrap()
    }

    #[test]
    fn same_day_duration() {
        assert_eq!(duration_minutes(hm(9, 0), hm(10, 30)), 90);
    }

    #[test]
    fn wraps_across_midnight() {
        assert_eq!(duration_minutes(hm(23, 50), hm(0, 10)), 20);
        assert_eq!(duration_minutes(hm(22, 0), hm(6, 0)), 480);
    }

    #[test]
    fn equal_times_are_zero() {
        for t in [hm(0, 0), hm(6, 0), hm(23, 59)] {
            assert_eq!(duration_minutes(t, t), 0);
        }
    }

    #[test]
    fn end_of_day_is_not_midnight() {
        let end_of_day = MinuteOfDay::new(1440).unwrap();
        assert_eq!(duration_minutes(hm(0, 0), end_of_day), 1440);
        assert_eq!(duration_minutes(hm(22, 0), end_of_day), 120);
        assert_eq!(duration_minutes(end_of_day, end_of_day), 0);
        assert_eq!(duration_minutes(end_of_day, hm(5, 0)), 300);
    }

    #[test]
    fn always_within_one_day() {
        for start in (0..1440).step_by(37) {
            for end in (0..1440).step_by(41) {
                let d = duration_minutes(
                    MinuteOfDay::new(start).unwrap(),
                    MinuteOfDay::new(end).unwrap(),
                );
                assert!((0..MINUTES_PER_DAY).contains(&d), "{start} -> {end} gave {d}");
            }
        }
    }
}
