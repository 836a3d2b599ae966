//! Spreadsheet serial-number decoding.
//!
//! The integer part of a serial is a day count from 1899-12-30; the fractional
//! part is the time of day as a fraction of 24 hours.

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::MinuteOfDay;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Serial of 9999-12-31, the last date a sheet can hold.
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

fn epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

fn is_valid_serial(serial: f64) -> bool {
    serial.is_finite() && (0.0..MAX_SERIAL_DAY + 1.0).contains(&serial)
}

/// Seconds into the day, rounded to the nearest second. May be 86400.
#[allow(clippy::cast_possible_truncation)]
fn seconds_of_day(serial: f64) -> i64 {
    let fraction = serial - serial.floor();
    (fraction * SECONDS_PER_DAY).round() as i64
}

/// Decodes the calendar date of a serial, ignoring any time fraction.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !is_valid_serial(serial) {
        return None;
    }
    epoch()?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Decodes a full date-and-time serial, to the second.
pub fn datetime_from_serial(serial: f64) -> Option<NaiveDateTime> {
    let date = date_from_serial(serial)?;
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::seconds(seconds_of_day(serial)))
}

/// Decodes the time-of-day part of a serial as whole minutes.
///
/// The fraction is rounded to the nearest second and then truncated to the minute.
pub fn minute_of_day_from_serial(serial: f64) -> Option<MinuteOfDay> {
    if !is_valid_serial(serial) {
        return None;
    }
    MinuteOfDay::new(seconds_of_day(serial) / 60).ok()
}
