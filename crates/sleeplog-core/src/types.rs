//! Core value types with validation.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 1440;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The minute count does not fit in a single day.
    #[error("minute of day must be between 0 and {MINUTES_PER_DAY}, got {value}")]
    MinuteOutOfRange { value: i64 },

    /// A segmentation threshold is not a positive number of minutes within bounds.
    #[error("{field} must be between 1 and {max} minutes, got {value}")]
    ThresholdOutOfRange {
        field: &'static str,
        value: i64,
        max: i64,
    },
}

/// A time of day, stored as whole minutes since local midnight.
///
/// The upper bound is inclusive: a sheet fraction just below `1.0` rounds up to
/// 24:00, and that value must still be representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    /// 00:00.
    pub const MIDNIGHT: Self = Self(0);

    /// Creates a minute-of-day after range validation.
    pub fn new(minutes: i64) -> Result<Self, ValidationError> {
        if (0..=MINUTES_PER_DAY).contains(&minutes) {
            u16::try_from(minutes)
                .map(Self)
                .map_err(|_| ValidationError::MinuteOutOfRange { value: minutes })
        } else {
            Err(ValidationError::MinuteOutOfRange { value: minutes })
        }
    }

    /// Creates a minute-of-day from an hour and minute pair.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, ValidationError> {
        Self::new(i64::from(hour) * 60 + i64::from(minute))
    }

    /// Minutes since midnight.
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Offset from midnight as a duration.
    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<i64> for MinuteOfDay {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MinuteOfDay> for i64 {
    fn from(value: MinuteOfDay) -> Self {
        Self::from(value.0)
    }
}
