//! Sleep cycle enum as the single source of truth for cycle strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which period of the day a sleep session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cycle {
    Day,
    Night,
}

impl Cycle {
    /// The literal string stored in the log's cycle column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Night => "Night",
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Cycle {
    type Err = UnknownCycle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Day" => Ok(Self::Day),
            "Night" => Ok(Self::Night),
            _ => Err(UnknownCycle(s.to_string())),
        }
    }
}

impl Serialize for Cycle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Cycle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown cycle strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCycle(pub String);

impl fmt::Display for UnknownCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown cycle: {:?}", self.0)
    }
}

impl std::error::Error for UnknownCycle {}
