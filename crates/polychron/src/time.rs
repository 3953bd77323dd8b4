//! A fixed-point time of day.

use serde::Serialize;

use crate::error::{CalendarError, Result};

pub(crate) const NANOS_PER_SECOND: u64 = 1_000_000_000;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;
pub(crate) const NANOS_PER_DAY: u64 = 86_400 * NANOS_PER_SECOND;

/// A wall-clock time of day with nanosecond precision.
///
/// Invariant: `0 <= nanos_of_day() < NANOS_PER_DAY`. Day overflow from
/// arithmetic is never stored here; [`LocalDateTime`](crate::LocalDateTime)
/// carries it into the date component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay {
        hour: 0,
        minute: 0,
        second: 0,
        nanosecond: 0,
    };

    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Result<Self> {
        if hour > 23 {
            return Err(CalendarError::OutOfRange(format!(
                "hour {hour} outside 0..=23"
            )));
        }
        if minute > 59 {
            return Err(CalendarError::OutOfRange(format!(
                "minute {minute} outside 0..=59"
            )));
        }
        if second > 59 {
            return Err(CalendarError::OutOfRange(format!(
                "second {second} outside 0..=59"
            )));
        }
        if nanosecond >= NANOS_PER_SECOND as u32 {
            return Err(CalendarError::OutOfRange(format!(
                "nanosecond {nanosecond} outside 0..=999999999"
            )));
        }
        Ok(TimeOfDay {
            hour,
            minute,
            second,
            nanosecond,
        })
    }

    /// Rebuild a time from a nanosecond-of-day value.
    pub fn from_nanos_of_day(nanos: u64) -> Result<Self> {
        if nanos >= NANOS_PER_DAY {
            return Err(CalendarError::OutOfRange(format!(
                "nanosecond-of-day {nanos} outside 0..{NANOS_PER_DAY}"
            )));
        }
        let second_of_day = nanos / NANOS_PER_SECOND;
        Ok(TimeOfDay {
            hour: (second_of_day / 3600) as u8,
            minute: (second_of_day / 60 % 60) as u8,
            second: (second_of_day % 60) as u8,
            nanosecond: (nanos % NANOS_PER_SECOND) as u32,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    pub fn second_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    pub fn nanos_of_day(&self) -> u64 {
        self.second_of_day() as u64 * NANOS_PER_SECOND + self.nanosecond as u64
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
