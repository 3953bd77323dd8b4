//! Date fields and temporal units.
//!
//! Both enums are closed and handled by exhaustive match everywhere; the one
//! escape hatch for externally defined fields is the [`CustomField`]
//! capability trait, consumed through
//! [`CalendarDate::get_custom`](crate::CalendarDate::get_custom) and
//! [`CalendarDate::with_custom`](crate::CalendarDate::with_custom).

use serde::Serialize;

use crate::date::CalendarDate;
use crate::error::Result;

/// A recognized date field.
///
/// `DayOfMonth`, `DayOfWeek`, `EpochDay` and `ProlepticMonth` behave
/// identically in every calendar; `Era`, `YearOfEra` and `DayOfYear` are
/// calendar-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DateField {
    Era,
    YearOfEra,
    Year,
    MonthOfYear,
    DayOfMonth,
    DayOfYear,
    DayOfWeek,
    EpochDay,
    ProlepticMonth,
}

/// A unit of date-time arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    Nanos,
    Micros,
    Millis,
    Seconds,
    Minutes,
    Hours,
    HalfDays,
    Days,
    Weeks,
    Months,
    Years,
}

impl Unit {
    pub fn is_date_based(&self) -> bool {
        matches!(self, Unit::Days | Unit::Weeks | Unit::Months | Unit::Years)
    }

    pub fn is_time_based(&self) -> bool {
        !self.is_date_based()
    }

    /// Exact nanosecond span of a time-based unit; `None` for calendar
    /// units, whose length varies.
    pub(crate) fn nanos(&self) -> Option<i128> {
        Some(match self {
            Unit::Nanos => 1,
            Unit::Micros => 1_000,
            Unit::Millis => 1_000_000,
            Unit::Seconds => 1_000_000_000,
            Unit::Minutes => 60_000_000_000,
            Unit::Hours => 3_600_000_000_000,
            Unit::HalfDays => 43_200_000_000_000,
            Unit::Days | Unit::Weeks | Unit::Months | Unit::Years => return None,
        })
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Unit::Nanos => "Nanos",
            Unit::Micros => "Micros",
            Unit::Millis => "Millis",
            Unit::Seconds => "Seconds",
            Unit::Minutes => "Minutes",
            Unit::Hours => "Hours",
            Unit::HalfDays => "HalfDays",
            Unit::Days => "Days",
            Unit::Weeks => "Weeks",
            Unit::Months => "Months",
            Unit::Years => "Years",
        }
    }
}

/// An externally defined date field.
///
/// The built-in fields cover everything the five calendars expose; a caller
/// with its own derived field (fiscal quarter, sprint number, ...) implements
/// this instead of the crate special-casing foreign types.
pub trait CustomField {
    /// Read the field's value from a date.
    fn get_from(&self, date: &CalendarDate) -> Result<i64>;

    /// Produce a copy of `date` with the field set to `value`.
    fn adjust_into(&self, date: &CalendarDate, value: i64) -> Result<CalendarDate>;
}

// ── Tests ───────────────────────────────────────────────────────────────────
