//! A single day in one calendar system.

use std::cmp::Ordering;

use serde::Serialize;

use crate::calendar::{Calendar, Era};
use crate::datetime::LocalDateTime;
use crate::error::{CalendarError, Result};
use crate::field::{CustomField, DateField, Unit};
use crate::japanese;
use crate::period::CalendarPeriod;
use crate::time::TimeOfDay;

/// Months per year shared by all five built-in calendars; proleptic-month
/// arithmetic relies on it being fixed.
const MONTHS_PER_YEAR: i64 = 12;

/// An immutable, always-valid date in one calendar system.
///
/// Constructors reject invalid (year, month, day) combinations; every
/// "mutator" returns a new value. Derived fields (era, year-of-era,
/// day-of-year, day-of-week) are computed on demand from the stored fields
/// and the calendar's tables.
///
/// Equality, ordering and hashing only relate dates of the same calendar:
/// comparing across calendars yields `None` from `partial_cmp` rather than a
/// silent epoch-day coercion. Callers that want instant-line comparison use
/// [`to_epoch_day`](Self::to_epoch_day) explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarDate {
    calendar: Calendar,
    year: i32,
    month: u8,
    day: u8,
}

impl CalendarDate {
    /// Build a date from calendar-specific (proleptic year, month, day).
    pub fn new(calendar: Calendar, year: i32, month: u8, day: u8) -> Result<Self> {
        calendar.validate_date(year, month, day)?;
        Ok(CalendarDate {
            calendar,
            year,
            month,
            day,
        })
    }

    /// Build a date from a linear epoch-day count.
    pub fn from_epoch_day(calendar: Calendar, epoch_day: i64) -> Result<Self> {
        let (year, month, day) = calendar.date_info_of(epoch_day)?;
        Ok(CalendarDate {
            calendar,
            year,
            month,
            day,
        })
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Proleptic year.
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Days since 1970-01-01, the common interchange value between
    /// calendars.
    pub fn to_epoch_day(&self) -> i64 {
        self.calendar
            .epoch_day_unchecked(self.year, self.month, self.day)
    }

    /// True if both dates name the same day on the instant line, whatever
    /// their calendars. The one sanctioned cross-calendar comparison.
    pub fn is_same_instant_day(&self, other: &Self) -> bool {
        self.to_epoch_day() == other.to_epoch_day()
    }

    /// Combine with a time of day into a [`LocalDateTime`].
    pub fn at_time(&self, time: TimeOfDay) -> LocalDateTime {
        LocalDateTime::new(*self, time)
    }

    // ── derived fields ─────────────────────────────────────────────────

    /// The era this date falls in.
    pub fn era(&self) -> Era {
        match self.calendar {
            Calendar::Japanese => {
                let era = japanese::era_at(self.to_epoch_day());
                Era {
                    value: era.value,
                    name: era.name,
                    since: era.since,
                }
            }
            Calendar::Minguo | Calendar::ThaiBuddhist => {
                let eras = self.calendar.eras();
                if self.year >= 1 {
                    eras[1]
                } else {
                    eras[0]
                }
            }
            Calendar::Iso | Calendar::Hijrah => self.calendar.eras()[0],
        }
    }

    /// Year numbering within the current era; restarts at 1 on each era
    /// transition for calendars with more than one era.
    pub fn year_of_era(&self) -> i32 {
        match self.calendar {
            Calendar::Japanese => {
                let era = japanese::era_at(self.to_epoch_day());
                self.year - era.first_year + 1
            }
            Calendar::Minguo | Calendar::ThaiBuddhist => {
                if self.year >= 1 {
                    self.year
                } else {
                    1 - self.year
                }
            }
            Calendar::Iso | Calendar::Hijrah => self.year,
        }
    }

    /// One-based day within the year.
    pub fn day_of_year(&self) -> u16 {
        let mut doy = self.day as u16;
        for m in 1..self.month {
            doy += self.calendar.month_length_unchecked(self.year, m) as u16;
        }
        doy
    }

    /// ISO day of week, 1 = Monday .. 7 = Sunday. Computed from the epoch
    /// day, never stored.
    pub fn day_of_week(&self) -> u8 {
        // epoch day 0 (1970-01-01) was a Thursday
        ((self.to_epoch_day() + 3).rem_euclid(7) + 1) as u8
    }

    /// Linear month count: `year * 12 + month - 1`.
    pub fn proleptic_month(&self) -> i64 {
        self.year as i64 * MONTHS_PER_YEAR + self.month as i64 - 1
    }

    // ── field access ───────────────────────────────────────────────────

    /// Read a recognized field.
    pub fn get(&self, field: DateField) -> i64 {
        match field {
            DateField::Era => self.era().value as i64,
            DateField::YearOfEra => self.year_of_era() as i64,
            DateField::Year => self.year as i64,
            DateField::MonthOfYear => self.month as i64,
            DateField::DayOfMonth => self.day as i64,
            DateField::DayOfYear => self.day_of_year() as i64,
            DateField::DayOfWeek => self.day_of_week() as i64,
            DateField::EpochDay => self.to_epoch_day(),
            DateField::ProlepticMonth => self.proleptic_month(),
        }
    }

    /// Return a copy with `field` set to `value`.
    ///
    /// Writes to `Year`, `YearOfEra`, `MonthOfYear` and `Era` follow the
    /// resolve-previous-valid policy: if the new year/month makes the
    /// current day-of-month invalid (a shorter Hijrah month, February), the
    /// day is clamped down to the month's last valid day instead of
    /// erroring. All other invalid writes are rejected.
    pub fn with_field(&self, field: DateField, value: i64) -> Result<Self> {
        match field {
            DateField::Era => self.with_era(value),
            DateField::YearOfEra => self.with_year_of_era(value),
            DateField::Year => resolve_previous_valid(
                self.calendar,
                to_i32(value, "year")?,
                self.month,
                self.day,
            ),
            DateField::MonthOfYear => {
                if !(1..=12).contains(&value) {
                    return Err(CalendarError::OutOfRange(format!(
                        "month {value} outside 1..=12"
                    )));
                }
                resolve_previous_valid(self.calendar, self.year, value as u8, self.day)
            }
            DateField::DayOfMonth => {
                let len = self.calendar.month_length(self.year, self.month)?;
                if !(1..=len as i64).contains(&value) {
                    return Err(CalendarError::OutOfRange(format!(
                        "day {value} outside 1..={len} for {} {}-{:02}",
                        self.calendar.id(),
                        self.year,
                        self.month
                    )));
                }
                CalendarDate::new(self.calendar, self.year, self.month, value as u8)
            }
            DateField::DayOfYear => {
                let len = self.calendar.year_length(self.year)? as i64;
                if !(1..=len).contains(&value) {
                    return Err(CalendarError::OutOfRange(format!(
                        "day-of-year {value} outside 1..={len} for {} {}",
                        self.calendar.id(),
                        self.year
                    )));
                }
                let first = self.calendar.epoch_day_unchecked(self.year, 1, 1);
                Self::from_epoch_day(self.calendar, first + value - 1)
            }
            DateField::DayOfWeek => {
                if !(1..=7).contains(&value) {
                    return Err(CalendarError::OutOfRange(format!(
                        "day-of-week {value} outside 1..=7"
                    )));
                }
                self.plus_days(value - self.day_of_week() as i64)
            }
            DateField::EpochDay => Self::from_epoch_day(self.calendar, value),
            DateField::ProlepticMonth => {
                let year = to_i32(value.div_euclid(MONTHS_PER_YEAR), "proleptic month")?;
                let month = value.rem_euclid(MONTHS_PER_YEAR) as u8 + 1;
                resolve_previous_valid(self.calendar, year, month, self.day)
            }
        }
    }

    /// Read an externally defined field.
    pub fn get_custom<F: CustomField + ?Sized>(&self, field: &F) -> Result<i64> {
        field.get_from(self)
    }

    /// Return a copy adjusted by an externally defined field.
    pub fn with_custom<F: CustomField + ?Sized>(&self, field: &F, value: i64) -> Result<Self> {
        field.adjust_into(self, value)
    }

    fn with_era(&self, value: i64) -> Result<Self> {
        let known = self.calendar.eras().iter().any(|e| e.value as i64 == value);
        if !known {
            return Err(CalendarError::OutOfRange(format!(
                "era {value} not defined for the {} calendar",
                self.calendar.id()
            )));
        }
        match self.calendar {
            // single-era calendars: the only valid write is a no-op
            Calendar::Iso | Calendar::Hijrah => Ok(*self),
            Calendar::Minguo | Calendar::ThaiBuddhist => {
                if value == self.era().value as i64 {
                    Ok(*self)
                } else {
                    // swap era, keep year-of-era: year' = 1 - year both ways
                    resolve_previous_valid(self.calendar, 1 - self.year, self.month, self.day)
                }
            }
            Calendar::Japanese => {
                // era_of_value is Some: `known` checked it against the table
                let era = japanese::era_of_value(value as i8).ok_or_else(|| {
                    CalendarError::OutOfRange(format!("era {value} not defined"))
                })?;
                let yoe = self.year_of_era();
                if yoe > japanese::max_year_of_era(era) {
                    return Err(CalendarError::OutOfRange(format!(
                        "year-of-era {yoe} outside 1..={} for era {}",
                        japanese::max_year_of_era(era),
                        era.name
                    )));
                }
                resolve_previous_valid(self.calendar, era.first_year + yoe - 1, self.month, self.day)
            }
        }
    }

    fn with_year_of_era(&self, value: i64) -> Result<Self> {
        let reject = |max: i64| {
            Err(CalendarError::OutOfRange(format!(
                "year-of-era {value} outside 1..={max} for the {} calendar",
                self.calendar.id()
            )))
        };
        match self.calendar {
            Calendar::Iso => {
                resolve_previous_valid(self.calendar, to_i32(value, "year")?, self.month, self.day)
            }
            Calendar::Hijrah => {
                if !(1..=9999).contains(&value) {
                    return reject(9999);
                }
                resolve_previous_valid(self.calendar, value as i32, self.month, self.day)
            }
            Calendar::Minguo | Calendar::ThaiBuddhist => {
                if value < 1 {
                    return reject(i32::MAX as i64);
                }
                let yoe = to_i32(value, "year-of-era")?;
                let year = if self.year >= 1 { yoe } else { 1 - yoe };
                resolve_previous_valid(self.calendar, year, self.month, self.day)
            }
            Calendar::Japanese => {
                // the valid maximum is dynamic: it depends on the era's span
                let era = japanese::era_at(self.to_epoch_day());
                let max = japanese::max_year_of_era(era) as i64;
                if !(1..=max).contains(&value) {
                    return reject(max);
                }
                resolve_previous_valid(
                    self.calendar,
                    era.first_year + value as i32 - 1,
                    self.month,
                    self.day,
                )
            }
        }
    }

    // ── arithmetic ─────────────────────────────────────────────────────

    /// Shift by an exact day count, routed through the epoch day.
    pub fn plus_days(&self, days: i64) -> Result<Self> {
        if days == 0 {
            return Ok(*self);
        }
        let epoch_day = self
            .to_epoch_day()
            .checked_add(days)
            .ok_or(CalendarError::Overflow("day addition"))?;
        Self::from_epoch_day(self.calendar, epoch_day)
    }

    pub fn minus_days(&self, days: i64) -> Result<Self> {
        self.plus_days(days.checked_neg().ok_or(CalendarError::Overflow("day negation"))?)
    }

    /// Shift by whole months via proleptic-month arithmetic, re-resolving
    /// the day under the resolve-previous-valid policy.
    pub fn plus_months(&self, months: i64) -> Result<Self> {
        if months == 0 {
            return Ok(*self);
        }
        let pm = self
            .proleptic_month()
            .checked_add(months)
            .ok_or(CalendarError::Overflow("month addition"))?;
        let year = to_i32(pm.div_euclid(MONTHS_PER_YEAR), "year")?;
        let month = pm.rem_euclid(MONTHS_PER_YEAR) as u8 + 1;
        resolve_previous_valid(self.calendar, year, month, self.day)
    }

    pub fn plus_years(&self, years: i64) -> Result<Self> {
        if years == 0 {
            return Ok(*self);
        }
        let year = (self.year as i64)
            .checked_add(years)
            .ok_or(CalendarError::Overflow("year addition"))?;
        resolve_previous_valid(self.calendar, to_i32(year, "year")?, self.month, self.day)
    }

    /// Add a calendar period (years+months as one combined month shift,
    /// then days). Fails on calendar mismatch.
    pub fn plus_period(&self, period: &CalendarPeriod) -> Result<Self> {
        period.add_to(self)
    }

    /// Subtract a calendar period. Fails on calendar mismatch.
    pub fn minus_period(&self, period: &CalendarPeriod) -> Result<Self> {
        period.subtract_from(self)
    }

    /// Amount of time from this date until `end`, in `unit`. Day-based
    /// units measure the exact epoch-day distance; calendar units use the
    /// borrow-adjusted month difference.
    pub fn until_in(&self, end: &Self, unit: Unit) -> Result<i64> {
        self.require_same_calendar(end)?;
        match unit {
            Unit::Days => Ok(end.to_epoch_day() - self.to_epoch_day()),
            Unit::Weeks => Ok((end.to_epoch_day() - self.to_epoch_day()) / 7),
            Unit::Months => Ok(self.months_until(end)?.0),
            Unit::Years => Ok(self.months_until(end)?.0 / MONTHS_PER_YEAR),
            _ => Err(CalendarError::UnsupportedUnit(unit.name())),
        }
    }

    /// The period from this date until `end` (years, months, days).
    pub fn until(&self, end: &Self) -> Result<CalendarPeriod> {
        let (months, days) = self.months_until(end)?;
        Ok(CalendarPeriod::new(
            self.calendar,
            to_i32(months / MONTHS_PER_YEAR, "years")?,
            (months % MONTHS_PER_YEAR) as i32,
            to_i32(days, "days")?,
        ))
    }

    /// Month difference with day-of-month borrow adjustment: if the day
    /// component would point backwards, borrow one month and measure the
    /// remaining days from the month-shifted anchor date (exact over
    /// variable-length months), never from naive calendar subtraction.
    fn months_until(&self, end: &Self) -> Result<(i64, i64)> {
        let mut months = end.proleptic_month() - self.proleptic_month();
        let mut days = end.day as i64 - self.day as i64;
        if (months > 0 && days < 0) || (months < 0 && days > 0) {
            months -= months.signum();
            let anchor = self.plus_months(months)?;
            days = end.to_epoch_day() - anchor.to_epoch_day();
        }
        Ok((months, days))
    }

    pub(crate) fn require_same_calendar(&self, other: &Self) -> Result<()> {
        if self.calendar == other.calendar {
            Ok(())
        } else {
            Err(CalendarError::CalendarMismatch {
                left: self.calendar.id(),
                right: other.calendar.id(),
            })
        }
    }
}

/// Ordering is defined within one calendar only; across calendars there is
/// deliberately no answer.
impl PartialOrd for CalendarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.calendar == other.calendar).then(|| {
            (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
        })
    }
}

/// Clamp the day to the target month's last valid day, then construct.
fn resolve_previous_valid(calendar: Calendar, year: i32, month: u8, day: u8) -> Result<CalendarDate> {
    let len = calendar.month_length(year, month)?;
    CalendarDate::new(calendar, year, month, day.min(len))
}

fn to_i32(value: i64, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| CalendarError::OutOfRange(format!("{what} {value} exceeds the i32 range")))
}

// ── Tests ───────────────────────────────────────────────────────────────────
