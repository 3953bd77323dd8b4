//! A date with a wall-clock time, in one calendar, without a zone.

use std::cmp::Ordering;

use serde::Serialize;

use crate::calendar::Calendar;
use crate::date::CalendarDate;
use crate::error::{CalendarError, Result};
use crate::field::{DateField, Unit};
use crate::time::{TimeOfDay, NANOS_PER_DAY, NANOS_PER_SECOND, SECONDS_PER_DAY};
use crate::zone::UtcOffset;

/// A calendar date combined with a time of day.
///
/// Not an instant: it means different points on the time line depending on
/// the UTC offset applied. Conversions to and from epoch seconds therefore
/// take the offset explicitly; attaching a full time zone is
/// [`ZonedDateTime`](crate::ZonedDateTime)'s job.
///
/// Time-based arithmetic runs on a single i128 nanosecond line (epoch day
/// times nanos-per-day plus nanos-of-day), so day carry in either direction
/// falls out of Euclidean division rather than cascading field fixups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LocalDateTime {
    date: CalendarDate,
    time: TimeOfDay,
}

impl LocalDateTime {
    pub fn new(date: CalendarDate, time: TimeOfDay) -> Self {
        LocalDateTime { date, time }
    }

    /// Build from raw fields in one call.
    #[allow(clippy::too_many_arguments)]
    pub fn of(
        calendar: Calendar,
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> Result<Self> {
        Ok(LocalDateTime {
            date: CalendarDate::new(calendar, year, month, day)?,
            time: TimeOfDay::new(hour, minute, second, nanosecond)?,
        })
    }

    /// Rebuild the local date-time that an instant shows on a clock at
    /// `offset`.
    pub fn of_epoch_second(
        calendar: Calendar,
        epoch_second: i64,
        nanosecond: u32,
        offset: UtcOffset,
    ) -> Result<Self> {
        if nanosecond >= NANOS_PER_SECOND as u32 {
            return Err(CalendarError::OutOfRange(format!(
                "nanosecond {nanosecond} outside 0..=999999999"
            )));
        }
        let local_second = epoch_second
            .checked_add(offset.total_seconds() as i64)
            .ok_or(CalendarError::Overflow("epoch second"))?;
        let epoch_day = local_second.div_euclid(SECONDS_PER_DAY);
        let second_of_day = local_second.rem_euclid(SECONDS_PER_DAY) as u64;
        Ok(LocalDateTime {
            date: CalendarDate::from_epoch_day(calendar, epoch_day)?,
            time: TimeOfDay::from_nanos_of_day(
                second_of_day * NANOS_PER_SECOND + nanosecond as u64,
            )?,
        })
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn calendar(&self) -> Calendar {
        self.date.calendar()
    }

    /// Seconds since 1970-01-01T00:00:00 at `offset`.
    pub fn to_epoch_second(&self, offset: UtcOffset) -> i64 {
        self.date.to_epoch_day() * SECONDS_PER_DAY + self.time.second_of_day() as i64
            - offset.total_seconds() as i64
    }

    /// Return a copy with a different time of day.
    pub fn with_time(&self, time: TimeOfDay) -> Self {
        LocalDateTime {
            date: self.date,
            time,
        }
    }

    /// Return a copy with a different date.
    pub fn with_date(&self, date: CalendarDate) -> Self {
        LocalDateTime {
            date,
            time: self.time,
        }
    }

    /// Read a date field; the time component has no fields of its own here,
    /// it is exposed directly through [`time`](Self::time).
    pub fn get(&self, field: DateField) -> i64 {
        self.date.get(field)
    }

    /// Return a copy with a date field adjusted, time unchanged.
    pub fn with_field(&self, field: DateField, value: i64) -> Result<Self> {
        Ok(LocalDateTime {
            date: self.date.with_field(field, value)?,
            time: self.time,
        })
    }

    // ── arithmetic ─────────────────────────────────────────────────────

    /// Shift by `amount` of `unit`. Date-based units move the date and keep
    /// the wall time; time-based units move along the nanosecond line and
    /// carry whole days into the date.
    pub fn plus(&self, amount: i64, unit: Unit) -> Result<Self> {
        match unit {
            Unit::Days => Ok(self.with_date(self.date.plus_days(amount)?)),
            Unit::Weeks => {
                let days = amount
                    .checked_mul(7)
                    .ok_or(CalendarError::Overflow("week addition"))?;
                Ok(self.with_date(self.date.plus_days(days)?))
            }
            Unit::Months => Ok(self.with_date(self.date.plus_months(amount)?)),
            Unit::Years => Ok(self.with_date(self.date.plus_years(amount)?)),
            _ => {
                // unwrap-free: every non-date unit has a nanos span
                let span = unit
                    .nanos()
                    .ok_or(CalendarError::UnsupportedUnit(unit.name()))?;
                self.plus_nanos(amount as i128 * span)
            }
        }
    }

    pub fn minus(&self, amount: i64, unit: Unit) -> Result<Self> {
        let negated = amount
            .checked_neg()
            .ok_or(CalendarError::Overflow("amount negation"))?;
        self.plus(negated, unit)
    }

    fn plus_nanos(&self, nanos: i128) -> Result<Self> {
        if nanos == 0 {
            return Ok(*self);
        }
        let total = self.total_nanos() + nanos;
        let day = i64::try_from(total.div_euclid(NANOS_PER_DAY as i128))
            .map_err(|_| CalendarError::Overflow("time addition"))?;
        let nanos_of_day = total.rem_euclid(NANOS_PER_DAY as i128) as u64;
        Ok(LocalDateTime {
            date: CalendarDate::from_epoch_day(self.calendar(), day)?,
            time: TimeOfDay::from_nanos_of_day(nanos_of_day)?,
        })
    }

    /// Position on the unanchored local nanosecond line.
    fn total_nanos(&self) -> i128 {
        self.date.to_epoch_day() as i128 * NANOS_PER_DAY as i128 + self.time.nanos_of_day() as i128
    }

    /// Amount of time until `end` in `unit`.
    ///
    /// Time-based units measure the exact nanosecond distance, truncated
    /// toward zero. Date-based units count whole units only: an end wall
    /// time earlier than the start's means the final unit is incomplete and
    /// is not counted.
    pub fn until(&self, end: &Self, unit: Unit) -> Result<i64> {
        self.date.require_same_calendar(&end.date)?;
        if let Some(span) = unit.nanos() {
            let diff = end.total_nanos() - self.total_nanos();
            return i64::try_from(diff / span)
                .map_err(|_| CalendarError::Overflow("duration"));
        }
        // trim the incomplete trailing day before delegating to date math
        let mut end_date = end.date;
        if end_date > self.date && end.time < self.time {
            end_date = end_date.plus_days(-1)?;
        } else if end_date < self.date && end.time > self.time {
            end_date = end_date.plus_days(1)?;
        }
        self.date.until_in(&end_date, unit)
    }
}

/// Ordering is defined within one calendar only, date first, then time.
impl PartialOrd for LocalDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.date
            .partial_cmp(&other.date)
            .map(|ord| ord.then(self.time.cmp(&other.time)))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn iso_dt(y: i32, mo: u8, d: u8, h: u8, mi: u8, s: u8) -> LocalDateTime {
        LocalDateTime::of(Calendar::Iso, y, mo, d, h, mi, s, 0).unwrap()
    }

    #[test]
    fn test_of_validates_both_halves() {
        assert!(LocalDateTime::of(Calendar::Iso, 2023, 2, 29, 0, 0, 0, 0).is_err());
        assert!(LocalDateTime::of(Calendar::Iso, 2023, 2, 28, 24, 0, 0, 0).is_err());
        assert!(LocalDateTime::of(Calendar::Iso, 2023, 2, 28, 23, 59, 59, 0).is_ok());
    }

    #[test]
    fn test_epoch_second_round_trip_with_offset() {
        let offset = UtcOffset::from_seconds(5 * 3600 + 1800).unwrap();
        let dt = iso_dt(2024, 3, 1, 10, 15, 30);
        let sec = dt.to_epoch_second(offset);
        let back = LocalDateTime::of_epoch_second(Calendar::Iso, sec, 0, offset).unwrap();
        assert_eq!(back, dt);
        // same instant at UTC shows a different wall time
        let utc = LocalDateTime::of_epoch_second(Calendar::Iso, sec, 0, UtcOffset::UTC).unwrap();
        assert_eq!((utc.time().hour(), utc.time().minute()), (4, 45));
    }

    #[test]
    fn test_epoch_second_of_epoch_origin() {
        let dt = iso_dt(1970, 1, 1, 0, 0, 0);
        assert_eq!(dt.to_epoch_second(UtcOffset::UTC), 0);
    }

    #[test]
    fn test_time_arithmetic_carries_days() {
        let dt = iso_dt(2024, 2, 28, 23, 30, 0);
        let plus = dt.plus(45, Unit::Minutes).unwrap();
        assert_eq!(plus.date().day(), 29); // leap day
        assert_eq!((plus.time().hour(), plus.time().minute()), (0, 15));

        let minus = iso_dt(2024, 1, 1, 0, 0, 10).minus(30, Unit::Seconds).unwrap();
        assert_eq!((minus.date().year(), minus.date().month(), minus.date().day()), (2023, 12, 31));
        assert_eq!((minus.time().hour(), minus.time().second()), (23, 40));
    }

    #[test]
    fn test_date_arithmetic_keeps_wall_time() {
        let dt = iso_dt(2024, 1, 31, 8, 5, 0);
        let plus = dt.plus(1, Unit::Months).unwrap();
        assert_eq!((plus.date().month(), plus.date().day()), (2, 29));
        assert_eq!(plus.time(), dt.time());
        let weeks = dt.plus(2, Unit::Weeks).unwrap();
        assert_eq!(weeks.date().day(), 14);
    }

    #[test]
    fn test_until_time_based_truncates() {
        let a = iso_dt(2024, 1, 1, 0, 0, 0);
        let b = iso_dt(2024, 1, 1, 1, 59, 59);
        assert_eq!(a.until(&b, Unit::Hours).unwrap(), 1);
        assert_eq!(a.until(&b, Unit::Minutes).unwrap(), 119);
        assert_eq!(b.until(&a, Unit::Hours).unwrap(), -1);
    }

    #[test]
    fn test_until_months_discounts_incomplete_day() {
        // two months on the date line, but the end wall time is earlier, so
        // the second month has not fully elapsed
        let start = iso_dt(2024, 1, 15, 12, 0, 0);
        let end = iso_dt(2024, 3, 15, 6, 0, 0);
        assert_eq!(start.until(&end, Unit::Months).unwrap(), 1);
        let full = iso_dt(2024, 3, 15, 12, 0, 0);
        assert_eq!(start.until(&full, Unit::Months).unwrap(), 2);
    }

    #[test]
    fn test_until_days_spanning_midnight() {
        let a = iso_dt(2024, 1, 1, 22, 0, 0);
        let b = iso_dt(2024, 1, 3, 2, 0, 0);
        // 28 hours short of two full days
        assert_eq!(a.until(&b, Unit::Days).unwrap(), 1);
        assert_eq!(a.until(&b, Unit::Hours).unwrap(), 28);
    }

    #[test]
    fn test_cross_calendar_comparison_and_until() {
        let a = iso_dt(2024, 1, 1, 0, 0, 0);
        let b = LocalDateTime::of(Calendar::ThaiBuddhist, 2567, 1, 1, 0, 0, 0, 0).unwrap();
        assert_eq!(a.partial_cmp(&b), None);
        assert!(matches!(
            a.until(&b, Unit::Days),
            Err(CalendarError::CalendarMismatch { .. })
        ));
    }

    #[test]
    fn test_ordering_date_then_time() {
        assert!(iso_dt(2024, 1, 1, 23, 0, 0) < iso_dt(2024, 1, 2, 0, 0, 0));
        assert!(iso_dt(2024, 1, 1, 9, 0, 0) < iso_dt(2024, 1, 1, 9, 30, 0));
    }

    #[test]
    fn test_with_field_keeps_time() {
        let dt = iso_dt(2024, 1, 31, 18, 30, 0);
        let moved = dt.with_field(DateField::MonthOfYear, 2).unwrap();
        assert_eq!((moved.date().month(), moved.date().day()), (2, 29));
        assert_eq!(moved.time(), dt.time());
    }
}
