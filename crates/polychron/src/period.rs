//! A calendar-relative amount of time.

use serde::Serialize;

use crate::calendar::Calendar;
use crate::date::CalendarDate;
use crate::error::{CalendarError, Result};

/// An amount of years, months and days tied to one calendar system.
///
/// Components are stored exactly as given; nothing is normalized on
/// construction, so `{0y, 13m}` and `{1y, 1m}` are distinct values that
/// happen to [`normalized`](Self::normalized) to the same one. Adding a
/// period to a date of a different calendar is an error, never a silent
/// conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarPeriod {
    calendar: Calendar,
    years: i32,
    months: i32,
    days: i32,
}

impl CalendarPeriod {
    pub fn new(calendar: Calendar, years: i32, months: i32, days: i32) -> Self {
        CalendarPeriod {
            calendar,
            years,
            months,
            days,
        }
    }

    pub fn zero(calendar: Calendar) -> Self {
        Self::new(calendar, 0, 0, 0)
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn years(&self) -> i32 {
        self.years
    }

    pub fn months(&self) -> i32 {
        self.months
    }

    pub fn days(&self) -> i32 {
        self.days
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// True if any component is negative.
    pub fn is_negative(&self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    // ── combination ────────────────────────────────────────────────────

    /// Component-wise sum. Fails on calendar mismatch or i32 overflow.
    pub fn plus(&self, other: &Self) -> Result<Self> {
        self.require_same_calendar(other)?;
        Ok(Self::new(
            self.calendar,
            add(self.years, other.years, "years")?,
            add(self.months, other.months, "months")?,
            add(self.days, other.days, "days")?,
        ))
    }

    /// Component-wise difference. Fails on calendar mismatch or overflow.
    pub fn minus(&self, other: &Self) -> Result<Self> {
        self.plus(&other.negated()?)
    }

    pub fn negated(&self) -> Result<Self> {
        self.multiplied_by(-1)
    }

    pub fn multiplied_by(&self, scalar: i32) -> Result<Self> {
        let mul = |v: i32, what: &'static str| {
            v.checked_mul(scalar).ok_or(CalendarError::Overflow(what))
        };
        Ok(Self::new(
            self.calendar,
            mul(self.years, "years")?,
            mul(self.months, "months")?,
            mul(self.days, "days")?,
        ))
    }

    /// Fold whole years' worth of months into years, leaving months in
    /// `0..months_per_year` (Euclidean, so `{0y, -1m}` becomes `{-1y, 11m}`).
    /// Identity for a calendar without a fixed months-per-year count. Days
    /// are calendar units of varying length and are never folded.
    pub fn normalized(&self) -> Result<Self> {
        let Some(per_year) = self.calendar.months_per_year() else {
            return Ok(*self);
        };
        let per_year = per_year as i64;
        let total = self.years as i64 * per_year + self.months as i64;
        let years = i32::try_from(total.div_euclid(per_year))
            .map_err(|_| CalendarError::Overflow("years"))?;
        Ok(Self::new(
            self.calendar,
            years,
            total.rem_euclid(per_year) as i32,
            self.days,
        ))
    }

    // ── application to dates ───────────────────────────────────────────

    /// Add this period to `date`: years and months as a single combined
    /// month shift (one end-of-month clamp at most), then days exactly.
    pub fn add_to(&self, date: &CalendarDate) -> Result<CalendarDate> {
        self.check_calendar_of(date)?;
        let shifted = if self.months == 0 {
            date.plus_years(self.years as i64)?
        } else {
            date.plus_months(self.years as i64 * 12 + self.months as i64)?
        };
        shifted.plus_days(self.days as i64)
    }

    /// Subtract this period from `date`, component-wise negated.
    pub fn subtract_from(&self, date: &CalendarDate) -> Result<CalendarDate> {
        self.negated()?.add_to(date)
    }

    fn require_same_calendar(&self, other: &Self) -> Result<()> {
        if self.calendar == other.calendar {
            Ok(())
        } else {
            Err(CalendarError::CalendarMismatch {
                left: self.calendar.id(),
                right: other.calendar.id(),
            })
        }
    }

    fn check_calendar_of(&self, date: &CalendarDate) -> Result<()> {
        if self.calendar == date.calendar() {
            Ok(())
        } else {
            Err(CalendarError::CalendarMismatch {
                left: self.calendar.id(),
                right: date.calendar().id(),
            })
        }
    }
}

fn add(a: i32, b: i32, what: &'static str) -> Result<i32> {
    a.checked_add(b).ok_or(CalendarError::Overflow(what))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn iso_period(y: i32, m: i32, d: i32) -> CalendarPeriod {
        CalendarPeriod::new(Calendar::Iso, y, m, d)
    }

    #[test]
    fn test_components_kept_verbatim() {
        let p = iso_period(1, 13, 0);
        assert_eq!((p.years(), p.months(), p.days()), (1, 13, 0));
        assert!(!p.is_zero());
        assert!(CalendarPeriod::zero(Calendar::Hijrah).is_zero());
    }

    #[test]
    fn test_normalized_folds_months_into_years() {
        let p = iso_period(1, 13, 0).normalized().unwrap();
        assert_eq!((p.years(), p.months(), p.days()), (2, 1, 0));
    }

    #[test]
    fn test_normalized_folds_by_the_calendar_month_count() {
        // every built-in reports twelve months per year, and the fold reads
        // that count off the calendar rather than assuming it
        for cal in [
            Calendar::Iso,
            Calendar::Hijrah,
            Calendar::Japanese,
            Calendar::Minguo,
            Calendar::ThaiBuddhist,
        ] {
            assert_eq!(cal.months_per_year(), Some(12));
            let p = CalendarPeriod::new(cal, 0, 25, 3).normalized().unwrap();
            assert_eq!((p.years(), p.months(), p.days()), (2, 1, 3), "{cal}");
        }
    }

    #[test]
    fn test_normalized_is_euclidean() {
        let p = iso_period(0, -1, 5).normalized().unwrap();
        assert_eq!((p.years(), p.months(), p.days()), (-1, 11, 5));
        let q = iso_period(-1, 25, 0).normalized().unwrap();
        assert_eq!((q.years(), q.months()), (1, 1));
    }

    #[test]
    fn test_plus_minus_negate() {
        let a = iso_period(1, 2, 3);
        let b = iso_period(0, 11, -3);
        let sum = a.plus(&b).unwrap();
        assert_eq!((sum.years(), sum.months(), sum.days()), (1, 13, 0));
        assert_eq!(sum.minus(&b).unwrap(), a);
        let neg = a.negated().unwrap();
        assert_eq!((neg.years(), neg.months(), neg.days()), (-1, -2, -3));
        assert!(neg.is_negative());
    }

    #[test]
    fn test_multiplied_by_checks_overflow() {
        let p = iso_period(2, 0, -1).multiplied_by(3).unwrap();
        assert_eq!((p.years(), p.days()), (6, -3));
        assert!(iso_period(i32::MAX, 0, 0).multiplied_by(2).is_err());
    }

    const CALENDARS: [Calendar; 5] = [
        Calendar::Iso,
        Calendar::Hijrah,
        Calendar::Japanese,
        Calendar::Minguo,
        Calendar::ThaiBuddhist,
    ];

    fn sample_date(cal: Calendar) -> CalendarDate {
        let (y, m, d) = match cal {
            Calendar::Hijrah => (1445, 1, 1),
            Calendar::Minguo => (113, 1, 1),
            Calendar::ThaiBuddhist => (2567, 1, 1),
            _ => (2024, 1, 1),
        };
        CalendarDate::new(cal, y, m, d).unwrap()
    }

    #[test]
    fn test_cross_calendar_combination_rejected_for_every_pair() {
        for left in CALENDARS {
            for right in CALENDARS {
                let a = CalendarPeriod::new(left, 1, 2, 3);
                let b = CalendarPeriod::new(right, 0, 1, 0);
                if left == right {
                    assert!(a.plus(&b).is_ok());
                    continue;
                }
                assert!(
                    matches!(a.plus(&b), Err(CalendarError::CalendarMismatch { .. })),
                    "{left} + {right}"
                );
                assert!(
                    matches!(a.minus(&b), Err(CalendarError::CalendarMismatch { .. })),
                    "{left} - {right}"
                );
            }
        }
    }

    #[test]
    fn test_add_to_wrong_calendar_rejected_for_every_pair() {
        for period_cal in CALENDARS {
            for date_cal in CALENDARS {
                if period_cal == date_cal {
                    continue;
                }
                let p = CalendarPeriod::new(period_cal, 0, 1, 0);
                let date = sample_date(date_cal);
                assert!(
                    matches!(p.add_to(&date), Err(CalendarError::CalendarMismatch { .. })),
                    "{period_cal} period onto {date_cal} date"
                );
                assert!(
                    matches!(
                        p.subtract_from(&date),
                        Err(CalendarError::CalendarMismatch { .. })
                    ),
                    "{period_cal} period off {date_cal} date"
                );
            }
        }
    }

    #[test]
    fn test_add_to_single_month_shift() {
        // Jan 31 + 1y1m: one combined 13-month shift lands on Feb 29 of the
        // leap year, not Feb 28 via an intermediate clamp
        let date = CalendarDate::new(Calendar::Iso, 2023, 1, 31).unwrap();
        let shifted = iso_period(1, 1, 0).add_to(&date).unwrap();
        assert_eq!(
            (shifted.year(), shifted.month(), shifted.day()),
            (2024, 2, 29)
        );
    }

    #[test]
    fn test_add_to_years_then_days() {
        let date = CalendarDate::new(Calendar::Iso, 2024, 2, 29).unwrap();
        let shifted = iso_period(1, 0, 1).add_to(&date).unwrap();
        // year shift clamps to Feb 28, then one exact day
        assert_eq!(
            (shifted.year(), shifted.month(), shifted.day()),
            (2025, 3, 1)
        );
    }

    #[test]
    fn test_subtract_from_round_trips_without_clamp() {
        let date = CalendarDate::new(Calendar::Iso, 2024, 6, 15).unwrap();
        let p = iso_period(2, 3, 10);
        let there = p.add_to(&date).unwrap();
        assert_eq!(p.subtract_from(&there).unwrap(), date);
    }

    #[test]
    fn test_until_then_add_recovers_end() {
        let start = CalendarDate::new(Calendar::Hijrah, 1420, 1, 30).unwrap();
        let end = CalendarDate::new(Calendar::Hijrah, 1421, 5, 2).unwrap();
        let p = start.until(&end).unwrap();
        assert_eq!(p.add_to(&start).unwrap(), end);
    }
}
