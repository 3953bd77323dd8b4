//! Calendar systems and their rule tables.
//!
//! [`Calendar`] is the closed set of supported calendar systems. Every
//! calendar answers the same rule contract — epoch-day conversion, month and
//! year lengths, leap years, era enumeration — with its own internal logic:
//!
//! - **ISO**: proleptic Gregorian, closed-form leap rule, single era.
//! - **Hijrah**: tabular lunar calendar; month and year lengths come from a
//!   precomputed table ([`crate::hijrah`]), never from a closed-form rule.
//! - **Japanese**: ISO year/month/day numbering with imperial eras; year-of-era
//!   resets to 1 at each era transition ([`crate::japanese`]).
//! - **Minguo** (ROC): ISO shifted by 1911 years, two eras.
//! - **ThaiBuddhist**: ISO shifted by −543 years, two eras.
//!
//! The primary correctness property is exact round-tripping:
//! `date_info_of(epoch_day_of(y, m, d)) == (y, m, d)` over each calendar's
//! full supported range.

use serde::Serialize;

use crate::error::{CalendarError, Result};
use crate::{hijrah, japanese};

/// Supported ISO proleptic year range. Wide enough for every practical use,
/// narrow enough that epoch-day and epoch-second math stays far from i64
/// overflow.
pub const ISO_YEAR_MIN: i32 = -999_999;
pub const ISO_YEAR_MAX: i32 = 999_999;

// ── Calendar ────────────────────────────────────────────────────────────────

/// A calendar system. The set is closed: these five variants are the only
/// calendars the crate knows about, and every rule method matches on them
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Calendar {
    Iso,
    Hijrah,
    Japanese,
    Minguo,
    ThaiBuddhist,
}

/// One row of a calendar's era table: a small signed value and the first
/// epoch day of the era (`i64::MIN` when the era extends indefinitely
/// backward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Era {
    pub value: i8,
    pub name: &'static str,
    pub since: i64,
}

const ISO_ERAS: [Era; 1] = [Era {
    value: 1,
    name: "CE",
    since: i64::MIN,
}];

const HIJRAH_ERAS: [Era; 1] = [Era {
    value: 1,
    name: "AH",
    since: hijrah::EPOCH_DAY,
}];

const MINGUO_ERAS: [Era; 2] = [
    Era {
        value: 0,
        name: "BEFORE_ROC",
        since: i64::MIN,
    },
    Era {
        value: 1,
        name: "ROC",
        // ROC year 1 = ISO 1912
        since: iso_epoch_day(1912, 1, 1),
    },
];

const THAI_BUDDHIST_ERAS: [Era; 2] = [
    Era {
        value: 0,
        name: "BEFORE_BE",
        since: i64::MIN,
    },
    Era {
        value: 1,
        name: "BE",
        // BE year 1 = ISO -542
        since: iso_epoch_day(-542, 1, 1),
    },
];

impl Calendar {
    /// Stable identity string, also used by the serialization codec.
    pub fn id(&self) -> &'static str {
        match self {
            Calendar::Iso => "ISO",
            Calendar::Hijrah => "Hijrah-umalqura",
            Calendar::Japanese => "Japanese",
            Calendar::Minguo => "ROC",
            Calendar::ThaiBuddhist => "ThaiBuddhist",
        }
    }

    /// Look a calendar up by its identity string.
    pub fn from_id(id: &str) -> Option<Calendar> {
        match id {
            "ISO" => Some(Calendar::Iso),
            "Hijrah-umalqura" => Some(Calendar::Hijrah),
            "Japanese" => Some(Calendar::Japanese),
            "ROC" => Some(Calendar::Minguo),
            "ThaiBuddhist" => Some(Calendar::ThaiBuddhist),
            _ => None,
        }
    }

    /// Fixed months-per-year count, when the calendar has one. All five
    /// built-ins do; the contract allows a calendar that does not, in which
    /// case period normalization is an identity.
    pub fn months_per_year(&self) -> Option<u8> {
        match self {
            Calendar::Iso
            | Calendar::Hijrah
            | Calendar::Japanese
            | Calendar::Minguo
            | Calendar::ThaiBuddhist => Some(12),
        }
    }

    /// The calendar's era table, ordered by since-day.
    pub fn eras(&self) -> &'static [Era] {
        match self {
            Calendar::Iso => &ISO_ERAS,
            Calendar::Hijrah => &HIJRAH_ERAS,
            Calendar::Japanese => &japanese::ERA_SUMMARY,
            Calendar::Minguo => &MINGUO_ERAS,
            Calendar::ThaiBuddhist => &THAI_BUDDHIST_ERAS,
        }
    }

    /// Whether `year` is a leap year. For the Hijrah calendar this is read
    /// off the year-length table, not computed from a rule.
    pub fn is_leap_year(&self, year: i32) -> bool {
        match self {
            Calendar::Hijrah => {
                hijrah::in_year_range(year) && hijrah::table().year_length(year) == 355
            }
            _ => match self.to_iso_year(year) {
                Some(iso) => iso_is_leap(iso),
                None => false,
            },
        }
    }

    /// Length of `month` in `year`, in days.
    pub fn month_length(&self, year: i32, month: u8) -> Result<u8> {
        self.validate_year(year)?;
        validate_month(month)?;
        Ok(self.month_length_unchecked(year, month))
    }

    /// Length of `year`, in days.
    pub fn year_length(&self, year: i32) -> Result<u16> {
        self.validate_year(year)?;
        Ok(match self {
            Calendar::Hijrah => hijrah::table().year_length(year),
            _ => {
                if self.is_leap_year(year) {
                    366
                } else {
                    365
                }
            }
        })
    }

    /// Epoch day of (year, month, day), validating the triple first.
    pub fn epoch_day_of(&self, year: i32, month: u8, day: u8) -> Result<i64> {
        self.validate_date(year, month, day)?;
        Ok(self.epoch_day_unchecked(year, month, day))
    }

    /// Inverse of [`epoch_day_of`](Self::epoch_day_of): split an epoch day
    /// into this calendar's (year, month, day).
    pub fn date_info_of(&self, epoch_day: i64) -> Result<(i32, u8, u8)> {
        match self {
            Calendar::Hijrah => hijrah::table().date_info(epoch_day).ok_or_else(|| {
                CalendarError::UnsupportedDate(format!(
                    "epoch day {epoch_day} outside the Hijrah table range"
                ))
            }),
            Calendar::Japanese if epoch_day < japanese::MIN_EPOCH_DAY => {
                Err(CalendarError::UnsupportedDate(format!(
                    "epoch day {epoch_day} precedes 1873-01-01 (Meiji 6), \
                     the first supported Japanese date"
                )))
            }
            _ => {
                let (iso_year, month, day) = iso_from_epoch_day(epoch_day);
                let year = self.from_iso_year(iso_year)?;
                Ok((year, month, day))
            }
        }
    }

    // ── internals ──────────────────────────────────────────────────────

    /// Epoch day of a triple already known to be valid.
    pub(crate) fn epoch_day_unchecked(&self, year: i32, month: u8, day: u8) -> i64 {
        match self {
            Calendar::Hijrah => hijrah::table().epoch_day(year, month, day),
            _ => {
                // to_iso_year is Some for every year that passed validation
                let iso = self.to_iso_year(year).unwrap_or(year as i64);
                iso_epoch_day(iso, month, day)
            }
        }
    }

    /// Month length for a (year, month) already known to be in range.
    pub(crate) fn month_length_unchecked(&self, year: i32, month: u8) -> u8 {
        match self {
            Calendar::Hijrah => hijrah::table().month_length(year, month),
            _ => {
                let iso = self.to_iso_year(year).unwrap_or(year as i64);
                iso_month_length(iso, month)
            }
        }
    }

    /// Validate a full (year, month, day) triple for this calendar.
    pub(crate) fn validate_date(&self, year: i32, month: u8, day: u8) -> Result<()> {
        self.validate_year(year)?;
        validate_month(month)?;
        let len = self.month_length_unchecked(year, month);
        if day < 1 || day > len {
            return Err(CalendarError::OutOfRange(format!(
                "day {day} outside 1..={len} for {} {year}-{month:02}",
                self.id()
            )));
        }
        if *self == Calendar::Japanese
            && iso_epoch_day(year as i64, month, day) < japanese::MIN_EPOCH_DAY
        {
            return Err(CalendarError::UnsupportedDate(format!(
                "Japanese date {year}-{month:02}-{day:02} precedes 1873-01-01 (Meiji 6)"
            )));
        }
        Ok(())
    }

    /// Validate that `year` is inside this calendar's supported range.
    pub(crate) fn validate_year(&self, year: i32) -> Result<()> {
        let ok = match self {
            Calendar::Hijrah => hijrah::in_year_range(year),
            Calendar::Japanese => (1873..=ISO_YEAR_MAX).contains(&year),
            _ => self.to_iso_year(year).is_some(),
        };
        if ok {
            Ok(())
        } else {
            Err(CalendarError::OutOfRange(format!(
                "year {year} outside the supported range of the {} calendar",
                self.id()
            )))
        }
    }

    /// ISO year equivalent of a proleptic year of this calendar, or `None`
    /// when it falls outside the supported ISO range. Not meaningful for
    /// Hijrah, whose year numbering is not an ISO offset.
    fn to_iso_year(&self, year: i32) -> Option<i64> {
        let iso = match self {
            Calendar::Iso | Calendar::Japanese => year as i64,
            Calendar::Minguo => year as i64 + 1911,
            Calendar::ThaiBuddhist => year as i64 - 543,
            Calendar::Hijrah => return None,
        };
        ((ISO_YEAR_MIN as i64)..=(ISO_YEAR_MAX as i64))
            .contains(&iso)
            .then_some(iso)
    }

    /// Inverse of [`to_iso_year`](Self::to_iso_year).
    fn from_iso_year(&self, iso_year: i64) -> Result<i32> {
        let out_of_range = || {
            CalendarError::OutOfRange(format!(
                "ISO year {iso_year} outside the supported range of the {} calendar",
                self.id()
            ))
        };
        if !((ISO_YEAR_MIN as i64)..=(ISO_YEAR_MAX as i64)).contains(&iso_year) {
            return Err(out_of_range());
        }
        let year = match self {
            Calendar::Iso | Calendar::Japanese => iso_year,
            Calendar::Minguo => iso_year - 1911,
            Calendar::ThaiBuddhist => iso_year + 543,
            Calendar::Hijrah => return Err(out_of_range()),
        };
        i32::try_from(year).map_err(|_| out_of_range())
    }
}

impl std::fmt::Display for Calendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// ── ISO civil arithmetic ────────────────────────────────────────────────────

fn validate_month(month: u8) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CalendarError::OutOfRange(format!(
            "month {month} outside 1..=12"
        )))
    }
}

pub(crate) const fn iso_is_leap(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub(crate) const fn iso_month_length(year: i64, month: u8) -> u8 {
    match month {
        2 => {
            if iso_is_leap(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 of a proleptic-Gregorian (year, month, day).
/// Shifts the year so the leap day is the last day of the shifted year,
/// then counts whole 400-year eras.
pub(crate) const fn iso_epoch_day(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y / 400 } else { (y - 399) / 400 };
    let yoe = y - era * 400; // [0, 399]
    let mp = (month as i64 + 9) % 12; // March-based month, [0, 11]
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`iso_epoch_day`]. Returns (year, month, day).
pub(crate) fn iso_from_epoch_day(epoch_day: i64) -> (i64, u8, u8) {
    let z = epoch_day + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097); // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    (if month <= 2 { y + 1 } else { y }, month, day)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── ISO arithmetic ──────────────────────────────────────────────────

    #[test]
    fn test_iso_epoch_day_known_values() {
        assert_eq!(iso_epoch_day(1970, 1, 1), 0);
        assert_eq!(iso_epoch_day(1970, 1, 2), 1);
        assert_eq!(iso_epoch_day(1969, 12, 31), -1);
        assert_eq!(iso_epoch_day(2000, 1, 1), 10_957);
        assert_eq!(iso_epoch_day(2000, 3, 1), 11_017); // after Feb 29
        assert_eq!(iso_epoch_day(1600, 1, 1), -135_140);
    }

    #[test]
    fn test_iso_round_trip_around_leap_boundaries() {
        for &(y, m, d) in &[
            (2000, 2, 28),
            (2000, 2, 29),
            (2000, 3, 1),
            (1900, 2, 28), // not a leap year (century rule)
            (1900, 3, 1),
            (2024, 12, 31),
            (-1, 12, 31),
            (0, 1, 1), // year zero exists proleptically
        ] {
            let ed = iso_epoch_day(y, m, d);
            assert_eq!(iso_from_epoch_day(ed), (y, m, d), "({y}, {m}, {d})");
        }
    }

    #[test]
    fn test_iso_leap_rule() {
        assert!(iso_is_leap(2000));
        assert!(iso_is_leap(2024));
        assert!(!iso_is_leap(1900));
        assert!(!iso_is_leap(2023));
    }

    #[test]
    fn test_iso_month_lengths() {
        let cal = Calendar::Iso;
        assert_eq!(cal.month_length(2024, 2).unwrap(), 29);
        assert_eq!(cal.month_length(2023, 2).unwrap(), 28);
        assert_eq!(cal.month_length(2023, 1).unwrap(), 31);
        assert_eq!(cal.month_length(2023, 4).unwrap(), 30);
        assert!(cal.month_length(2023, 13).is_err());
    }

    // ── Offset calendars ────────────────────────────────────────────────

    #[test]
    fn test_minguo_year_offset() {
        // ROC 113 = ISO 2024
        assert_eq!(
            Calendar::Minguo.epoch_day_of(113, 2, 29).unwrap(),
            iso_epoch_day(2024, 2, 29)
        );
        assert_eq!(
            Calendar::Minguo.date_info_of(iso_epoch_day(2024, 2, 29)).unwrap(),
            (113, 2, 29)
        );
        assert!(Calendar::Minguo.is_leap_year(113));
    }

    #[test]
    fn test_thai_buddhist_year_offset() {
        // BE 2567 = ISO 2024
        assert_eq!(
            Calendar::ThaiBuddhist.epoch_day_of(2567, 1, 1).unwrap(),
            iso_epoch_day(2024, 1, 1)
        );
        assert_eq!(
            Calendar::ThaiBuddhist.date_info_of(iso_epoch_day(2024, 1, 1)).unwrap(),
            (2567, 1, 1)
        );
    }

    #[test]
    fn test_japanese_numbering_matches_iso() {
        assert_eq!(
            Calendar::Japanese.epoch_day_of(1989, 1, 7).unwrap(),
            iso_epoch_day(1989, 1, 7)
        );
    }

    #[test]
    fn test_japanese_pre_meiji6_rejected() {
        let err = Calendar::Japanese.epoch_day_of(1872, 12, 31).unwrap_err();
        assert!(matches!(err, CalendarError::UnsupportedDate(_)), "got {err}");
        // the very first supported day is fine
        assert!(Calendar::Japanese.epoch_day_of(1873, 1, 1).is_ok());
    }

    // ── Hijrah through the Calendar surface ─────────────────────────────

    #[test]
    fn test_hijrah_known_correspondence() {
        // 24 Ramadan 1420 AH = 2000-01-01 ISO
        let ed = Calendar::Hijrah.epoch_day_of(1420, 9, 24).unwrap();
        assert_eq!(ed, iso_epoch_day(2000, 1, 1));
        assert_eq!(Calendar::Hijrah.date_info_of(ed).unwrap(), (1420, 9, 24));
    }

    #[test]
    fn test_hijrah_pre_epoch_rejected() {
        assert!(Calendar::Hijrah.epoch_day_of(0, 1, 1).is_err());
        assert!(Calendar::Hijrah.date_info_of(hijrah::EPOCH_DAY - 1).is_err());
    }

    #[test]
    fn test_hijrah_leap_from_table() {
        // 1420 AH has 355 days
        assert!(Calendar::Hijrah.is_leap_year(1420));
        assert_eq!(Calendar::Hijrah.year_length(1420).unwrap(), 355);
        assert_eq!(Calendar::Hijrah.year_length(1419).unwrap(), 354);
    }

    // ── Era tables ──────────────────────────────────────────────────────

    #[test]
    fn test_era_tables_ordered_and_named() {
        for cal in [
            Calendar::Iso,
            Calendar::Hijrah,
            Calendar::Japanese,
            Calendar::Minguo,
            Calendar::ThaiBuddhist,
        ] {
            let eras = cal.eras();
            assert!(!eras.is_empty());
            for pair in eras.windows(2) {
                assert!(pair[0].since < pair[1].since, "{}: era table unordered", cal);
                assert!(pair[0].value < pair[1].value);
            }
        }
        assert_eq!(Calendar::Minguo.eras()[1].name, "ROC");
        assert_eq!(Calendar::Minguo.eras()[1].since, iso_epoch_day(1912, 1, 1));
    }

    #[test]
    fn test_calendar_id_round_trip() {
        for cal in [
            Calendar::Iso,
            Calendar::Hijrah,
            Calendar::Japanese,
            Calendar::Minguo,
            Calendar::ThaiBuddhist,
        ] {
            assert_eq!(Calendar::from_id(cal.id()), Some(cal));
        }
        assert_eq!(Calendar::from_id("Gregorian"), None);
    }
}
