//! The Japanese imperial era table.
//!
//! Year, month and day numbering are identical to ISO; what the era table
//! adds is the mapping from a date to its era and year-of-era. A date's era
//! is the latest table entry whose since-day is not after the date, and
//! year-of-era restarts at 1 on each era's first calendar year (the day
//! after Showa 64 is Heisei 1, not Showa 65).
//!
//! Dates before 1873-01-01 (Meiji 6, the Gregorian switchover) are outside
//! the supported range.

use crate::calendar::{iso_epoch_day, Era, ISO_YEAR_MAX};

/// One imperial era: wire value, abbreviation, full name, first epoch day,
/// and the ISO year in which the era begins (year-of-era 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JapaneseEra {
    pub value: i8,
    pub abbreviation: &'static str,
    pub name: &'static str,
    pub since: i64,
    pub first_year: i32,
}

pub(crate) const ERAS: [JapaneseEra; 5] = [
    JapaneseEra {
        value: -1,
        abbreviation: "M",
        name: "Meiji",
        since: iso_epoch_day(1868, 1, 1),
        first_year: 1868,
    },
    JapaneseEra {
        value: 0,
        abbreviation: "T",
        name: "Taisho",
        since: iso_epoch_day(1912, 7, 30),
        first_year: 1912,
    },
    JapaneseEra {
        value: 1,
        abbreviation: "S",
        name: "Showa",
        since: iso_epoch_day(1926, 12, 25),
        first_year: 1926,
    },
    JapaneseEra {
        value: 2,
        abbreviation: "H",
        name: "Heisei",
        since: iso_epoch_day(1989, 1, 8),
        first_year: 1989,
    },
    JapaneseEra {
        value: 3,
        abbreviation: "R",
        name: "Reiwa",
        since: iso_epoch_day(2019, 5, 1),
        first_year: 2019,
    },
];

/// The same table in the shared [`Era`] shape used by
/// [`Calendar::eras`](crate::Calendar::eras).
pub(crate) const ERA_SUMMARY: [Era; 5] = [
    summary(&ERAS[0]),
    summary(&ERAS[1]),
    summary(&ERAS[2]),
    summary(&ERAS[3]),
    summary(&ERAS[4]),
];

const fn summary(era: &JapaneseEra) -> Era {
    Era {
        value: era.value,
        name: era.name,
        since: era.since,
    }
}

/// First supported epoch day: 1873-01-01 (Meiji 6).
pub(crate) const MIN_EPOCH_DAY: i64 = iso_epoch_day(1873, 1, 1);

/// The era in effect on `epoch_day`: the latest entry whose since-day is not
/// after it. Days before Meiji fall back to the first entry; callers reject
/// them before ever asking.
pub(crate) fn era_at(epoch_day: i64) -> &'static JapaneseEra {
    ERAS.iter()
        .rev()
        .find(|e| e.since <= epoch_day)
        .unwrap_or(&ERAS[0])
}

pub(crate) fn era_of_value(value: i8) -> Option<&'static JapaneseEra> {
    ERAS.iter().find(|e| e.value == value)
}

/// Largest valid year-of-era for `era`: bounded by the next era's first
/// calendar year, open-ended for the current era.
pub(crate) fn max_year_of_era(era: &JapaneseEra) -> i32 {
    let next = ERAS.iter().find(|e| e.value == era.value + 1);
    match next {
        Some(next) => next.first_year - era.first_year + 1,
        None => ISO_YEAR_MAX - era.first_year + 1,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
