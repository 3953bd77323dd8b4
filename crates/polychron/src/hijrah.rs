//! The Hijrah (tabular Islamic) month- and year-length table.
//!
//! The lunar calendar has no closed-form month rule usable downstream: every
//! month is 29 or 30 days, every year 354 or 355, and consumers only ever ask
//! the table. The table itself is generated once from the 30-year tabular
//! cycle (intercalary years 2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29) and then
//! shared immutably; lookups binary-search a cumulative-days-per-year index.
//!
//! Construction is idempotent and safe under concurrent first access: the
//! table sits behind a [`OnceLock`], so racing initializers observe either
//! nothing or the fully built index, never partial state.

use std::sync::OnceLock;

/// Epoch day (days since 1970-01-01) of 1 Muharram 1 AH.
pub(crate) const EPOCH_DAY: i64 = -492_148;

pub(crate) const MIN_YEAR: i32 = 1;
pub(crate) const MAX_YEAR: i32 = 9999;

pub(crate) fn in_year_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

static TABLE: OnceLock<HijrahTable> = OnceLock::new();

/// Shared handle to the singleton table.
pub(crate) fn table() -> &'static HijrahTable {
    TABLE.get_or_init(HijrahTable::build)
}

/// Cumulative-days index over the supported Hijri years.
///
/// `year_starts[y - MIN_YEAR]` is the epoch day of 1 Muharram of year `y`;
/// one sentinel entry past `MAX_YEAR` closes the final year.
pub(crate) struct HijrahTable {
    year_starts: Vec<i64>,
}

impl HijrahTable {
    fn build() -> Self {
        let mut year_starts = Vec::with_capacity((MAX_YEAR - MIN_YEAR + 2) as usize);
        let mut start = EPOCH_DAY;
        for year in MIN_YEAR..=MAX_YEAR {
            year_starts.push(start);
            start += if cycle_leap(year) { 355 } else { 354 };
        }
        year_starts.push(start); // sentinel
        Self { year_starts }
    }

    fn start_of_year(&self, year: i32) -> i64 {
        self.year_starts[(year - MIN_YEAR) as usize]
    }

    /// Length of `year` in days (354 or 355). Caller guarantees
    /// `in_year_range(year)`.
    pub(crate) fn year_length(&self, year: i32) -> u16 {
        (self.start_of_year(year + 1) - self.start_of_year(year)) as u16
    }

    /// The twelve month lengths of `year`.
    pub(crate) fn month_lengths(&self, year: i32) -> [u8; 12] {
        let last = if self.year_length(year) == 355 { 30 } else { 29 };
        [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, last]
    }

    /// Length of `month` in `year`. Caller guarantees a valid year and
    /// month (1..=12).
    pub(crate) fn month_length(&self, year: i32, month: u8) -> u8 {
        self.month_lengths(year)[(month - 1) as usize]
    }

    /// Epoch day of a valid (year, month, day).
    pub(crate) fn epoch_day(&self, year: i32, month: u8, day: u8) -> i64 {
        let mut days = self.start_of_year(year);
        let lengths = self.month_lengths(year);
        for len in &lengths[..(month - 1) as usize] {
            days += *len as i64;
        }
        days + day as i64 - 1
    }

    /// Split an epoch day into (year, month, day), or `None` outside the
    /// table range. Binary-searches the year index, then scans the twelve
    /// month lengths of the found year.
    pub(crate) fn date_info(&self, epoch_day: i64) -> Option<(i32, u8, u8)> {
        let last = *self.year_starts.last()?;
        if epoch_day < EPOCH_DAY || epoch_day >= last {
            return None;
        }
        let idx = self.year_starts.partition_point(|&s| s <= epoch_day);
        let year = MIN_YEAR + idx as i32 - 1;
        let mut rem = epoch_day - self.start_of_year(year);
        for (i, len) in self.month_lengths(year).iter().enumerate() {
            if rem < *len as i64 {
                return Some((year, i as u8 + 1, rem as u8 + 1));
            }
            rem -= *len as i64;
        }
        None
    }
}

/// The 30-year-cycle intercalation rule. Used only while generating the
/// table; all lookups afterwards go through the table itself.
fn cycle_leap(year: i32) -> bool {
    (year as i64 * 11 + 14).rem_euclid(30) < 11
}

// ── Tests ───────────────────────────────────────────────────────────────────
