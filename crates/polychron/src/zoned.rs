//! A date-time pinned to a time zone.

use serde::Serialize;

use crate::calendar::Calendar;
use crate::datetime::LocalDateTime;
use crate::error::{CalendarError, Result};
use crate::field::{DateField, Unit};
use crate::time::NANOS_PER_SECOND;
use crate::zone::{LocalOffsets, UtcOffset, ZoneId};

/// A [`LocalDateTime`] resolved against a zone, carrying the offset that
/// resolution produced. Unlike the local type it identifies one instant.
///
/// Construction from a wall time applies the zone's rules:
///
/// * a unique wall time keeps its single offset;
/// * a repeated wall time (daylight-saving overlap) takes the smaller of the
///   two offsets unless the caller's preferred offset is the other one;
/// * a skipped wall time (gap) is pushed forward by the width of the gap and
///   takes the post-transition offset.
///
/// Date-based arithmetic moves the wall clock and re-resolves; time-based
/// arithmetic moves the instant. Across a transition the two give different
/// answers, which is the point of keeping them separate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ZonedDateTime {
    datetime: LocalDateTime,
    offset: UtcOffset,
    zone: ZoneId,
}

impl ZonedDateTime {
    /// Resolve a wall time in `zone`. `preferred` breaks overlap ties when
    /// it is one of the two valid offsets; it never overrides a unique
    /// offset and never validates against one.
    pub fn of_local(
        datetime: LocalDateTime,
        zone: ZoneId,
        preferred: Option<UtcOffset>,
    ) -> Result<Self> {
        let local_second = datetime.to_epoch_second(UtcOffset::UTC);
        let (datetime, offset) = match zone.offsets_at_local(local_second) {
            LocalOffsets::Single(offset) => (datetime, offset),
            LocalOffsets::Ambiguous { first, second } => {
                if preferred == Some(second) {
                    (datetime, second)
                } else {
                    (datetime, first)
                }
            }
            LocalOffsets::Gap { before, after } => {
                let width = (after.total_seconds() - before.total_seconds()) as i64;
                (datetime.plus(width, Unit::Seconds)?, after)
            }
        };
        Ok(ZonedDateTime {
            datetime,
            offset,
            zone,
        })
    }

    /// The wall time that an instant shows in `zone`, in `calendar`.
    pub fn of_instant(
        calendar: Calendar,
        epoch_second: i64,
        nanosecond: u32,
        zone: ZoneId,
    ) -> Result<Self> {
        let offset = zone.offset_at_instant(epoch_second);
        Ok(ZonedDateTime {
            datetime: LocalDateTime::of_epoch_second(calendar, epoch_second, nanosecond, offset)?,
            offset,
            zone,
        })
    }

    /// Assemble from already-resolved parts; the decoder's path, where the
    /// offset was resolved at encode time.
    pub(crate) fn from_parts(datetime: LocalDateTime, offset: UtcOffset, zone: ZoneId) -> Self {
        ZonedDateTime {
            datetime,
            offset,
            zone,
        }
    }

    pub fn datetime(&self) -> LocalDateTime {
        self.datetime
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    pub fn calendar(&self) -> Calendar {
        self.datetime.calendar()
    }

    /// Seconds since 1970-01-01T00:00:00Z.
    pub fn to_epoch_second(&self) -> i64 {
        self.datetime.to_epoch_second(self.offset)
    }

    pub fn nanosecond(&self) -> u32 {
        self.datetime.time().nanosecond()
    }

    /// True if this instant is strictly before `other`'s, regardless of
    /// zone or calendar.
    pub fn is_before(&self, other: &Self) -> bool {
        self.instant_nanos() < other.instant_nanos()
    }

    pub fn is_after(&self, other: &Self) -> bool {
        self.instant_nanos() > other.instant_nanos()
    }

    fn instant_nanos(&self) -> i128 {
        self.to_epoch_second() as i128 * NANOS_PER_SECOND as i128 + self.nanosecond() as i128
    }

    /// Return a copy with a date field adjusted on the wall clock, then
    /// re-resolved in the zone. A result landing in an overlap keeps the
    /// current offset when it is still valid; one landing in a gap shifts
    /// forward like any other gap resolution.
    pub fn with_field(&self, field: DateField, value: i64) -> Result<Self> {
        let adjusted = self.datetime.with_field(field, value)?;
        Self::of_local(adjusted, self.zone.clone(), Some(self.offset))
    }

    // ── offset and zone adjustment ─────────────────────────────────────

    /// During an overlap, the copy using the earlier of the two offsets;
    /// outside an overlap, self unchanged.
    pub fn with_earlier_offset_at_overlap(&self) -> Self {
        self.with_overlap_offset(true)
    }

    /// During an overlap, the copy using the later of the two offsets;
    /// outside an overlap, self unchanged.
    pub fn with_later_offset_at_overlap(&self) -> Self {
        self.with_overlap_offset(false)
    }

    fn with_overlap_offset(&self, earlier: bool) -> Self {
        let local_second = self.datetime.to_epoch_second(UtcOffset::UTC);
        if let LocalOffsets::Ambiguous { first, second } = self.zone.offsets_at_local(local_second)
        {
            // ascending offset order: the larger offset is the earlier instant
            let offset = if earlier { second } else { first };
            return ZonedDateTime {
                datetime: self.datetime,
                offset,
                zone: self.zone.clone(),
            };
        }
        self.clone()
    }

    /// Jump to another instant, keeping zone, calendar and sub-second part.
    pub fn with_instant_seconds(&self, epoch_second: i64) -> Result<Self> {
        Self::of_instant(self.calendar(), epoch_second, self.nanosecond(), self.zone.clone())
    }

    /// Replace the offset with one the caller asserts is correct, keeping
    /// the wall time. No rule validation; this changes the instant.
    pub fn with_offset_unchecked(&self, offset: UtcOffset) -> Self {
        ZonedDateTime {
            datetime: self.datetime,
            offset,
            zone: self.zone.clone(),
        }
    }

    /// Same instant, shown in another zone.
    pub fn with_zone_same_instant(&self, zone: ZoneId) -> Result<Self> {
        Self::of_instant(self.calendar(), self.to_epoch_second(), self.nanosecond(), zone)
    }

    /// Same wall time, re-resolved in another zone.
    pub fn with_zone_same_local(&self, zone: ZoneId) -> Result<Self> {
        Self::of_local(self.datetime, zone, Some(self.offset))
    }

    // ── arithmetic ─────────────────────────────────────────────────────

    /// Shift by `amount` of `unit`.
    ///
    /// Date-based units shift the wall clock and re-resolve in the zone, so
    /// "+1 day" lands on the same wall time even across a daylight-saving
    /// change. Time-based units shift the instant, so "+24 hours" across a
    /// spring-forward transition lands one wall hour later.
    pub fn plus(&self, amount: i64, unit: Unit) -> Result<Self> {
        if unit.is_date_based() {
            let shifted = self.datetime.plus(amount, unit)?;
            Self::of_local(shifted, self.zone.clone(), Some(self.offset))
        } else {
            let span = unit
                .nanos()
                .ok_or(CalendarError::UnsupportedUnit(unit.name()))?;
            let total = self.instant_nanos() + amount as i128 * span;
            let second = i64::try_from(total.div_euclid(NANOS_PER_SECOND as i128))
                .map_err(|_| CalendarError::Overflow("instant addition"))?;
            let nano = total.rem_euclid(NANOS_PER_SECOND as i128) as u32;
            Self::of_instant(self.calendar(), second, nano, self.zone.clone())
        }
    }

    pub fn minus(&self, amount: i64, unit: Unit) -> Result<Self> {
        let negated = amount
            .checked_neg()
            .ok_or(CalendarError::Overflow("amount negation"))?;
        self.plus(negated, unit)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
