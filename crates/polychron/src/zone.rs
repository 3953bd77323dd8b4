//! UTC offsets and time-zone rules.
//!
//! Zone rules answer exactly two questions: which offset is in effect at an
//! instant, and which offsets a local wall time can map to. The second
//! answer is a set of zero, one or two offsets ([`LocalOffsets`]), which is
//! what makes daylight-saving gaps and overlaps explicit instead of a hidden
//! coin toss inside a conversion.
//!
//! Three rule sources back a [`ZoneId`]: a fixed offset, a named IANA zone
//! (resolved through `chrono-tz`'s compiled tzdb), or a caller-supplied
//! [`TransitionZone`] table.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::error::{CalendarError, Result};

const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

// chrono's NaiveDateTime covers roughly ±262000 years; clamping epoch
// seconds to this bound keeps conversions total for inputs far outside any
// tzdb transition, where the offset no longer changes anyway
const CHRONO_SECOND_BOUND: i64 = 8_000_000_000_000;

// the widest gap/overlap probe: no real transition shifts local time by
// anywhere near a day, so offsets a day either side of the local value
// bracket the transition
const GAP_PROBE_SECONDS: i64 = 86_400;

// ── UtcOffset ───────────────────────────────────────────────────────────────

/// A fixed offset from UTC, in whole seconds, within ±18 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtcOffset {
    seconds: i32,
}

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset { seconds: 0 };

    pub fn from_seconds(seconds: i32) -> Result<Self> {
        if seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(CalendarError::OutOfRange(format!(
                "offset {seconds}s outside ±18:00"
            )));
        }
        Ok(UtcOffset { seconds })
    }

    /// Build from signed hour/minute/second parts; the parts must not
    /// disagree in sign.
    pub fn from_hms(hours: i8, minutes: i8, seconds: i8) -> Result<Self> {
        let signs_mixed = [hours as i32, minutes as i32, seconds as i32]
            .iter()
            .any(|&p| p > 0)
            && [hours as i32, minutes as i32, seconds as i32]
                .iter()
                .any(|&p| p < 0);
        if signs_mixed || minutes.abs() > 59 || seconds.abs() > 59 {
            return Err(CalendarError::OutOfRange(format!(
                "offset parts {hours}:{minutes}:{seconds} are inconsistent"
            )));
        }
        Self::from_seconds(hours as i32 * 3600 + minutes as i32 * 60 + seconds as i32)
    }

    /// Parse an offset id: `Z`, `±HH`, `±HH:MM` or `±HH:MM:SS`.
    pub(crate) fn from_id(id: &str) -> Result<Self> {
        let invalid = || CalendarError::InvalidTimezone(id.to_string());
        if id == "Z" || id == "z" {
            return Ok(Self::UTC);
        }
        let sign = match id.as_bytes().first() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Err(invalid()),
        };
        let mut parts = id[1..].split(':');
        let mut field = |max: u32| -> Result<i32> {
            match parts.next() {
                None => Ok(0),
                Some(p) => {
                    let v: u32 = p.parse().map_err(|_| invalid())?;
                    if p.len() != 2 || v > max {
                        Err(invalid())
                    } else {
                        Ok(v as i32)
                    }
                }
            }
        };
        let hours = field(18)?;
        let minutes = field(59)?;
        let seconds = field(59)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Self::from_seconds(sign * (hours * 3600 + minutes * 60 + seconds))
    }

    pub fn total_seconds(&self) -> i32 {
        self.seconds
    }
}

/// `Z` for zero, otherwise `±HH:MM` with a `:SS` tail only when nonzero.
impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds == 0 {
            return f.write_str("Z");
        }
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let abs = self.seconds.unsigned_abs();
        let (h, m, s) = (abs / 3600, abs / 60 % 60, abs % 60);
        if s == 0 {
            write!(f, "{sign}{h:02}:{m:02}")
        } else {
            write!(f, "{sign}{h:02}:{m:02}:{s:02}")
        }
    }
}

impl Serialize for UtcOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── LocalOffsets ────────────────────────────────────────────────────────────

/// The set of offsets a local wall time maps to in one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalOffsets {
    /// The usual case: exactly one offset.
    Single(UtcOffset),
    /// The wall time occurs twice (clocks fell back over it). Offsets are
    /// ordered ascending by value; `first` is the default pick.
    Ambiguous { first: UtcOffset, second: UtcOffset },
    /// The wall time never occurs (clocks sprang forward over it).
    Gap { before: UtcOffset, after: UtcOffset },
}

// ── TransitionZone ──────────────────────────────────────────────────────────

/// One offset change: from `at` (an epoch second, inclusive) onward the
/// zone's offset is `offset_after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub at: i64,
    pub offset_after: UtcOffset,
}

/// An explicit zone-rule table: an initial offset and a chronological list
/// of transitions. Self-contained, no tzdb involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionZone {
    id: String,
    initial: UtcOffset,
    transitions: Vec<Transition>,
}

impl TransitionZone {
    pub fn new(id: impl Into<String>, initial: UtcOffset, mut transitions: Vec<Transition>) -> Self {
        transitions.sort_by_key(|t| t.at);
        TransitionZone {
            id: id.into(),
            initial,
            transitions,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Offset in effect at an instant: the last transition at or before it,
    /// or the initial offset.
    pub fn offset_at_instant(&self, epoch_second: i64) -> UtcOffset {
        let idx = self.transitions.partition_point(|t| t.at <= epoch_second);
        if idx == 0 {
            self.initial
        } else {
            self.transitions[idx - 1].offset_after
        }
    }

    /// All offsets a local wall time (as a local epoch second) maps to.
    ///
    /// Each transition defines a window on the local line between the wall
    /// time just before it and the wall time just after it; a forward
    /// transition leaves a gap window, a backward one an overlap window.
    /// The windows are scanned in order and the first verdict wins.
    pub fn offsets_at_local(&self, local_second: i64) -> LocalOffsets {
        let mut prev = self.initial;
        for t in &self.transitions {
            let after = t.offset_after;
            let before_end = t.at + prev.total_seconds() as i64;
            let after_start = t.at + after.total_seconds() as i64;
            match after.cmp(&prev) {
                Ordering::Greater => {
                    // clocks jump forward: [before_end, after_start) is skipped
                    if local_second < before_end {
                        return LocalOffsets::Single(prev);
                    }
                    if local_second < after_start {
                        return LocalOffsets::Gap {
                            before: prev,
                            after,
                        };
                    }
                }
                Ordering::Less => {
                    // clocks fall back: [after_start, before_end) repeats
                    if local_second < after_start {
                        return LocalOffsets::Single(prev);
                    }
                    if local_second < before_end {
                        return LocalOffsets::Ambiguous {
                            first: after.min(prev),
                            second: after.max(prev),
                        };
                    }
                }
                Ordering::Equal => {
                    if local_second < before_end {
                        return LocalOffsets::Single(prev);
                    }
                }
            }
            prev = after;
        }
        LocalOffsets::Single(prev)
    }
}

// ── ZoneId ──────────────────────────────────────────────────────────────────

/// A time zone: fixed offset, IANA name, or explicit transition table.
///
/// Equality and hashing go through the zone id string, so a fixed `+02:00`
/// and an IANA zone that happens to be two hours ahead are distinct.
#[derive(Debug, Clone)]
pub enum ZoneId {
    Fixed(UtcOffset),
    Iana(Tz),
    Custom(Arc<TransitionZone>),
}

impl ZoneId {
    pub fn fixed(offset: UtcOffset) -> Self {
        ZoneId::Fixed(offset)
    }

    /// Look up an IANA zone name in the compiled tzdb.
    pub fn iana(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(ZoneId::Iana)
            .map_err(|_| CalendarError::InvalidTimezone(name.to_string()))
    }

    pub fn custom(zone: TransitionZone) -> Self {
        ZoneId::Custom(Arc::new(zone))
    }

    /// Resolve a zone id string: `Z` and `±HH:MM[:SS]` become fixed zones,
    /// anything else is tried as an IANA name.
    pub fn of(id: &str) -> Result<Self> {
        match id.as_bytes().first() {
            Some(b'Z') | Some(b'z') | Some(b'+') | Some(b'-') => {
                UtcOffset::from_id(id).map(ZoneId::Fixed)
            }
            _ => Self::iana(id),
        }
    }

    pub fn id(&self) -> String {
        match self {
            ZoneId::Fixed(offset) => offset.to_string(),
            ZoneId::Iana(tz) => tz.name().to_string(),
            ZoneId::Custom(zone) => zone.id().to_string(),
        }
    }

    /// The offset, when this zone is a fixed one.
    pub fn fixed_offset(&self) -> Option<UtcOffset> {
        match self {
            ZoneId::Fixed(offset) => Some(*offset),
            _ => None,
        }
    }

    /// Offset in effect at an instant.
    pub fn offset_at_instant(&self, epoch_second: i64) -> UtcOffset {
        match self {
            ZoneId::Fixed(offset) => *offset,
            ZoneId::Iana(tz) => {
                let offset = tz.offset_from_utc_datetime(&naive(epoch_second));
                UtcOffset {
                    seconds: offset.fix().local_minus_utc(),
                }
            }
            ZoneId::Custom(zone) => zone.offset_at_instant(epoch_second),
        }
    }

    /// All offsets a local wall time (as a local epoch second) maps to.
    pub fn offsets_at_local(&self, local_second: i64) -> LocalOffsets {
        match self {
            ZoneId::Fixed(offset) => LocalOffsets::Single(*offset),
            ZoneId::Iana(tz) => match tz.offset_from_local_datetime(&naive(local_second)) {
                LocalResult::Single(o) => LocalOffsets::Single(UtcOffset {
                    seconds: o.fix().local_minus_utc(),
                }),
                LocalResult::Ambiguous(a, b) => {
                    let a = UtcOffset {
                        seconds: a.fix().local_minus_utc(),
                    };
                    let b = UtcOffset {
                        seconds: b.fix().local_minus_utc(),
                    };
                    LocalOffsets::Ambiguous {
                        first: a.min(b),
                        second: a.max(b),
                    }
                }
                LocalResult::None => {
                    // the tzdb API does not expose the surrounding offsets of
                    // a gap; instants a day either side of the local value
                    // bracket the transition
                    LocalOffsets::Gap {
                        before: self.offset_at_instant(local_second - GAP_PROBE_SECONDS),
                        after: self.offset_at_instant(local_second + GAP_PROBE_SECONDS),
                    }
                }
            },
            ZoneId::Custom(zone) => zone.offsets_at_local(local_second),
        }
    }
}

fn naive(epoch_second: i64) -> NaiveDateTime {
    let clamped = epoch_second.clamp(-CHRONO_SECOND_BOUND, CHRONO_SECOND_BOUND);
    DateTime::from_timestamp(clamped, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

impl PartialEq for ZoneId {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ZoneId {}

impl Hash for ZoneId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl Serialize for ZoneId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
