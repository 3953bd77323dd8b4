//! Tagged binary serialization.
//!
//! Every value is one tag byte followed by a fixed-layout body; integers are
//! big-endian and strings are a u16 length prefix plus UTF-8 bytes. Dates of
//! each calendar get their own tag, so a decoder can dispatch without ever
//! guessing; nested records (the date inside a date-time, the date-time
//! inside a zoned one) are written body-only, the outer tag covers them.
//!
//! Decoding is strict: an unknown tag, a truncated body and trailing bytes
//! after a complete value are all distinct errors, never a best-effort
//! value.

use crate::calendar::Calendar;
use crate::date::CalendarDate;
use crate::datetime::LocalDateTime;
use crate::error::{CalendarError, Result};
use crate::japanese::{self, JapaneseEra};
use crate::period::CalendarPeriod;
use crate::time::TimeOfDay;
use crate::zone::{UtcOffset, ZoneId};
use crate::zoned::ZonedDateTime;

const TAG_CALENDAR: u8 = 1;
const TAG_DATE_TIME: u8 = 2;
const TAG_ZONED_DATE_TIME: u8 = 3;
const TAG_JAPANESE_DATE: u8 = 4;
const TAG_JAPANESE_ERA: u8 = 5;
const TAG_HIJRAH_DATE: u8 = 6;
const TAG_THAI_BUDDHIST_DATE: u8 = 7;
const TAG_MINGUO_DATE: u8 = 8;
const TAG_PERIOD: u8 = 9;
const TAG_ISO_DATE: u8 = 10;

/// A value of one of the wire-serializable types.
#[derive(Debug, Clone, PartialEq)]
pub enum Tagged {
    Calendar(Calendar),
    Date(CalendarDate),
    DateTime(LocalDateTime),
    Zoned(ZonedDateTime),
    JapaneseEra(JapaneseEra),
    Period(CalendarPeriod),
}

// ── encoding ────────────────────────────────────────────────────────────────

/// Serialize a value to its tagged wire form.
pub fn encode(value: &Tagged) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(32);
    match value {
        Tagged::Calendar(calendar) => {
            out.push(TAG_CALENDAR);
            put_string(&mut out, calendar.id())?;
        }
        Tagged::Date(date) => {
            out.push(date_tag(date.calendar()));
            put_date_body(&mut out, date)?;
        }
        Tagged::DateTime(dt) => {
            out.push(TAG_DATE_TIME);
            put_datetime_body(&mut out, dt)?;
        }
        Tagged::Zoned(zdt) => {
            out.push(TAG_ZONED_DATE_TIME);
            put_datetime_body(&mut out, &zdt.datetime())?;
            out.extend_from_slice(&zdt.offset().total_seconds().to_be_bytes());
            put_string(&mut out, &zdt.zone().id())?;
        }
        Tagged::JapaneseEra(era) => {
            out.push(TAG_JAPANESE_ERA);
            out.push(era.value as u8);
        }
        Tagged::Period(period) => {
            out.push(TAG_PERIOD);
            put_string(&mut out, period.calendar().id())?;
            out.extend_from_slice(&period.years().to_be_bytes());
            out.extend_from_slice(&period.months().to_be_bytes());
            out.extend_from_slice(&period.days().to_be_bytes());
        }
    }
    Ok(out)
}

/// Deserialize one complete tagged value. The input must hold exactly one
/// value; trailing bytes are an error.
pub fn decode(bytes: &[u8]) -> Result<Tagged> {
    let mut cursor = Cursor::new(bytes);
    let tag = cursor.read_u8()?;
    let value = match tag {
        TAG_CALENDAR => Tagged::Calendar(read_calendar(&mut cursor)?),
        TAG_ISO_DATE => Tagged::Date(read_plain_date(&mut cursor, Calendar::Iso)?),
        TAG_JAPANESE_DATE => Tagged::Date(read_plain_date(&mut cursor, Calendar::Japanese)?),
        TAG_MINGUO_DATE => Tagged::Date(read_plain_date(&mut cursor, Calendar::Minguo)?),
        TAG_THAI_BUDDHIST_DATE => {
            Tagged::Date(read_plain_date(&mut cursor, Calendar::ThaiBuddhist)?)
        }
        TAG_HIJRAH_DATE => {
            // the Hijrah body repeats the calendar id, naming the variant
            let calendar = read_calendar(&mut cursor)?;
            if calendar != Calendar::Hijrah {
                return Err(CalendarError::Malformed(format!(
                    "Hijrah date tagged with calendar {}",
                    calendar.id()
                )));
            }
            Tagged::Date(read_plain_date(&mut cursor, calendar)?)
        }
        TAG_DATE_TIME => Tagged::DateTime(read_datetime_body(&mut cursor)?),
        TAG_ZONED_DATE_TIME => {
            let datetime = read_datetime_body(&mut cursor)?;
            let offset = UtcOffset::from_seconds(cursor.read_i32()?)?;
            let zone = ZoneId::of(&cursor.read_string()?)?;
            Tagged::Zoned(ZonedDateTime::from_parts(datetime, offset, zone))
        }
        TAG_JAPANESE_ERA => {
            let value = cursor.read_i8()?;
            let era = japanese::era_of_value(value).ok_or_else(|| {
                CalendarError::Malformed(format!("unknown Japanese era value {value}"))
            })?;
            Tagged::JapaneseEra(*era)
        }
        TAG_PERIOD => {
            let calendar = read_calendar(&mut cursor)?;
            let years = cursor.read_i32()?;
            let months = cursor.read_i32()?;
            let days = cursor.read_i32()?;
            Tagged::Period(CalendarPeriod::new(calendar, years, months, days))
        }
        other => return Err(CalendarError::UnknownTag(other)),
    };
    cursor.finish()?;
    Ok(value)
}

fn date_tag(calendar: Calendar) -> u8 {
    match calendar {
        Calendar::Iso => TAG_ISO_DATE,
        Calendar::Hijrah => TAG_HIJRAH_DATE,
        Calendar::Japanese => TAG_JAPANESE_DATE,
        Calendar::Minguo => TAG_MINGUO_DATE,
        Calendar::ThaiBuddhist => TAG_THAI_BUDDHIST_DATE,
    }
}

fn put_string(out: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = u16::try_from(s.len())
        .map_err(|_| CalendarError::Malformed(format!("string of {} bytes", s.len())))?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

fn put_date_body(out: &mut Vec<u8>, date: &CalendarDate) -> Result<()> {
    if date.calendar() == Calendar::Hijrah {
        put_string(out, date.calendar().id())?;
    }
    out.extend_from_slice(&date.year().to_be_bytes());
    out.push(date.month());
    out.push(date.day());
    Ok(())
}

fn put_datetime_body(out: &mut Vec<u8>, dt: &LocalDateTime) -> Result<()> {
    // date-times always carry their calendar id; the single tag cannot
    put_string(out, dt.calendar().id())?;
    let date = dt.date();
    out.extend_from_slice(&date.year().to_be_bytes());
    out.push(date.month());
    out.push(date.day());
    let time = dt.time();
    out.push(time.hour());
    out.push(time.minute());
    out.push(time.second());
    out.extend_from_slice(&time.nanosecond().to_be_bytes());
    Ok(())
}

fn read_calendar(cursor: &mut Cursor<'_>) -> Result<Calendar> {
    let id = cursor.read_string()?;
    Calendar::from_id(&id)
        .ok_or_else(|| CalendarError::Malformed(format!("unknown calendar id {id:?}")))
}

fn read_plain_date(cursor: &mut Cursor<'_>, calendar: Calendar) -> Result<CalendarDate> {
    let year = cursor.read_i32()?;
    let month = cursor.read_u8()?;
    let day = cursor.read_u8()?;
    CalendarDate::new(calendar, year, month, day)
}

fn read_datetime_body(cursor: &mut Cursor<'_>) -> Result<LocalDateTime> {
    let calendar = read_calendar(cursor)?;
    let date = read_plain_date(cursor, calendar)?;
    let hour = cursor.read_u8()?;
    let minute = cursor.read_u8()?;
    let second = cursor.read_u8()?;
    let nano = cursor.read_u32()?;
    Ok(LocalDateTime::new(date, TimeOfDay::new(hour, minute, second, nano)?))
}

// ── Cursor ──────────────────────────────────────────────────────────────────

/// A bounds-checked reader over the input slice.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(CalendarError::Malformed(format!(
                "need {n} bytes at offset {}, have {}",
                self.pos,
                self.bytes.len() - self.pos
            ))),
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| CalendarError::Malformed("string is not UTF-8".to_string()))
    }

    /// Assert the input is fully consumed.
    fn finish(&self) -> Result<()> {
        let left = self.bytes.len() - self.pos;
        if left == 0 {
            Ok(())
        } else {
            Err(CalendarError::Malformed(format!(
                "{left} trailing bytes after a complete value"
            )))
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{Transition, TransitionZone};
    use proptest::prelude::*;

    fn round_trip(value: Tagged) {
        let bytes = encode(&value).unwrap();
        assert_eq!(decode(&bytes).unwrap(), value, "{value:?}");
    }

    #[test]
    fn test_calendar_round_trip() {
        for cal in [
            Calendar::Iso,
            Calendar::Hijrah,
            Calendar::Japanese,
            Calendar::Minguo,
            Calendar::ThaiBuddhist,
        ] {
            round_trip(Tagged::Calendar(cal));
        }
    }

    #[test]
    fn test_date_tag_per_calendar() {
        for (cal, y, expected_tag) in [
            (Calendar::Iso, 2024, TAG_ISO_DATE),
            (Calendar::Hijrah, 1420, TAG_HIJRAH_DATE),
            (Calendar::Japanese, 2024, TAG_JAPANESE_DATE),
            (Calendar::Minguo, 113, TAG_MINGUO_DATE),
            (Calendar::ThaiBuddhist, 2567, TAG_THAI_BUDDHIST_DATE),
        ] {
            let date = CalendarDate::new(cal, y, 1, 15).unwrap();
            let bytes = encode(&Tagged::Date(date)).unwrap();
            assert_eq!(bytes[0], expected_tag);
            round_trip(Tagged::Date(date));
        }
    }

    #[test]
    fn test_hijrah_body_names_the_variant() {
        let date = CalendarDate::new(Calendar::Hijrah, 1420, 9, 24).unwrap();
        let bytes = encode(&Tagged::Date(date)).unwrap();
        // tag, u16 length, then the id string
        assert_eq!(&bytes[1..3], &[0, 15]);
        assert_eq!(&bytes[3..18], b"Hijrah-umalqura");
    }

    #[test]
    fn test_datetime_round_trip() {
        let dt = LocalDateTime::of(Calendar::Japanese, 2019, 5, 1, 9, 30, 15, 123_456_789).unwrap();
        round_trip(Tagged::DateTime(dt));
    }

    #[test]
    fn test_zoned_round_trip_fixed_and_iana() {
        let dt = LocalDateTime::of(Calendar::Iso, 2024, 10, 27, 2, 30, 0, 0).unwrap();
        for zone in [
            ZoneId::of("+05:30").unwrap(),
            ZoneId::of("Z").unwrap(),
            ZoneId::of("Europe/Paris").unwrap(),
        ] {
            let zdt = ZonedDateTime::of_local(dt, zone, None).unwrap();
            round_trip(Tagged::Zoned(zdt));
        }
    }

    #[test]
    fn test_zoned_decode_keeps_encoded_overlap_offset() {
        // the later-offset reading of an ambiguous wall time survives the
        // wire, because the offset travels alongside the zone id
        let dt = LocalDateTime::of(Calendar::Iso, 2024, 10, 27, 2, 30, 0, 0).unwrap();
        let zone = ZoneId::of("Europe/Paris").unwrap();
        let early = ZonedDateTime::of_local(dt, zone, None)
            .unwrap()
            .with_earlier_offset_at_overlap();
        let bytes = encode(&Tagged::Zoned(early.clone())).unwrap();
        assert_eq!(decode(&bytes).unwrap(), Tagged::Zoned(early));
    }

    #[test]
    fn test_custom_zone_does_not_survive_decode() {
        // a transition-table zone id is not resolvable on the other side
        let zone = ZoneId::custom(TransitionZone::new(
            "Test/Nowhere",
            UtcOffset::UTC,
            vec![Transition {
                at: 0,
                offset_after: UtcOffset::from_seconds(3600).unwrap(),
            }],
        ));
        let dt = LocalDateTime::of(Calendar::Iso, 2024, 1, 1, 0, 0, 0, 0).unwrap();
        let zdt = ZonedDateTime::of_local(dt, zone, None).unwrap();
        let bytes = encode(&Tagged::Zoned(zdt)).unwrap();
        assert!(matches!(
            decode(&bytes),
            Err(CalendarError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_japanese_era_round_trip() {
        for value in [-1i8, 0, 1, 2, 3] {
            let era = *japanese::era_of_value(value).unwrap();
            let bytes = encode(&Tagged::JapaneseEra(era)).unwrap();
            assert_eq!(bytes, vec![TAG_JAPANESE_ERA, value as u8]);
            round_trip(Tagged::JapaneseEra(era));
        }
        assert!(matches!(
            decode(&[TAG_JAPANESE_ERA, 9]),
            Err(CalendarError::Malformed(_))
        ));
    }

    #[test]
    fn test_period_round_trip() {
        round_trip(Tagged::Period(CalendarPeriod::new(
            Calendar::Hijrah,
            -1,
            13,
            29,
        )));
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(decode(&[42]), Err(CalendarError::UnknownTag(42))));
        assert!(matches!(decode(&[0]), Err(CalendarError::UnknownTag(0))));
    }

    #[test]
    fn test_truncated_inputs() {
        let full = encode(&Tagged::Date(
            CalendarDate::new(Calendar::Iso, 2024, 2, 29).unwrap(),
        ))
        .unwrap();
        for cut in 0..full.len() {
            let err = decode(&full[..cut]).unwrap_err();
            assert!(
                matches!(err, CalendarError::Malformed(_)),
                "cut at {cut}: {err}"
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encode(&Tagged::Calendar(Calendar::Iso)).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode(&bytes),
            Err(CalendarError::Malformed(_))
        ));
    }

    #[test]
    fn test_decoded_dates_are_validated() {
        // ISO date body with month 13
        let mut bytes = vec![TAG_ISO_DATE];
        bytes.extend_from_slice(&2024i32.to_be_bytes());
        bytes.push(13);
        bytes.push(1);
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn test_hijrah_tag_with_wrong_calendar_id() {
        let mut bytes = vec![TAG_HIJRAH_DATE];
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes.extend_from_slice(b"ISO");
        bytes.extend_from_slice(&1420i32.to_be_bytes());
        bytes.push(1);
        bytes.push(1);
        assert!(matches!(
            decode(&bytes),
            Err(CalendarError::Malformed(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_date_round_trip(year in 1i32..9999, month in 1u8..=12, day_seed in 0u8..31) {
            for cal in [Calendar::Iso, Calendar::Hijrah, Calendar::ThaiBuddhist] {
                let len = cal.month_length(year, month).unwrap();
                let date = CalendarDate::new(cal, year, month, 1 + day_seed % len).unwrap();
                let bytes = encode(&Tagged::Date(date)).unwrap();
                prop_assert_eq!(decode(&bytes).unwrap(), Tagged::Date(date));
            }
        }

        #[test]
        fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode(&bytes);
        }
    }
}
