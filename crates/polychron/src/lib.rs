//! # polychron
//!
//! Multi-calendar date and time computation.
//!
//! Polychron models dates in five calendar systems — ISO proleptic
//! Gregorian, Hijrah (tabular Islamic), Japanese imperial, Minguo (ROC) and
//! Thai Buddhist — over one shared epoch-day line, plus date-times, periods,
//! time-zone resolution with explicit daylight-saving gap and overlap
//! handling, and a tagged binary wire format.
//!
//! ## Modules
//!
//! - [`calendar`] — Calendar systems, era tables, epoch-day conversion
//! - [`date`] — [`CalendarDate`]: a validated day in one calendar
//! - [`period`] — [`CalendarPeriod`]: years/months/days amounts
//! - [`time`] — [`TimeOfDay`]: nanosecond-precision wall time
//! - [`datetime`] — [`LocalDateTime`]: date + time, no zone
//! - [`zone`] — [`UtcOffset`], [`ZoneId`] and zone-rule evaluation
//! - [`zoned`] — [`ZonedDateTime`]: a date-time resolved in a zone
//! - [`field`] — Date fields, units, and the [`CustomField`] extension trait
//! - [`codec`] — Tagged binary encoding and decoding
//! - [`error`] — Error types

pub mod calendar;
pub mod codec;
pub mod date;
pub mod datetime;
pub mod error;
pub mod field;
mod hijrah;
mod japanese;
pub mod period;
pub mod time;
pub mod zone;
pub mod zoned;

pub use calendar::{Calendar, Era, ISO_YEAR_MAX, ISO_YEAR_MIN};
pub use codec::{decode, encode, Tagged};
pub use date::CalendarDate;
pub use datetime::LocalDateTime;
pub use error::{CalendarError, Result};
pub use field::{CustomField, DateField, Unit};
pub use japanese::JapaneseEra;
pub use period::CalendarPeriod;
pub use time::TimeOfDay;
pub use zone::{LocalOffsets, Transition, TransitionZone, UtcOffset, ZoneId};
pub use zoned::ZonedDateTime;
