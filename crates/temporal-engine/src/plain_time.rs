//! Wall-clock times of day.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::format;
use crate::iso::{ordering_to_i8, IsoTime};
use crate::options::{DifferenceOptions, Overflow, ToStringOptions, Unit};
use crate::parser;

/// A time of day with nanosecond precision, no date and no calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PlainTime {
    iso: IsoTime,
}

/// Replacement fields for `with`; `None` keeps the original value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartialTime {
    pub hour: Option<i64>,
    pub minute: Option<i64>,
    pub second: Option<i64>,
    pub millisecond: Option<i64>,
    pub microsecond: Option<i64>,
    pub nanosecond: Option<i64>,
}

impl PartialTime {
    pub fn is_empty(&self) -> bool {
        self.hour.is_none()
            && self.minute.is_none()
            && self.second.is_none()
            && self.millisecond.is_none()
            && self.microsecond.is_none()
            && self.nanosecond.is_none()
    }

    /// Overlay these fields on `base`, then build under `overflow`.
    pub(crate) fn apply(&self, base: IsoTime, overflow: Overflow) -> Result<IsoTime> {
        IsoTime::new(
            [
                self.hour.unwrap_or(i64::from(base.hour)),
                self.minute.unwrap_or(i64::from(base.minute)),
                self.second.unwrap_or(i64::from(base.second)),
                self.millisecond.unwrap_or(i64::from(base.millisecond)),
                self.microsecond.unwrap_or(i64::from(base.microsecond)),
                self.nanosecond.unwrap_or(i64::from(base.nanosecond)),
            ],
            overflow,
        )
    }
}

impl PlainTime {
    /// Build a time, rejecting any out-of-range field.
    pub fn try_new(
        hour: i64,
        minute: i64,
        second: i64,
        millisecond: i64,
        microsecond: i64,
        nanosecond: i64,
    ) -> Result<PlainTime> {
        PlainTime::with_fields(
            [hour, minute, second, millisecond, microsecond, nanosecond],
            Overflow::Reject,
        )
    }

    /// Build a time from `[hour, minute, second, ms, µs, ns]` under `overflow`.
    pub fn with_fields(fields: [i64; 6], overflow: Overflow) -> Result<PlainTime> {
        Ok(PlainTime {
            iso: IsoTime::new(fields, overflow)?,
        })
    }

    pub(crate) fn from_iso(iso: IsoTime) -> PlainTime {
        PlainTime { iso }
    }

    pub(crate) fn iso(&self) -> IsoTime {
        self.iso
    }

    pub fn hour(&self) -> u8 {
        self.iso.hour
    }

    pub fn minute(&self) -> u8 {
        self.iso.minute
    }

    pub fn second(&self) -> u8 {
        self.iso.second
    }

    pub fn millisecond(&self) -> u16 {
        self.iso.millisecond
    }

    pub fn microsecond(&self) -> u16 {
        self.iso.microsecond
    }

    pub fn nanosecond(&self) -> u16 {
        self.iso.nanosecond
    }

    /// Replace fields, rejecting out-of-range values.
    pub fn with(&self, fields: PartialTime) -> Result<PlainTime> {
        self.with_overflow(fields, Overflow::Reject)
    }

    pub fn with_overflow(&self, fields: PartialTime, overflow: Overflow) -> Result<PlainTime> {
        if fields.is_empty() {
            return Err(TemporalError::type_error("no time fields to replace"));
        }
        Ok(PlainTime {
            iso: fields.apply(self.iso, overflow)?,
        })
    }

    /// Add the hours..nanoseconds of `duration`, wrapping around midnight.
    /// Date components are ignored.
    pub fn add(&self, duration: &Duration) -> Result<PlainTime> {
        let (_, iso) = self.iso.add_nanoseconds(duration.sub_day_nanoseconds());
        Ok(PlainTime { iso })
    }

    pub fn subtract(&self, duration: &Duration) -> Result<PlainTime> {
        self.add(&duration.negated())
    }

    /// Time from `self` to `other`, hours and smaller.
    pub fn until(&self, other: &PlainTime, options: DifferenceOptions) -> Result<Duration> {
        let largest = options.resolve(Unit::Hour, Unit::Nanosecond, Unit::Hour)?;
        Duration::from_nanoseconds(other.iso.nanoseconds() - self.iso.nanoseconds(), largest)
    }

    pub fn since(&self, other: &PlainTime, options: DifferenceOptions) -> Result<Duration> {
        Ok(self.until(other, options)?.negated())
    }

    pub fn compare(a: &PlainTime, b: &PlainTime) -> i8 {
        ordering_to_i8(a.cmp(b))
    }

    pub fn equals(&self, other: &PlainTime) -> bool {
        self == other
    }

    pub fn to_string_with_options(&self, options: ToStringOptions) -> Result<String> {
        options.validate()?;
        Ok(format::time(self.iso, options.precision))
    }
}

impl FromStr for PlainTime {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<PlainTime> {
        Ok(PlainTime {
            iso: parser::parse_time(s)?,
        })
    }
}

impl fmt::Display for PlainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::time(self.iso, Default::default()))
    }
}

crate::iso_string_serde!(PlainTime);
