//! Calendar dates with a wall-clock time, no time zone.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::calendar::Calendar;
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::format;
use crate::iso::{ordering_to_i8, IsoDate, IsoDateTime, IsoTime, NS_PER_DAY};
use crate::options::{DifferenceOptions, Overflow, ToStringOptions, Unit};
use crate::parser;
use crate::plain_date::{require_same_calendar, PartialDate, PlainDate};
use crate::plain_time::{PartialTime, PlainTime};

/// A date and time of day in a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainDateTime {
    iso: IsoDateTime,
    calendar: Calendar,
}

/// Replacement fields for [`PlainDateTime::with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialDateTime {
    #[serde(flatten)]
    pub date: PartialDate,
    #[serde(flatten)]
    pub time: PartialTime,
}

impl PartialDateTime {
    pub fn is_empty(&self) -> bool {
        self.date.is_empty() && self.time.is_empty()
    }
}

impl PlainDateTime {
    /// Build from `[year, month, day]` and `[hour, minute, second, ms, µs, ns]`,
    /// rejecting out-of-range fields.
    pub fn try_new(date: [i64; 3], time: [i64; 6], calendar: Calendar) -> Result<PlainDateTime> {
        PlainDateTime::new_with_overflow(date, time, calendar, Overflow::Reject)
    }

    pub fn new_with_overflow(
        date: [i64; 3],
        time: [i64; 6],
        calendar: Calendar,
        overflow: Overflow,
    ) -> Result<PlainDateTime> {
        let [year, month, day] = date;
        let iso = IsoDateTime {
            date: IsoDate::new(year, month, day, overflow)?,
            time: IsoTime::new(time, overflow)?,
        };
        PlainDateTime::from_iso(iso, calendar)
    }

    pub(crate) fn from_iso(iso: IsoDateTime, calendar: Calendar) -> Result<PlainDateTime> {
        iso.check_limits()?;
        Ok(PlainDateTime { iso, calendar })
    }

    pub fn year(&self) -> i32 {
        self.iso.date.year
    }

    pub fn month(&self) -> u8 {
        self.iso.date.month
    }

    pub fn day(&self) -> u8 {
        self.iso.date.day
    }

    pub fn hour(&self) -> u8 {
        self.iso.time.hour
    }

    pub fn minute(&self) -> u8 {
        self.iso.time.minute
    }

    pub fn second(&self) -> u8 {
        self.iso.time.second
    }

    pub fn millisecond(&self) -> u16 {
        self.iso.time.millisecond
    }

    pub fn microsecond(&self) -> u16 {
        self.iso.time.microsecond
    }

    pub fn nanosecond(&self) -> u16 {
        self.iso.time.nanosecond
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn month_code(&self) -> String {
        self.calendar.month_code(self.iso.date.month)
    }

    /// The date part, which carries every derived calendar field.
    pub fn to_plain_date(&self) -> PlainDate {
        PlainDate::from_iso(self.iso.date, self.calendar)
    }

    pub fn to_plain_time(&self) -> PlainTime {
        PlainTime::from_iso(self.iso.time)
    }

    /// Replace fields, failing if any is out of range.
    pub fn with(&self, fields: &PartialDateTime) -> Result<PlainDateTime> {
        self.with_overflow(fields, Overflow::Reject)
    }

    pub fn with_overflow(&self, fields: &PartialDateTime, overflow: Overflow) -> Result<PlainDateTime> {
        if fields.is_empty() {
            return Err(TemporalError::type_error("no date-time fields to replace"));
        }
        let iso = IsoDateTime {
            date: fields.date.apply(self.iso.date, self.calendar, overflow)?,
            time: fields.time.apply(self.iso.time, overflow)?,
        };
        PlainDateTime::from_iso(iso, self.calendar)
    }

    /// Replace the time, midnight if `None`.
    pub fn with_plain_time(&self, time: Option<PlainTime>) -> Result<PlainDateTime> {
        let iso = IsoDateTime {
            date: self.iso.date,
            time: time.unwrap_or_default().iso(),
        };
        PlainDateTime::from_iso(iso, self.calendar)
    }

    pub fn with_calendar(&self, calendar: Calendar) -> PlainDateTime {
        PlainDateTime { calendar, ..*self }
    }

    pub fn add(&self, duration: &Duration) -> Result<PlainDateTime> {
        self.add_with_overflow(duration, Overflow::Constrain)
    }

    /// Add the time part first, carrying whole days into the date part.
    pub fn add_with_overflow(&self, duration: &Duration, overflow: Overflow) -> Result<PlainDateTime> {
        let (carry, time) = self.iso.time.add_nanoseconds(duration.sub_day_nanoseconds());
        let days = i64::try_from(carry)
            .ok()
            .and_then(|c| c.checked_add(duration.days()))
            .ok_or_else(|| TemporalError::range("date-time arithmetic overflowed"))?;
        let date = self.iso.date.add(
            duration.years(),
            duration.months(),
            duration.weeks(),
            days,
            overflow,
        )?;
        PlainDateTime::from_iso(IsoDateTime { date, time }, self.calendar)
    }

    pub fn subtract(&self, duration: &Duration) -> Result<PlainDateTime> {
        self.add(&duration.negated())
    }

    pub fn subtract_with_overflow(&self, duration: &Duration, overflow: Overflow) -> Result<PlainDateTime> {
        self.add_with_overflow(&duration.negated(), overflow)
    }

    /// Difference from `self` to `other`, years down to nanoseconds by default.
    pub fn until(&self, other: &PlainDateTime, options: DifferenceOptions) -> Result<Duration> {
        require_same_calendar(self.calendar, other.calendar)?;
        let largest = options.resolve(Unit::Year, Unit::Nanosecond, Unit::Year)?;
        if !largest.is_date_unit() {
            return Duration::from_nanoseconds(
                other.iso.epoch_nanoseconds() - self.iso.epoch_nanoseconds(),
                largest,
            );
        }

        let mut time_ns = other.iso.time.nanoseconds() - self.iso.time.nanoseconds();
        let time_sign = time_ns.signum() as i64;
        let date_sign = i64::from(ordering_to_i8(other.iso.date.cmp(&self.iso.date)));
        let mut end_date = other.iso.date;
        if time_sign != 0 && time_sign == -date_sign {
            // Borrow one day from the date part so both parts share a sign.
            end_date = IsoDate::from_epoch_days(end_date.epoch_days() + time_sign)?;
            time_ns -= i128::from(time_sign) * NS_PER_DAY;
        }
        let date_part = self.iso.date.until(end_date, largest);
        let time_part = Duration::from_nanoseconds(time_ns, Unit::Hour)?;
        Duration::from_date_and_time(date_part, time_part)
    }

    pub fn since(&self, other: &PlainDateTime, options: DifferenceOptions) -> Result<Duration> {
        Ok(self.until(other, options)?.negated())
    }

    /// Order by ISO date and time, ignoring the calendar.
    pub fn compare(a: &PlainDateTime, b: &PlainDateTime) -> i8 {
        ordering_to_i8(a.iso.cmp(&b.iso))
    }

    pub fn equals(&self, other: &PlainDateTime) -> bool {
        self == other
    }

    pub fn to_string_with_options(&self, options: ToStringOptions) -> Result<String> {
        options.validate()?;
        Ok(format!(
            "{}{}",
            format::date_time(self.iso, options.precision),
            format::calendar_annotation(self.calendar, options.calendar)
        ))
    }
}

impl FromStr for PlainDateTime {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<PlainDateTime> {
        let (iso, calendar) = parser::parse_date_time(s)?;
        Ok(PlainDateTime { iso, calendar })
    }
}

impl fmt::Display for PlainDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            format::date_time(self.iso, Default::default()),
            format::calendar_annotation(self.calendar, Default::default())
        )
    }
}

crate::iso_string_serde!(PlainDateTime);
