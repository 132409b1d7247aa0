//! Signed multi-unit durations.
//!
//! A [`Duration`] holds ten integer components, years through nanoseconds.
//! Every nonzero component shares one sign, calendar components stay below
//! 2^32 in magnitude, and the day/time portion stays below 2^53 seconds.
//! Constructors and arithmetic enforce all three.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, TemporalError};
use crate::format;
use crate::iso::{ordering_to_i8, NS_PER_SECOND};
use crate::options::Unit;
use crate::parser;

const CALENDAR_UNIT_LIMIT: i64 = 1 << 32;
const MAX_TIME_SECONDS: i128 = 1 << 53;

/// Nanoseconds per unit for days through nanoseconds, largest first.
const TIME_UNIT_NS: [i128; 7] = [
    86_400_000_000_000,
    3_600_000_000_000,
    60_000_000_000,
    1_000_000_000,
    1_000_000,
    1_000,
    1,
];

/// A duration of calendar and clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Duration {
    fields: [i64; 10],
}

/// Replacement components for [`Duration::with`]; `None` keeps the original.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartialDuration {
    pub years: Option<i64>,
    pub months: Option<i64>,
    pub weeks: Option<i64>,
    pub days: Option<i64>,
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
    pub milliseconds: Option<i64>,
    pub microseconds: Option<i64>,
    pub nanoseconds: Option<i64>,
}

impl PartialDuration {
    /// Components in order from years to nanoseconds.
    pub fn from_array(fields: [Option<i64>; 10]) -> PartialDuration {
        let [years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds] =
            fields;
        PartialDuration {
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        }
    }

    fn to_array(self) -> [Option<i64>; 10] {
        [
            self.years,
            self.months,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
            self.milliseconds,
            self.microseconds,
            self.nanoseconds,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.to_array().iter().all(Option::is_none)
    }
}

/// The shared sign of `fields`, or `None` if nonzero fields disagree.
fn shared_sign(fields: &[i64]) -> Option<i8> {
    let mut sign = 0i8;
    for &value in fields {
        let s = value.signum() as i8;
        if s == 0 {
            continue;
        }
        if sign != 0 && s != sign {
            return None;
        }
        sign = s;
    }
    Some(sign)
}

/// Nanoseconds in the day/time components, counting days as 24 hours.
fn time_nanoseconds(fields: &[i64; 10]) -> i128 {
    fields[3..]
        .iter()
        .zip(TIME_UNIT_NS)
        .map(|(&value, ns)| i128::from(value) * ns)
        .sum()
}

/// Split `total` nanoseconds into days..nanoseconds, starting at `largest`.
fn balance_time(total: i128, largest: Unit) -> Result<[i64; 7]> {
    let start = (largest.max(Unit::Day) as usize) - Unit::Day as usize;
    let mut out = [0i64; 7];
    let mut rest = total;
    for (index, size) in TIME_UNIT_NS.iter().enumerate().skip(start) {
        out[index] = i64::try_from(rest / size)
            .map_err(|_| TemporalError::range("duration component is too large"))?;
        rest %= size;
    }
    Ok(out)
}

impl Duration {
    /// Build a duration from years, months, weeks, days, hours, minutes,
    /// seconds, milliseconds, microseconds and nanoseconds.
    ///
    /// # Errors
    ///
    /// `RangeError` if the components have mixed signs or exceed the bounds.
    pub fn from_components(fields: [i64; 10]) -> Result<Duration> {
        if fields.contains(&i64::MIN) {
            return Err(TemporalError::range("duration component is out of range"));
        }
        if shared_sign(&fields).is_none() {
            return Err(TemporalError::range(
                "duration components must all have the same sign",
            ));
        }
        for (unit, &value) in ["years", "months", "weeks"].iter().zip(&fields[..3]) {
            if value.abs() >= CALENDAR_UNIT_LIMIT {
                return Err(TemporalError::range(format!(
                    "duration {unit} {value} is out of range"
                )));
            }
        }
        if time_nanoseconds(&fields).abs() / NS_PER_SECOND >= MAX_TIME_SECONDS {
            return Err(TemporalError::range("duration time span is out of range"));
        }
        Ok(Duration { fields })
    }

    /// Build a duration from only the supplied components.
    pub fn from_partial(partial: PartialDuration) -> Result<Duration> {
        if partial.is_empty() {
            return Err(TemporalError::type_error(
                "a duration needs at least one component",
            ));
        }
        Duration::default().with(partial)
    }

    /// Balance `total` nanoseconds into a time duration whose largest
    /// component is `largest` (days or smaller).
    pub fn from_nanoseconds(total: i128, largest: Unit) -> Result<Duration> {
        if largest.is_calendar_unit() {
            return Err(TemporalError::range(format!(
                "cannot balance nanoseconds into {largest}s"
            )));
        }
        let time = balance_time(total, largest)?;
        let mut fields = [0i64; 10];
        fields[3..].copy_from_slice(&time);
        Duration::from_components(fields)
    }

    pub(crate) fn from_date_and_time(date: (i64, i64, i64, i64), time: Duration) -> Result<Duration> {
        let mut fields = time.fields;
        fields[0] = date.0;
        fields[1] = date.1;
        fields[2] = date.2;
        fields[3] = fields[3]
            .checked_add(date.3)
            .ok_or_else(|| TemporalError::range("duration days overflowed"))?;
        Duration::from_components(fields)
    }

    pub fn components(&self) -> [i64; 10] {
        self.fields
    }

    pub fn get(&self, unit: Unit) -> i64 {
        self.fields[unit as usize]
    }

    pub fn years(&self) -> i64 {
        self.fields[0]
    }

    pub fn months(&self) -> i64 {
        self.fields[1]
    }

    pub fn weeks(&self) -> i64 {
        self.fields[2]
    }

    pub fn days(&self) -> i64 {
        self.fields[3]
    }

    pub fn hours(&self) -> i64 {
        self.fields[4]
    }

    pub fn minutes(&self) -> i64 {
        self.fields[5]
    }

    pub fn seconds(&self) -> i64 {
        self.fields[6]
    }

    pub fn milliseconds(&self) -> i64 {
        self.fields[7]
    }

    pub fn microseconds(&self) -> i64 {
        self.fields[8]
    }

    pub fn nanoseconds(&self) -> i64 {
        self.fields[9]
    }

    /// `-1`, `0` or `1`.
    pub fn sign(&self) -> i8 {
        shared_sign(&self.fields).unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.fields.iter().all(|&v| v == 0)
    }

    /// Whether no years, months or weeks are present.
    pub fn is_time_only(&self) -> bool {
        self.fields[..3].iter().all(|&v| v == 0)
    }

    /// The largest unit with a nonzero component.
    pub fn largest_unit(&self) -> Option<Unit> {
        self.fields
            .iter()
            .position(|&v| v != 0)
            .map(unit_at)
    }

    /// Exact length in nanoseconds, counting days as 24 hours.
    ///
    /// # Errors
    ///
    /// `TypeError` if years, months or weeks are present, since their length
    /// depends on a starting date.
    pub fn total_nanoseconds(&self) -> Result<i128> {
        self.require_time_only("measure")?;
        Ok(time_nanoseconds(&self.fields))
    }

    /// Nanoseconds in the hours..nanoseconds components only.
    pub(crate) fn sub_day_nanoseconds(&self) -> i128 {
        time_nanoseconds(&self.fields) - i128::from(self.fields[3]) * TIME_UNIT_NS[0]
    }

    /// Nanoseconds in the days..nanoseconds components.
    pub(crate) fn day_time_nanoseconds(&self) -> i128 {
        time_nanoseconds(&self.fields)
    }

    fn require_time_only(&self, action: &str) -> Result<()> {
        if self.is_time_only() {
            Ok(())
        } else {
            Err(TemporalError::type_error(format!(
                "cannot {action} a duration with years, months or weeks without a relative date"
            )))
        }
    }

    /// Rebalance a duration without calendar units so its largest component is `largest`.
    pub fn balance(&self, largest: Unit) -> Result<Duration> {
        self.require_time_only("balance")?;
        Duration::from_nanoseconds(time_nanoseconds(&self.fields), largest)
    }

    pub fn negated(&self) -> Duration {
        Duration {
            fields: self.fields.map(|v| -v),
        }
    }

    pub fn abs(&self) -> Duration {
        Duration {
            fields: self.fields.map(i64::abs),
        }
    }

    /// Replace the supplied components and re-validate the result.
    pub fn with(&self, partial: PartialDuration) -> Result<Duration> {
        let mut fields = self.fields;
        for (field, replacement) in fields.iter_mut().zip(partial.to_array()) {
            if let Some(value) = replacement {
                *field = value;
            }
        }
        Duration::from_components(fields)
    }

    /// Component-wise sum, re-validated as a whole.
    ///
    /// # Errors
    ///
    /// `RangeError` if the summed components disagree in sign or leave the
    /// duration bounds. No units are converted into one another, so
    /// `d.add(e)?.subtract(e)` is always `d`.
    pub fn add(&self, other: &Duration) -> Result<Duration> {
        let mut sum = [0i64; 10];
        for (slot, (a, b)) in sum.iter_mut().zip(self.fields.iter().zip(&other.fields)) {
            *slot = a
                .checked_add(*b)
                .ok_or_else(|| TemporalError::range("duration addition overflowed"))?;
        }
        if shared_sign(&sum).is_none() {
            tracing::trace!(%self, %other, "duration sum has mixed signs");
            return Err(TemporalError::range(format!(
                "{self} plus {other} has components with mixed signs"
            )));
        }
        Duration::from_components(sum)
    }

    pub fn subtract(&self, other: &Duration) -> Result<Duration> {
        self.add(&other.negated())
    }

    /// Compare two durations by exact length, `-1`, `0` or `1`.
    ///
    /// # Errors
    ///
    /// `TypeError` if either side has years, months or weeks.
    pub fn compare(a: &Duration, b: &Duration) -> Result<i8> {
        if !a.is_time_only() || !b.is_time_only() {
            return Err(TemporalError::type_error(
                "comparing durations with years, months or weeks requires a relative date",
            ));
        }
        Ok(ordering_to_i8(
            time_nanoseconds(&a.fields).cmp(&time_nanoseconds(&b.fields)),
        ))
    }
}

fn unit_at(index: usize) -> Unit {
    const UNITS: [Unit; 10] = [
        Unit::Year,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::Millisecond,
        Unit::Microsecond,
        Unit::Nanosecond,
    ];
    UNITS[index]
}

impl FromStr for Duration {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Duration> {
        Duration::from_components(parser::parse_duration(s)?)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::duration(&self.fields))
    }
}

crate::iso_string_serde!(Duration);
