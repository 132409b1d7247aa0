//! ISO date and time records, the shared currency between the parser, the
//! value engines and the formatter.
//!
//! These records carry no calendar. Constructors here enforce field ranges and
//! representable limits; the public value types wrap them together with a
//! [`Calendar`](crate::Calendar) tag.

use std::cmp::Ordering;

use crate::calendar::{
    balance_year_month, check_date_limits, date_from_epoch_days, days_in_month,
    epoch_days_from_date, narrow_year, MAX_EPOCH_DAYS, MIN_EPOCH_DAYS,
};
use crate::error::{Result, TemporalError};
use crate::options::{Overflow, Unit};

pub(crate) const NS_PER_DAY: i128 = 86_400_000_000_000;
pub(crate) const NS_PER_SECOND: i128 = 1_000_000_000;
/// Instants may lie at most 10^8 days on either side of the epoch.
pub(crate) const NS_MAX_INSTANT: i128 = 8_640_000_000_000_000_000_000;

/// A proleptic Gregorian calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl IsoDate {
    /// Build a date, applying `overflow` to the month and day fields, then
    /// checking the representable range.
    pub(crate) fn new(year: i64, month: i64, day: i64, overflow: Overflow) -> Result<IsoDate> {
        let year = narrow_year(year)?;
        let (month, day) = match overflow {
            Overflow::Reject => {
                if !(1..=12).contains(&month) {
                    return Err(TemporalError::range(format!(
                        "month {month} is out of range (1..=12)"
                    )));
                }
                let max = i64::from(days_in_month(year, month as u8));
                if !(1..=max).contains(&day) {
                    return Err(TemporalError::range(format!(
                        "day {day} is out of range for {year:04}-{month:02} (1..={max})"
                    )));
                }
                (month as u8, day as u8)
            }
            Overflow::Constrain => {
                if month < 1 || day < 1 {
                    return Err(TemporalError::range(format!(
                        "month {month} and day {day} must be positive"
                    )));
                }
                let month = month.min(12) as u8;
                let day = day.min(i64::from(days_in_month(year, month))) as u8;
                (month, day)
            }
        };
        check_date_limits(year, month, day)?;
        Ok(IsoDate { year, month, day })
    }

    pub(crate) fn epoch_days(self) -> i64 {
        epoch_days_from_date(self.year, self.month, self.day)
    }

    pub(crate) fn from_epoch_days(days: i64) -> Result<IsoDate> {
        if !(MIN_EPOCH_DAYS..=MAX_EPOCH_DAYS).contains(&days) {
            return Err(TemporalError::range(
                "date is outside the representable range",
            ));
        }
        let (year, month, day) = date_from_epoch_days(days);
        Ok(IsoDate { year, month, day })
    }

    /// Add a date duration: years and months first under `overflow`, then
    /// weeks and days as plain day counts.
    pub(crate) fn add(
        self,
        years: i64,
        months: i64,
        weeks: i64,
        days: i64,
        overflow: Overflow,
    ) -> Result<IsoDate> {
        let year = i64::from(self.year) + years;
        let (year, month) = balance_year_month(year, i64::from(self.month) + months);
        let intermediate = IsoDate::new(year, i64::from(month), i64::from(self.day), overflow)?;
        let total_days = weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(days))
            .and_then(|d| d.checked_add(intermediate.epoch_days()))
            .ok_or_else(|| TemporalError::range("date arithmetic overflowed"))?;
        IsoDate::from_epoch_days(total_days)
    }

    /// Whether moving `self` by `years`/`months` (unconstrained day) goes past `target`
    /// in the direction `sign`.
    fn surpasses(self, sign: i64, years: i64, months: i64, target: IsoDate) -> bool {
        let (year, month) =
            balance_year_month(i64::from(self.year) + years, i64::from(self.month) + months);
        let candidate = (year, i64::from(month), i64::from(self.day));
        let target = (
            i64::from(target.year),
            i64::from(target.month),
            i64::from(target.day),
        );
        let cmp = match candidate.cmp(&target) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        };
        cmp * sign > 0
    }

    /// Difference from `self` to `other` as `(years, months, weeks, days)`,
    /// balanced up to `largest` (which must be a date unit).
    pub(crate) fn until(self, other: IsoDate, largest: Unit) -> (i64, i64, i64, i64) {
        let sign = match self.cmp(&other) {
            Ordering::Less => 1,
            Ordering::Equal => return (0, 0, 0, 0),
            Ordering::Greater => -1,
        };
        match largest {
            Unit::Year | Unit::Month => {
                let mut years = 0;
                let mut candidate = i64::from(other.year) - i64::from(self.year);
                if candidate != 0 {
                    candidate -= sign;
                }
                while !self.surpasses(sign, candidate, 0, other) {
                    years = candidate;
                    candidate += sign;
                }
                let mut months = 0;
                let mut candidate = sign;
                while !self.surpasses(sign, years, candidate, other) {
                    months = candidate;
                    candidate += sign;
                }
                if largest == Unit::Month {
                    months += years * 12;
                    years = 0;
                }
                let (year, month) = balance_year_month(
                    i64::from(self.year) + years,
                    i64::from(self.month) + months,
                );
                // Between self and other, so the year always fits.
                let year = year as i32;
                let day = self.day.min(days_in_month(year, month));
                let intermediate = epoch_days_from_date(year, month, day);
                (years, months, 0, other.epoch_days() - intermediate)
            }
            Unit::Week => {
                let total = other.epoch_days() - self.epoch_days();
                (0, 0, total / 7, total % 7)
            }
            _ => (0, 0, 0, other.epoch_days() - self.epoch_days()),
        }
    }
}

/// A wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IsoTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub microsecond: u16,
    pub nanosecond: u16,
}

impl IsoTime {
    pub const MIDNIGHT: IsoTime = IsoTime {
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
        microsecond: 0,
        nanosecond: 0,
    };

    /// Build a time, applying `overflow` to each field.
    pub(crate) fn new(fields: [i64; 6], overflow: Overflow) -> Result<IsoTime> {
        const NAMES: [&str; 6] = [
            "hour",
            "minute",
            "second",
            "millisecond",
            "microsecond",
            "nanosecond",
        ];
        const MAX: [i64; 6] = [23, 59, 59, 999, 999, 999];
        let mut out = [0i64; 6];
        for i in 0..6 {
            let value = fields[i];
            if value < 0 {
                return Err(TemporalError::range(format!(
                    "{} {value} must not be negative",
                    NAMES[i]
                )));
            }
            out[i] = match overflow {
                Overflow::Constrain => value.min(MAX[i]),
                Overflow::Reject if value > MAX[i] => {
                    return Err(TemporalError::range(format!(
                        "{} {value} is out of range (0..={})",
                        NAMES[i], MAX[i]
                    )));
                }
                Overflow::Reject => value,
            };
        }
        Ok(IsoTime {
            hour: out[0] as u8,
            minute: out[1] as u8,
            second: out[2] as u8,
            millisecond: out[3] as u16,
            microsecond: out[4] as u16,
            nanosecond: out[5] as u16,
        })
    }

    /// Nanoseconds since midnight.
    pub(crate) fn nanoseconds(self) -> i128 {
        i128::from(self.hour) * 3_600_000_000_000
            + i128::from(self.minute) * 60_000_000_000
            + i128::from(self.second) * NS_PER_SECOND
            + i128::from(self.millisecond) * 1_000_000
            + i128::from(self.microsecond) * 1_000
            + i128::from(self.nanosecond)
    }

    /// Inverse of [`IsoTime::nanoseconds`]; `ns` must be within one day.
    pub(crate) fn from_nanoseconds(ns: i128) -> IsoTime {
        debug_assert!((0..NS_PER_DAY).contains(&ns));
        IsoTime {
            hour: (ns / 3_600_000_000_000) as u8,
            minute: (ns / 60_000_000_000 % 60) as u8,
            second: (ns / NS_PER_SECOND % 60) as u8,
            millisecond: (ns / 1_000_000 % 1000) as u16,
            microsecond: (ns / 1_000 % 1000) as u16,
            nanosecond: (ns % 1000) as u16,
        }
    }

    /// Add a nanosecond delta, returning the whole days carried and the wrapped time.
    pub(crate) fn add_nanoseconds(self, delta: i128) -> (i128, IsoTime) {
        let total = self.nanoseconds() + delta;
        (
            total.div_euclid(NS_PER_DAY),
            IsoTime::from_nanoseconds(total.rem_euclid(NS_PER_DAY)),
        )
    }
}

/// A date and a time together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoDateTime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl IsoDateTime {
    /// Nanoseconds since the epoch, reading the fields as UTC.
    pub(crate) fn epoch_nanoseconds(self) -> i128 {
        i128::from(self.date.epoch_days()) * NS_PER_DAY + self.time.nanoseconds()
    }

    pub(crate) fn from_epoch_nanoseconds(ns: i128) -> Result<IsoDateTime> {
        let days = ns.div_euclid(NS_PER_DAY);
        let days = i64::try_from(days)
            .map_err(|_| TemporalError::range("date-time is outside the representable range"))?;
        Ok(IsoDateTime {
            date: IsoDate::from_epoch_days(days)?,
            time: IsoTime::from_nanoseconds(ns.rem_euclid(NS_PER_DAY)),
        })
    }

    /// Date-times must lie strictly within one day of the instant range.
    pub(crate) fn check_limits(self) -> Result<()> {
        let ns = self.epoch_nanoseconds();
        if ns <= -NS_MAX_INSTANT - NS_PER_DAY || ns >= NS_MAX_INSTANT + NS_PER_DAY {
            return Err(TemporalError::range(
                "date-time is outside the representable range",
            ));
        }
        Ok(())
    }
}

/// Sign of an ordering as `-1`, `0` or `1`.
pub(crate) fn ordering_to_i8(ordering: Ordering) -> i8 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u8, d: u8) -> IsoDate {
        IsoDate {
            year: y,
            month: m,
            day: d,
        }
    }

    #[test]
    fn test_new_reject_vs_constrain() {
        assert!(IsoDate::new(2023, 2, 29, Overflow::Reject).is_err());
        assert_eq!(
            IsoDate::new(2023, 2, 29, Overflow::Constrain).unwrap(),
            date(2023, 2, 28)
        );
        assert_eq!(
            IsoDate::new(2023, 14, 40, Overflow::Constrain).unwrap(),
            date(2023, 12, 31)
        );
        assert!(IsoDate::new(2023, 0, 1, Overflow::Constrain).is_err());
    }

    #[test]
    fn test_add_months_clamps_day() {
        let jan31 = date(2024, 1, 31);
        assert_eq!(
            jan31.add(0, 1, 0, 0, Overflow::Constrain).unwrap(),
            date(2024, 2, 29)
        );
        assert!(jan31.add(0, 1, 0, 0, Overflow::Reject).is_err());
        assert_eq!(
            jan31.add(1, 1, 0, 0, Overflow::Constrain).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_add_days_crosses_years() {
        assert_eq!(
            date(2024, 12, 31).add(0, 0, 0, 1, Overflow::Constrain).unwrap(),
            date(2025, 1, 1)
        );
        assert_eq!(
            date(2024, 3, 1).add(0, 0, -1, -1, Overflow::Constrain).unwrap(),
            date(2024, 2, 22)
        );
    }

    #[test]
    fn test_until_years_months_days() {
        assert_eq!(
            date(2020, 1, 15).until(date(2024, 3, 20), Unit::Year),
            (4, 2, 0, 5)
        );
        assert_eq!(
            date(2024, 3, 20).until(date(2020, 1, 15), Unit::Year),
            (-4, -2, 0, -5)
        );
        assert_eq!(
            date(2020, 1, 15).until(date(2024, 3, 20), Unit::Month),
            (0, 50, 0, 5)
        );
    }

    #[test]
    fn test_until_end_of_month() {
        // Jan 31 + 1 month would pass Feb 28, so only days are counted.
        assert_eq!(
            date(2023, 1, 31).until(date(2023, 2, 28), Unit::Year),
            (0, 0, 0, 28)
        );
        assert_eq!(
            date(2023, 1, 31).until(date(2023, 3, 31), Unit::Month),
            (0, 2, 0, 0)
        );
    }

    #[test]
    fn test_until_weeks_and_days() {
        assert_eq!(
            date(2024, 1, 1).until(date(2024, 1, 20), Unit::Week),
            (0, 0, 2, 5)
        );
        assert_eq!(
            date(2024, 1, 20).until(date(2024, 1, 1), Unit::Week),
            (0, 0, -2, -5)
        );
        assert_eq!(
            date(2024, 1, 1).until(date(2025, 1, 1), Unit::Day),
            (0, 0, 0, 366)
        );
    }

    #[test]
    fn test_time_add_nanoseconds_wraps() {
        let t = IsoTime::new([23, 30, 0, 0, 0, 0], Overflow::Reject).unwrap();
        let (days, wrapped) = t.add_nanoseconds(3_600_000_000_000);
        assert_eq!(days, 1);
        assert_eq!((wrapped.hour, wrapped.minute), (0, 30));
        let (days, wrapped) = IsoTime::MIDNIGHT.add_nanoseconds(-1);
        assert_eq!(days, -1);
        assert_eq!(wrapped.nanosecond, 999);
        assert_eq!(wrapped.hour, 23);
    }

    #[test]
    fn test_time_reject_out_of_range() {
        assert!(IsoTime::new([24, 0, 0, 0, 0, 0], Overflow::Reject).is_err());
        assert!(IsoTime::new([0, 0, 60, 0, 0, 0], Overflow::Reject).is_err());
        let t = IsoTime::new([24, 61, 60, 1000, 0, 0], Overflow::Constrain).unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.millisecond), (23, 59, 59, 999));
    }

    #[test]
    fn test_date_time_limits() {
        let min = IsoDateTime {
            date: date(-271_821, 4, 19),
            time: IsoTime::MIDNIGHT,
        };
        assert!(min.check_limits().is_err());
        let min_plus = IsoDateTime {
            date: date(-271_821, 4, 19),
            time: IsoTime::from_nanoseconds(1),
        };
        assert!(min_plus.check_limits().is_ok());
    }
}
