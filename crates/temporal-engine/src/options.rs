//! Option types shared by the value engines.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, TemporalError};

/// A duration unit, ordered from largest to smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl Unit {
    /// Whether this unit needs a calendar to convert into a fixed length.
    pub fn is_calendar_unit(self) -> bool {
        matches!(self, Unit::Year | Unit::Month | Unit::Week)
    }

    pub fn is_date_unit(self) -> bool {
        self <= Unit::Day
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Year => "year",
            Unit::Month => "month",
            Unit::Week => "week",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
            Unit::Millisecond => "millisecond",
            Unit::Microsecond => "microsecond",
            Unit::Nanosecond => "nanosecond",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = TemporalError;

    /// Accepts singular or plural unit names, e.g. `"day"` or `"days"`.
    fn from_str(s: &str) -> Result<Unit> {
        let singular = s.strip_suffix('s').unwrap_or(s);
        match singular {
            "year" => Ok(Unit::Year),
            "month" => Ok(Unit::Month),
            "week" => Ok(Unit::Week),
            "day" => Ok(Unit::Day),
            "hour" => Ok(Unit::Hour),
            "minute" => Ok(Unit::Minute),
            "second" => Ok(Unit::Second),
            "millisecond" => Ok(Unit::Millisecond),
            "microsecond" => Ok(Unit::Microsecond),
            "nanosecond" => Ok(Unit::Nanosecond),
            _ => Err(TemporalError::type_error(format!("unknown unit '{s}'"))),
        }
    }
}

/// What to do when a field lands outside its valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Clamp to the nearest valid value.
    #[default]
    Constrain,
    /// Fail with a `RangeError`.
    Reject,
}

/// Options for `until`/`since`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferenceOptions {
    /// Largest unit in the result. `None` uses the kind's default.
    pub largest_unit: Option<Unit>,
}

impl DifferenceOptions {
    pub fn largest(unit: Unit) -> Self {
        DifferenceOptions {
            largest_unit: Some(unit),
        }
    }

    /// Resolve the largest unit against the units a kind supports.
    pub(crate) fn resolve(&self, default: Unit, smallest_allowed: Unit, largest_allowed: Unit) -> Result<Unit> {
        let unit = self.largest_unit.unwrap_or(default);
        if unit < largest_allowed || unit > smallest_allowed {
            return Err(TemporalError::range(format!(
                "largest unit '{unit}' must be between '{largest_allowed}' and '{smallest_allowed}'"
            )));
        }
        Ok(unit)
    }
}

/// When to print the `[u-ca=...]` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarDisplay {
    /// Only for non-ISO calendars.
    #[default]
    Auto,
    Always,
    Never,
    /// Always, with the critical flag: `[!u-ca=...]`.
    Critical,
}

/// How many fractional-second digits to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// As many as needed, trailing zeros removed.
    #[default]
    Auto,
    /// Exactly this many digits (0..=9), truncating.
    Digits(u8),
}

/// Options for rendering values back to strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToStringOptions {
    pub calendar: CalendarDisplay,
    pub precision: Precision,
}

impl ToStringOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Precision::Digits(d) = self.precision {
            if d > 9 {
                return Err(TemporalError::range(format!(
                    "fractional second digits must be 0..=9, got {d}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_ordering() {
        assert!(Unit::Year < Unit::Day);
        assert!(Unit::Hour < Unit::Nanosecond);
        assert!(Unit::Week.is_calendar_unit());
        assert!(!Unit::Day.is_calendar_unit());
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("days".parse::<Unit>().unwrap(), Unit::Day);
        assert_eq!("hour".parse::<Unit>().unwrap(), Unit::Hour);
        assert!("fortnight".parse::<Unit>().is_err());
    }

    #[test]
    fn test_difference_options_resolve() {
        let opts = DifferenceOptions::default();
        assert_eq!(opts.resolve(Unit::Year, Unit::Day, Unit::Year).unwrap(), Unit::Year);
        let opts = DifferenceOptions::largest(Unit::Hour);
        assert!(opts.resolve(Unit::Year, Unit::Day, Unit::Year).is_err());
        let opts = DifferenceOptions::largest(Unit::Week);
        assert_eq!(opts.resolve(Unit::Year, Unit::Day, Unit::Year).unwrap(), Unit::Week);
    }
}
