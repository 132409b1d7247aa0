//! Exact points on the timeline.

use std::fmt;
use std::str::FromStr;

use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::format;
use crate::iso::{ordering_to_i8, IsoDateTime, NS_MAX_INSTANT};
use crate::options::{DifferenceOptions, ToStringOptions, Unit};
use crate::parser;

/// Nanoseconds since 1970-01-01T00:00:00Z, within ±8.64e21.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instant {
    epoch_ns: i128,
}

impl Instant {
    pub fn try_new(epoch_ns: i128) -> Result<Instant> {
        if !(-NS_MAX_INSTANT..=NS_MAX_INSTANT).contains(&epoch_ns) {
            return Err(TemporalError::range(format!(
                "instant {epoch_ns} ns is outside the representable range"
            )));
        }
        Ok(Instant { epoch_ns })
    }

    pub fn from_epoch_seconds(seconds: i64) -> Result<Instant> {
        Instant::try_new(i128::from(seconds) * 1_000_000_000)
    }

    pub fn from_epoch_milliseconds(ms: i64) -> Result<Instant> {
        Instant::try_new(i128::from(ms) * 1_000_000)
    }

    /// Build from a decimal integer string, e.g. `"-1000000000"`.
    pub fn from_epoch_nanoseconds(text: &str) -> Result<Instant> {
        let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TemporalError::type_error(format!(
                "'{text}' is not a decimal integer"
            )));
        }
        let ns = text
            .parse::<i128>()
            .map_err(|_| TemporalError::range(format!("{text} ns is outside the representable range")))?;
        Instant::try_new(ns)
    }

    pub fn epoch_seconds(&self) -> i64 {
        // |ns| <= 8.64e21, so the quotient fits.
        self.epoch_ns.div_euclid(1_000_000_000) as i64
    }

    pub fn epoch_milliseconds(&self) -> i64 {
        self.epoch_ns.div_euclid(1_000_000) as i64
    }

    /// Exact nanosecond count as a decimal string.
    pub fn epoch_nanoseconds(&self) -> String {
        self.epoch_ns.to_string()
    }

    pub fn epoch_nanoseconds_i128(&self) -> i128 {
        self.epoch_ns
    }

    /// Add a duration made only of days and smaller units (days are 24 hours).
    pub fn add(&self, duration: &Duration) -> Result<Instant> {
        if !duration.is_time_only() {
            return Err(TemporalError::range(
                "years, months and weeks cannot be added to an instant",
            ));
        }
        Instant::try_new(self.epoch_ns + duration.day_time_nanoseconds())
    }

    pub fn subtract(&self, duration: &Duration) -> Result<Instant> {
        self.add(&duration.negated())
    }

    /// Time from `self` to `other`, hours and smaller by default.
    pub fn until(&self, other: &Instant, options: DifferenceOptions) -> Result<Duration> {
        let largest = options.resolve(Unit::Hour, Unit::Nanosecond, Unit::Hour)?;
        Duration::from_nanoseconds(other.epoch_ns - self.epoch_ns, largest)
    }

    pub fn since(&self, other: &Instant, options: DifferenceOptions) -> Result<Duration> {
        let largest = options.resolve(Unit::Hour, Unit::Nanosecond, Unit::Hour)?;
        Duration::from_nanoseconds(self.epoch_ns - other.epoch_ns, largest)
    }

    pub fn compare(a: &Instant, b: &Instant) -> i8 {
        ordering_to_i8(a.cmp(b))
    }

    pub(crate) fn to_iso_date_time(self) -> Result<IsoDateTime> {
        IsoDateTime::from_epoch_nanoseconds(self.epoch_ns)
    }

    pub fn to_string_with_options(&self, options: ToStringOptions) -> Result<String> {
        options.validate()?;
        Ok(format::instant(self.to_iso_date_time()?, options.precision))
    }
}

impl FromStr for Instant {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Instant> {
        let (date_time, offset_ns) = parser::parse_instant(s)?;
        Instant::try_new(date_time.epoch_nanoseconds() - i128::from(offset_ns))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Every valid instant lies inside the date range.
        let date_time = self.to_iso_date_time().map_err(|_| fmt::Error)?;
        f.write_str(&format::instant(date_time, Default::default()))
    }
}

crate::iso_string_serde!(Instant);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::Precision;

    #[test]
    fn test_epoch_zero() {
        let i = Instant::from_epoch_milliseconds(0).unwrap();
        assert_eq!(i.to_string(), "1970-01-01T00:00:00.000Z");
        assert_eq!(i.epoch_nanoseconds(), "0");
    }

    #[test]
    fn test_parse_with_offset() {
        let i: Instant = "2024-01-15T10:30:00+02:00".parse().unwrap();
        assert_eq!(i.to_string(), "2024-01-15T08:30:00.000Z");
        let j: Instant = "2024-01-15T08:30:00.000000001Z".parse().unwrap();
        assert_eq!(j.to_string(), "2024-01-15T08:30:00.000000001Z");
        assert_eq!(Instant::compare(&i, &j), -1);
    }

    #[test]
    fn test_limits() {
        assert!(Instant::try_new(NS_MAX_INSTANT).is_ok());
        assert!(Instant::try_new(-NS_MAX_INSTANT).is_ok());
        assert!(Instant::try_new(NS_MAX_INSTANT + 1).is_err());
        let max = Instant::try_new(NS_MAX_INSTANT).unwrap();
        assert_eq!(max.to_string(), "+275760-09-13T00:00:00.000Z");
        let min = Instant::try_new(-NS_MAX_INSTANT).unwrap();
        assert_eq!(min.to_string(), "-271821-04-20T00:00:00.000Z");
    }

    #[test]
    fn test_epoch_conversions_floor() {
        let i = Instant::from_epoch_nanoseconds("-1").unwrap();
        assert_eq!(i.epoch_milliseconds(), -1);
        assert_eq!(i.epoch_seconds(), -1);
        assert_eq!(i.to_string(), "1969-12-31T23:59:59.999999999Z");
        assert_eq!(
            Instant::from_epoch_nanoseconds("12x").unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            Instant::from_epoch_nanoseconds("99999999999999999999999").unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn test_add_rejects_calendar_units() {
        let i = Instant::from_epoch_seconds(0).unwrap();
        let later = i.add(&"P1DT1H".parse().unwrap()).unwrap();
        assert_eq!(later.epoch_seconds(), 90_000);
        let err = i.add(&"P1M".parse().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(later.subtract(&"PT25H".parse().unwrap()).unwrap(), i);
    }

    #[test]
    fn test_until_and_since() {
        let a = Instant::from_epoch_seconds(0).unwrap();
        let b = Instant::from_epoch_seconds(93_784).unwrap();
        let d = a.until(&b, DifferenceOptions::default()).unwrap();
        assert_eq!(d.to_string(), "PT26H3M4S");
        let d = a.until(&b, DifferenceOptions::largest(Unit::Second)).unwrap();
        assert_eq!(d.to_string(), "PT93784S");
        assert_eq!(b.since(&a, DifferenceOptions::default()).unwrap(), a.until(&b, DifferenceOptions::default()).unwrap());
        assert!(a.until(&b, DifferenceOptions::largest(Unit::Day)).is_err());
    }

    #[test]
    fn test_precision_option() {
        let i: Instant = "2024-01-01T00:00:00.123456Z".parse().unwrap();
        let opts = ToStringOptions {
            precision: Precision::Digits(1),
            ..Default::default()
        };
        assert_eq!(i.to_string_with_options(opts).unwrap(), "2024-01-01T00:00:00.1Z");
    }
}
