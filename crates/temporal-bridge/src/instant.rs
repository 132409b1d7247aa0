use serde::Serialize;
use temporal_engine::{now, Duration, HostClock, Instant, SystemClock};

use crate::{canonical, difference_options, extract, parse, required, CompareOutcome, Outcome};

const WHAT: &str = "instant";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstantComponents {
    pub is_valid: bool,
    pub epoch_seconds: i64,
    pub epoch_milliseconds: i64,
    /// Decimal string; the value does not fit in 64 bits.
    pub epoch_nanoseconds: String,
}

impl From<Instant> for InstantComponents {
    fn from(instant: Instant) -> Self {
        InstantComponents {
            is_valid: true,
            epoch_seconds: instant.epoch_seconds(),
            epoch_milliseconds: instant.epoch_milliseconds(),
            epoch_nanoseconds: instant.epoch_nanoseconds(),
        }
    }
}

pub fn now() -> Outcome<String> {
    now_on(&SystemClock)
}

pub fn now_on(clock: &dyn HostClock) -> Outcome<String> {
    now::instant(clock).map(|i| i.to_string()).into()
}

pub fn from_string(text: Option<&str>) -> Outcome<String> {
    canonical::<Instant>(text, WHAT)
}

pub fn from_epoch_milliseconds(ms: i64) -> Outcome<String> {
    Instant::from_epoch_milliseconds(ms)
        .map(|i| i.to_string())
        .into()
}

/// `ns` is a decimal integer string, optionally signed.
pub fn from_epoch_nanoseconds(ns: Option<&str>) -> Outcome<String> {
    required(ns, "epoch nanoseconds")
        .and_then(Instant::from_epoch_nanoseconds)
        .map(|i| i.to_string())
        .into()
}

pub fn epoch_milliseconds(text: Option<&str>) -> Outcome<i64> {
    parse::<Instant>(text, WHAT)
        .map(|i| i.epoch_milliseconds())
        .into()
}

pub fn epoch_nanoseconds(text: Option<&str>) -> Outcome<String> {
    parse::<Instant>(text, WHAT)
        .map(|i| i.epoch_nanoseconds())
        .into()
}

pub fn components(text: Option<&str>) -> InstantComponents {
    extract(parse::<Instant>(text, WHAT), InstantComponents::from)
}

pub fn add(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let instant = parse::<Instant>(text, WHAT)?;
        instant.add(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|i| i.to_string()).into()
}

pub fn subtract(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let instant = parse::<Instant>(text, WHAT)?;
        instant.subtract(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|i| i.to_string()).into()
}

pub fn compare(a: Option<&str>, b: Option<&str>) -> CompareOutcome {
    let result = || -> temporal_engine::Result<i8> {
        let a = parse::<Instant>(a, WHAT)?;
        let b = parse::<Instant>(b, WHAT)?;
        Ok(Instant::compare(&a, &b))
    };
    result().into()
}

/// Duration from `a` to `b`; `largest_unit` defaults to hours.
pub fn until(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<Instant>(a, WHAT)?;
        let b = parse::<Instant>(b, WHAT)?;
        a.until(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn since(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<Instant>(a, WHAT)?;
        let b = parse::<Instant>(b, WHAT)?;
        a.since(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use temporal_engine::FixedClock;

    #[test]
    fn test_epoch_conversions() {
        assert_eq!(
            from_epoch_milliseconds(0).into_value().unwrap(),
            "1970-01-01T00:00:00.000Z"
        );
        assert_eq!(
            from_epoch_nanoseconds(Some("-1")).into_value().unwrap(),
            "1969-12-31T23:59:59.999999999Z"
        );
        assert_eq!(
            from_epoch_nanoseconds(Some("12abc")).error_kind(),
            ErrorKind::TypeError
        );
        assert_eq!(
            from_epoch_nanoseconds(Some("8640000000000000000001")).error_kind(),
            ErrorKind::RangeError
        );
        assert_eq!(
            epoch_milliseconds(Some("1969-12-31T23:59:59.9995Z")).into_value(),
            Some(-1)
        );
        assert_eq!(
            epoch_nanoseconds(Some("+275760-09-13T00:00Z")).into_value().unwrap(),
            "8640000000000000000000"
        );
    }

    #[test]
    fn test_from_string_needs_offset() {
        assert_eq!(
            from_string(Some("2024-03-10T02:30:00-05:00")).into_value().unwrap(),
            "2024-03-10T07:30:00.000Z"
        );
        assert_eq!(from_string(Some("2024-03-10T02:30")).error_kind(), ErrorKind::TypeError);
        assert_eq!(from_string(None).error_kind(), ErrorKind::TypeError);
    }

    #[test]
    fn test_components() {
        let c = components(Some("1970-01-01T00:00:01.5Z"));
        assert!(c.is_valid);
        assert_eq!(c.epoch_seconds, 1);
        assert_eq!(c.epoch_milliseconds, 1500);
        assert_eq!(c.epoch_nanoseconds, "1500000000");
        assert!(!components(Some("1970-01-01")).is_valid);
    }

    #[test]
    fn test_arithmetic() {
        let t = Some("2024-01-01T00:00:00Z");
        assert_eq!(
            add(t, Some("P1DT1.5S")).into_value().unwrap(),
            "2024-01-02T00:00:01.500Z"
        );
        assert_eq!(
            subtract(t, Some("PT1H")).into_value().unwrap(),
            "2023-12-31T23:00:00.000Z"
        );
        assert_eq!(add(t, Some("P1M")).error_kind(), ErrorKind::RangeError);
        assert_eq!(add(t, None).error_kind(), ErrorKind::TypeError);
    }

    #[test]
    fn test_compare_and_difference() {
        let a = Some("2024-01-01T00:00:00Z");
        let b = Some("2024-01-01T01:00:00+01:00");
        assert_eq!(compare(a, b).into_value(), Some(0));
        assert_eq!(compare(a, Some("2024-01-01T00:00:00.000000001Z")).into_value(), Some(-1));
        let c = Some("2024-01-03T12:00:00Z");
        assert_eq!(until(a, c, None).into_value().unwrap(), "PT60H");
        assert_eq!(until(a, c, Some("minute")).into_value().unwrap(), "PT3600M");
        assert_eq!(since(a, c, None).into_value().unwrap(), "-PT60H");
        assert_eq!(until(a, c, Some("day")).error_kind(), ErrorKind::RangeError);
    }

    #[test]
    fn test_now_on_fixed_clock() {
        let clock = FixedClock::new(1_000_000, "UTC");
        assert_eq!(now_on(&clock).into_value().unwrap(), "1970-01-01T00:00:00.001Z");
        assert!(now().is_ok());
    }
}
