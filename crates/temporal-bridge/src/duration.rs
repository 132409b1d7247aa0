use serde::Serialize;
use temporal_engine::{Duration, PartialDuration};

use crate::{canonical, decode_field, extract, parse, CompareOutcome, Outcome};

const WHAT: &str = "duration";

/// All ten components plus the sign, in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DurationComponents {
    pub is_valid: bool,
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
    pub microseconds: i64,
    pub nanoseconds: i64,
    pub sign: i8,
}

impl From<Duration> for DurationComponents {
    fn from(d: Duration) -> Self {
        DurationComponents {
            is_valid: true,
            years: d.years(),
            months: d.months(),
            weeks: d.weeks(),
            days: d.days(),
            hours: d.hours(),
            minutes: d.minutes(),
            seconds: d.seconds(),
            milliseconds: d.milliseconds(),
            microseconds: d.microseconds(),
            nanoseconds: d.nanoseconds(),
            sign: d.sign(),
        }
    }
}

pub fn from_string(text: Option<&str>) -> Outcome<String> {
    canonical::<Duration>(text, WHAT)
}

/// Years, months, weeks, days, hours, minutes, seconds, milliseconds,
/// microseconds, nanoseconds.
pub fn from_components(fields: [i64; 10]) -> Outcome<String> {
    Duration::from_components(fields).map(|d| d.to_string()).into()
}

pub fn components(text: Option<&str>) -> DurationComponents {
    extract(parse::<Duration>(text, WHAT), DurationComponents::from)
}

/// Replace the fields that are not [`FIELD_UNSET`](crate::FIELD_UNSET).
pub fn with(text: Option<&str>, fields: [i64; 10]) -> Outcome<String> {
    let partial = PartialDuration::from_array(fields.map(decode_field));
    parse::<Duration>(text, WHAT)
        .and_then(|d| d.with(partial))
        .map(|d| d.to_string())
        .into()
}

pub fn add(a: Option<&str>, b: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<Duration>(a, WHAT)?;
        let b = parse::<Duration>(b, WHAT)?;
        a.add(&b)
    };
    result().map(|d| d.to_string()).into()
}

pub fn subtract(a: Option<&str>, b: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<Duration>(a, WHAT)?;
        let b = parse::<Duration>(b, WHAT)?;
        a.subtract(&b)
    };
    result().map(|d| d.to_string()).into()
}

pub fn negate(text: Option<&str>) -> Outcome<String> {
    parse::<Duration>(text, WHAT)
        .map(|d| d.negated().to_string())
        .into()
}

pub fn abs(text: Option<&str>) -> Outcome<String> {
    parse::<Duration>(text, WHAT).map(|d| d.abs().to_string()).into()
}

pub fn sign(text: Option<&str>) -> Outcome<i8> {
    parse::<Duration>(text, WHAT).map(|d| d.sign()).into()
}

/// `TypeError` if either side has years, months or weeks.
pub fn compare(a: Option<&str>, b: Option<&str>) -> CompareOutcome {
    let result = || {
        let a = parse::<Duration>(a, WHAT)?;
        let b = parse::<Duration>(b, WHAT)?;
        Duration::compare(&a, &b)
    };
    result().into()
}
