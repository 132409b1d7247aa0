use serde::Serialize;
use temporal_engine::{now, Duration, HostClock, Overflow, PartialTime, PlainTime, SystemClock};

use crate::{canonical, decode_field, difference_options, extract, parse, CompareOutcome, Outcome};

const WHAT: &str = "plain time";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlainTimeComponents {
    pub is_valid: bool,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub microsecond: u16,
    pub nanosecond: u16,
}

impl From<PlainTime> for PlainTimeComponents {
    fn from(t: PlainTime) -> Self {
        PlainTimeComponents {
            is_valid: true,
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
            millisecond: t.millisecond(),
            microsecond: t.microsecond(),
            nanosecond: t.nanosecond(),
        }
    }
}

pub(crate) fn partial(fields: [i64; 6]) -> PartialTime {
    let [hour, minute, second, millisecond, microsecond, nanosecond] = fields.map(decode_field);
    PartialTime {
        hour,
        minute,
        second,
        millisecond,
        microsecond,
        nanosecond,
    }
}

/// Current wall-clock time in `zone`, or the host's zone when `None`.
pub fn now(zone: Option<&str>) -> Outcome<String> {
    now_on(&SystemClock, zone)
}

pub fn now_on(clock: &dyn HostClock, zone: Option<&str>) -> Outcome<String> {
    now::plain_time(clock, zone).map(|t| t.to_string()).into()
}

pub fn from_string(text: Option<&str>) -> Outcome<String> {
    canonical::<PlainTime>(text, WHAT)
}

/// Hour, minute, second, millisecond, microsecond, nanosecond; out-of-range
/// fields are a `RangeError`.
pub fn from_components(fields: [i64; 6]) -> Outcome<String> {
    PlainTime::with_fields(fields, Overflow::Reject)
        .map(|t| t.to_string())
        .into()
}

pub fn components(text: Option<&str>) -> PlainTimeComponents {
    extract(parse::<PlainTime>(text, WHAT), PlainTimeComponents::from)
}

pub fn with(text: Option<&str>, fields: [i64; 6]) -> Outcome<String> {
    parse::<PlainTime>(text, WHAT)
        .and_then(|t| t.with(partial(fields)))
        .map(|t| t.to_string())
        .into()
}

pub fn add(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let time = parse::<PlainTime>(text, WHAT)?;
        time.add(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|t| t.to_string()).into()
}

pub fn subtract(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let time = parse::<PlainTime>(text, WHAT)?;
        time.subtract(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|t| t.to_string()).into()
}

pub fn compare(a: Option<&str>, b: Option<&str>) -> CompareOutcome {
    let result = || -> temporal_engine::Result<i8> {
        let a = parse::<PlainTime>(a, WHAT)?;
        let b = parse::<PlainTime>(b, WHAT)?;
        Ok(PlainTime::compare(&a, &b))
    };
    result().into()
}

pub fn until(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainTime>(a, WHAT)?;
        let b = parse::<PlainTime>(b, WHAT)?;
        a.until(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn since(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainTime>(a, WHAT)?;
        let b = parse::<PlainTime>(b, WHAT)?;
        a.since(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}
