use serde::Serialize;
use temporal_engine::{now, Duration, HostClock, PartialDateTime, PlainDateTime, SystemClock};

use crate::plain_date::{self, PlainDateComponents};
use crate::plain_time::{self, PlainTimeComponents};
use crate::{calendar_or_iso, canonical, difference_options, extract, parse, CompareOutcome, Outcome};

const WHAT: &str = "plain date-time";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlainDateTimeComponents {
    pub is_valid: bool,
    pub date: PlainDateComponents,
    pub time: PlainTimeComponents,
}

impl From<PlainDateTime> for PlainDateTimeComponents {
    fn from(dt: PlainDateTime) -> Self {
        PlainDateTimeComponents {
            is_valid: true,
            date: dt.to_plain_date().into(),
            time: dt.to_plain_time().into(),
        }
    }
}

pub fn now(zone: Option<&str>) -> Outcome<String> {
    now_on(&SystemClock, zone)
}

pub fn now_on(clock: &dyn HostClock, zone: Option<&str>) -> Outcome<String> {
    now::plain_date_time(clock, zone)
        .map(|dt| dt.to_string())
        .into()
}

pub fn from_string(text: Option<&str>) -> Outcome<String> {
    canonical::<PlainDateTime>(text, WHAT)
}

pub fn from_components(date: [i64; 3], time: [i64; 6], calendar: Option<&str>) -> Outcome<String> {
    calendar_or_iso(calendar)
        .and_then(|cal| PlainDateTime::try_new(date, time, cal))
        .map(|dt| dt.to_string())
        .into()
}

pub fn components(text: Option<&str>) -> PlainDateTimeComponents {
    extract(parse::<PlainDateTime>(text, WHAT), PlainDateTimeComponents::from)
}

/// `fields` holds year, month, day, hour, minute, second, millisecond,
/// microsecond and nanosecond, each possibly [`FIELD_UNSET`](crate::FIELD_UNSET).
pub fn with(text: Option<&str>, fields: [i64; 9], month_code: Option<&str>) -> Outcome<String> {
    let [year, month, day, hour, minute, second, ms, us, ns] = fields;
    let partial = PartialDateTime {
        date: plain_date::partial([year, month, day], month_code),
        time: plain_time::partial([hour, minute, second, ms, us, ns]),
    };
    parse::<PlainDateTime>(text, WHAT)
        .and_then(|dt| dt.with(&partial))
        .map(|dt| dt.to_string())
        .into()
}

pub fn add(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let dt = parse::<PlainDateTime>(text, WHAT)?;
        dt.add(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|dt| dt.to_string()).into()
}

pub fn subtract(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let dt = parse::<PlainDateTime>(text, WHAT)?;
        dt.subtract(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|dt| dt.to_string()).into()
}

pub fn compare(a: Option<&str>, b: Option<&str>) -> CompareOutcome {
    let result = || -> temporal_engine::Result<i8> {
        let a = parse::<PlainDateTime>(a, WHAT)?;
        let b = parse::<PlainDateTime>(b, WHAT)?;
        Ok(PlainDateTime::compare(&a, &b))
    };
    result().into()
}

pub fn until(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainDateTime>(a, WHAT)?;
        let b = parse::<PlainDateTime>(b, WHAT)?;
        a.until(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn since(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainDateTime>(a, WHAT)?;
        let b = parse::<PlainDateTime>(b, WHAT)?;
        a.since(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn month_code(text: Option<&str>) -> Outcome<String> {
    parse::<PlainDateTime>(text, WHAT)
        .map(|dt| dt.month_code())
        .into()
}

pub fn calendar(text: Option<&str>) -> Outcome<String> {
    parse::<PlainDateTime>(text, WHAT)
        .map(|dt| dt.calendar().identifier().to_string())
        .into()
}
