use serde::Serialize;
use temporal_engine::{Duration, PartialMonthDay, PlainMonthDay};

use crate::{
    calendar_or_iso, canonical, decode_field, difference_options, extract, parse, CompareOutcome,
    Outcome,
};

const WHAT: &str = "plain month-day";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlainMonthDayComponents {
    pub is_valid: bool,
    pub month: u8,
    pub day: u8,
    pub month_code: String,
    pub calendar: String,
    pub reference_year: i32,
}

impl From<PlainMonthDay> for PlainMonthDayComponents {
    fn from(md: PlainMonthDay) -> Self {
        PlainMonthDayComponents {
            is_valid: true,
            month: md.month(),
            day: md.day(),
            month_code: md.month_code(),
            calendar: md.calendar().identifier().to_string(),
            reference_year: md.reference_year(),
        }
    }
}

pub fn from_string(text: Option<&str>) -> Outcome<String> {
    canonical::<PlainMonthDay>(text, WHAT)
}

pub fn from_components(month: i64, day: i64, calendar: Option<&str>) -> Outcome<String> {
    calendar_or_iso(calendar)
        .and_then(|cal| PlainMonthDay::try_new(month, day, cal))
        .map(|md| md.to_string())
        .into()
}

pub fn components(text: Option<&str>) -> PlainMonthDayComponents {
    extract(parse::<PlainMonthDay>(text, WHAT), PlainMonthDayComponents::from)
}

/// `fields` holds month and day, each possibly [`FIELD_UNSET`](crate::FIELD_UNSET).
pub fn with(text: Option<&str>, fields: [i64; 2], month_code: Option<&str>) -> Outcome<String> {
    let [month, day] = fields.map(decode_field);
    let partial = PartialMonthDay {
        month,
        month_code: month_code.map(str::to_string),
        day,
    };
    parse::<PlainMonthDay>(text, WHAT)
        .and_then(|md| md.with(&partial))
        .map(|md| md.to_string())
        .into()
}

pub fn add(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let md = parse::<PlainMonthDay>(text, WHAT)?;
        md.add(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|md| md.to_string()).into()
}

pub fn subtract(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let md = parse::<PlainMonthDay>(text, WHAT)?;
        md.subtract(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|md| md.to_string()).into()
}

pub fn compare(a: Option<&str>, b: Option<&str>) -> CompareOutcome {
    let result = || -> temporal_engine::Result<i8> {
        let a = parse::<PlainMonthDay>(a, WHAT)?;
        let b = parse::<PlainMonthDay>(b, WHAT)?;
        Ok(PlainMonthDay::compare(&a, &b))
    };
    result().into()
}

pub fn until(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainMonthDay>(a, WHAT)?;
        let b = parse::<PlainMonthDay>(b, WHAT)?;
        a.until(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn since(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainMonthDay>(a, WHAT)?;
        let b = parse::<PlainMonthDay>(b, WHAT)?;
        a.since(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn month_code(text: Option<&str>) -> Outcome<String> {
    parse::<PlainMonthDay>(text, WHAT)
        .map(|md| md.month_code())
        .into()
}

pub fn calendar(text: Option<&str>) -> Outcome<String> {
    parse::<PlainMonthDay>(text, WHAT)
        .map(|md| md.calendar().identifier().to_string())
        .into()
}
