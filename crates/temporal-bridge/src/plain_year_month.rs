use serde::Serialize;
use temporal_engine::{Duration, PartialYearMonth, PlainYearMonth};

use crate::{
    calendar_or_iso, canonical, decode_field, difference_options, extract, parse, CompareOutcome,
    Outcome,
};

const WHAT: &str = "plain year-month";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlainYearMonthComponents {
    pub is_valid: bool,
    pub year: i32,
    pub month: u8,
    pub month_code: String,
    pub calendar: String,
    pub reference_day: u8,
    pub days_in_month: u8,
    pub days_in_year: u16,
    pub months_in_year: u8,
    pub in_leap_year: bool,
}

impl From<PlainYearMonth> for PlainYearMonthComponents {
    fn from(ym: PlainYearMonth) -> Self {
        PlainYearMonthComponents {
            is_valid: true,
            year: ym.year(),
            month: ym.month(),
            month_code: ym.month_code(),
            calendar: ym.calendar().identifier().to_string(),
            reference_day: ym.reference_day(),
            days_in_month: ym.days_in_month(),
            days_in_year: ym.days_in_year(),
            months_in_year: ym.months_in_year(),
            in_leap_year: ym.in_leap_year(),
        }
    }
}

pub fn from_string(text: Option<&str>) -> Outcome<String> {
    canonical::<PlainYearMonth>(text, WHAT)
}

pub fn from_components(year: i64, month: i64, calendar: Option<&str>) -> Outcome<String> {
    calendar_or_iso(calendar)
        .and_then(|cal| PlainYearMonth::try_new(year, month, cal))
        .map(|ym| ym.to_string())
        .into()
}

pub fn components(text: Option<&str>) -> PlainYearMonthComponents {
    extract(parse::<PlainYearMonth>(text, WHAT), PlainYearMonthComponents::from)
}

/// `fields` holds year and month, each possibly [`FIELD_UNSET`](crate::FIELD_UNSET).
pub fn with(text: Option<&str>, fields: [i64; 2], month_code: Option<&str>) -> Outcome<String> {
    let [year, month] = fields.map(decode_field);
    let partial = PartialYearMonth {
        year,
        month,
        month_code: month_code.map(str::to_string),
    };
    parse::<PlainYearMonth>(text, WHAT)
        .and_then(|ym| ym.with(&partial))
        .map(|ym| ym.to_string())
        .into()
}

pub fn add(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let ym = parse::<PlainYearMonth>(text, WHAT)?;
        ym.add(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|ym| ym.to_string()).into()
}

pub fn subtract(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let ym = parse::<PlainYearMonth>(text, WHAT)?;
        ym.subtract(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|ym| ym.to_string()).into()
}

pub fn compare(a: Option<&str>, b: Option<&str>) -> CompareOutcome {
    let result = || -> temporal_engine::Result<i8> {
        let a = parse::<PlainYearMonth>(a, WHAT)?;
        let b = parse::<PlainYearMonth>(b, WHAT)?;
        Ok(PlainYearMonth::compare(&a, &b))
    };
    result().into()
}

pub fn until(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainYearMonth>(a, WHAT)?;
        let b = parse::<PlainYearMonth>(b, WHAT)?;
        a.until(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn since(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainYearMonth>(a, WHAT)?;
        let b = parse::<PlainYearMonth>(b, WHAT)?;
        a.since(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn month_code(text: Option<&str>) -> Outcome<String> {
    parse::<PlainYearMonth>(text, WHAT)
        .map(|ym| ym.month_code())
        .into()
}

pub fn calendar(text: Option<&str>) -> Outcome<String> {
    parse::<PlainYearMonth>(text, WHAT)
        .map(|ym| ym.calendar().identifier().to_string())
        .into()
}
