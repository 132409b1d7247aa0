use serde::Serialize;
use temporal_engine::{now, Duration, HostClock, PartialDate, PlainDate, SystemClock};

use crate::{
    calendar_or_iso, canonical, decode_field, difference_options, extract, parse, CompareOutcome,
    Outcome,
};

const WHAT: &str = "plain date";

/// Every field derivable from a date, in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlainDateComponents {
    pub is_valid: bool,
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub month_code: String,
    pub calendar: String,
    pub day_of_week: u8,
    pub day_of_year: u16,
    pub week_of_year: u8,
    pub year_of_week: i32,
    pub days_in_week: u8,
    pub days_in_month: u8,
    pub days_in_year: u16,
    pub months_in_year: u8,
    pub in_leap_year: bool,
}

impl From<PlainDate> for PlainDateComponents {
    fn from(d: PlainDate) -> Self {
        PlainDateComponents {
            is_valid: true,
            year: d.year(),
            month: d.month(),
            day: d.day(),
            month_code: d.month_code(),
            calendar: d.calendar().identifier().to_string(),
            day_of_week: d.day_of_week(),
            day_of_year: d.day_of_year(),
            week_of_year: d.week_of_year(),
            year_of_week: d.year_of_week(),
            days_in_week: d.days_in_week(),
            days_in_month: d.days_in_month(),
            days_in_year: d.days_in_year(),
            months_in_year: d.months_in_year(),
            in_leap_year: d.in_leap_year(),
        }
    }
}

/// Year, month and day replacements, plus an optional month code.
pub(crate) fn partial(fields: [i64; 3], month_code: Option<&str>) -> PartialDate {
    let [year, month, day] = fields.map(decode_field);
    PartialDate {
        year,
        month,
        month_code: month_code.map(str::to_string),
        day,
    }
}

pub fn now(zone: Option<&str>) -> Outcome<String> {
    now_on(&SystemClock, zone)
}

pub fn now_on(clock: &dyn HostClock, zone: Option<&str>) -> Outcome<String> {
    now::plain_date(clock, zone).map(|d| d.to_string()).into()
}

pub fn from_string(text: Option<&str>) -> Outcome<String> {
    canonical::<PlainDate>(text, WHAT)
}

/// `calendar` defaults to ISO 8601; an unknown identifier is a `TypeError`.
pub fn from_components(year: i64, month: i64, day: i64, calendar: Option<&str>) -> Outcome<String> {
    calendar_or_iso(calendar)
        .and_then(|cal| PlainDate::try_new(year, month, day, cal))
        .map(|d| d.to_string())
        .into()
}

pub fn components(text: Option<&str>) -> PlainDateComponents {
    extract(parse::<PlainDate>(text, WHAT), PlainDateComponents::from)
}

/// Replace fields under the reject policy; [`FIELD_UNSET`](crate::FIELD_UNSET)
/// keeps a field.
pub fn with(text: Option<&str>, fields: [i64; 3], month_code: Option<&str>) -> Outcome<String> {
    parse::<PlainDate>(text, WHAT)
        .and_then(|d| d.with(&partial(fields, month_code)))
        .map(|d| d.to_string())
        .into()
}

/// Add under the constrain policy.
pub fn add(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let date = parse::<PlainDate>(text, WHAT)?;
        date.add(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn subtract(text: Option<&str>, duration: Option<&str>) -> Outcome<String> {
    let result = || {
        let date = parse::<PlainDate>(text, WHAT)?;
        date.subtract(&parse::<Duration>(duration, "duration")?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn compare(a: Option<&str>, b: Option<&str>) -> CompareOutcome {
    let result = || -> temporal_engine::Result<i8> {
        let a = parse::<PlainDate>(a, WHAT)?;
        let b = parse::<PlainDate>(b, WHAT)?;
        Ok(PlainDate::compare(&a, &b))
    };
    result().into()
}

pub fn until(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainDate>(a, WHAT)?;
        let b = parse::<PlainDate>(b, WHAT)?;
        a.until(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn since(a: Option<&str>, b: Option<&str>, largest_unit: Option<&str>) -> Outcome<String> {
    let result = || {
        let a = parse::<PlainDate>(a, WHAT)?;
        let b = parse::<PlainDate>(b, WHAT)?;
        a.since(&b, difference_options(largest_unit)?)
    };
    result().map(|d| d.to_string()).into()
}

pub fn month_code(text: Option<&str>) -> Outcome<String> {
    parse::<PlainDate>(text, WHAT).map(|d| d.month_code()).into()
}

pub fn calendar(text: Option<&str>) -> Outcome<String> {
    parse::<PlainDate>(text, WHAT)
        .map(|d| d.calendar().identifier().to_string())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, FIELD_UNSET as U};
    use temporal_engine::FixedClock;

    #[test]
    fn test_from_components() {
        assert_eq!(from_components(2024, 2, 29, None).into_value().unwrap(), "2024-02-29");
        assert_eq!(
            from_components(2024, 2, 29, Some("gregory")).into_value().unwrap(),
            "2024-02-29[u-ca=gregory]"
        );
        assert_eq!(from_components(2023, 2, 29, None).error_kind(), ErrorKind::RangeError);
        assert_eq!(from_components(2023, 2, 1, Some("mayan")).error_kind(), ErrorKind::TypeError);
    }

    #[test]
    fn test_components_batch() {
        let c = components(Some("2024-12-31"));
        assert!(c.is_valid);
        assert_eq!(c.day_of_week, 2);
        assert_eq!(c.day_of_year, 366);
        assert_eq!((c.week_of_year, c.year_of_week), (1, 2025));
        assert_eq!(c.month_code, "M12");
        assert_eq!(c.calendar, "iso8601");
        assert!(c.in_leap_year);

        let bad = components(Some("2023-02-30"));
        assert!(!bad.is_valid);
        assert_eq!(bad, PlainDateComponents::default());
    }

    #[test]
    fn test_with_rejects_but_add_constrains() {
        let jan31 = Some("2023-01-31");
        assert_eq!(with(jan31, [U, 2, U], None).error_kind(), ErrorKind::RangeError);
        assert_eq!(with(jan31, [U, 2, 28], None).into_value().unwrap(), "2023-02-28");
        assert_eq!(with(jan31, [U, U, U], Some("M04")).error_kind(), ErrorKind::RangeError);
        assert_eq!(with(jan31, [U, U, U], None).error_kind(), ErrorKind::TypeError);
        assert_eq!(add(jan31, Some("P1M")).into_value().unwrap(), "2023-02-28");
        assert_eq!(subtract(Some("2024-03-31"), Some("P1M")).into_value().unwrap(), "2024-02-29");
    }

    #[test]
    fn test_compare_until_since() {
        let a = Some("2024-12-31");
        let b = Some("2025-01-01");
        assert_eq!(compare(a, b).into_value(), Some(-1));
        assert_eq!(until(a, b, None).into_value().unwrap(), "P1D");
        assert_eq!(since(a, b, None).into_value().unwrap(), "-P1D");
        assert_eq!(until(a, b, Some("hour")).error_kind(), ErrorKind::RangeError);
        assert_eq!(
            until(Some("2024-01-01[u-ca=gregory]"), b, None).error_kind(),
            ErrorKind::RangeError
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(month_code(Some("2024-07-04")).into_value().unwrap(), "M07");
        assert_eq!(
            calendar(Some("2024-07-04[u-ca=japanese]")).into_value().unwrap(),
            "japanese"
        );
        assert_eq!(calendar(None).error_kind(), ErrorKind::TypeError);
    }

    #[test]
    fn test_now_in_zone() {
        // 2024-07-01T12:00:00Z
        let clock = FixedClock::new(1_719_835_200_000_000_000, "Pacific/Kiritimati");
        assert_eq!(now_on(&clock, None).into_value().unwrap(), "2024-07-02");
        assert_eq!(now_on(&clock, Some("UTC")).into_value().unwrap(), "2024-07-01");
    }
}
