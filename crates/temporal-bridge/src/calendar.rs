//! Calendar queries over raw integers. Month and day are validated before
//! any derived field is computed, so `2023-04-31` is a `RangeError` rather
//! than a day of the week.

use temporal_engine::{Calendar, TemporalError};

use crate::{calendar_or_iso, Outcome};

/// Month counts do not vary by year in any supported calendar.
const EPOCH_YEAR: i32 = 1970;

fn year(value: i64) -> temporal_engine::Result<i32> {
    i32::try_from(value).map_err(|_| TemporalError::Range(format!("year {value} is out of range")))
}

fn small(value: i64, what: &str) -> temporal_engine::Result<u8> {
    u8::try_from(value).map_err(|_| TemporalError::Range(format!("{what} {value} is out of range")))
}

/// Run an ISO date query on `(year, month, day)`.
fn iso_query<T>(
    y: i64,
    m: i64,
    d: i64,
    query: impl FnOnce(Calendar, i32, u8, u8) -> temporal_engine::Result<T>,
) -> Outcome<T> {
    let result = || query(Calendar::Iso8601, year(y)?, small(m, "month")?, small(d, "day")?);
    result().into()
}

pub fn days_in_month(y: i64, month: i64, calendar: Option<&str>) -> Outcome<u8> {
    let result = || calendar_or_iso(calendar)?.days_in_month(year(y)?, small(month, "month")?);
    result().into()
}

pub fn days_in_year(y: i64, calendar: Option<&str>) -> Outcome<u16> {
    let result = || -> temporal_engine::Result<u16> {
        Ok(calendar_or_iso(calendar)?.days_in_year(year(y)?))
    };
    result().into()
}

pub fn is_leap_year(y: i64, calendar: Option<&str>) -> Outcome<bool> {
    let result = || -> temporal_engine::Result<bool> {
        Ok(calendar_or_iso(calendar)?.is_leap_year(year(y)?))
    };
    result().into()
}

pub fn months_in_year(calendar: Option<&str>) -> Outcome<u8> {
    calendar_or_iso(calendar)
        .map(|cal| cal.months_in_year(EPOCH_YEAR))
        .into()
}

/// Monday = 1 through Sunday = 7.
pub fn day_of_week(y: i64, m: i64, d: i64) -> Outcome<u8> {
    iso_query(y, m, d, Calendar::day_of_week)
}

pub fn day_of_year(y: i64, m: i64, d: i64) -> Outcome<u16> {
    iso_query(y, m, d, Calendar::day_of_year)
}

pub fn week_of_year(y: i64, m: i64, d: i64) -> Outcome<u8> {
    iso_query(y, m, d, Calendar::week_of_year)
}

pub fn year_of_week(y: i64, m: i64, d: i64) -> Outcome<i32> {
    iso_query(y, m, d, Calendar::year_of_week)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_month_and_year_lengths() {
        assert_eq!(days_in_month(2024, 2, None).into_value(), Some(29));
        assert_eq!(days_in_month(2100, 2, None).into_value(), Some(28));
        assert_eq!(days_in_month(2024, 13, None).error_kind(), ErrorKind::RangeError);
        assert_eq!(days_in_month(2024, 300, None).error_kind(), ErrorKind::RangeError);
        assert_eq!(days_in_month(2024, 2, Some("nope")).error_kind(), ErrorKind::TypeError);
        assert_eq!(days_in_year(2000, None).into_value(), Some(366));
        assert_eq!(days_in_year(1900, Some("gregory")).into_value(), Some(365));
        assert_eq!(is_leap_year(2024, None).into_value(), Some(true));
        assert_eq!(is_leap_year(i64::MAX, None).error_kind(), ErrorKind::RangeError);
        assert_eq!(months_in_year(None).into_value(), Some(12));
        assert_eq!(months_in_year(Some("hebrew")).into_value(), Some(12));
    }

    #[test]
    fn test_iso_week_rule() {
        assert_eq!(day_of_week(2024, 12, 31).into_value(), Some(2));
        assert_eq!(week_of_year(2024, 12, 31).into_value(), Some(1));
        assert_eq!(year_of_week(2024, 12, 31).into_value(), Some(2025));
        assert_eq!(week_of_year(2021, 1, 3).into_value(), Some(53));
        assert_eq!(year_of_week(2021, 1, 3).into_value(), Some(2020));
        assert_eq!(day_of_year(2024, 12, 31).into_value(), Some(366));
    }

    #[test]
    fn test_invalid_day_is_rejected_first() {
        assert_eq!(day_of_week(2023, 4, 31).error_kind(), ErrorKind::RangeError);
        assert_eq!(day_of_year(2023, 2, 29).error_kind(), ErrorKind::RangeError);
        assert_eq!(week_of_year(2023, 1, 0).error_kind(), ErrorKind::RangeError);
        assert_eq!(year_of_week(2023, -1, 1).error_kind(), ErrorKind::RangeError);
    }
}
