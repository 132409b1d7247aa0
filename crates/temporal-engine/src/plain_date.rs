//! Calendar dates without a time or time zone.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::calendar::{self, Calendar, REFERENCE_LEAP_YEAR};
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::format;
use crate::iso::{ordering_to_i8, IsoDate, IsoDateTime, NS_PER_DAY};
use crate::options::{DifferenceOptions, Overflow, ToStringOptions, Unit};
use crate::parser;
use crate::plain_date_time::PlainDateTime;
use crate::plain_month_day::PlainMonthDay;
use crate::plain_time::PlainTime;
use crate::plain_year_month::PlainYearMonth;

/// A date in a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainDate {
    iso: IsoDate,
    calendar: Calendar,
}

/// Replacement date fields for `with`; `None` keeps the original value.
///
/// `month` and `month_code` may both be given only if they agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialDate {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub month_code: Option<String>,
    pub day: Option<i64>,
}

impl PartialDate {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.month_code.is_none() && self.day.is_none()
    }

    /// The replacement month, if any, reconciling `month` with `month_code`.
    pub(crate) fn resolve_month(&self, calendar: Calendar) -> Result<Option<i64>> {
        let from_code = match &self.month_code {
            Some(code) => Some(i64::from(calendar.month_from_code(code)?)),
            None => None,
        };
        match (self.month, from_code) {
            (Some(month), Some(coded)) if month != coded => Err(TemporalError::range(format!(
                "month {month} does not match month code {}",
                self.month_code.as_deref().unwrap_or_default()
            ))),
            (month, coded) => Ok(month.or(coded)),
        }
    }

    /// Overlay these fields on `base`, then build under `overflow`.
    pub(crate) fn apply(&self, base: IsoDate, calendar: Calendar, overflow: Overflow) -> Result<IsoDate> {
        let month = self.resolve_month(calendar)?;
        IsoDate::new(
            self.year.unwrap_or(i64::from(base.year)),
            month.unwrap_or(i64::from(base.month)),
            self.day.unwrap_or(i64::from(base.day)),
            overflow,
        )
    }
}

/// Whole days in the sub-day part of `duration`, truncated toward zero.
pub(crate) fn balanced_days(duration: &Duration) -> Result<i64> {
    let extra = (duration.sub_day_nanoseconds() / NS_PER_DAY) as i64;
    duration
        .days()
        .checked_add(extra)
        .ok_or_else(|| TemporalError::range("date arithmetic overflowed"))
}

pub(crate) fn require_same_calendar(a: Calendar, b: Calendar) -> Result<()> {
    if a != b {
        return Err(TemporalError::range(format!(
            "cannot compute the difference between the {a} and {b} calendars"
        )));
    }
    Ok(())
}

impl PlainDate {
    /// Build a date, rejecting out-of-range fields.
    pub fn try_new(year: i64, month: i64, day: i64, calendar: Calendar) -> Result<PlainDate> {
        PlainDate::new_with_overflow(year, month, day, calendar, Overflow::Reject)
    }

    pub fn new_with_overflow(
        year: i64,
        month: i64,
        day: i64,
        calendar: Calendar,
        overflow: Overflow,
    ) -> Result<PlainDate> {
        Ok(PlainDate {
            iso: IsoDate::new(year, month, day, overflow)?,
            calendar,
        })
    }

    pub(crate) fn from_iso(iso: IsoDate, calendar: Calendar) -> PlainDate {
        PlainDate { iso, calendar }
    }

    pub(crate) fn iso(&self) -> IsoDate {
        self.iso
    }

    pub fn year(&self) -> i32 {
        self.iso.year
    }

    pub fn month(&self) -> u8 {
        self.iso.month
    }

    pub fn day(&self) -> u8 {
        self.iso.day
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn month_code(&self) -> String {
        self.calendar.month_code(self.iso.month)
    }

    /// Monday = 1 through Sunday = 7.
    pub fn day_of_week(&self) -> u8 {
        calendar::weekday_from_epoch_days(self.iso.epoch_days())
    }

    pub fn day_of_year(&self) -> u16 {
        calendar::day_of_year(self.iso.year, self.iso.month, self.iso.day)
    }

    pub fn week_of_year(&self) -> u8 {
        calendar::iso_week(self.iso.year, self.iso.month, self.iso.day).0
    }

    pub fn year_of_week(&self) -> i32 {
        calendar::iso_week(self.iso.year, self.iso.month, self.iso.day).1
    }

    pub fn days_in_week(&self) -> u8 {
        self.calendar.days_in_week()
    }

    pub fn days_in_month(&self) -> u8 {
        calendar::days_in_month(self.iso.year, self.iso.month)
    }

    pub fn days_in_year(&self) -> u16 {
        self.calendar.days_in_year(self.iso.year)
    }

    pub fn months_in_year(&self) -> u8 {
        self.calendar.months_in_year(self.iso.year)
    }

    pub fn in_leap_year(&self) -> bool {
        self.calendar.is_leap_year(self.iso.year)
    }

    /// Replace fields, failing if the result is not a valid date.
    pub fn with(&self, fields: &PartialDate) -> Result<PlainDate> {
        self.with_overflow(fields, Overflow::Reject)
    }

    pub fn with_overflow(&self, fields: &PartialDate, overflow: Overflow) -> Result<PlainDate> {
        if fields.is_empty() {
            return Err(TemporalError::type_error("no date fields to replace"));
        }
        Ok(PlainDate {
            iso: fields.apply(self.iso, self.calendar, overflow)?,
            calendar: self.calendar,
        })
    }

    pub fn with_calendar(&self, calendar: Calendar) -> PlainDate {
        PlainDate { calendar, ..*self }
    }

    /// Add a duration, clamping the day to the end of the resulting month.
    pub fn add(&self, duration: &Duration) -> Result<PlainDate> {
        self.add_with_overflow(duration, Overflow::Constrain)
    }

    /// Add years and months first, then weeks and days. Time units are
    /// balanced into whole days.
    pub fn add_with_overflow(&self, duration: &Duration, overflow: Overflow) -> Result<PlainDate> {
        let days = balanced_days(duration)?;
        let iso = self.iso.add(
            duration.years(),
            duration.months(),
            duration.weeks(),
            days,
            overflow,
        )?;
        Ok(PlainDate {
            iso,
            calendar: self.calendar,
        })
    }

    pub fn subtract(&self, duration: &Duration) -> Result<PlainDate> {
        self.add(&duration.negated())
    }

    pub fn subtract_with_overflow(&self, duration: &Duration, overflow: Overflow) -> Result<PlainDate> {
        self.add_with_overflow(&duration.negated(), overflow)
    }

    /// Difference from `self` to `other` in years, months, weeks or days.
    pub fn until(&self, other: &PlainDate, options: DifferenceOptions) -> Result<Duration> {
        require_same_calendar(self.calendar, other.calendar)?;
        let largest = options.resolve(Unit::Year, Unit::Day, Unit::Year)?;
        let (years, months, weeks, days) = self.iso.until(other.iso, largest);
        Duration::from_components([years, months, weeks, days, 0, 0, 0, 0, 0, 0])
    }

    pub fn since(&self, other: &PlainDate, options: DifferenceOptions) -> Result<Duration> {
        Ok(self.until(other, options)?.negated())
    }

    /// Order by ISO date, ignoring the calendar.
    pub fn compare(a: &PlainDate, b: &PlainDate) -> i8 {
        ordering_to_i8(a.iso.cmp(&b.iso))
    }

    /// Same date and same calendar.
    pub fn equals(&self, other: &PlainDate) -> bool {
        self == other
    }

    /// Combine with a time, midnight if `None`.
    pub fn to_plain_date_time(&self, time: Option<PlainTime>) -> Result<PlainDateTime> {
        let time = time.unwrap_or_default();
        PlainDateTime::from_iso(
            IsoDateTime {
                date: self.iso,
                time: time.iso(),
            },
            self.calendar,
        )
    }

    pub fn to_plain_year_month(&self) -> Result<PlainYearMonth> {
        PlainYearMonth::try_new(
            i64::from(self.iso.year),
            i64::from(self.iso.month),
            self.calendar,
        )
    }

    pub fn to_plain_month_day(&self) -> Result<PlainMonthDay> {
        let reference_year = if self.calendar.is_iso() {
            REFERENCE_LEAP_YEAR
        } else {
            self.iso.year
        };
        PlainMonthDay::from_reference(self.iso.month, self.iso.day, reference_year, self.calendar)
    }

    pub fn to_string_with_options(&self, options: ToStringOptions) -> Result<String> {
        options.validate()?;
        Ok(format!(
            "{}{}",
            format::date(self.iso),
            format::calendar_annotation(self.calendar, options.calendar)
        ))
    }
}

impl FromStr for PlainDate {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<PlainDate> {
        let (iso, calendar) = parser::parse_date(s)?;
        Ok(PlainDate { iso, calendar })
    }
}

impl fmt::Display for PlainDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            format::date(self.iso),
            format::calendar_annotation(self.calendar, Default::default())
        )
    }
}

crate::iso_string_serde!(PlainDate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn date(s: &str) -> PlainDate {
        s.parse().unwrap()
    }

    fn dur(s: &str) -> Duration {
        s.parse().unwrap()
    }

    #[test]
    fn test_try_new_validates() {
        let d = PlainDate::try_new(2024, 2, 29, Calendar::Iso8601).unwrap();
        assert_eq!(d.to_string(), "2024-02-29");
        assert_eq!(
            PlainDate::try_new(2023, 2, 29, Calendar::Iso8601).unwrap_err().kind(),
            ErrorKind::Range
        );
        assert!(PlainDate::try_new(2024, 4, 31, Calendar::Iso8601).is_err());
        assert!(PlainDate::try_new(2024, 13, 1, Calendar::Iso8601).is_err());
        assert!(PlainDate::try_new(275_761, 1, 1, Calendar::Iso8601).is_err());
    }

    #[test]
    fn test_derived_fields() {
        let d = date("2024-12-31");
        assert_eq!(d.day_of_week(), 2);
        assert_eq!(d.day_of_year(), 366);
        assert_eq!(d.week_of_year(), 1);
        assert_eq!(d.year_of_week(), 2025);
        assert_eq!(d.days_in_month(), 31);
        assert_eq!(d.days_in_year(), 366);
        assert!(d.in_leap_year());
        assert_eq!(d.months_in_year(), 12);
        assert_eq!(d.month_code(), "M12");

        let d = date("2021-01-03");
        assert_eq!(d.day_of_week(), 7);
        assert_eq!((d.week_of_year(), d.year_of_week()), (53, 2020));
    }

    #[test]
    fn test_add_constrains_month_end() {
        assert_eq!(date("2024-01-31").add(&dur("P1M")).unwrap().to_string(), "2024-02-29");
        assert_eq!(date("2023-01-31").add(&dur("P1M")).unwrap().to_string(), "2023-02-28");
        assert_eq!(
            date("2024-02-29").add(&dur("P1Y")).unwrap().to_string(),
            "2025-02-28"
        );
        assert!(date("2024-01-31")
            .add_with_overflow(&dur("P1M"), Overflow::Reject)
            .is_err());
        assert_eq!(
            date("2024-03-31").subtract(&dur("P1M")).unwrap().to_string(),
            "2024-02-29"
        );
    }

    #[test]
    fn test_add_balances_time_into_days() {
        assert_eq!(date("2024-01-01").add(&dur("PT47H")).unwrap().to_string(), "2024-01-02");
        assert_eq!(date("2024-01-01").add(&dur("P1W2DT24H")).unwrap().to_string(), "2024-01-11");
        assert_eq!(
            date("2024-01-01").subtract(&dur("PT23H")).unwrap().to_string(),
            "2024-01-01"
        );
    }

    #[test]
    fn test_with_rejects_invalid_day() {
        let err = date("2023-01-31")
            .with(&PartialDate {
                month: Some(2),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        let constrained = date("2023-01-31")
            .with_overflow(
                &PartialDate {
                    month: Some(2),
                    ..Default::default()
                },
                Overflow::Constrain,
            )
            .unwrap();
        assert_eq!(constrained.to_string(), "2023-02-28");
    }

    #[test]
    fn test_with_month_code() {
        let d = date("2024-05-15")
            .with(&PartialDate {
                month_code: Some("M09".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(d.to_string(), "2024-09-15");
        let err = date("2024-05-15")
            .with(&PartialDate {
                month: Some(3),
                month_code: Some("M04".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_until_since() {
        let a = date("2020-02-29");
        let b = date("2024-03-15");
        let d = a.until(&b, DifferenceOptions::default()).unwrap();
        assert_eq!(d.to_string(), "P4Y15D");
        assert_eq!(a.since(&b, DifferenceOptions::default()).unwrap(), d.negated());
        let d = a.until(&b, DifferenceOptions::largest(Unit::Week)).unwrap();
        assert_eq!(d.to_string(), "P210W6D");
        assert!(a.until(&b, DifferenceOptions::largest(Unit::Hour)).is_err());
        let greg = b.with_calendar(Calendar::Gregory);
        assert_eq!(
            a.until(&greg, DifferenceOptions::default()).unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn test_compare_and_equals() {
        let a = date("2024-12-31");
        let b = date("2025-01-01");
        assert_eq!(PlainDate::compare(&a, &b), -1);
        let g = a.with_calendar(Calendar::Gregory);
        assert_eq!(PlainDate::compare(&a, &g), 0);
        assert!(!a.equals(&g));
        assert!(a.equals(&date("2024-12-31[u-ca=iso8601]")));
    }

    #[test]
    fn test_calendar_annotation_round_trip() {
        let d = date("2024-03-05[u-ca=japanese]");
        assert_eq!(d.calendar(), Calendar::Japanese);
        assert_eq!(d.to_string(), "2024-03-05[u-ca=japanese]");
        assert_eq!(date(&d.to_string()), d);
    }

    #[test]
    fn test_conversions() {
        let d = date("2024-02-29");
        assert_eq!(d.to_plain_year_month().unwrap().to_string(), "2024-02");
        assert_eq!(d.to_plain_month_day().unwrap().to_string(), "02-29");
        let noon = PlainTime::try_new(12, 0, 0, 0, 0, 0).unwrap();
        assert_eq!(
            d.to_plain_date_time(Some(noon)).unwrap().to_string(),
            "2024-02-29T12:00:00"
        );
    }
}
