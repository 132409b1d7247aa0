//! A month in a particular year.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::calendar::{self, balance_year_month, narrow_year, Calendar};
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::format;
use crate::iso::{ordering_to_i8, IsoDate};
use crate::options::{CalendarDisplay, DifferenceOptions, Overflow, ToStringOptions, Unit};
use crate::parser;
use crate::plain_date::{require_same_calendar, PartialDate, PlainDate};

/// A year and month. The reference day only disambiguates round trips for
/// non-ISO calendars; it is 1 for ISO 8601.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainYearMonth {
    iso: IsoDate,
    calendar: Calendar,
}

/// Replacement fields for [`PlainYearMonth::with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialYearMonth {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub month_code: Option<String>,
}

fn check_limits(year: i32, month: u8) -> Result<()> {
    if !calendar::year_month_within_limits(year, month) {
        return Err(TemporalError::range(format!(
            "year-month {}-{month:02} is outside the representable range",
            format::year(year)
        )));
    }
    Ok(())
}

impl PlainYearMonth {
    /// Build a year-month, rejecting an out-of-range month.
    pub fn try_new(year: i64, month: i64, calendar: Calendar) -> Result<PlainYearMonth> {
        PlainYearMonth::new_with_overflow(year, month, calendar, Overflow::Reject)
    }

    pub fn new_with_overflow(
        year: i64,
        month: i64,
        calendar: Calendar,
        overflow: Overflow,
    ) -> Result<PlainYearMonth> {
        let year = narrow_year(year)?;
        let month = match overflow {
            Overflow::Reject if !(1..=12).contains(&month) => {
                return Err(TemporalError::range(format!(
                    "month {month} is out of range (1..=12)"
                )));
            }
            _ if month < 1 => {
                return Err(TemporalError::range(format!("month {month} must be positive")));
            }
            _ => month.min(12) as u8,
        };
        PlainYearMonth::from_reference(year, month, 1, calendar)
    }

    pub(crate) fn from_reference(
        year: i32,
        month: u8,
        reference_day: u8,
        calendar: Calendar,
    ) -> Result<PlainYearMonth> {
        check_limits(year, month)?;
        Ok(PlainYearMonth {
            iso: IsoDate {
                year,
                month,
                day: reference_day,
            },
            calendar,
        })
    }

    pub fn year(&self) -> i32 {
        self.iso.year
    }

    pub fn month(&self) -> u8 {
        self.iso.month
    }

    pub fn month_code(&self) -> String {
        self.calendar.month_code(self.iso.month)
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn reference_day(&self) -> u8 {
        self.iso.day
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

    pub fn with(&self, fields: &PartialYearMonth) -> Result<PlainYearMonth> {
        self.with_overflow(fields, Overflow::Reject)
    }

    pub fn with_overflow(&self, fields: &PartialYearMonth, overflow: Overflow) -> Result<PlainYearMonth> {
        let partial = PartialDate {
            year: fields.year,
            month: fields.month,
            month_code: fields.month_code.clone(),
            day: None,
        };
        if partial.is_empty() {
            return Err(TemporalError::type_error("no year-month fields to replace"));
        }
        let month = partial.resolve_month(self.calendar)?;
        PlainYearMonth::new_with_overflow(
            fields.year.unwrap_or(i64::from(self.iso.year)),
            month.unwrap_or(i64::from(self.iso.month)),
            self.calendar,
            overflow,
        )
    }

    /// Add whole years and months.
    ///
    /// # Errors
    ///
    /// `RangeError` if the duration has weeks, days or time units, or the
    /// result leaves the representable range.
    pub fn add(&self, duration: &Duration) -> Result<PlainYearMonth> {
        let c = duration.components();
        if c[2..].iter().any(|&v| v != 0) {
            return Err(TemporalError::range(
                "only years and months can be added to a year-month",
            ));
        }
        let (year, month) = balance_year_month(
            i64::from(self.iso.year) + duration.years(),
            i64::from(self.iso.month) + duration.months(),
        );
        let year = narrow_year(year)?;
        PlainYearMonth::from_reference(year, month, 1, self.calendar)
    }

    pub fn subtract(&self, duration: &Duration) -> Result<PlainYearMonth> {
        self.add(&duration.negated())
    }

    /// Difference in years and months (or months only).
    pub fn until(&self, other: &PlainYearMonth, options: DifferenceOptions) -> Result<Duration> {
        require_same_calendar(self.calendar, other.calendar)?;
        let largest = options.resolve(Unit::Year, Unit::Month, Unit::Year)?;
        let months_of = |ym: &PlainYearMonth| i64::from(ym.iso.year) * 12 + i64::from(ym.iso.month);
        let total = months_of(other) - months_of(self);
        let (years, months) = match largest {
            Unit::Year => (total / 12, total % 12),
            _ => (0, total),
        };
        Duration::from_components([years, months, 0, 0, 0, 0, 0, 0, 0, 0])
    }

    pub fn since(&self, other: &PlainYearMonth, options: DifferenceOptions) -> Result<Duration> {
        Ok(self.until(other, options)?.negated())
    }

    /// Orders by year, then month. The reference day plays no part.
    pub fn compare(a: &PlainYearMonth, b: &PlainYearMonth) -> i8 {
        ordering_to_i8((a.iso.year, a.iso.month).cmp(&(b.iso.year, b.iso.month)))
    }

    /// Same year, month and calendar.
    pub fn equals(&self, other: &PlainYearMonth) -> bool {
        PlainYearMonth::compare(self, other) == 0 && self.calendar == other.calendar
    }

    /// The date on `day` of this month, rejecting days past the month's end.
    pub fn to_plain_date(&self, day: i64) -> Result<PlainDate> {
        PlainDate::try_new(
            i64::from(self.iso.year),
            i64::from(self.iso.month),
            day,
            self.calendar,
        )
    }

    pub fn to_string_with_options(&self, options: ToStringOptions) -> Result<String> {
        options.validate()?;
        Ok(self.render(options.calendar))
    }

    fn render(&self, display: CalendarDisplay) -> String {
        let annotation = format::calendar_annotation(self.calendar, display);
        if self.calendar.is_iso() && annotation.is_empty() {
            format::year_month(self.iso)
        } else {
            format!("{}{annotation}", format::date(self.iso))
        }
    }
}

impl FromStr for PlainYearMonth {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<PlainYearMonth> {
        let parsed = parser::parse_year_month(s)?;
        PlainYearMonth::from_reference(parsed.year, parsed.month, parsed.reference_day, parsed.calendar)
    }
}

impl fmt::Display for PlainYearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(CalendarDisplay::Auto))
    }
}

crate::iso_string_serde!(PlainYearMonth);
