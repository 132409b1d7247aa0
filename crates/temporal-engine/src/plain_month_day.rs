//! A recurring day of the year, such as a birthday.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::calendar::{Calendar, REFERENCE_LEAP_YEAR};
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::format;
use crate::iso::{ordering_to_i8, IsoDate};
use crate::options::{CalendarDisplay, DifferenceOptions, Overflow, ToStringOptions, Unit};
use crate::parser;
use crate::plain_date::{balanced_days, require_same_calendar, PartialDate, PlainDate};

/// A month and day. ISO 8601 values are anchored to the leap year 1972 so
/// February 29 is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainMonthDay {
    iso: IsoDate,
    calendar: Calendar,
}

/// Replacement fields for [`PlainMonthDay::with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialMonthDay {
    pub month: Option<i64>,
    pub month_code: Option<String>,
    pub day: Option<i64>,
}

impl PlainMonthDay {
    /// Build a month-day, rejecting a day that never occurs in `month`.
    pub fn try_new(month: i64, day: i64, calendar: Calendar) -> Result<PlainMonthDay> {
        PlainMonthDay::new_with_overflow(month, day, calendar, Overflow::Reject)
    }

    pub fn new_with_overflow(
        month: i64,
        day: i64,
        calendar: Calendar,
        overflow: Overflow,
    ) -> Result<PlainMonthDay> {
        let iso = IsoDate::new(i64::from(REFERENCE_LEAP_YEAR), month, day, overflow)?;
        Ok(PlainMonthDay { iso, calendar })
    }

    pub(crate) fn from_reference(
        month: u8,
        day: u8,
        reference_year: i32,
        calendar: Calendar,
    ) -> Result<PlainMonthDay> {
        let iso = IsoDate::new(
            i64::from(reference_year),
            i64::from(month),
            i64::from(day),
            Overflow::Reject,
        )?;
        Ok(PlainMonthDay { iso, calendar })
    }

    fn reanchor(iso: IsoDate, calendar: Calendar) -> Result<PlainMonthDay> {
        let year = if calendar.is_iso() {
            REFERENCE_LEAP_YEAR
        } else {
            iso.year
        };
        PlainMonthDay::from_reference(iso.month, iso.day, year, calendar)
    }

    pub fn month(&self) -> u8 {
        self.iso.month
    }

    pub fn day(&self) -> u8 {
        self.iso.day
    }

    pub fn month_code(&self) -> String {
        self.calendar.month_code(self.iso.month)
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn reference_year(&self) -> i32 {
        self.iso.year
    }

    pub fn with(&self, fields: &PartialMonthDay) -> Result<PlainMonthDay> {
        self.with_overflow(fields, Overflow::Reject)
    }

    pub fn with_overflow(&self, fields: &PartialMonthDay, overflow: Overflow) -> Result<PlainMonthDay> {
        let partial = PartialDate {
            year: None,
            month: fields.month,
            month_code: fields.month_code.clone(),
            day: fields.day,
        };
        if partial.is_empty() {
            return Err(TemporalError::type_error("no month-day fields to replace"));
        }
        let iso = partial.apply(self.iso, self.calendar, overflow)?;
        Ok(PlainMonthDay {
            iso,
            calendar: self.calendar,
        })
    }

    /// Add years through days to the reference date, constraining the day,
    /// then re-anchor the resulting month and day.
    pub fn add(&self, duration: &Duration) -> Result<PlainMonthDay> {
        self.add_with_overflow(duration, Overflow::Constrain)
    }

    pub fn add_with_overflow(&self, duration: &Duration, overflow: Overflow) -> Result<PlainMonthDay> {
        if duration.sub_day_nanoseconds() != 0 {
            return Err(TemporalError::range(
                "time units cannot be added to a month-day",
            ));
        }
        let days = balanced_days(duration)?;
        let moved = self.iso.add(
            duration.years(),
            duration.months(),
            duration.weeks(),
            days,
            overflow,
        )?;
        PlainMonthDay::reanchor(moved, self.calendar)
    }

    pub fn subtract(&self, duration: &Duration) -> Result<PlainMonthDay> {
        self.add(&duration.negated())
    }

    /// Difference within the reference year, in months and days by default.
    pub fn until(&self, other: &PlainMonthDay, options: DifferenceOptions) -> Result<Duration> {
        require_same_calendar(self.calendar, other.calendar)?;
        let largest = options.resolve(Unit::Month, Unit::Day, Unit::Month)?;
        let start = self.in_reference_year();
        let (years, months, weeks, days) = start.until(other.in_reference_year(), largest);
        Duration::from_components([years, months, weeks, days, 0, 0, 0, 0, 0, 0])
    }

    pub fn since(&self, other: &PlainMonthDay, options: DifferenceOptions) -> Result<Duration> {
        Ok(self.until(other, options)?.negated())
    }

    /// Orders by month, then day. The reference year plays no part.
    pub fn compare(a: &PlainMonthDay, b: &PlainMonthDay) -> i8 {
        ordering_to_i8((a.iso.month, a.iso.day).cmp(&(b.iso.month, b.iso.day)))
    }

    /// Same month, day and calendar.
    pub fn equals(&self, other: &PlainMonthDay) -> bool {
        PlainMonthDay::compare(self, other) == 0 && self.calendar == other.calendar
    }

    /// This month and day in the reference leap year, where every month-day exists.
    fn in_reference_year(&self) -> IsoDate {
        IsoDate {
            year: REFERENCE_LEAP_YEAR,
            ..self.iso
        }
    }

    /// This month and day in `year`; February 29 becomes February 28 in
    /// common years.
    pub fn to_plain_date(&self, year: i64) -> Result<PlainDate> {
        PlainDate::new_with_overflow(
            year,
            i64::from(self.iso.month),
            i64::from(self.iso.day),
            self.calendar,
            Overflow::Constrain,
        )
    }

    pub fn to_string_with_options(&self, options: ToStringOptions) -> Result<String> {
        options.validate()?;
        Ok(self.render(options.calendar))
    }

    fn render(&self, display: CalendarDisplay) -> String {
        let annotation = format::calendar_annotation(self.calendar, display);
        if self.calendar.is_iso() && annotation.is_empty() {
            format::month_day(self.iso)
        } else {
            format!("{}{annotation}", format::date(self.iso))
        }
    }
}

impl FromStr for PlainMonthDay {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<PlainMonthDay> {
        let parsed = parser::parse_month_day(s)?;
        PlainMonthDay::from_reference(parsed.month, parsed.day, parsed.reference_year, parsed.calendar)
    }
}

impl fmt::Display for PlainMonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(CalendarDisplay::Auto))
    }
}

crate::iso_string_serde!(PlainMonthDay);
