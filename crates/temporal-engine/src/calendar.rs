//! Calendar identifiers and ISO 8601 calendar rules.
//!
//! Calendars form a closed set. Only [`Calendar::Iso8601`] has its own rules
//! defined here; every other identifier is a recognized tag that is carried
//! through values and rendered in annotations, while the underlying
//! arithmetic stays proleptic Gregorian.
//!
//! All functions taking `(year, month, day)` validate the tuple before doing
//! any derived-field math, so a day 31 in a 30-day month is a `RangeError`
//! rather than a silently wrong weekday.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TemporalError};

/// Day number (since 1970-01-01) of the earliest representable date, -271821-04-19.
pub(crate) const MIN_EPOCH_DAYS: i64 = -100_000_001;
/// Day number (since 1970-01-01) of the latest representable date, +275760-09-13.
pub(crate) const MAX_EPOCH_DAYS: i64 = 100_000_000;

pub(crate) const MIN_YEAR: i32 = -271_821;
pub(crate) const MAX_YEAR: i32 = 275_760;

/// ISO reference year used by month-day values: a leap year, so February 29 is valid.
pub(crate) const REFERENCE_LEAP_YEAR: i32 = 1972;

/// A calendar identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Calendar {
    #[default]
    Iso8601,
    Buddhist,
    Chinese,
    Coptic,
    Dangi,
    Ethioaa,
    Ethiopic,
    Gregory,
    Hebrew,
    Indian,
    IslamicCivil,
    IslamicTbla,
    IslamicUmalqura,
    Japanese,
    Persian,
    Roc,
}

const ALL_CALENDARS: [Calendar; 16] = [
    Calendar::Iso8601,
    Calendar::Buddhist,
    Calendar::Chinese,
    Calendar::Coptic,
    Calendar::Dangi,
    Calendar::Ethioaa,
    Calendar::Ethiopic,
    Calendar::Gregory,
    Calendar::Hebrew,
    Calendar::Indian,
    Calendar::IslamicCivil,
    Calendar::IslamicTbla,
    Calendar::IslamicUmalqura,
    Calendar::Japanese,
    Calendar::Persian,
    Calendar::Roc,
];

impl Calendar {
    /// Parse a calendar identifier (ASCII case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns a `TypeError` if the identifier is empty or not recognized.
    pub fn from_identifier(id: &str) -> Result<Calendar> {
        if id.is_empty() {
            return Err(TemporalError::type_error("calendar identifier is empty"));
        }
        ALL_CALENDARS
            .iter()
            .copied()
            .find(|cal| cal.identifier().eq_ignore_ascii_case(id))
            .ok_or_else(|| {
                TemporalError::type_error(format!("unknown calendar identifier '{id}'"))
            })
    }

    /// The canonical identifier, e.g. `"iso8601"` or `"islamic-civil"`.
    pub fn identifier(self) -> &'static str {
        match self {
            Calendar::Iso8601 => "iso8601",
            Calendar::Buddhist => "buddhist",
            Calendar::Chinese => "chinese",
            Calendar::Coptic => "coptic",
            Calendar::Dangi => "dangi",
            Calendar::Ethioaa => "ethioaa",
            Calendar::Ethiopic => "ethiopic",
            Calendar::Gregory => "gregory",
            Calendar::Hebrew => "hebrew",
            Calendar::Indian => "indian",
            Calendar::IslamicCivil => "islamic-civil",
            Calendar::IslamicTbla => "islamic-tbla",
            Calendar::IslamicUmalqura => "islamic-umalqura",
            Calendar::Japanese => "japanese",
            Calendar::Persian => "persian",
            Calendar::Roc => "roc",
        }
    }

    pub fn is_iso(self) -> bool {
        self == Calendar::Iso8601
    }

    /// Number of months in `year`. Always 12 for the calendars supported here.
    pub fn months_in_year(self, _year: i32) -> u8 {
        // Every tag shares ISO month structure.
        12
    }

    pub fn days_in_week(self) -> u8 {
        7
    }

    pub fn is_leap_year(self, year: i32) -> bool {
        is_leap_year(year)
    }

    pub fn days_in_year(self, year: i32) -> u16 {
        days_in_year(year)
    }

    /// Days in `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns a `RangeError` if `month` is outside `1..=months_in_year`.
    pub fn days_in_month(self, year: i32, month: u8) -> Result<u8> {
        self.check_month(year, month)?;
        Ok(days_in_month(year, month))
    }

    /// Validate a full date against this calendar's month and day ranges.
    pub fn validate_date(self, year: i32, month: u8, day: u8) -> Result<()> {
        self.check_month(year, month)?;
        let max = days_in_month(year, month);
        if day < 1 || day > max {
            return Err(TemporalError::range(format!(
                "day {day} is out of range for {year:04}-{month:02} (1..={max})"
            )));
        }
        Ok(())
    }

    /// ISO day of week, Monday = 1 through Sunday = 7.
    pub fn day_of_week(self, year: i32, month: u8, day: u8) -> Result<u8> {
        self.validate_date(year, month, day)?;
        Ok(weekday_from_epoch_days(epoch_days_from_date(year, month, day)))
    }

    /// Ordinal day within the year, starting at 1.
    pub fn day_of_year(self, year: i32, month: u8, day: u8) -> Result<u16> {
        self.validate_date(year, month, day)?;
        Ok(day_of_year(year, month, day))
    }

    /// ISO week number (1..=53) under the first-Thursday rule.
    pub fn week_of_year(self, year: i32, month: u8, day: u8) -> Result<u8> {
        self.validate_date(year, month, day)?;
        Ok(iso_week(year, month, day).0)
    }

    /// The year the ISO week containing this date belongs to.
    pub fn year_of_week(self, year: i32, month: u8, day: u8) -> Result<i32> {
        self.validate_date(year, month, day)?;
        Ok(iso_week(year, month, day).1)
    }

    /// Month code such as `"M02"`.
    pub fn month_code(self, month: u8) -> String {
        format!("M{month:02}")
    }

    /// Resolve a month code back to an ordinal month.
    pub fn month_from_code(self, code: &str) -> Result<u8> {
        let digits = code
            .strip_prefix('M')
            .filter(|d| d.len() == 2 && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| TemporalError::range(format!("invalid month code '{code}'")))?;
        let month: u8 = digits
            .parse()
            .map_err(|_| TemporalError::range(format!("invalid month code '{code}'")))?;
        if month < 1 || month > 12 {
            return Err(TemporalError::range(format!(
                "month code '{code}' is not valid in the {} calendar",
                self.identifier()
            )));
        }
        Ok(month)
    }

    fn check_month(self, year: i32, month: u8) -> Result<()> {
        let max = self.months_in_year(year);
        if month < 1 || month > max {
            return Err(TemporalError::range(format!(
                "month {month} is out of range (1..={max})"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Calendar {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Calendar> {
        Calendar::from_identifier(s)
    }
}

impl Serialize for Calendar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

impl<'de> Deserialize<'de> for Calendar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Calendar::from_identifier(&id).map_err(serde::de::Error::custom)
    }
}

// ── ISO 8601 rules ──────────────────────────────────────────────────────────

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Days in an ISO month. `month` must already be in `1..=12`.
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

pub(crate) fn day_of_year(year: i32, month: u8, day: u8) -> u16 {
    const CUMULATIVE: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let mut doy = CUMULATIVE[usize::from(month - 1)] + u16::from(day);
    if month > 2 && is_leap_year(year) {
        doy += 1;
    }
    doy
}

/// Days since 1970-01-01 for a valid ISO date.
pub(crate) const fn epoch_days_from_date(year: i32, month: u8, day: u8) -> i64 {
    let y = year as i64 - if month <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`epoch_days_from_date`].
pub(crate) const fn date_from_epoch_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + if m <= 2 { 1 } else { 0 };
    (y as i32, m as u8, d as u8)
}

/// 1970-01-01 was a Thursday.
pub(crate) fn weekday_from_epoch_days(days: i64) -> u8 {
    ((days + 3).rem_euclid(7) + 1) as u8
}

/// Epoch day of the Monday that starts ISO week 1 of `year`.
fn iso_week_start(year: i32) -> i64 {
    let jan4 = epoch_days_from_date(year, 1, 4);
    jan4 - i64::from(weekday_from_epoch_days(jan4) - 1)
}

/// `(week_of_year, year_of_week)` for a valid ISO date.
pub(crate) fn iso_week(year: i32, month: u8, day: u8) -> (u8, i32) {
    let days = epoch_days_from_date(year, month, day);
    let year_of_week = if days >= iso_week_start(year + 1) {
        year + 1
    } else if days < iso_week_start(year) {
        year - 1
    } else {
        year
    };
    let week = (days - iso_week_start(year_of_week)) / 7 + 1;
    (week as u8, year_of_week)
}

/// Normalize a possibly out-of-range `(year, month)` pair, with `month` 1-based.
pub(crate) fn balance_year_month(year: i64, month: i64) -> (i64, u8) {
    let year = year + (month - 1).div_euclid(12);
    let month = ((month - 1).rem_euclid(12) + 1) as u8;
    (year, month)
}

/// Whether a date lies within the representable range.
pub(crate) fn date_within_limits(year: i32, month: u8, day: u8) -> bool {
    let days = epoch_days_from_date(year, month, day);
    (MIN_EPOCH_DAYS..=MAX_EPOCH_DAYS).contains(&days)
}

/// Whether a year-month lies within the representable range.
pub(crate) fn year_month_within_limits(year: i32, month: u8) -> bool {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return false;
    }
    !(year == MIN_YEAR && month < 4 || year == MAX_YEAR && month > 9)
}

pub(crate) fn check_date_limits(year: i32, month: u8, day: u8) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !date_within_limits(year, month, day) {
        return Err(TemporalError::range(format!(
            "date {year}-{month:02}-{day:02} is outside the representable range"
        )));
    }
    Ok(())
}

/// Convert a year that may exceed `i32` into one, or fail with a range error.
pub(crate) fn narrow_year(year: i64) -> Result<i32> {
    i32::try_from(year)
        .ok()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
        .ok_or_else(|| TemporalError::range(format!("year {year} is outside the representable range")))
}
