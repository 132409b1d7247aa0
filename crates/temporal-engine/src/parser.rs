//! ISO 8601 / RFC 9557 string parsing.
//!
//! Each parse function turns text into a validated field record for one value
//! kind. Text that does not match the grammar is a `TypeError`; text that
//! matches but carries an out-of-range field (month 13, hour 24, second 60) is
//! a `RangeError`. Ranges are checked only after the whole string has matched,
//! so trailing garbage is always reported as a grammar error.

use crate::calendar::{narrow_year, Calendar, REFERENCE_LEAP_YEAR};
use crate::error::{Result, TemporalError};
use crate::iso::{IsoDate, IsoDateTime, IsoTime};
use crate::options::Overflow;

/// The value kinds the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Instant,
    PlainDate,
    PlainTime,
    PlainDateTime,
    PlainYearMonth,
    PlainMonthDay,
    Duration,
}

/// Validated fields produced by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
    Instant {
        date_time: IsoDateTime,
        /// UTC offset in nanoseconds; subtract it to get UTC.
        offset_ns: i64,
    },
    PlainDate {
        date: IsoDate,
        calendar: Calendar,
    },
    PlainTime(IsoTime),
    PlainDateTime {
        date_time: IsoDateTime,
        calendar: Calendar,
    },
    PlainYearMonth {
        year: i32,
        month: u8,
        reference_day: u8,
        calendar: Calendar,
    },
    PlainMonthDay {
        month: u8,
        day: u8,
        reference_year: i32,
        calendar: Calendar,
    },
    /// Signed components, years through nanoseconds.
    Duration([i64; 10]),
}

/// Parse `text` as the given kind.
pub fn parse(kind: Kind, text: &str) -> Result<Fields> {
    let fields = match kind {
        Kind::Instant => {
            let (date_time, offset_ns) = parse_instant(text)?;
            Fields::Instant {
                date_time,
                offset_ns,
            }
        }
        Kind::PlainDate => {
            let (date, calendar) = parse_date(text)?;
            Fields::PlainDate { date, calendar }
        }
        Kind::PlainTime => Fields::PlainTime(parse_time(text)?),
        Kind::PlainDateTime => {
            let (date_time, calendar) = parse_date_time(text)?;
            Fields::PlainDateTime {
                date_time,
                calendar,
            }
        }
        Kind::PlainYearMonth => {
            let ym = parse_year_month(text)?;
            Fields::PlainYearMonth {
                year: ym.year,
                month: ym.month,
                reference_day: ym.reference_day,
                calendar: ym.calendar,
            }
        }
        Kind::PlainMonthDay => {
            let md = parse_month_day(text)?;
            Fields::PlainMonthDay {
                month: md.month,
                day: md.day,
                reference_year: md.reference_year,
                calendar: md.calendar,
            }
        }
        Kind::Duration => Fields::Duration(parse_duration(text)?),
    };
    Ok(fields)
}

// ── Raw records (grammar matched, ranges not yet checked) ──────────────────

#[derive(Debug, Clone, Copy, Default)]
struct RawTime {
    hour: i64,
    minute: i64,
    second: i64,
    /// Fraction of a second, in nanoseconds.
    fraction: i64,
}

#[derive(Debug, Clone, Copy)]
enum RawOffset {
    Utc,
    Numeric(i64),
}

#[derive(Debug, Clone, Copy)]
struct RawDate {
    year: i64,
    month: i64,
    day: i64,
}

#[derive(Debug, Default)]
struct Annotations {
    calendar: Option<Calendar>,
}

#[derive(Debug)]
struct RawDateTime {
    date: RawDate,
    time: Option<RawTime>,
    offset: Option<RawOffset>,
    annotations: Annotations,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ParsedYearMonth {
    pub year: i32,
    pub month: u8,
    pub reference_day: u8,
    pub calendar: Calendar,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ParsedMonthDay {
    pub month: u8,
    pub day: u8,
    pub reference_year: i32,
    pub calendar: Calendar,
}

// ── Cursor ──────────────────────────────────────────────────────────────────

struct Cursor<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_ignore_case(&mut self, byte: u8) -> bool {
        match self.peek() {
            Some(b) if b.eq_ignore_ascii_case(&byte) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Consume `+`, `-` or U+2212 MINUS SIGN, returning `-1` or `1`.
    fn eat_sign(&mut self) -> Option<i64> {
        match self.peek() {
            Some(b'+') => {
                self.pos += 1;
                Some(1)
            }
            Some(b'-') => {
                self.pos += 1;
                Some(-1)
            }
            Some(0xE2) if self.peek_at(1) == Some(0x88) && self.peek_at(2) == Some(0x92) => {
                self.pos += 3;
                Some(-1)
            }
            _ => None,
        }
    }

    fn starts_with_sign(&self) -> bool {
        matches!(self.peek(), Some(b'+' | b'-'))
            || (self.peek() == Some(0xE2)
                && self.peek_at(1) == Some(0x88)
                && self.peek_at(2) == Some(0x92))
    }

    fn is_digit_at(&self, offset: usize) -> bool {
        self.peek_at(offset).is_some_and(|b| b.is_ascii_digit())
    }

    /// Exactly `n` ASCII digits.
    fn digits(&mut self, n: usize, what: &str) -> Result<i64> {
        let mut value = 0i64;
        for i in 0..n {
            match self.peek_at(i) {
                Some(b) if b.is_ascii_digit() => value = value * 10 + i64::from(b - b'0'),
                _ => {
                    self.pos += i;
                    return Err(self.syntax(&format!("expected {n}-digit {what}")));
                }
            }
        }
        self.pos += n;
        Ok(value)
    }

    /// A fraction after `.` or `,`, as nanoseconds. Digits past the ninth are
    /// consumed and truncated.
    fn fraction(&mut self) -> Result<Option<i64>> {
        if !matches!(self.peek(), Some(b'.' | b',')) {
            return Ok(None);
        }
        self.pos += 1;
        let start = self.pos;
        let mut value = 0i64;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            if self.pos - start < 9 {
                value = value * 10 + i64::from(b - b'0');
            }
            self.pos += 1;
        }
        let len = self.pos - start;
        if len == 0 {
            return Err(self.syntax("expected fraction digits"));
        }
        for _ in len..9 {
            value *= 10;
        }
        Ok(Some(value))
    }

    fn syntax(&self, what: &str) -> TemporalError {
        syntax_error(self.text, self.pos, what)
    }

    fn expect_end(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.syntax("unexpected trailing characters"))
        }
    }
}

fn syntax_error(text: &str, pos: usize, what: &str) -> TemporalError {
    tracing::trace!(text, pos, what, "rejected ISO 8601 text");
    TemporalError::type_error(format!("invalid ISO 8601 string '{text}': {what} at position {pos}"))
}

fn check_not_empty(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(TemporalError::type_error("cannot parse an empty string"));
    }
    Ok(())
}

// ── Grammar productions ─────────────────────────────────────────────────────

fn parse_year(cur: &mut Cursor<'_>) -> Result<i64> {
    if let Some(sign) = cur.eat_sign() {
        let start = cur.pos;
        let year = cur.digits(6, "extended year")?;
        if year == 0 && sign < 0 {
            return Err(syntax_error(cur.text, start, "negative zero year"));
        }
        Ok(sign * year)
    } else {
        cur.digits(4, "year")
    }
}

fn date_spec(cur: &mut Cursor<'_>) -> Result<RawDate> {
    let year = parse_year(cur)?;
    let extended = cur.eat(b'-');
    let month = cur.digits(2, "month")?;
    if extended && !cur.eat(b'-') {
        return Err(cur.syntax("expected '-' before day"));
    }
    let day = cur.digits(2, "day")?;
    Ok(RawDate { year, month, day })
}

fn parse_time_spec(cur: &mut Cursor<'_>) -> Result<RawTime> {
    let hour = cur.digits(2, "hour")?;
    let mut time = RawTime {
        hour,
        ..RawTime::default()
    };
    let extended = cur.peek() == Some(b':');
    if extended {
        cur.pos += 1;
        time.minute = cur.digits(2, "minute")?;
        if cur.eat(b':') {
            time.second = cur.digits(2, "second")?;
            time.fraction = cur.fraction()?.unwrap_or(0);
        }
    } else if cur.is_digit_at(0) {
        time.minute = cur.digits(2, "minute")?;
        if cur.is_digit_at(0) {
            time.second = cur.digits(2, "second")?;
            time.fraction = cur.fraction()?.unwrap_or(0);
        }
    }
    Ok(time)
}

fn parse_offset(cur: &mut Cursor<'_>) -> Result<Option<RawOffset>> {
    if cur.eat_ignore_case(b'Z') {
        return Ok(Some(RawOffset::Utc));
    }
    if !cur.starts_with_sign() {
        return Ok(None);
    }
    let sign = cur.eat_sign().unwrap_or(1);
    let hours = cur.digits(2, "offset hours")?;
    let (mut minutes, mut seconds, mut fraction) = (0, 0, 0);
    if cur.eat(b':') {
        minutes = cur.digits(2, "offset minutes")?;
        if cur.eat(b':') {
            seconds = cur.digits(2, "offset seconds")?;
            fraction = cur.fraction()?.unwrap_or(0);
        }
    } else if cur.is_digit_at(0) {
        minutes = cur.digits(2, "offset minutes")?;
        if cur.is_digit_at(0) {
            seconds = cur.digits(2, "offset seconds")?;
            fraction = cur.fraction()?.unwrap_or(0);
        }
    }
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(TemporalError::range(format!(
            "UTC offset out of range in '{}'",
            cur.text
        )));
    }
    let ns = ((hours * 60 + minutes) * 60 + seconds) * 1_000_000_000 + fraction;
    Ok(Some(RawOffset::Numeric(sign * ns)))
}

fn is_annotation_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    matches!(bytes.next(), Some(b'a'..=b'z' | b'_'))
        && bytes.all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-'))
}

fn is_annotation_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric()))
}

fn is_time_zone_annotation(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            b.is_ascii_alphanumeric() || matches!(b, b'/' | b'_' | b'-' | b'+' | b'.' | b':')
        })
}

fn parse_annotations(cur: &mut Cursor<'_>) -> Result<Annotations> {
    let mut annotations = Annotations::default();
    let mut calendar_critical = false;
    let mut index = 0;
    while cur.eat(b'[') {
        let critical = cur.eat(b'!');
        let start = cur.pos;
        while cur.peek().is_some_and(|b| b != b']' && b != b'[') {
            cur.pos += 1;
        }
        let content = &cur.text[start..cur.pos];
        if !cur.eat(b']') {
            return Err(cur.syntax("unterminated annotation"));
        }
        match content.split_once('=') {
            Some((key, value)) => {
                if !is_annotation_key(key) || !is_annotation_value(value) {
                    return Err(syntax_error(cur.text, start, "malformed annotation"));
                }
                if key == "u-ca" {
                    if annotations.calendar.is_some() {
                        if critical || calendar_critical {
                            return Err(TemporalError::range(format!(
                                "conflicting calendar annotations in '{}'",
                                cur.text
                            )));
                        }
                    } else {
                        annotations.calendar = Some(Calendar::from_identifier(value)?);
                        calendar_critical = critical;
                    }
                } else if critical {
                    return Err(TemporalError::range(format!(
                        "unsupported critical annotation '{key}' in '{}'",
                        cur.text
                    )));
                }
            }
            None => {
                if index != 0 || !is_time_zone_annotation(content) {
                    return Err(syntax_error(cur.text, start, "malformed time zone annotation"));
                }
            }
        }
        index += 1;
    }
    Ok(annotations)
}

fn parse_raw_date_time(text: &str, require_time: bool) -> Result<RawDateTime> {
    check_not_empty(text)?;
    let mut cur = Cursor::new(text);
    let date = date_spec(&mut cur)?;
    let mut time = None;
    let mut offset = None;
    if matches!(cur.peek(), Some(b'T' | b't' | b' ')) {
        cur.pos += 1;
        time = Some(parse_time_spec(&mut cur)?);
        offset = parse_offset(&mut cur)?;
    } else if require_time {
        return Err(cur.syntax("expected a time"));
    }
    let annotations = parse_annotations(&mut cur)?;
    cur.expect_end()?;
    Ok(RawDateTime {
        date,
        time,
        offset,
        annotations,
    })
}

// ── Range validation ────────────────────────────────────────────────────────

fn validate_time(raw: RawTime) -> Result<IsoTime> {
    if raw.second == 60 {
        return Err(TemporalError::range("leap seconds are not supported"));
    }
    let fraction = raw.fraction;
    IsoTime::new(
        [
            raw.hour,
            raw.minute,
            raw.second,
            fraction / 1_000_000,
            fraction / 1_000 % 1_000,
            fraction % 1_000,
        ],
        Overflow::Reject,
    )
}

fn validate_date(raw: RawDate) -> Result<IsoDate> {
    if !(1..=12).contains(&raw.month) {
        return Err(TemporalError::range(format!(
            "month {} is out of range (1..=12)",
            raw.month
        )));
    }
    if !(1..=31).contains(&raw.day) {
        return Err(TemporalError::range(format!(
            "day {} is out of range (1..=31)",
            raw.day
        )));
    }
    IsoDate::new(raw.year, raw.month, raw.day, Overflow::Reject)
}

fn reject_utc_designator(raw: &RawDateTime, text: &str) -> Result<()> {
    if matches!(raw.offset, Some(RawOffset::Utc)) {
        return Err(TemporalError::range(format!(
            "'Z' designator is not allowed for plain values: '{text}'"
        )));
    }
    Ok(())
}

fn plain_date_time_from_raw(raw: &RawDateTime, text: &str) -> Result<(IsoDateTime, Calendar)> {
    reject_utc_designator(raw, text)?;
    let date = validate_date(raw.date)?;
    let time = match raw.time {
        Some(t) => validate_time(t)?,
        None => IsoTime::MIDNIGHT,
    };
    let date_time = IsoDateTime { date, time };
    date_time.check_limits()?;
    Ok((date_time, raw.annotations.calendar.unwrap_or_default()))
}

/// The date part of a date-time string; any time part is validated and dropped.
fn date_from_raw(raw: &RawDateTime, text: &str) -> Result<(IsoDate, Calendar)> {
    reject_utc_designator(raw, text)?;
    let date = validate_date(raw.date)?;
    if let Some(time) = raw.time {
        validate_time(time)?;
    }
    Ok((date, raw.annotations.calendar.unwrap_or_default()))
}

// ── Public entry points per kind ────────────────────────────────────────────

/// Parse an instant: a date-time with a mandatory UTC offset.
pub(crate) fn parse_instant(text: &str) -> Result<(IsoDateTime, i64)> {
    let raw = parse_raw_date_time(text, true)?;
    let offset_ns = match raw.offset {
        Some(RawOffset::Utc) => 0,
        Some(RawOffset::Numeric(ns)) => ns,
        None => {
            return Err(TemporalError::type_error(format!(
                "instant string '{text}' requires a UTC offset or 'Z'"
            )))
        }
    };
    let date = validate_date(raw.date)?;
    let time = validate_time(raw.time.unwrap_or_default())?;
    Ok((IsoDateTime { date, time }, offset_ns))
}

pub(crate) fn parse_date(text: &str) -> Result<(IsoDate, Calendar)> {
    let raw = parse_raw_date_time(text, false)?;
    date_from_raw(&raw, text)
}

pub(crate) fn parse_date_time(text: &str) -> Result<(IsoDateTime, Calendar)> {
    let raw = parse_raw_date_time(text, false)?;
    plain_date_time_from_raw(&raw, text)
}

/// Parse a time of day, either standalone (optionally `T`-prefixed) or as the
/// time part of a date-time string.
pub(crate) fn parse_time(text: &str) -> Result<IsoTime> {
    check_not_empty(text)?;
    let date_time_attempt = parse_raw_date_time(text, true);
    if let Ok(raw) = &date_time_attempt {
        reject_utc_designator(raw, text)?;
        validate_date(raw.date)?;
        return validate_time(raw.time.unwrap_or_default());
    }

    let mut cur = Cursor::new(text);
    let designated = cur.eat_ignore_case(b'T');
    let time_attempt = parse_time_spec(&mut cur).and_then(|raw| {
        let offset = parse_offset(&mut cur)?;
        parse_annotations(&mut cur)?;
        cur.expect_end()?;
        Ok((raw, offset))
    });
    match time_attempt {
        Ok((raw, offset)) => {
            if matches!(offset, Some(RawOffset::Utc)) {
                return Err(TemporalError::range(format!(
                    "'Z' designator is not allowed for plain values: '{text}'"
                )));
            }
            if !designated && (parse_year_month(text).is_ok() || parse_month_day(text).is_ok()) {
                return Err(TemporalError::type_error(format!(
                    "'{text}' is ambiguous; prefix a time with 'T'"
                )));
            }
            validate_time(raw)
        }
        Err(time_err) => match date_time_attempt {
            Err(err @ TemporalError::Range(_)) => Err(err),
            _ => Err(time_err),
        },
    }
}

/// Parse a year-month: `YYYY-MM`, `YYYYMM`, or any date string.
pub(crate) fn parse_year_month(text: &str) -> Result<ParsedYearMonth> {
    check_not_empty(text)?;
    let short = (|| {
        let mut cur = Cursor::new(text);
        let year = parse_year(&mut cur)?;
        cur.eat(b'-');
        let month = cur.digits(2, "month")?;
        let annotations = parse_annotations(&mut cur)?;
        cur.expect_end()?;
        Ok::<_, TemporalError>((year, month, annotations))
    })();
    match short {
        Ok((year, month, annotations)) => {
            if !(1..=12).contains(&month) {
                return Err(TemporalError::range(format!(
                    "month {month} is out of range (1..=12)"
                )));
            }
            let year = narrow_year(year)?;
            let month = month as u8;
            year_month_in_limits(year, month)?;
            Ok(ParsedYearMonth {
                year,
                month,
                reference_day: 1,
                calendar: annotations.calendar.unwrap_or_default(),
            })
        }
        Err(short_err) => {
            let raw = parse_raw_date_time(text, false).map_err(|err| match err {
                TemporalError::Range(_) => err,
                TemporalError::Type(_) => short_err,
            })?;
            let (date, calendar) = date_from_raw(&raw, text)?;
            year_month_in_limits(date.year, date.month)?;
            Ok(ParsedYearMonth {
                year: date.year,
                month: date.month,
                reference_day: if calendar.is_iso() { 1 } else { date.day },
                calendar,
            })
        }
    }
}

fn year_month_in_limits(year: i32, month: u8) -> Result<()> {
    if !crate::calendar::year_month_within_limits(year, month) {
        return Err(TemporalError::range(format!(
            "year-month {year}-{month:02} is outside the representable range"
        )));
    }
    Ok(())
}

/// Parse a month-day: `--MM-DD`, `--MMDD`, `MM-DD`, `MMDD`, or any date string.
pub(crate) fn parse_month_day(text: &str) -> Result<ParsedMonthDay> {
    check_not_empty(text)?;
    let short = (|| {
        let mut cur = Cursor::new(text);
        if cur.eat(b'-') && !cur.eat(b'-') {
            return Err(cur.syntax("expected '--' before month"));
        }
        let month = cur.digits(2, "month")?;
        cur.eat(b'-');
        let day = cur.digits(2, "day")?;
        let annotations = parse_annotations(&mut cur)?;
        cur.expect_end()?;
        Ok::<_, TemporalError>((month, day, annotations))
    })();
    match short {
        Ok((month, day, annotations)) => {
            let date = validate_date(RawDate {
                year: i64::from(REFERENCE_LEAP_YEAR),
                month,
                day,
            })?;
            Ok(ParsedMonthDay {
                month: date.month,
                day: date.day,
                reference_year: REFERENCE_LEAP_YEAR,
                calendar: annotations.calendar.unwrap_or_default(),
            })
        }
        Err(short_err) => {
            let raw = parse_raw_date_time(text, false).map_err(|err| match err {
                TemporalError::Range(_) => err,
                TemporalError::Type(_) => short_err,
            })?;
            let (date, calendar) = date_from_raw(&raw, text)?;
            Ok(ParsedMonthDay {
                month: date.month,
                day: date.day,
                reference_year: if calendar.is_iso() {
                    REFERENCE_LEAP_YEAR
                } else {
                    date.year
                },
                calendar,
            })
        }
    }
}

// ── Durations ───────────────────────────────────────────────────────────────

const NS_PER_HOUR: i128 = 3_600_000_000_000;
const NS_PER_MINUTE: i128 = 60_000_000_000;

/// Read an unsigned integer and optional fraction for a duration component.
fn duration_number(cur: &mut Cursor<'_>) -> Result<(u128, Option<i64>)> {
    let start = cur.pos;
    let mut value: u128 = 0;
    while let Some(b) = cur.peek().filter(u8::is_ascii_digit) {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u128::from(b - b'0')))
            .ok_or_else(|| TemporalError::range("duration field is too large"))?;
        cur.pos += 1;
    }
    if cur.pos == start {
        return Err(cur.syntax("expected a number"));
    }
    let fraction = cur.fraction()?;
    Ok((value, fraction))
}

fn component(value: u128, text: &str) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| TemporalError::range(format!("duration field is too large in '{text}'")))
}

/// Parse `[-+]PnYnMnWnDTnHnMnS` into signed components, years through nanoseconds.
pub(crate) fn parse_duration(text: &str) -> Result<[i64; 10]> {
    check_not_empty(text)?;
    let mut cur = Cursor::new(text);
    let sign = cur.eat_sign().unwrap_or(1);
    if !cur.eat_ignore_case(b'P') {
        return Err(cur.syntax("expected 'P'"));
    }

    let mut fields = [0i64; 10];
    let mut any = false;

    // Date part: each designator at most once, in order Y, M, W, D.
    let mut next_date_slot = 0;
    while !cur.at_end() && !matches!(cur.peek(), Some(b'T' | b't')) {
        let (value, fraction) = duration_number(&mut cur)?;
        if fraction.is_some() {
            return Err(cur.syntax("fractions are only allowed on time units"));
        }
        let slot = match cur.peek().map(|b| b.to_ascii_uppercase()) {
            Some(b'Y') => 0,
            Some(b'M') => 1,
            Some(b'W') => 2,
            Some(b'D') => 3,
            _ => return Err(cur.syntax("expected a date unit designator")),
        };
        if slot < next_date_slot {
            return Err(cur.syntax("duration units out of order"));
        }
        cur.pos += 1;
        fields[slot] = component(value, text)?;
        next_date_slot = slot + 1;
        any = true;
    }

    if cur.eat_ignore_case(b'T') {
        let mut next_time_slot = 4;
        let mut any_time = false;
        while !cur.at_end() {
            let (value, fraction) = duration_number(&mut cur)?;
            let slot = match cur.peek().map(|b| b.to_ascii_uppercase()) {
                Some(b'H') => 4,
                Some(b'M') => 5,
                Some(b'S') => 6,
                _ => return Err(cur.syntax("expected a time unit designator")),
            };
            if slot < next_time_slot {
                return Err(cur.syntax("duration units out of order"));
            }
            cur.pos += 1;
            fields[slot] = component(value, text)?;
            next_time_slot = slot + 1;
            any_time = true;

            if let Some(fraction) = fraction {
                let unit_ns = match slot {
                    4 => NS_PER_HOUR,
                    5 => NS_PER_MINUTE,
                    _ => 1_000_000_000,
                };
                // fraction is in billionths of the unit
                let mut rest = i128::from(fraction) * unit_ns / 1_000_000_000;
                for (index, size) in [
                    (5, NS_PER_MINUTE),
                    (6, 1_000_000_000),
                    (7, 1_000_000),
                    (8, 1_000),
                    (9, 1),
                ] {
                    if index > slot {
                        fields[index] += (rest / size) as i64;
                        rest %= size;
                    }
                }
                if !cur.at_end() {
                    return Err(cur.syntax("a fractional unit must be the last unit"));
                }
            }
        }
        if !any_time {
            return Err(cur.syntax("expected a time unit after 'T'"));
        }
        any = true;
    }

    cur.expect_end()?;
    if !any {
        return Err(cur.syntax("duration has no components"));
    }
    if sign < 0 {
        for field in &mut fields {
            *field = -*field;
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kind_of(result: Result<impl std::fmt::Debug>) -> ErrorKind {
        result.unwrap_err().kind()
    }

    #[test]
    fn test_parse_date_extended_and_basic() {
        let (date, cal) = parse_date("2024-02-29").unwrap();
        assert_eq!((date.year, date.month, date.day), (2024, 2, 29));
        assert_eq!(cal, Calendar::Iso8601);
        let (date, _) = parse_date("20240229").unwrap();
        assert_eq!((date.year, date.month, date.day), (2024, 2, 29));
    }

    #[test]
    fn test_parse_date_extended_years() {
        let (date, _) = parse_date("-002024-01-01").unwrap();
        assert_eq!(date.year, -2024);
        let (date, _) = parse_date("+275760-09-13").unwrap();
        assert_eq!(date.year, 275_760);
        assert_eq!(kind_of(parse_date("+275760-09-14")), ErrorKind::Range);
        assert_eq!(kind_of(parse_date("-000000-01-01")), ErrorKind::Type);
        let (date, _) = parse_date("-271821-04-19").unwrap();
        assert_eq!(date.year, -271_821);
        assert_eq!(kind_of(parse_date_time("-271821-04-19")), ErrorKind::Range);
        assert!(parse_date_time("-271821-04-19T00:00:00.000000001").is_ok());
    }

    #[test]
    fn test_parse_date_range_errors() {
        assert_eq!(kind_of(parse_date("2024-13-01")), ErrorKind::Range);
        assert_eq!(kind_of(parse_date("2024-01-32")), ErrorKind::Range);
        assert_eq!(kind_of(parse_date("2023-02-29")), ErrorKind::Range);
        assert_eq!(kind_of(parse_date("2024-04-31")), ErrorKind::Range);
    }

    #[test]
    fn test_parse_date_type_errors() {
        assert_eq!(kind_of(parse_date("")), ErrorKind::Type);
        assert_eq!(kind_of(parse_date("2024/01/01")), ErrorKind::Type);
        assert_eq!(kind_of(parse_date("2024-1-01")), ErrorKind::Type);
        assert_eq!(kind_of(parse_date("2024-01-0x")), ErrorKind::Type);
        assert_eq!(kind_of(parse_date("2024-0101")), ErrorKind::Type);
        assert_eq!(kind_of(parse_date("2024-01-01 garbage")), ErrorKind::Type);
    }

    #[test]
    fn test_parse_date_ignores_time_and_offset() {
        let (date, _) = parse_date("2024-03-05T10:00:00+05:30").unwrap();
        assert_eq!((date.year, date.month, date.day), (2024, 3, 5));
        assert_eq!(kind_of(parse_date("2024-03-05T10:00:00Z")), ErrorKind::Range);
    }

    #[test]
    fn test_parse_annotations() {
        let (_, cal) = parse_date("2024-03-05[u-ca=gregory]").unwrap();
        assert_eq!(cal, Calendar::Gregory);
        let (_, cal) = parse_date("2024-03-05T00:00[Europe/Paris][u-ca=japanese]").unwrap();
        assert_eq!(cal, Calendar::Japanese);
        let (_, cal) = parse_date("2024-03-05[foo=bar]").unwrap();
        assert_eq!(cal, Calendar::Iso8601);
        assert_eq!(kind_of(parse_date("2024-03-05[!foo=bar]")), ErrorKind::Range);
        assert_eq!(kind_of(parse_date("2024-03-05[u-ca=klingon]")), ErrorKind::Type);
        assert_eq!(
            kind_of(parse_date("2024-03-05[u-ca=iso8601][!u-ca=gregory]")),
            ErrorKind::Range
        );
        assert_eq!(kind_of(parse_date("2024-03-05[u-ca=gregory")), ErrorKind::Type);
        assert_eq!(
            kind_of(parse_date("2024-03-05[u-ca=iso8601][Europe/Paris]")),
            ErrorKind::Type
        );
    }

    #[test]
    fn test_parse_time_forms() {
        let t = parse_time("12:34:56.789").unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.millisecond), (12, 34, 56, 789));
        let t = parse_time("T1234").unwrap();
        assert_eq!((t.hour, t.minute, t.second), (12, 34, 0));
        let t = parse_time("2024-01-01T05:06:07").unwrap();
        assert_eq!((t.hour, t.minute, t.second), (5, 6, 7));
        let t = parse_time("08").unwrap();
        assert_eq!(t.hour, 8);
    }

    #[test]
    fn test_parse_time_fraction_truncates() {
        let t = parse_time("00:00:00.1234567891").unwrap();
        assert_eq!((t.millisecond, t.microsecond, t.nanosecond), (123, 456, 789));
        let t = parse_time("00:00:00,5").unwrap();
        assert_eq!(t.millisecond, 500);
    }

    #[test]
    fn test_parse_time_errors() {
        assert_eq!(kind_of(parse_time("24:00:00")), ErrorKind::Range);
        assert_eq!(kind_of(parse_time("23:59:60")), ErrorKind::Range);
        assert_eq!(kind_of(parse_time("12:60")), ErrorKind::Range);
        assert_eq!(kind_of(parse_time("12/30")), ErrorKind::Type);
        assert_eq!(kind_of(parse_time("noon")), ErrorKind::Type);
        assert_eq!(kind_of(parse_time("12:30Z")), ErrorKind::Range);
        assert_eq!(kind_of(parse_time("12:30:00.")), ErrorKind::Type);
    }

    #[test]
    fn test_parse_time_ambiguity() {
        // Could be December 14th.
        assert_eq!(kind_of(parse_time("1214")), ErrorKind::Type);
        let t = parse_time("T1214").unwrap();
        assert_eq!((t.hour, t.minute), (12, 14));
        // 1330 is not a valid month-day, so it is a time.
        let t = parse_time("1330").unwrap();
        assert_eq!((t.hour, t.minute), (13, 30));
    }

    #[test]
    fn test_parse_instant() {
        let (dt, offset) = parse_instant("2024-01-15T10:30:45.123Z").unwrap();
        assert_eq!(offset, 0);
        assert_eq!(dt.time.millisecond, 123);
        let (_, offset) = parse_instant("2024-01-15T10:30:45-05:30").unwrap();
        assert_eq!(offset, -(5 * 3600 + 30 * 60) * 1_000_000_000);
        assert_eq!(kind_of(parse_instant("2024-01-15T10:30:45")), ErrorKind::Type);
        assert_eq!(kind_of(parse_instant("2024-01-15")), ErrorKind::Type);
        assert_eq!(kind_of(parse_instant("2024-01-15T10:30+24:00")), ErrorKind::Range);
    }

    #[test]
    fn test_parse_year_month() {
        let ym = parse_year_month("2024-05").unwrap();
        assert_eq!((ym.year, ym.month, ym.reference_day), (2024, 5, 1));
        let ym = parse_year_month("202405").unwrap();
        assert_eq!((ym.year, ym.month), (2024, 5));
        let ym = parse_year_month("2024-05-17").unwrap();
        assert_eq!(ym.reference_day, 1);
        let ym = parse_year_month("2024-05-17[u-ca=gregory]").unwrap();
        assert_eq!(ym.reference_day, 17);
        assert_eq!(kind_of(parse_year_month("2024-13")), ErrorKind::Range);
        assert_eq!(kind_of(parse_year_month("2024-5")), ErrorKind::Type);
        let ym = parse_year_month("-271821-04").unwrap();
        assert_eq!((ym.year, ym.month), (-271_821, 4));
        assert_eq!(kind_of(parse_year_month("-271821-03")), ErrorKind::Range);
    }

    #[test]
    fn test_parse_month_day() {
        for text in ["--02-29", "--0229", "02-29", "0229", "2023-02-28"] {
            let md = parse_month_day(text).unwrap();
            assert_eq!(md.month, 2, "{text}");
            assert_eq!(md.reference_year, REFERENCE_LEAP_YEAR);
        }
        assert_eq!(kind_of(parse_month_day("02-30")), ErrorKind::Range);
        assert_eq!(kind_of(parse_month_day("-02-28")), ErrorKind::Type);
    }

    #[test]
    fn test_parse_duration_basic() {
        assert_eq!(
            parse_duration("P1Y2M3DT4H5M6S").unwrap(),
            [1, 2, 0, 3, 4, 5, 6, 0, 0, 0]
        );
        assert_eq!(parse_duration("-P2W").unwrap(), [0, 0, -2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(parse_duration("pt1m").unwrap(), [0, 0, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(
            parse_duration("\u{2212}PT1S").unwrap(),
            [0, 0, 0, 0, 0, 0, -1, 0, 0, 0]
        );
    }

    #[test]
    fn test_parse_duration_fractions() {
        assert_eq!(
            parse_duration("PT1.5H").unwrap(),
            [0, 0, 0, 0, 1, 30, 0, 0, 0, 0]
        );
        assert_eq!(
            parse_duration("PT0.123456789S").unwrap(),
            [0, 0, 0, 0, 0, 0, 0, 123, 456, 789]
        );
        assert_eq!(
            parse_duration("PT1.0000000019S").unwrap(),
            [0, 0, 0, 0, 0, 0, 1, 0, 0, 1]
        );
        assert_eq!(
            parse_duration("PT2.25M").unwrap(),
            [0, 0, 0, 0, 0, 2, 15, 0, 0, 0]
        );
    }

    #[test]
    fn test_parse_duration_errors() {
        for text in ["", "P", "PT", "1Y", "P1", "P1.5Y", "PT1.5H30M", "P1D2Y", "PT1S1M", "P1YT", "P-1Y"] {
            assert_eq!(kind_of(parse_duration(text)), ErrorKind::Type, "{text:?}");
        }
        assert_eq!(
            kind_of(parse_duration("P99999999999999999999Y")),
            ErrorKind::Range
        );
    }

    #[test]
    fn test_parse_dispatch() {
        match parse(Kind::Duration, "PT0S").unwrap() {
            Fields::Duration(fields) => assert_eq!(fields, [0; 10]),
            other => panic!("unexpected {other:?}"),
        }
        match parse(Kind::PlainMonthDay, "12-25").unwrap() {
            Fields::PlainMonthDay { month, day, .. } => assert_eq!((month, day), (12, 25)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
