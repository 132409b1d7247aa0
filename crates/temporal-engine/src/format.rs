//! Canonical ISO 8601 rendering.
//!
//! Output is always the unique normalized form of a value: zero-padded
//! fields, six-digit signed years outside 0..=9999, no calendar annotation
//! for ISO 8601 unless asked for.

use std::fmt::Write;

use crate::calendar::Calendar;
use crate::iso::{IsoDate, IsoDateTime, IsoTime};
use crate::options::{CalendarDisplay, Precision};

pub(crate) fn year(year: i32) -> String {
    if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else if year < 0 {
        format!("-{:06}", year.unsigned_abs())
    } else {
        format!("+{year:06}")
    }
}

pub(crate) fn date(date: IsoDate) -> String {
    format!("{}-{:02}-{:02}", year(date.year), date.month, date.day)
}

pub(crate) fn year_month(date: IsoDate) -> String {
    format!("{}-{:02}", year(date.year), date.month)
}

pub(crate) fn month_day(date: IsoDate) -> String {
    format!("{:02}-{:02}", date.month, date.day)
}

/// Sub-second digits of `ns` (below 10^9), with a leading `.`, or empty.
fn fraction(ns: u32, precision: Precision) -> String {
    let digits = format!("{ns:09}");
    match precision {
        Precision::Auto => {
            let trimmed = digits.trim_end_matches('0');
            if trimmed.is_empty() {
                String::new()
            } else {
                format!(".{trimmed}")
            }
        }
        Precision::Digits(0) => String::new(),
        Precision::Digits(n) => format!(".{}", &digits[..usize::from(n.min(9))]),
    }
}

fn sub_second_ns(time: IsoTime) -> u32 {
    u32::from(time.millisecond) * 1_000_000
        + u32::from(time.microsecond) * 1_000
        + u32::from(time.nanosecond)
}

pub(crate) fn time(time: IsoTime, precision: Precision) -> String {
    format!(
        "{:02}:{:02}:{:02}{}",
        time.hour,
        time.minute,
        time.second,
        fraction(sub_second_ns(time), precision)
    )
}

pub(crate) fn date_time(dt: IsoDateTime, precision: Precision) -> String {
    format!("{}T{}", date(dt.date), time(dt.time, precision))
}

/// UTC date-time with a `Z` suffix. Under automatic precision the fraction is
/// always printed in groups of three digits, at least milliseconds.
pub(crate) fn instant(dt: IsoDateTime, precision: Precision) -> String {
    let precision = match precision {
        Precision::Auto => {
            let ns = sub_second_ns(dt.time);
            let digits = if ns % 1_000_000 == 0 {
                3
            } else if ns % 1_000 == 0 {
                6
            } else {
                9
            };
            Precision::Digits(digits)
        }
        digits => digits,
    };
    format!("{}Z", date_time(dt, precision))
}

pub(crate) fn calendar_annotation(calendar: Calendar, display: CalendarDisplay) -> String {
    let id = calendar.identifier();
    match display {
        CalendarDisplay::Auto if calendar.is_iso() => String::new(),
        CalendarDisplay::Auto | CalendarDisplay::Always => format!("[u-ca={id}]"),
        CalendarDisplay::Critical => format!("[!u-ca={id}]"),
        CalendarDisplay::Never => String::new(),
    }
}

/// `[-]P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`, or `PT0S` when empty.
pub(crate) fn duration(fields: &[i64; 10]) -> String {
    let negative = fields.iter().any(|&v| v < 0);
    let abs = fields.map(i64::unsigned_abs);

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('P');
    for (value, designator) in abs[..4].iter().zip(['Y', 'M', 'W', 'D']) {
        if *value != 0 {
            let _ = write!(out, "{value}{designator}");
        }
    }

    let sub_second = u128::from(abs[7]) * 1_000_000 + u128::from(abs[8]) * 1_000 + u128::from(abs[9]);
    let seconds = u128::from(abs[6]) + sub_second / 1_000_000_000;
    let nanos = (sub_second % 1_000_000_000) as u32;

    let mut time = String::new();
    if abs[4] != 0 {
        let _ = write!(time, "{}H", abs[4]);
    }
    if abs[5] != 0 {
        let _ = write!(time, "{}M", abs[5]);
    }
    let all_zero = abs.iter().all(|&v| v == 0);
    if seconds != 0 || nanos != 0 || all_zero {
        let _ = write!(time, "{seconds}{}S", fraction(nanos, Precision::Auto));
    }
    if !time.is_empty() {
        out.push('T');
        out.push_str(&time);
    }
    out
}
