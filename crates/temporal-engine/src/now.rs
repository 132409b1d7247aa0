//! The current time, as reported by a host clock.
//!
//! Everything else in the crate is a pure function of its inputs. This module
//! is the one place that reads the system clock and time zone database, and it
//! does so only through the [`HostClock`] trait so callers and tests can
//! substitute a [`FixedClock`].

use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;

use crate::calendar::Calendar;
use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::iso::IsoDateTime;
use crate::plain_date::PlainDate;
use crate::plain_date_time::PlainDateTime;
use crate::plain_time::PlainTime;

/// Source of the current instant and the default time zone.
pub trait HostClock: Send + Sync {
    /// Nanoseconds since the Unix epoch.
    fn epoch_nanoseconds(&self) -> i128;

    /// Time zone used when the caller names none.
    fn default_time_zone(&self) -> String;

    /// UTC offset of `zone` at `epoch_ns`, in nanoseconds.
    fn offset_nanoseconds(&self, zone: &str, epoch_ns: i128) -> Result<i64> {
        zone_offset_nanoseconds(zone, epoch_ns)
    }
}

/// The operating system clock and time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl HostClock for SystemClock {
    fn epoch_nanoseconds(&self) -> i128 {
        let now = Utc::now();
        i128::from(now.timestamp()) * 1_000_000_000 + i128::from(now.timestamp_subsec_nanos())
    }

    fn default_time_zone(&self) -> String {
        iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
    }
}

/// A clock stopped at one instant, for tests and reproducible output.
#[derive(Debug, Clone)]
pub struct FixedClock {
    pub epoch_ns: i128,
    pub time_zone: String,
}

impl FixedClock {
    pub fn new(epoch_ns: i128, time_zone: impl Into<String>) -> Self {
        FixedClock {
            epoch_ns,
            time_zone: time_zone.into(),
        }
    }
}

impl HostClock for FixedClock {
    fn epoch_nanoseconds(&self) -> i128 {
        self.epoch_ns
    }

    fn default_time_zone(&self) -> String {
        self.time_zone.clone()
    }
}

/// Parse `±HH:MM` (or `±HHMM`, `±HH`) into seconds east of UTC.
fn fixed_offset_seconds(zone: &str) -> Option<i64> {
    let (sign, rest) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) || !matches!(digits.len(), 2 | 4) {
        return None;
    }
    let hours: i64 = digits[..2].parse().ok()?;
    let minutes: i64 = digits.get(2..).filter(|m| !m.is_empty()).map_or(Some(0), |m| m.parse().ok())?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Offset of an IANA zone or fixed `±HH:MM` offset at an instant.
pub fn zone_offset_nanoseconds(zone: &str, epoch_ns: i128) -> Result<i64> {
    if let Some(seconds) = fixed_offset_seconds(zone) {
        return Ok(seconds * 1_000_000_000);
    }
    let tz: Tz = zone
        .parse()
        .map_err(|_| TemporalError::range(format!("unknown time zone '{zone}'")))?;
    let seconds = i64::try_from(epoch_ns.div_euclid(1_000_000_000))
        .map_err(|_| TemporalError::range("instant is outside the time zone database range"))?;
    let nanos = epoch_ns.rem_euclid(1_000_000_000) as u32;
    let utc = DateTime::from_timestamp(seconds, nanos)
        .ok_or_else(|| TemporalError::range("instant is outside the time zone database range"))?;
    let offset = utc.with_timezone(&tz).offset().fix().local_minus_utc();
    Ok(i64::from(offset) * 1_000_000_000)
}

pub fn instant(clock: &dyn HostClock) -> Result<Instant> {
    Instant::try_new(clock.epoch_nanoseconds())
}

/// The zone `zone` names, or the clock's default.
pub fn time_zone_id(clock: &dyn HostClock, zone: Option<&str>) -> String {
    zone.map_or_else(|| clock.default_time_zone(), str::to_string)
}

/// Current wall-clock date and time in `zone` (default zone if `None`), ISO calendar.
pub fn plain_date_time(clock: &dyn HostClock, zone: Option<&str>) -> Result<PlainDateTime> {
    let zone = time_zone_id(clock, zone);
    let epoch_ns = clock.epoch_nanoseconds();
    let offset = clock.offset_nanoseconds(&zone, epoch_ns)?;
    tracing::debug!(zone = %zone, offset_ns = offset, "resolved current wall clock");
    let local = IsoDateTime::from_epoch_nanoseconds(epoch_ns + i128::from(offset))?;
    PlainDateTime::from_iso(local, Calendar::Iso8601)
}

pub fn plain_date(clock: &dyn HostClock, zone: Option<&str>) -> Result<PlainDate> {
    Ok(plain_date_time(clock, zone)?.to_plain_date())
}

pub fn plain_time(clock: &dyn HostClock, zone: Option<&str>) -> Result<PlainTime> {
    Ok(plain_date_time(clock, zone)?.to_plain_time())
}
