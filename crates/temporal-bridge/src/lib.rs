//! # temporal-bridge
//!
//! The primitive-value boundary over [`temporal_engine`]. Every entry point
//! takes strings and integers, and returns either a tagged [`Outcome`] or a
//! batched component record with an `is_valid` flag. Nothing here panics or
//! returns a Rust error type across the boundary, so a transport shim (C ABI,
//! JNI, WASM) only has to marshal plain values.
//!
//! Absent text (`None`) is always a `TypeError`. Integer fields passed to
//! `with` use [`FIELD_UNSET`] to mean "keep the current value".
//!
//! ## Modules
//!
//! - [`instant`]: Exact instants: epoch conversions, arithmetic, differences
//! - [`duration`]: Durations: components, `with`, add/subtract, negate, compare
//! - [`plain_time`], [`plain_date`], [`plain_date_time`], [`plain_year_month`],
//!   [`plain_month_day`]: Wall-clock values
//! - [`calendar`]: Calendar queries over raw year/month/day integers

use std::fmt::Display;
use std::str::FromStr;

use serde::Serialize;
use temporal_engine::{Calendar, DifferenceOptions, TemporalError, Unit};

pub mod calendar;
pub mod duration;
pub mod instant;
pub mod plain_date;
pub mod plain_date_time;
pub mod plain_month_day;
pub mod plain_time;
pub mod plain_year_month;

/// Marks a `with` field as "not provided". Never a legal field value.
pub const FIELD_UNSET: i64 = i64::MIN;

/// `None` for [`FIELD_UNSET`], otherwise the value.
pub fn decode_field(value: i64) -> Option<i64> {
    (value != FIELD_UNSET).then_some(value)
}

/// Error tag carried by every [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ErrorKind {
    #[default]
    None,
    RangeError,
    TypeError,
}

impl From<temporal_engine::ErrorKind> for ErrorKind {
    fn from(kind: temporal_engine::ErrorKind) -> Self {
        match kind {
            temporal_engine::ErrorKind::Range => ErrorKind::RangeError,
            temporal_engine::ErrorKind::Type => ErrorKind::TypeError,
        }
    }
}

/// A value or an error, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    value: Option<T>,
    error_kind: ErrorKind,
    message: Option<String>,
}

/// Outcome of a comparison: `-1`, `0` or `1`.
pub type CompareOutcome = Outcome<i8>;

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Outcome {
            value: Some(value),
            error_kind: ErrorKind::None,
            message: None,
        }
    }

    pub fn err(error: &TemporalError) -> Self {
        Outcome {
            value: None,
            error_kind: error.kind().into(),
            message: Some(error.message().to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_kind == ErrorKind::None
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn error_kind(&self) -> ErrorKind {
        self.error_kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Split into the value or the `(kind, message)` pair.
    pub fn into_result(self) -> Result<T, (ErrorKind, String)> {
        match self.value {
            Some(value) => Ok(value),
            None => Err((self.error_kind, self.message.unwrap_or_default())),
        }
    }
}

impl<T> From<temporal_engine::Result<T>> for Outcome<T> {
    fn from(result: temporal_engine::Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::ok(value),
            Err(error) => {
                tracing::debug!(kind = ?error.kind(), message = error.message(), "bridge call failed");
                Outcome::err(&error)
            }
        }
    }
}

pub(crate) fn required<'a>(text: Option<&'a str>, what: &str) -> temporal_engine::Result<&'a str> {
    text.ok_or_else(|| TemporalError::Type(format!("{what} is required")))
}

/// Parse a required value of any engine kind.
pub(crate) fn parse<T>(text: Option<&str>, what: &str) -> temporal_engine::Result<T>
where
    T: FromStr<Err = TemporalError>,
{
    required(text, what)?.parse()
}

/// Parse and re-render in canonical form.
pub(crate) fn canonical<T>(text: Option<&str>, what: &str) -> Outcome<String>
where
    T: FromStr<Err = TemporalError> + Display,
{
    parse::<T>(text, what).map(|value| value.to_string()).into()
}

/// The named calendar, or ISO 8601 when none is given.
pub(crate) fn calendar_or_iso(id: Option<&str>) -> temporal_engine::Result<Calendar> {
    id.map_or(Ok(Calendar::Iso8601), Calendar::from_identifier)
}

pub(crate) fn difference_options(largest_unit: Option<&str>) -> temporal_engine::Result<DifferenceOptions> {
    Ok(DifferenceOptions {
        largest_unit: largest_unit.map(str::parse::<Unit>).transpose()?,
    })
}

/// Build a component record, or the invalid default if `result` failed.
pub(crate) fn extract<T, R: Default>(result: temporal_engine::Result<T>, build: impl FnOnce(T) -> R) -> R {
    match result {
        Ok(value) => build(value),
        Err(error) => {
            tracing::trace!(kind = ?error.kind(), message = error.message(), "component extraction failed");
            R::default()
        }
    }
}
