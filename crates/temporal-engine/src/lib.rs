//! # temporal-engine
//!
//! Calendar-aware date, time and duration arithmetic.
//!
//! Every value is immutable: parsing, construction and arithmetic all return
//! new values, and every fallible operation returns a [`TemporalError`] that is
//! either a `RangeError` (a well-formed value out of bounds) or a `TypeError`
//! (structurally invalid input). Canonical ISO 8601 strings round-trip exactly.
//!
//! ## Modules
//!
//! - [`parser`]: ISO 8601 / RFC 9557 text → validated fields per value kind
//! - [`calendar`]: Calendar identifiers, leap years, month lengths, ISO week numbering
//! - [`duration`]: Ten-component signed durations: balancing, add, compare, with
//! - [`instant`]: Exact epoch-nanosecond points on the timeline
//! - [`plain_time`], [`plain_date`], [`plain_date_time`], [`plain_year_month`],
//!   [`plain_month_day`]: Wall-clock values with constrain/reject overflow policies
//! - [`options`]: Units, overflow policy, difference and formatting options
//! - [`now`]: The host clock collaborator for "current time" queries
//! - [`error`]: Error types

/// Serialize and deserialize a type as its canonical ISO string, through its
/// `Display` and `FromStr` impls.
macro_rules! iso_string_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
pub(crate) use iso_string_serde;

pub mod calendar;
pub mod duration;
pub mod error;
mod format;
pub mod instant;
mod iso;
pub mod now;
pub mod options;
pub mod parser;
pub mod plain_date;
pub mod plain_date_time;
pub mod plain_month_day;
pub mod plain_time;
pub mod plain_year_month;

pub use calendar::Calendar;
pub use duration::{Duration, PartialDuration};
pub use error::{ErrorKind, Result, TemporalError};
pub use instant::Instant;
pub use iso::{IsoDate, IsoDateTime, IsoTime};
pub use now::{FixedClock, HostClock, SystemClock};
pub use options::{CalendarDisplay, DifferenceOptions, Overflow, Precision, ToStringOptions, Unit};
pub use parser::{parse, Fields, Kind};
pub use plain_date::{PartialDate, PlainDate};
pub use plain_date_time::{PartialDateTime, PlainDateTime};
pub use plain_month_day::{PartialMonthDay, PlainMonthDay};
pub use plain_time::{PartialTime, PlainTime};
pub use plain_year_month::{PartialYearMonth, PlainYearMonth};
