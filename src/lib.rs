//! The `xsd_temporal` crate implements the XML Schema 1.0 `duration` type and
//! the eight Gregorian date/time types (`dateTime`, `date`, `time`,
//! `gYearMonth`, `gMonthDay`, `gYear`, `gMonth`, `gDay`) as exact values.
//!
//! ```rust
//! use xsd_temporal::{Duration, PartialDateTime};
//! use core::str::FromStr;
//!
//! let mut moment = PartialDateTime::from_str("2000-01-31T00:00:00Z").unwrap();
//! moment.add(&Duration::from_str("P1M").unwrap()).unwrap();
//! assert_eq!(moment.to_xml_format().unwrap(), "2000-02-29T00:00:00Z");
//!
//! // Durations only have a partial order.
//! let days = Duration::from_str("P30D").unwrap();
//! let month = Duration::from_str("P1M").unwrap();
//! assert_eq!(days.compare(&month).unwrap(), None);
//! ```
//!
//! Every field of both value kinds may be absent, and an absent field is
//! distinct from a field holding zero. Integer fields have unbounded
//! magnitude and seconds are kept as exact decimals.
//!
//! This library's primary source is [XML Schema Part 2: Datatypes][xsd-datatypes],
//! including the order relation of Appendix D and the addition algorithm of
//! Appendix E.
//!
//! [xsd-datatypes]: https://www.w3.org/TR/xmlschema-2/
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod fields;
pub mod parsers;
pub mod primitive;

mod builtins;

#[doc(hidden)]
pub(crate) mod utils;

use core::cmp::Ordering;

#[doc(inline)]
pub use error::{DatatypeError, ErrorKind};

/// The result type of this crate.
pub type DatatypeResult<T> = Result<T, DatatypeError>;

pub mod partial {
    //! Partial component records.
    //!
    //! A `PartialDuration` collects the possibly-absent fields of a duration
    //! before they are validated into a `Duration`.
    pub use crate::builtins::core::PartialDuration;
}

pub use crate::builtins::core::{Duration, PartialDateTime};
pub use fields::{DurationField, DurationType, SchemaType};
pub use primitive::Decimal;

/// A library specific trait for unwrapping assertions.
pub(crate) trait DatatypeUnwrap {
    type Output;

    /// Assertion based unwrapping. This will panic in debug builds, but
    /// returns an error at runtime.
    fn datatype_unwrap(self) -> DatatypeResult<Self::Output>;
}

impl<T> DatatypeUnwrap for Option<T> {
    type Output = T;

    fn datatype_unwrap(self) -> DatatypeResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(DatatypeError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! datatype_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::DatatypeError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::DatatypeError::assert());
        }
    };
}

/// A general Sign type.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    #[default]
    Positive = 1,
    Zero = 0,
    Negative = -1,
}

impl From<i8> for Sign {
    fn from(value: i8) -> Self {
        match value.cmp(&0) {
            Ordering::Greater => Self::Positive,
            Ordering::Equal => Self::Zero,
            Ordering::Less => Self::Negative,
        }
    }
}

impl Sign {
    /// Returns the opposite `Sign`.
    #[must_use]
    pub fn negate(&self) -> Sign {
        Sign::from(-(*self as i8))
    }

    /// Returns the `Sign` of the product of two signed values.
    #[must_use]
    pub fn mul(&self, other: Sign) -> Sign {
        Sign::from(*self as i8 * other as i8)
    }
}

// Relevant numeric constants
/// The number of years in an eon.
pub const YEARS_PER_EON: u32 = 1_000_000_000;
/// The largest timezone offset, in minutes.
pub const MAX_TIMEZONE_OFFSET: i16 = 14 * 60;
/// The smallest timezone offset, in minutes.
pub const MIN_TIMEZONE_OFFSET: i16 = -14 * 60;
