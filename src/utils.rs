//! Utility field arithmetic and date equations.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::{fields::DurationField, primitive::Decimal, DatatypeError, DatatypeResult, Sign};

pub(crate) const MONTHS_PER_YEAR: u8 = 12;
pub(crate) const HOURS_PER_DAY: u8 = 24;
pub(crate) const MINUTES_PER_HOUR: u8 = 60;
pub(crate) const SECONDS_PER_MINUTE: u8 = 60;

/// The number of days in a 400 year Gregorian cycle.
pub(crate) const DAYS_PER_GREGORIAN_CYCLE: u32 = 146_097;
/// The number of years in a Gregorian cycle.
pub(crate) const YEARS_PER_GREGORIAN_CYCLE: u32 = 400;

/// Year used to resolve February when the year is unknown.
pub(crate) const DEFAULT_LEAP_YEAR: i32 = 2000;

const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Fails with `InvalidField` when `value` is negative.
pub(crate) fn non_negative_or_fail(value: &BigInt, field: DurationField) -> DatatypeResult<()> {
    if value.is_negative() {
        return Err(DatatypeError::invalid_field()
            .with_message(alloc::format!("{field} must not be negative: {value}")));
    }
    Ok(())
}

/// Returns zero for an absent field or a zero sign, otherwise the value
/// with `sign` applied.
pub(crate) fn sanitize(value: Option<&BigInt>, sign: Sign) -> BigInt {
    match (value, sign) {
        (None, _) | (_, Sign::Zero) => BigInt::zero(),
        (Some(v), Sign::Positive) => v.clone(),
        (Some(v), Sign::Negative) => -v,
    }
}

/// `sanitize` for the decimal seconds field.
pub(crate) fn sanitize_decimal(value: Option<&Decimal>, sign: Sign) -> Decimal {
    match (value, sign) {
        (None, _) | (_, Sign::Zero) => Decimal::zero(),
        (Some(v), Sign::Positive) => v.clone(),
        (Some(v), Sign::Negative) => -v,
    }
}

#[inline]
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

pub(crate) fn is_leap_big_year(year: &BigInt) -> bool {
    year.is_multiple_of(&BigInt::from(400u16))
        || (year.is_multiple_of(&BigInt::from(4u8)) && !year.is_multiple_of(&BigInt::from(100u8)))
}

#[inline]
const fn days_in_month_with_leap(in_leap_year: bool, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if in_leap_year => 29,
        2 => 28,
        _ => 31,
    }
}

/// Returns the number of days in `month` of `year`.
#[inline]
pub(crate) fn max_day_in_month(year: i32, month: u8) -> u8 {
    days_in_month_with_leap(is_leap_year(year), month)
}

/// Returns the number of days in `month` of an arbitrarily large `year`.
#[inline]
pub(crate) fn max_day_in_month_big(year: &BigInt, month: u8) -> u8 {
    days_in_month_with_leap(is_leap_big_year(year), month)
}

/// Returns the number of days between 1970-01-01 and the first day of `year`.
pub(crate) fn epoch_day_number_for_year(year: &BigInt) -> BigInt {
    let days = BigInt::from(365u16) * (year - 1970i32);
    let leap_days = (year - 1969i32).div_floor(&BigInt::from(4u8))
        - (year - 1901i32).div_floor(&BigInt::from(100u8))
        + (year - 1601i32).div_floor(&BigInt::from(400u16));
    days + leap_days
}

/// Returns the number of days between 1970-01-01 and the given date.
pub(crate) fn epoch_days(year: &BigInt, month: u8, day: u8) -> BigInt {
    let month_index = usize::from(month.clamp(1, 12) - 1);
    let mut day_of_year = u32::from(DAYS_BEFORE_MONTH[month_index]) + u32::from(day) - 1;
    if month > 2 && is_leap_big_year(year) {
        day_of_year += 1;
    }
    epoch_day_number_for_year(year) + day_of_year
}
