//! Adding a `Duration` to a date/time, field by field.
//!
//! Months and years are added first, then seconds, minutes, hours and
//! finally days, with each step carrying into the next. The day of month is
//! clamped into the resulting month before days are added, so `P1M` from
//! January 31st lands on the last day of February.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;

use crate::{
    builtins::core::Duration,
    primitive::Decimal,
    utils::{self, sanitize, sanitize_decimal},
    DatatypeResult, DatatypeUnwrap,
};

use super::DateTimeFields;

/// Adds `duration` to `fields`.
///
/// Absent fields are read as their smallest value and are absent again
/// afterwards.
pub(crate) fn add_duration(fields: &mut DateTimeFields, duration: &Duration) -> DatatypeResult<()> {
    let sign = duration.sign();

    // Month, carrying whole years.
    let months = BigInt::from(fields.month.unwrap_or(1)) - 1u8 + sanitize(duration.months(), sign);
    let (year_carry, month_index) = months.div_mod_floor(&BigInt::from(utils::MONTHS_PER_YEAR));
    let mut month = month_index.to_u8().datatype_unwrap()? + 1;

    // Year
    let mut year = fields.eon_and_year().unwrap_or_default()
        + sanitize(duration.years(), sign)
        + year_carry;

    // Second, carrying whole minutes. The remainder is in [0, 60).
    let start_seconds = match fields.second {
        Some(second) => {
            Decimal::from(u32::from(second)) + fields.fractional_second.clone().unwrap_or_default()
        }
        None => Decimal::zero(),
    };
    let seconds = start_seconds + sanitize_decimal(duration.seconds(), sign);
    let carry = seconds
        .floor()
        .div_floor(&BigInt::from(utils::SECONDS_PER_MINUTE));
    let seconds = seconds - Decimal::from(&carry * utils::SECONDS_PER_MINUTE);
    let second = seconds.trunc().to_u8().datatype_unwrap()?;
    let fraction = seconds.fract();

    // Minute
    let minutes = BigInt::from(fields.minute.unwrap_or(0)) + sanitize(duration.minutes(), sign) + carry;
    let (carry, minute) = minutes.div_mod_floor(&BigInt::from(utils::MINUTES_PER_HOUR));

    // Hour
    let hours = BigInt::from(fields.hour.unwrap_or(0)) + sanitize(duration.hours(), sign) + carry;
    let (carry, hour) = hours.div_mod_floor(&BigInt::from(utils::HOURS_PER_DAY));

    // Day
    let max_day = utils::max_day_in_month_big(&year, month);
    let start_day = fields.day.unwrap_or(1).clamp(1, max_day);
    let days = BigInt::from(start_day) + sanitize(duration.days(), sign) + carry;

    // Whole 400 year cycles leave the month and day unchanged.
    let (cycles, days) = days.div_rem(&BigInt::from(utils::DAYS_PER_GREGORIAN_CYCLE));
    year += cycles * utils::YEARS_PER_GREGORIAN_CYCLE;
    let mut day = days.to_i64().datatype_unwrap()?;

    loop {
        if day < 1 {
            if month == 1 {
                month = utils::MONTHS_PER_YEAR;
                year -= 1u8;
            } else {
                month -= 1;
            }
            day += i64::from(utils::max_day_in_month_big(&year, month));
            continue;
        }
        let max_day = i64::from(utils::max_day_in_month_big(&year, month));
        if day <= max_day {
            break;
        }
        day -= max_day;
        if month == utils::MONTHS_PER_YEAR {
            month = 1;
            year += 1u8;
        } else {
            month += 1;
        }
    }

    crate::datatype_assert!(
        (1..=31).contains(&day),
        "day {day} is outside its month after adding {duration}"
    );

    if fields.year.is_some() || fields.eon.is_some() {
        fields.set_eon_and_year(Some(&year));
    }
    if fields.month.is_some() {
        fields.month = Some(month);
    }
    if fields.day.is_some() {
        fields.day = Some(day.to_u8().datatype_unwrap()?);
    }
    if fields.hour.is_some() {
        fields.hour = Some(hour.to_u8().datatype_unwrap()?);
    }
    if fields.minute.is_some() {
        fields.minute = Some(minute.to_u8().datatype_unwrap()?);
    }
    if fields.second.is_some() {
        fields.second = Some(second);
        if fields.fractional_second.is_some() || !fraction.is_zero() {
            fields.fractional_second = Some(fraction);
        }
    }

    Ok(())
}
