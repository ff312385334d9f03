//! Addition, subtraction and scaling of `Duration`s.

use core::ops::Range;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::{
    fields::DurationField, primitive::Decimal, utils, DatatypeError, DatatypeResult, Sign,
};

use super::{Duration, PartialDuration};

/// Returns how many units of the next smaller field make up one `field`.
///
/// Months have no fixed length in days, so they carry nothing.
const fn carry_radix(field: DurationField) -> Option<u8> {
    match field {
        DurationField::Years => Some(utils::MONTHS_PER_YEAR),
        DurationField::Days => Some(utils::HOURS_PER_DAY),
        DurationField::Hours => Some(utils::MINUTES_PER_HOUR),
        DurationField::Minutes => Some(utils::SECONDS_PER_MINUTE),
        DurationField::Months | DurationField::Seconds => None,
    }
}

/// Returns `None` for a zero that both inputs left absent.
fn keep_if_set<T>(value: T, was_absent: bool, is_zero: impl FnOnce(&T) -> bool) -> Option<T> {
    if was_absent && is_zero(&value) {
        return None;
    }
    Some(value)
}

/// Borrows across the fields in `range` until every non-zero field in it
/// shares one sign.
///
/// A field whose sign disagrees with the last non-zero field before it
/// borrows the smallest whole number of units from its left neighbour that
/// flips its sign.
fn align_signs(buf: &mut [Decimal; 6], range: Range<usize>) -> DatatypeResult<()> {
    loop {
        let mut touched = false;
        let mut sign = Sign::Zero;
        for index in range.clone() {
            if sign.mul(buf[index].sign()) == Sign::Negative {
                touched = true;
                let radix = carry_radix(DurationField::ALL[index - 1]).ok_or_else(|| {
                    DatatypeError::assert().with_message("Borrowing across a field without a radix.")
                })?;
                let mut borrow = buf[index].ceil_div_abs(u32::from(radix));
                if buf[index].sign() == Sign::Positive {
                    borrow = -borrow;
                }
                buf[index - 1] = &buf[index - 1] - &Decimal::from(&borrow);
                buf[index] = &buf[index] + &Decimal::from(borrow * radix);
            }
            if !buf[index].is_zero() {
                sign = buf[index].sign();
            }
        }
        if !touched {
            return Ok(());
        }
    }
}

impl Duration {
    /// Returns the sum of two durations.
    ///
    /// Fails with `IllegalState` when the fields of the sum cannot be given a
    /// common sign, e.g. `P1M` minus `P1D`.
    pub fn add(&self, other: &Self) -> DatatypeResult<Self> {
        let mut buf: [Decimal; 6] = core::array::from_fn(|index| match DurationField::ALL[index] {
            DurationField::Seconds => {
                utils::sanitize_decimal(self.seconds(), self.sign)
                    + utils::sanitize_decimal(other.seconds(), other.sign)
            }
            field => Decimal::from(
                utils::sanitize(self.integer_field(field), self.sign)
                    + utils::sanitize(other.integer_field(field), other.sign),
            ),
        });

        align_signs(&mut buf, 0..2)?;
        align_signs(&mut buf, 2..6)?;

        let mut sign = Sign::Zero;
        for value in &buf {
            if sign.mul(value.sign()) == Sign::Negative {
                return Err(DatatypeError::illegal_state().with_message(alloc::format!(
                    "{self} + {other} has fields of mixed signs."
                )));
            }
            if sign == Sign::Zero {
                sign = value.sign();
            }
        }

        let absent = DurationField::ALL.map(|field| !self.is_set(field) && !other.is_set(field));
        let [years, months, days, hours, minutes, seconds] = buf.map(|value| value.abs());
        let integer = |value: Decimal, field: DurationField| {
            keep_if_set(value.trunc(), absent[field as usize], BigInt::is_zero)
        };

        Ok(Self::new_unchecked(
            sign != Sign::Negative,
            PartialDuration {
                years: integer(years, DurationField::Years),
                months: integer(months, DurationField::Months),
                days: integer(days, DurationField::Days),
                hours: integer(hours, DurationField::Hours),
                minutes: integer(minutes, DurationField::Minutes),
                seconds: keep_if_set(seconds, absent[DurationField::Seconds as usize], Decimal::is_zero),
            },
        ))
    }

    /// Returns `self - other`.
    pub fn subtract(&self, other: &Self) -> DatatypeResult<Self> {
        self.add(&other.negate())
    }

    /// Returns this duration scaled by `factor`.
    ///
    /// Each field is scaled from years down to minutes. The fractional part
    /// of a field is carried into the next smaller field and the seconds
    /// absorb whatever remains. A fractional number of months cannot be
    /// expressed in days and fails with `IllegalState`.
    pub fn multiply(&self, factor: &Decimal) -> DatatypeResult<Self> {
        let magnitude = factor.abs();
        let mut carry = Decimal::zero();
        let mut buf: [BigInt; 5] = Default::default();

        for (index, field) in DurationField::ALL[..5].iter().enumerate() {
            let value = self.integer_field(*field).cloned().unwrap_or_default();
            let scaled = Decimal::from(value) * magnitude.clone() + carry;
            let whole = scaled.trunc();
            let remainder = scaled - Decimal::from(&whole);
            carry = match carry_radix(*field) {
                Some(radix) => remainder * Decimal::from(u32::from(radix)),
                None if remainder.is_zero() => Decimal::zero(),
                None => {
                    return Err(DatatypeError::illegal_state().with_message(alloc::format!(
                        "{self} * {factor} has a fractional number of months."
                    )))
                }
            };
            buf[index] = whole;
        }

        let seconds = match self.seconds() {
            Some(seconds) => seconds * &magnitude + carry,
            None => carry,
        };

        let [years, months, days, hours, minutes] = buf;
        let integer = |value: BigInt, field: DurationField| {
            keep_if_set(value, !self.is_set(field), BigInt::is_zero)
        };

        Ok(Self::new_unchecked(
            self.sign.mul(factor.sign()) != Sign::Negative,
            PartialDuration {
                years: integer(years, DurationField::Years),
                months: integer(months, DurationField::Months),
                days: integer(days, DurationField::Days),
                hours: integer(hours, DurationField::Hours),
                minutes: integer(minutes, DurationField::Minutes),
                seconds: keep_if_set(seconds, self.seconds.is_none(), Decimal::is_zero),
            },
        ))
    }
}
