//! Implementation of the `Decimal` primitive
//!
//! A `Decimal` is an unscaled arbitrary-precision integer together with a
//! base ten scale, so `1.50` is stored as `150` with a scale of `2`. Values
//! keep the scale they were written with; equality and ordering compare the
//! numeric value only.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::{
    cmp::Ordering,
    fmt,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::{DatatypeError, DatatypeResult, Sign};

#[derive(Debug, Clone, Default)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    /// Creates a new `Decimal` equal to `unscaled * 10^-scale`.
    #[inline]
    #[must_use]
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        bigint_sign(&self.unscaled)
    }

    #[inline]
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.unscaled.abs(), self.scale)
    }

    /// Returns the unscaled value expressed at `scale`, which must not be
    /// smaller than the current scale.
    fn unscaled_at(&self, scale: u32) -> BigInt {
        debug_assert!(scale >= self.scale);
        &self.unscaled * pow10(scale - self.scale)
    }

    /// Returns the integer part, truncated toward zero.
    #[must_use]
    pub fn trunc(&self) -> BigInt {
        if self.scale == 0 {
            return self.unscaled.clone();
        }
        &self.unscaled / pow10(self.scale)
    }

    /// Returns the greatest integer less than or equal to this value.
    #[must_use]
    pub fn floor(&self) -> BigInt {
        if self.scale == 0 {
            return self.unscaled.clone();
        }
        self.unscaled.div_floor(&pow10(self.scale))
    }

    /// Returns `self - self.trunc()`, keeping the current scale.
    #[must_use]
    pub fn fract(&self) -> Self {
        if self.scale == 0 {
            return Self::zero();
        }
        Self::new(&self.unscaled % pow10(self.scale), self.scale)
    }

    /// Returns `ceil(|self| / divisor)` as an integer.
    #[must_use]
    pub(crate) fn ceil_div_abs(&self, divisor: u32) -> BigInt {
        let denominator = pow10(self.scale) * BigInt::from(divisor);
        let (quotient, remainder) = self.unscaled.abs().div_rem(&denominator);
        if remainder.is_zero() {
            quotient
        } else {
            quotient + 1u32
        }
    }

    /// Parses `digits`, `digits.digits`, `digits.` or `.digits`, optionally
    /// preceded by a sign.
    pub fn from_utf8(bytes: &[u8]) -> DatatypeResult<Self> {
        let (negative, body) = match bytes.split_first() {
            Some((b'-', rest)) => (true, rest),
            Some((b'+', rest)) => (false, rest),
            _ => (false, bytes),
        };

        let (integer, fraction) = match body.iter().position(|b| *b == b'.') {
            Some(point) => (&body[..point], &body[point + 1..]),
            None => (body, &body[body.len()..]),
        };

        if integer.len() + fraction.len() == 0
            || !integer.iter().chain(fraction).all(u8::is_ascii_digit)
        {
            return Err(DatatypeError::syntax().with_message("Invalid decimal number."));
        }

        let mut digits = Vec::with_capacity(integer.len() + fraction.len());
        digits.extend_from_slice(integer);
        digits.extend_from_slice(fraction);

        let mut unscaled = BigInt::parse_bytes(&digits, 10)
            .ok_or(DatatypeError::syntax().with_message("Invalid decimal number."))?;
        if negative {
            unscaled = -unscaled;
        }

        let scale = u32::try_from(fraction.len())
            .map_err(|_| DatatypeError::syntax().with_message("Decimal scale is too large."))?;

        Ok(Self::new(unscaled, scale))
    }

    /// Returns the plain rendering of this value with the leading integer
    /// digit removed, e.g. `0.250` becomes `.250`.
    ///
    /// Only meaningful for values in `[0, 1)`.
    #[must_use]
    pub(crate) fn to_fraction_string(&self) -> String {
        let plain = self.to_string();
        plain.get(1..).map(ToString::to_string).unwrap_or_default()
    }
}

#[inline]
pub(crate) fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u8).pow(exponent)
}

#[inline]
pub(crate) fn bigint_sign(value: &BigInt) -> Sign {
    if value.is_positive() {
        Sign::Positive
    } else if value.is_negative() {
        Sign::Negative
    } else {
        Sign::Zero
    }
}

// ==== Trait implementations ====

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}

impl From<&BigInt> for Decimal {
    fn from(value: &BigInt) -> Self {
        Self::new(value.clone(), 0)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl FromStr for Decimal {
    type Err = DatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_utf8(s.as_bytes())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unscaled.is_negative() {
            f.write_str("-")?;
        }
        let digits = self.unscaled.magnitude().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (integer, fraction) = digits.split_at(digits.len() - scale);
            f.write_str(integer)?;
            f.write_str(".")?;
            return f.write_str(fraction);
        }
        f.write_str("0.")?;
        for _ in digits.len()..scale {
            f.write_str("0")?;
        }
        f.write_str(&digits)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.unscaled_at(scale).cmp(&other.unscaled_at(scale))
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        let scale = self.scale.max(rhs.scale);
        Decimal::new(self.unscaled_at(scale) + rhs.unscaled_at(scale), scale)
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        &self + &rhs
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        let scale = self.scale.max(rhs.scale);
        Decimal::new(self.unscaled_at(scale) - rhs.unscaled_at(scale), scale)
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        &self - &rhs
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal::new(&self.unscaled * &rhs.unscaled, self.scale + rhs.scale)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        &self * &rhs
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::new(-&self.unscaled, self.scale)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::str::FromStr;

    #[test]
    fn parse_and_render_keeps_scale() {
        let value = Decimal::from_str("1.50").unwrap();
        assert_eq!(value.scale(), 2);
        assert_eq!(value.to_string(), "1.50");

        assert_eq!(Decimal::from_str(".5").unwrap().to_string(), "0.5");
        assert_eq!(Decimal::from_str("5.").unwrap().to_string(), "5");
        assert_eq!(Decimal::from_str("0.007").unwrap().to_string(), "0.007");
        assert_eq!(Decimal::from_str("-0.25").unwrap().to_string(), "-0.25");

        assert!(Decimal::from_str(".").is_err());
        assert!(Decimal::from_str("").is_err());
        assert!(Decimal::from_str("1.2.3").is_err());
        assert!(Decimal::from_str("1e5").is_err());
    }

    #[test]
    fn equality_ignores_scale() {
        let a = Decimal::from_str("1.0").unwrap();
        let b = Decimal::from_str("1.000").unwrap();
        assert_eq!(a, b);
        assert!(Decimal::from_str("0.99").unwrap() < a);
    }

    #[test]
    fn integer_parts() {
        let value = Decimal::from_str("-7.25").unwrap();
        assert_eq!(value.trunc(), BigInt::from(-7));
        assert_eq!(value.floor(), BigInt::from(-8));
        assert_eq!(value.fract(), Decimal::from_str("-0.25").unwrap());

        let value = Decimal::from_str("61.5").unwrap();
        assert_eq!(value.ceil_div_abs(60), BigInt::from(2));
        assert_eq!(Decimal::from(120).ceil_div_abs(60), BigInt::from(2));
        assert_eq!(Decimal::from(-121).ceil_div_abs(60), BigInt::from(3));
    }

    #[test]
    fn arithmetic_is_exact() {
        let a = Decimal::from_str("0.1").unwrap();
        let b = Decimal::from_str("0.2").unwrap();
        assert_eq!((&a + &b).to_string(), "0.3");
        assert_eq!((&a - &b).to_string(), "-0.1");
        assert_eq!((&a * &b).to_string(), "0.02");
        assert_eq!((-&a).to_string(), "-0.1");
    }

    #[test]
    fn fraction_rendering() {
        assert_eq!(Decimal::from_str("0.500").unwrap().to_fraction_string(), ".500");
        assert_eq!(Decimal::zero().to_fraction_string(), "");
    }
}
