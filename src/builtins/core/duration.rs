//! This module implements `Duration` along with its methods and components.

use alloc::{format, string::String};
use core::{cmp::Ordering, fmt, str::FromStr};

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use writeable::Writeable;

use crate::{
    builtins::core::PartialDateTime,
    fields::{DurationField, DurationType},
    parsers::{self, FormattableDuration},
    primitive::Decimal,
    utils, DatatypeError, DatatypeResult, DatatypeUnwrap, Sign,
};

mod arithmetic;

#[cfg(test)]
mod tests;

/// The moments every pair of durations is added to when comparing them.
///
/// Between them these cover every combination of month lengths and leap
/// years a duration of months and days can straddle.
const TEST_POINTS: [(i32, u8); 4] = [(1696, 9), (1697, 2), (1903, 3), (1903, 7)];

/// A `PartialDuration` is a Duration that may have fields not set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartialDuration {
    /// A potentially existent `years` field.
    pub years: Option<BigInt>,
    /// A potentially existent `months` field.
    pub months: Option<BigInt>,
    /// A potentially existent `days` field.
    pub days: Option<BigInt>,
    /// A potentially existent `hours` field.
    pub hours: Option<BigInt>,
    /// A potentially existent `minutes` field.
    pub minutes: Option<BigInt>,
    /// A potentially existent `seconds` field.
    pub seconds: Option<Decimal>,
}

impl PartialDuration {
    /// Returns whether the `PartialDuration` is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// An XML Schema `duration`.
///
/// A `Duration` is a sign together with six non-negative fields, any of
/// which may be absent. An absent field is distinct from a field holding
/// zero: `P1Y` and `P1Y0M` are different values that compare equal.
///
/// `==` is structural. Use [`Duration::compare`] for the order relation,
/// which is only partial: `P30D` and `P1M` are incomparable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duration {
    sign: Sign,
    years: Option<BigInt>,
    months: Option<BigInt>,
    days: Option<BigInt>,
    hours: Option<BigInt>,
    minutes: Option<BigInt>,
    seconds: Option<Decimal>,
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.formattable().write_to(f)
    }
}

// ==== Private Creation methods ====

impl Duration {
    /// Creates a `Duration` from non-negative fields.
    ///
    /// The sign is zero when every present field is zero, otherwise the
    /// polarity given by `is_positive`.
    pub(crate) fn new_unchecked(is_positive: bool, fields: PartialDuration) -> Self {
        let all_zero = [
            &fields.years,
            &fields.months,
            &fields.days,
            &fields.hours,
            &fields.minutes,
        ]
        .into_iter()
        .all(|field| field.as_ref().is_none_or(Zero::is_zero))
            && fields.seconds.as_ref().is_none_or(Decimal::is_zero);

        let sign = match (all_zero, is_positive) {
            (true, _) => Sign::Zero,
            (false, true) => Sign::Positive,
            (false, false) => Sign::Negative,
        };

        Self {
            sign,
            years: fields.years,
            months: fields.months,
            days: fields.days,
            hours: fields.hours,
            minutes: fields.minutes,
            seconds: fields.seconds,
        }
    }

    /// A duration with only `field` set.
    fn single_field(sign: Sign, field: DurationField, value: BigInt) -> Self {
        let mut fields = PartialDuration::default();
        match field {
            DurationField::Years => fields.years = Some(value),
            DurationField::Months => fields.months = Some(value),
            DurationField::Days => fields.days = Some(value),
            DurationField::Hours => fields.hours = Some(value),
            DurationField::Minutes => fields.minutes = Some(value),
            DurationField::Seconds => fields.seconds = Some(Decimal::from(value)),
        }
        Self::new_unchecked(sign != Sign::Negative, fields)
    }

    pub(crate) fn formattable(&self) -> FormattableDuration<'_> {
        FormattableDuration {
            sign: self.sign,
            years: self.years.as_ref(),
            months: self.months.as_ref(),
            days: self.days.as_ref(),
            hours: self.hours.as_ref(),
            minutes: self.minutes.as_ref(),
            seconds: self.seconds.as_ref(),
        }
    }

    /// Fails with `Unsupported` when a field is too large for `compare`.
    fn check_comparable(&self) -> DatatypeResult<()> {
        let ceiling = BigInt::from(i32::MAX);
        for field in DurationField::ALL {
            let too_large = match field {
                DurationField::Seconds => self
                    .seconds
                    .as_ref()
                    .is_some_and(|s| s.trunc() > ceiling),
                _ => self.integer_field(field).is_some_and(|v| v > &ceiling),
            };
            if too_large {
                #[cfg(feature = "log")]
                log::debug!("refusing to compare {self}: {field} exceeds {ceiling}");
                return Err(DatatypeError::unsupported()
                    .with_message(format!("Cannot compare a duration whose {field} exceeds {ceiling}.")));
            }
        }
        Ok(())
    }
}

// ==== Public Duration API ====

impl Duration {
    /// Creates a `Duration` with all six fields present.
    #[must_use]
    pub fn new(
        is_positive: bool,
        years: u64,
        months: u64,
        days: u64,
        hours: u64,
        minutes: u64,
        seconds: u64,
    ) -> Self {
        Self::new_unchecked(
            is_positive,
            PartialDuration {
                years: Some(years.into()),
                months: Some(months.into()),
                days: Some(days.into()),
                hours: Some(hours.into()),
                minutes: Some(minutes.into()),
                seconds: Some(Decimal::from(BigInt::from(seconds))),
            },
        )
    }

    /// Creates a `dayTimeDuration`: days, hours, minutes and seconds present,
    /// years and months absent.
    #[must_use]
    pub fn day_time(is_positive: bool, days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self::new_unchecked(
            is_positive,
            PartialDuration {
                days: Some(days.into()),
                hours: Some(hours.into()),
                minutes: Some(minutes.into()),
                seconds: Some(Decimal::from(BigInt::from(seconds))),
                ..Default::default()
            },
        )
    }

    /// Creates a `yearMonthDuration`: years and months present, everything
    /// else absent.
    #[must_use]
    pub fn year_month(is_positive: bool, years: u64, months: u64) -> Self {
        Self::new_unchecked(
            is_positive,
            PartialDuration {
                years: Some(years.into()),
                months: Some(months.into()),
                ..Default::default()
            },
        )
    }

    /// Creates a `Duration` from its possibly absent fields.
    ///
    /// Fails with `InvalidField` when every field is absent or a field is
    /// negative.
    pub fn from_partial_duration(is_positive: bool, partial: PartialDuration) -> DatatypeResult<Self> {
        if partial.is_empty() {
            return Err(DatatypeError::invalid_field()
                .with_message("PartialDuration must have a defined field."));
        }

        let integers = [
            (&partial.years, DurationField::Years),
            (&partial.months, DurationField::Months),
            (&partial.days, DurationField::Days),
            (&partial.hours, DurationField::Hours),
            (&partial.minutes, DurationField::Minutes),
        ];
        for (value, field) in integers {
            if let Some(value) = value {
                utils::non_negative_or_fail(value, field)?;
            }
        }
        if partial.seconds.as_ref().is_some_and(|s| s.sign() == Sign::Negative) {
            return Err(DatatypeError::invalid_field().with_message("seconds must not be negative."));
        }

        Ok(Self::new_unchecked(is_positive, partial))
    }

    /// Parses a lexical `duration`.
    pub fn from_utf8(s: &[u8]) -> DatatypeResult<Self> {
        let parsed = parsers::parse_duration(s)?;
        Ok(Self::new_unchecked(parsed.is_positive, parsed.fields))
    }

    /// Parses a lexical duration of the given subtype, rejecting fields the
    /// subtype does not allow with a `Syntax` error.
    pub fn parse_as(s: &str, duration_type: DurationType) -> DatatypeResult<Self> {
        let duration = Self::from_str(s)?;
        if let Some(field) = DurationField::ALL
            .into_iter()
            .find(|field| duration.is_set(*field) && !duration_type.allows(*field))
        {
            return Err(DatatypeError::syntax()
                .with_message(format!("A {duration_type} cannot contain {field}: \"{s}\"")));
        }
        Ok(duration)
    }
}

// ==== Public Duration Getters ====

impl Duration {
    /// Returns the sign of this `Duration`.
    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Returns whether every present field is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.sign == Sign::Zero
    }

    #[inline]
    #[must_use]
    pub fn years(&self) -> Option<&BigInt> {
        self.years.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn months(&self) -> Option<&BigInt> {
        self.months.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn days(&self) -> Option<&BigInt> {
        self.days.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn hours(&self) -> Option<&BigInt> {
        self.hours.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn minutes(&self) -> Option<&BigInt> {
        self.minutes.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn seconds(&self) -> Option<&Decimal> {
        self.seconds.as_ref()
    }

    /// Returns whether `field` is present.
    #[must_use]
    pub fn is_set(&self, field: DurationField) -> bool {
        match field {
            DurationField::Seconds => self.seconds.is_some(),
            _ => self.integer_field(field).is_some(),
        }
    }

    /// Returns one of the five integer fields. Always `None` for seconds.
    pub(crate) fn integer_field(&self, field: DurationField) -> Option<&BigInt> {
        match field {
            DurationField::Years => self.years.as_ref(),
            DurationField::Months => self.months.as_ref(),
            DurationField::Days => self.days.as_ref(),
            DurationField::Hours => self.hours.as_ref(),
            DurationField::Minutes => self.minutes.as_ref(),
            DurationField::Seconds => None,
        }
    }

    /// Returns the duration subtype this value belongs to.
    ///
    /// Fails with `IllegalState` when the present fields match no subtype.
    pub fn schema_type(&self) -> DatatypeResult<DurationType> {
        match DurationField::ALL.map(|field| self.is_set(field)) {
            [true, true, true, true, true, true] => Ok(DurationType::Duration),
            [false, false, true, true, true, true] => Ok(DurationType::DayTimeDuration),
            [true, true, false, false, false, false] => Ok(DurationType::YearMonthDuration),
            _ => Err(DatatypeError::illegal_state()
                .with_message(format!("{self} does not match a duration type."))),
        }
    }

    /// Returns the signed total number of months, or `None` when a day or
    /// time field is present.
    #[must_use]
    pub fn year_month_value(&self) -> Option<BigInt> {
        if [DurationField::Days, DurationField::Hours, DurationField::Minutes, DurationField::Seconds]
            .into_iter()
            .any(|field| self.is_set(field))
        {
            return None;
        }
        let years = utils::sanitize(self.years(), self.sign);
        let months = utils::sanitize(self.months(), self.sign);
        Some(years * utils::MONTHS_PER_YEAR + months)
    }

    /// Returns the signed total number of seconds, or `None` when a year or
    /// month field is present.
    #[must_use]
    pub fn day_time_value(&self) -> Option<Decimal> {
        if self.years.is_some() || self.months.is_some() {
            return None;
        }
        let days = utils::sanitize(self.days(), self.sign);
        let hours = days * utils::HOURS_PER_DAY + utils::sanitize(self.hours(), self.sign);
        let minutes = hours * utils::MINUTES_PER_HOUR + utils::sanitize(self.minutes(), self.sign);
        let seconds = minutes * utils::SECONDS_PER_MINUTE;
        Some(Decimal::from(seconds) + utils::sanitize_decimal(self.seconds(), self.sign))
    }
}

// ==== Public Duration methods ====

impl Duration {
    /// Returns this duration with its sign flipped.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            sign: self.sign.negate(),
            ..self.clone()
        }
    }

    /// Returns this duration's lexical representation.
    #[must_use]
    pub fn to_xml_format(&self) -> String {
        self.formattable().write_to_string().into_owned()
    }

    /// Compares two durations by adding both to four fixed moments.
    ///
    /// Returns `Ok(None)` when the order depends on the moment, e.g. `P30D`
    /// against `P1M`. Fails with `Unsupported` when a field of either
    /// duration exceeds `i32::MAX`.
    pub fn compare(&self, other: &Self) -> DatatypeResult<Option<Ordering>> {
        self.check_comparable()?;
        other.check_comparable()?;

        let mut result = None;
        for (year, month) in TEST_POINTS {
            let start = PartialDateTime::try_new(
                Some(year.into()),
                Some(month),
                Some(1),
                Some(0),
                Some(0),
                Some(0),
                None,
                Some(0),
            )?;
            let mut lhs = start.clone();
            lhs.add(self)?;
            let mut rhs = start;
            rhs.add(other)?;

            let Some(ordering) = lhs.compare(&rhs) else {
                return Ok(None);
            };
            match result {
                Some(previous) if previous != ordering => return Ok(None),
                _ => result = Some(ordering),
            }
        }
        Ok(result)
    }

    /// Returns whether this duration is strictly longer than `other`.
    pub fn is_longer_than(&self, other: &Self) -> DatatypeResult<bool> {
        Ok(self.compare(other)? == Some(Ordering::Greater))
    }

    /// Returns whether this duration is strictly shorter than `other`.
    pub fn is_shorter_than(&self, other: &Self) -> DatatypeResult<bool> {
        Ok(self.compare(other)? == Some(Ordering::Less))
    }

    /// Converts the years and months of this duration into days, measured
    /// from `start`.
    ///
    /// Years, then months, then days are added to `start` and the whole
    /// days elapsed become the days of the result. Hours, minutes and
    /// seconds are kept as they are. `start` must have a year, month and day.
    pub fn normalize_with(&self, start: &PartialDateTime) -> DatatypeResult<Self> {
        let (Some(year), Some(month), Some(day)) = (start.eon_and_year(), start.month(), start.day())
        else {
            return Err(DatatypeError::invalid_field()
                .with_message("A reference moment must have a year, month and day."));
        };

        let mut end = start.clone();
        for field in [DurationField::Years, DurationField::Months, DurationField::Days] {
            if let Some(value) = self.integer_field(field) {
                end.add(&Self::single_field(self.sign, field, value.clone()))?;
            }
        }

        let end_days = utils::epoch_days(
            &end.eon_and_year().datatype_unwrap()?,
            end.month().datatype_unwrap()?,
            end.day().datatype_unwrap()?,
        );
        let elapsed = end_days - utils::epoch_days(&year, month, day);

        Ok(Self::new_unchecked(
            self.sign != Sign::Negative,
            PartialDuration {
                days: Some(elapsed.abs()),
                hours: self.hours.clone(),
                minutes: self.minutes.clone(),
                seconds: self.seconds.clone(),
                ..Default::default()
            },
        ))
    }
}

// ==== Trait impls ====

impl FromStr for Duration {
    type Err = DatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_utf8(s.as_bytes())
    }
}
