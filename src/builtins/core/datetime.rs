//! This module implements `PartialDateTime`, the value of every XML Schema
//! Gregorian date/time type.

use alloc::{format, string::String};
use core::{cmp::Ordering, fmt, ops::RangeInclusive, str::FromStr};

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use writeable::Writeable;

use crate::{
    builtins::core::Duration,
    fields::{self, SchemaType},
    parsers::{self, FormattableMoment, ParsedMoment},
    primitive::Decimal,
    utils, DatatypeError, DatatypeResult, MAX_TIMEZONE_OFFSET, MIN_TIMEZONE_OFFSET,
    YEARS_PER_EON,
};

mod add;
mod compare;


/// The fields of a `PartialDateTime`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct DateTimeFields {
    /// The multiple of a billion years above `year`.
    pub(crate) eon: Option<BigInt>,
    pub(crate) year: Option<i32>,
    pub(crate) month: Option<u8>,
    pub(crate) day: Option<u8>,
    pub(crate) hour: Option<u8>,
    pub(crate) minute: Option<u8>,
    pub(crate) second: Option<u8>,
    pub(crate) fractional_second: Option<Decimal>,
    /// Offset from UTC in minutes.
    pub(crate) timezone: Option<i16>,
}

impl DateTimeFields {
    pub(crate) fn eon_and_year(&self) -> Option<BigInt> {
        match (&self.eon, self.year) {
            (Some(eon), Some(year)) => Some(eon + year),
            (Some(eon), None) => Some(eon.clone()),
            (None, Some(year)) => Some(BigInt::from(year)),
            (None, None) => None,
        }
    }

    /// Splits `year` into an eon and a year below a billion in magnitude.
    pub(crate) fn set_eon_and_year(&mut self, year: Option<&BigInt>) {
        let Some(year) = year else {
            self.eon = None;
            self.year = None;
            return;
        };
        let low = year % BigInt::from(YEARS_PER_EON);
        let eon = year - &low;
        // |low| < 10^9, so it always fits.
        self.year = low.to_i32();
        self.eon = (!eon.is_zero()).then_some(eon);
    }

    fn presence_mask(&self) -> u8 {
        let mut mask = 0;
        if self.year.is_some() || self.eon.is_some() {
            mask |= fields::YEAR;
        }
        for (present, bit) in [
            (self.month.is_some(), fields::MONTH),
            (self.day.is_some(), fields::DAY),
            (self.hour.is_some(), fields::HOUR),
            (self.minute.is_some(), fields::MINUTE),
            (self.second.is_some(), fields::SECOND),
        ] {
            if present {
                mask |= bit;
            }
        }
        mask
    }

    fn max_day_in_month(&self, month: u8) -> u8 {
        match (&self.eon, self.year) {
            (None, None) => utils::max_day_in_month(utils::DEFAULT_LEAP_YEAR, month),
            (None, Some(year)) => utils::max_day_in_month(year, month),
            _ => self.eon_and_year().map_or_else(
                || utils::max_day_in_month(utils::DEFAULT_LEAP_YEAR, month),
                |year| utils::max_day_in_month_big(&year, month),
            ),
        }
    }

    fn is_valid(&self) -> bool {
        if let (Some(month), Some(day)) = (self.month, self.day) {
            if day > self.max_day_in_month(month) {
                return false;
            }
        }
        if self.hour == Some(24) && !self.is_midnight_time() {
            return false;
        }
        // There is no year zero without an eon.
        !(self.eon.is_none() && self.year == Some(0))
    }

    /// Whether minute, second and fraction are all zero.
    fn is_midnight_time(&self) -> bool {
        self.minute == Some(0)
            && self.second == Some(0)
            && self.fractional_second.as_ref().is_none_or(Decimal::is_zero)
    }

    /// Rewrites `24:00:00` to `00:00:00` of the next day.
    fn resolve_hour_24(&mut self) -> DatatypeResult<()> {
        if self.hour != Some(24) {
            return Ok(());
        }
        if !self.is_midnight_time() {
            return Err(DatatypeError::invalid_field()
                .with_message("Hour 24 requires zero minutes and seconds."));
        }
        self.hour = Some(0);
        add::add_duration(self, &Duration::new(true, 0, 0, 1, 0, 0, 0))
    }
}

fn check_range<T>(value: Option<T>, range: RangeInclusive<T>, name: &str) -> DatatypeResult<()>
where
    T: PartialOrd + fmt::Display,
{
    match value {
        Some(value) if !range.contains(&value) => Err(DatatypeError::invalid_field().with_message(
            format!("{name} {value} is not in {}..={}.", range.start(), range.end()),
        )),
        _ => Ok(()),
    }
}

/// A Gregorian date/time value whose fields may each be absent.
///
/// The present fields decide which of the eight XML Schema date/time types
/// the value belongs to, see [`PartialDateTime::schema_type`].
///
/// Fields are changed through fallible setters that leave the value
/// untouched when they fail. The last value accepted by
/// [`PartialDateTime::save`] can be restored with [`PartialDateTime::reset`].
///
/// Moments are only partially ordered: a moment without a timezone is
/// incomparable with a zoned moment less than fourteen hours away.
#[derive(Debug, Default)]
pub struct PartialDateTime {
    fields: DateTimeFields,
    last_valid: DateTimeFields,
}

impl Clone for PartialDateTime {
    fn clone(&self) -> Self {
        Self::from_fields(self.fields.clone())
    }
}

// ==== Private API ====

impl PartialDateTime {
    fn from_fields(fields: DateTimeFields) -> Self {
        Self {
            last_valid: fields.clone(),
            fields,
        }
    }

    /// Applies the raw fields through the setters without checking that they
    /// form a valid moment.
    fn assemble(parsed: ParsedMoment) -> DatatypeResult<Self> {
        let mut moment = Self::default();
        moment.set_year(parsed.year);
        moment.set_month(parsed.month)?;
        moment.set_day(parsed.day)?;
        moment.set_time(
            parsed.hour,
            parsed.minute,
            parsed.second,
            parsed.fractional_second,
        )?;
        moment.set_timezone(parsed.timezone)?;
        Ok(moment)
    }

    /// Runs a fallible change on a copy of the fields and keeps the copy
    /// only if the change succeeds.
    fn update(
        &mut self,
        change: impl FnOnce(&mut DateTimeFields) -> DatatypeResult<()>,
    ) -> DatatypeResult<()> {
        let mut fields = self.fields.clone();
        change(&mut fields)?;
        self.fields = fields;
        Ok(())
    }
}

// ==== Public API ====

impl PartialDateTime {
    /// Creates a `PartialDateTime` with every field absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validated `PartialDateTime` from its fields.
    ///
    /// An hour of 24 is accepted as midnight of the following day. Fails with
    /// `InvalidField` when a field is out of range or the fields do not form
    /// a valid moment.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        year: Option<BigInt>,
        month: Option<u8>,
        day: Option<u8>,
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
        fractional_second: Option<Decimal>,
        timezone: Option<i16>,
    ) -> DatatypeResult<Self> {
        let mut moment = Self::assemble(ParsedMoment {
            year,
            month,
            day,
            hour,
            minute,
            second,
            fractional_second,
            timezone,
        })?;
        moment.save()?;
        Ok(moment)
    }

    /// Parses any of the eight lexical date/time forms.
    ///
    /// The form is chosen from the punctuation of `s`.
    pub fn from_utf8(s: &[u8]) -> DatatypeResult<Self> {
        let moment = Self::assemble(parsers::parse_moment(s)?)?;
        if !moment.is_valid() {
            return Err(DatatypeError::syntax().with_message(format!(
                "\"{}\" is not a valid date/time.",
                String::from_utf8_lossy(s)
            )));
        }
        Ok(Self::from_fields(moment.fields))
    }

    /// Returns the lexical representation of this value.
    ///
    /// Fails with `IllegalState` when the present fields match no schema type.
    pub fn to_xml_format(&self) -> DatatypeResult<String> {
        let schema_type = self.schema_type()?;
        let formattable = FormattableMoment {
            schema_type,
            year: self.eon_and_year(),
            month: self.fields.month,
            day: self.fields.day,
            hour: self.fields.hour,
            minute: self.fields.minute,
            second: self.fields.second,
            fractional_second: self.fields.fractional_second.as_ref(),
            timezone: self.fields.timezone,
        };
        Ok(formattable.write_to_string().into_owned())
    }

    /// Returns the schema type selected by the present fields.
    pub fn schema_type(&self) -> DatatypeResult<SchemaType> {
        SchemaType::from_mask(self.fields.presence_mask()).ok_or_else(|| {
            DatatypeError::illegal_state()
                .with_message("The present fields do not match a date/time type.")
        })
    }

    /// Returns whether the present fields form a valid moment.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fields.is_valid()
    }

    /// Records the current fields as the state `reset` returns to.
    ///
    /// Fails with `InvalidField` when the fields are not a valid moment.
    pub fn save(&mut self) -> DatatypeResult<()> {
        if !self.is_valid() {
            return Err(DatatypeError::invalid_field()
                .with_message("Cannot save an invalid date/time."));
        }
        self.last_valid = self.fields.clone();
        Ok(())
    }

    /// Restores the fields last recorded by `save`.
    pub fn reset(&mut self) {
        self.fields = self.last_valid.clone();
    }

    /// Makes every field absent.
    pub fn clear(&mut self) {
        self.fields = DateTimeFields::default();
    }

    /// Adds `duration` to this moment.
    ///
    /// Fields that are absent stay absent, but still take part in carrying.
    /// The timezone is not changed.
    pub fn add(&mut self, duration: &Duration) -> DatatypeResult<()> {
        self.update(|fields| add::add_duration(fields, duration))
    }
}

// ==== Getters ====

impl PartialDateTime {
    /// Returns the eon, the year rounded toward zero to a multiple of a billion.
    #[inline]
    #[must_use]
    pub fn eon(&self) -> Option<&BigInt> {
        self.fields.eon.as_ref()
    }

    /// Returns the year modulo a billion.
    #[inline]
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.fields.year
    }

    /// Returns the full year.
    #[inline]
    #[must_use]
    pub fn eon_and_year(&self) -> Option<BigInt> {
        self.fields.eon_and_year()
    }

    #[inline]
    #[must_use]
    pub fn month(&self) -> Option<u8> {
        self.fields.month
    }

    #[inline]
    #[must_use]
    pub fn day(&self) -> Option<u8> {
        self.fields.day
    }

    #[inline]
    #[must_use]
    pub fn hour(&self) -> Option<u8> {
        self.fields.hour
    }

    #[inline]
    #[must_use]
    pub fn minute(&self) -> Option<u8> {
        self.fields.minute
    }

    #[inline]
    #[must_use]
    pub fn second(&self) -> Option<u8> {
        self.fields.second
    }

    #[inline]
    #[must_use]
    pub fn fractional_second(&self) -> Option<&Decimal> {
        self.fields.fractional_second.as_ref()
    }

    /// Returns the fractional second in whole milliseconds.
    #[must_use]
    pub fn millisecond(&self) -> Option<u16> {
        let fraction = self.fields.fractional_second.as_ref()?;
        (fraction * &Decimal::from(1000)).trunc().to_u16()
    }

    /// Returns the offset from UTC in minutes.
    #[inline]
    #[must_use]
    pub fn timezone(&self) -> Option<i16> {
        self.fields.timezone
    }
}

// ==== Setters ====

impl PartialDateTime {
    /// Sets the full year. Years beyond a billion are split into an eon.
    pub fn set_year(&mut self, year: Option<BigInt>) {
        self.fields.set_eon_and_year(year.as_ref());
    }

    pub fn set_month(&mut self, month: Option<u8>) -> DatatypeResult<()> {
        check_range(month, 1..=12, "month")?;
        self.fields.month = month;
        Ok(())
    }

    pub fn set_day(&mut self, day: Option<u8>) -> DatatypeResult<()> {
        check_range(day, 1..=31, "day")?;
        self.fields.day = day;
        Ok(())
    }

    /// Sets the hour.
    ///
    /// An hour of 24 requires the minute and second to already be zero and is
    /// stored as hour zero of the next day.
    pub fn set_hour(&mut self, hour: Option<u8>) -> DatatypeResult<()> {
        check_range(hour, 0..=24, "hour")?;
        self.update(|fields| {
            fields.hour = hour;
            fields.resolve_hour_24()
        })
    }

    pub fn set_minute(&mut self, minute: Option<u8>) -> DatatypeResult<()> {
        check_range(minute, 0..=59, "minute")?;
        self.fields.minute = minute;
        Ok(())
    }

    /// Sets the second. A second of 60 is a leap second.
    pub fn set_second(&mut self, second: Option<u8>) -> DatatypeResult<()> {
        check_range(second, 0..=60, "second")?;
        self.fields.second = second;
        Ok(())
    }

    /// Sets the fractional second, which must be in `[0, 1)`.
    pub fn set_fractional_second(&mut self, fraction: Option<Decimal>) -> DatatypeResult<()> {
        if let Some(fraction) = &fraction {
            if fraction.sign() == crate::Sign::Negative || fraction >= &Decimal::from(1) {
                return Err(DatatypeError::invalid_field()
                    .with_message(format!("fractional second {fraction} is not in [0, 1).")));
            }
        }
        self.fields.fractional_second = fraction;
        Ok(())
    }

    /// Sets the fractional second to a whole number of milliseconds.
    pub fn set_millisecond(&mut self, millisecond: Option<u16>) -> DatatypeResult<()> {
        check_range(millisecond, 0..=999, "millisecond")?;
        self.fields.fractional_second =
            millisecond.map(|ms| Decimal::new(BigInt::from(ms), 3));
        Ok(())
    }

    /// Sets the offset from UTC in minutes.
    pub fn set_timezone(&mut self, timezone: Option<i16>) -> DatatypeResult<()> {
        check_range(timezone, MIN_TIMEZONE_OFFSET..=MAX_TIMEZONE_OFFSET, "timezone")?;
        self.fields.timezone = timezone;
        Ok(())
    }

    /// Sets the four time fields at once.
    ///
    /// A second of 60 is only accepted at 23:59 or 00:00. An hour of 24 is
    /// only accepted as `24:00:00` and is stored as midnight of the next day.
    pub fn set_time(
        &mut self,
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
        fractional_second: Option<Decimal>,
    ) -> DatatypeResult<()> {
        check_range(hour, 0..=24, "hour")?;
        let leap_second_allowed = matches!((hour, minute), (Some(23), Some(59)) | (Some(0), Some(0)));
        if second == Some(60) && !leap_second_allowed {
            return Err(DatatypeError::invalid_field()
                .with_message("A leap second is only allowed at 23:59 or 00:00."));
        }

        let mut scratch = self.clone();
        scratch.fields.hour = hour;
        scratch.set_minute(minute)?;
        scratch.set_second(second)?;
        scratch.set_fractional_second(fractional_second)?;
        scratch.fields.resolve_hour_24()?;
        self.fields = scratch.fields;
        Ok(())
    }
}

// ==== Trait impls ====

impl FromStr for PartialDateTime {
    type Err = DatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_utf8(s.as_bytes())
    }
}

impl PartialEq for PartialDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for PartialDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}
