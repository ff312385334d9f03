//! The order relation of date/time values.

use core::cmp::Ordering;

use crate::{
    builtins::core::Duration, DatatypeResult, MAX_TIMEZONE_OFFSET, MIN_TIMEZONE_OFFSET,
};

use super::{add, DateTimeFields, PartialDateTime};

impl DateTimeFields {
    /// Reads the local fields as if they were at `timezone` and converts
    /// them to UTC.
    fn at_timezone(&self, timezone: i16) -> DatatypeResult<Self> {
        let mut fields = self.clone();
        if timezone != 0 {
            let minutes = u64::from(timezone.unsigned_abs());
            add::add_duration(&mut fields, &Duration::new(timezone < 0, 0, 0, 0, 0, minutes, 0))?;
        }
        fields.timezone = Some(0);
        Ok(fields)
    }

    /// Converts zoned fields to UTC. Unzoned fields are left alone.
    fn to_utc(&self) -> DatatypeResult<Self> {
        match self.timezone {
            Some(timezone) => self.at_timezone(timezone),
            None => Ok(self.clone()),
        }
    }
}

/// Compares two optional fields. A field present on one side only cannot be
/// ordered.
fn compare_field<T: Ord>(lhs: Option<T>, rhs: Option<T>) -> Option<Ordering> {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => Some(lhs.cmp(&rhs)),
        (None, None) => Some(Ordering::Equal),
        _ => None,
    }
}

/// Compares fields from the year down, without regard to the timezone.
fn compare_fields(lhs: &DateTimeFields, rhs: &DateTimeFields) -> Option<Ordering> {
    let orderings = [
        compare_field(lhs.eon_and_year(), rhs.eon_and_year()),
        compare_field(lhs.month, rhs.month),
        compare_field(lhs.day, rhs.day),
        compare_field(lhs.hour, rhs.hour),
        compare_field(lhs.minute, rhs.minute),
        compare_field(lhs.second, rhs.second),
    ];
    for ordering in orderings {
        if ordering != Some(Ordering::Equal) {
            return ordering;
        }
    }
    // An absent fraction is zero.
    let lhs_fraction = lhs.fractional_second.clone().unwrap_or_default();
    let rhs_fraction = rhs.fractional_second.clone().unwrap_or_default();
    Some(lhs_fraction.cmp(&rhs_fraction))
}

impl PartialDateTime {
    /// Compares two moments.
    ///
    /// Returns `None` when the moments are incomparable: a field is present
    /// on one side only, or exactly one of them has a timezone and they are
    /// less than fourteen hours apart.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        self.try_compare(other).ok().flatten()
    }

    fn try_compare(&self, other: &Self) -> DatatypeResult<Option<Ordering>> {
        let (lhs, rhs) = (&self.fields, &other.fields);
        match (lhs.timezone, rhs.timezone) {
            (lhs_zone, rhs_zone) if lhs_zone == rhs_zone => Ok(compare_fields(lhs, rhs)),
            (Some(_), Some(_)) => Ok(compare_fields(&lhs.to_utc()?, &rhs.to_utc()?)),
            (Some(_), None) => {
                // `rhs` spans every instant from its reading at +14:00 to its
                // reading at -14:00. Time-only values can wrap around
                // midnight, so both ends must agree.
                let lhs = lhs.to_utc()?;
                let earliest = compare_fields(&lhs, &rhs.at_timezone(MAX_TIMEZONE_OFFSET)?);
                let latest = compare_fields(&lhs, &rhs.at_timezone(MIN_TIMEZONE_OFFSET)?);
                Ok(match (earliest, latest) {
                    (Some(Ordering::Less), Some(Ordering::Less)) => Some(Ordering::Less),
                    (Some(Ordering::Greater), Some(Ordering::Greater)) => Some(Ordering::Greater),
                    _ => None,
                })
            }
            (None, _) => Ok(other.try_compare(self)?.map(Ordering::reverse)),
        }
    }

    /// Returns this moment converted to UTC.
    ///
    /// A moment without a timezone is returned unchanged.
    pub fn normalize(&self) -> DatatypeResult<Self> {
        Ok(Self::from_fields(self.fields.to_utc()?))
    }
}
