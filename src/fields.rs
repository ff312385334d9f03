//! This module implements the field bookkeeping shared by `Duration` and
//! `PartialDateTime`: field identifiers, presence masks and the XML Schema
//! types a set of present fields maps to.

use core::fmt;

/// Presence bit of the `year` field.
pub(crate) const YEAR: u8 = 0b10_0000;
/// Presence bit of the `month` field.
pub(crate) const MONTH: u8 = 0b01_0000;
/// Presence bit of the `day` field.
pub(crate) const DAY: u8 = 0b00_1000;
/// Presence bit of the `hour` field.
pub(crate) const HOUR: u8 = 0b00_0100;
/// Presence bit of the `minute` field.
pub(crate) const MINUTE: u8 = 0b00_0010;
/// Presence bit of the `second` field.
pub(crate) const SECOND: u8 = 0b00_0001;

/// The XML Schema date/time type of a `PartialDateTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// `xs:dateTime`, every field present.
    DateTime,
    /// `xs:date`, year, month and day present.
    Date,
    /// `xs:time`, hour, minute and second present.
    Time,
    /// `xs:gYearMonth`
    GYearMonth,
    /// `xs:gMonthDay`
    GMonthDay,
    /// `xs:gYear`
    GYear,
    /// `xs:gMonth`
    GMonth,
    /// `xs:gDay`
    GDay,
}

impl SchemaType {
    /// Maps a year/month/day/hour/minute/second presence mask to its type.
    #[must_use]
    pub(crate) const fn from_mask(mask: u8) -> Option<Self> {
        const DATE: u8 = YEAR | MONTH | DAY;
        const TIME: u8 = HOUR | MINUTE | SECOND;
        match mask {
            m if m == DATE | TIME => Some(Self::DateTime),
            DATE => Some(Self::Date),
            TIME => Some(Self::Time),
            m if m == YEAR | MONTH => Some(Self::GYearMonth),
            m if m == MONTH | DAY => Some(Self::GMonthDay),
            YEAR => Some(Self::GYear),
            MONTH => Some(Self::GMonth),
            DAY => Some(Self::GDay),
            _ => None,
        }
    }

    /// Returns the format template read and written for this type.
    ///
    /// `%Y` year, `%M` month, `%D` day, `%h` hour, `%m` minute, `%s` second
    /// with an optional fraction, `%z` optional timezone. Any other byte is a
    /// literal.
    #[must_use]
    pub(crate) const fn template(self) -> &'static str {
        match self {
            Self::DateTime => "%Y-%M-%DT%h:%m:%s%z",
            Self::Date => "%Y-%M-%D%z",
            Self::Time => "%h:%m:%s%z",
            Self::GYearMonth => "%Y-%M%z",
            Self::GMonthDay => "--%M-%D%z",
            Self::GYear => "%Y%z",
            Self::GMonth => "--%M%z",
            Self::GDay => "---%D%z",
        }
    }

    /// Returns the local name of this type in the XML Schema namespace.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DateTime => "dateTime",
            Self::Date => "date",
            Self::Time => "time",
            Self::GYearMonth => "gYearMonth",
            Self::GMonthDay => "gMonthDay",
            Self::GYear => "gYear",
            Self::GMonth => "gMonth",
            Self::GDay => "gDay",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six fields of a `Duration`, in lexical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DurationField {
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DurationField {
    /// All fields, most significant first.
    pub const ALL: [Self; 6] = [
        Self::Years,
        Self::Months,
        Self::Days,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
    ];

    /// Returns the designator letter that follows the field in lexical form.
    #[must_use]
    pub const fn designator(self) -> char {
        match self {
            Self::Years => 'Y',
            Self::Months | Self::Minutes => 'M',
            Self::Days => 'D',
            Self::Hours => 'H',
            Self::Seconds => 'S',
        }
    }

    /// Returns the field's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        }
    }
}

impl fmt::Display for DurationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The XML Schema duration types.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationType {
    /// `xs:duration`, any field may be present.
    #[default]
    Duration,
    /// `xdt:dayTimeDuration`, only days, hours, minutes and seconds.
    DayTimeDuration,
    /// `xdt:yearMonthDuration`, only years and months.
    YearMonthDuration,
}

impl DurationType {
    /// Returns whether a duration of this type may carry `field`.
    #[must_use]
    pub const fn allows(self, field: DurationField) -> bool {
        match self {
            Self::Duration => true,
            Self::DayTimeDuration => !matches!(field, DurationField::Years | DurationField::Months),
            Self::YearMonthDuration => {
                matches!(field, DurationField::Years | DurationField::Months)
            }
        }
    }

    /// Returns the local name of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::DayTimeDuration => "dayTimeDuration",
            Self::YearMonthDuration => "yearMonthDuration",
        }
    }
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
