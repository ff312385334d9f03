//! This module implements the lexical parsers and formatters of the XML
//! Schema duration and date/time types.

use alloc::string::String;
use core::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use writeable::{impl_display_with_writeable, Writeable};

use crate::{
    builtins::core::PartialDuration,
    fields::{DurationField, SchemaType},
    primitive::Decimal,
    DatatypeError, DatatypeResult, Sign,
};

// ==== Lexical cursor ====

#[derive(Debug)]
struct Cursor<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a [u8]) -> Self {
        Self { source, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn is_done(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Consumes `expected` if it is the next byte.
    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, expected: u8) -> DatatypeResult<()> {
        if self.eat(expected) {
            return Ok(());
        }
        Err(self.syntax_error())
    }

    /// Consumes bytes while `predicate` holds and returns them.
    fn take_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }

    fn two_digits(&mut self) -> DatatypeResult<u8> {
        match self.source.get(self.pos..self.pos + 2) {
            Some([tens @ b'0'..=b'9', ones @ b'0'..=b'9']) => {
                self.pos += 2;
                Ok((tens - b'0') * 10 + (ones - b'0'))
            }
            _ => Err(self.syntax_error()),
        }
    }

    fn syntax_error(&self) -> DatatypeError {
        let text = String::from_utf8_lossy(self.source);
        DatatypeError::syntax().with_message(alloc::format!(
            "Unexpected character at position {} of \"{text}\".",
            self.pos
        ))
    }
}

// ==== Duration parsing ====

/// The fields read from a lexical duration.
#[derive(Debug, Clone)]
pub(crate) struct ParsedDuration {
    pub(crate) is_positive: bool,
    pub(crate) fields: PartialDuration,
}

const DATE_UNITS: [DurationField; 3] = [
    DurationField::Years,
    DurationField::Months,
    DurationField::Days,
];

const TIME_UNITS: [DurationField; 3] = [
    DurationField::Hours,
    DurationField::Minutes,
    DurationField::Seconds,
];

/// Parses `[-]P[nY][nM][nD][T[nH][nM][nS]]`.
pub(crate) fn parse_duration(source: &[u8]) -> DatatypeResult<ParsedDuration> {
    let mut cursor = Cursor::new(source);
    let is_positive = !cursor.eat(b'-');
    cursor.expect(b'P')?;

    let mut fields = PartialDuration::default();
    let date_count = parse_duration_part(&mut cursor, &DATE_UNITS, &mut fields)?;

    let mut time_count = 0;
    if cursor.eat(b'T') {
        time_count = parse_duration_part(&mut cursor, &TIME_UNITS, &mut fields)?;
        if time_count == 0 {
            return Err(DatatypeError::syntax()
                .with_message("Duration time designator must be followed by a time field."));
        }
    }

    if date_count + time_count == 0 {
        return Err(DatatypeError::syntax().with_message("Duration must contain a field."));
    }

    if !cursor.is_done() {
        return Err(cursor.syntax_error());
    }

    Ok(ParsedDuration {
        is_positive,
        fields,
    })
}

/// Reads `<number><unit>` tokens whose units appear in `units` in increasing
/// order, returning how many were read.
fn parse_duration_part(
    cursor: &mut Cursor<'_>,
    units: &[DurationField; 3],
    fields: &mut PartialDuration,
) -> DatatypeResult<usize> {
    let mut next_unit = 0;
    let mut count = 0;
    while cursor.peek().is_some_and(|b| b.is_ascii_digit() || b == b'.') {
        let number = cursor.take_while(|b| b.is_ascii_digit() || b == b'.');
        let designator = cursor.peek().ok_or_else(|| {
            DatatypeError::syntax().with_message("Duration field is missing its designator.")
        })?;
        let offset = units[next_unit..]
            .iter()
            .position(|unit| unit.designator() as u8 == designator)
            .ok_or_else(|| cursor.syntax_error())?;
        let field = units[next_unit + offset];
        cursor.pos += 1;
        next_unit += offset + 1;
        count += 1;

        if field == DurationField::Seconds {
            fields.seconds = Some(Decimal::from_utf8(number)?);
            continue;
        }

        if !number.iter().all(u8::is_ascii_digit) {
            return Err(DatatypeError::syntax()
                .with_message(alloc::format!("Duration {field} must be an integer.")));
        }
        let value = BigInt::parse_bytes(number, 10).ok_or_else(|| cursor.syntax_error())?;
        match field {
            DurationField::Years => fields.years = Some(value),
            DurationField::Months => fields.months = Some(value),
            DurationField::Days => fields.days = Some(value),
            DurationField::Hours => fields.hours = Some(value),
            DurationField::Minutes => fields.minutes = Some(value),
            DurationField::Seconds => {}
        }
    }
    Ok(count)
}

// ==== Date/time parsing ====

/// The raw fields read from a lexical date/time, before range checks.
#[derive(Debug, Default, Clone)]
pub(crate) struct ParsedMoment {
    pub(crate) year: Option<BigInt>,
    pub(crate) month: Option<u8>,
    pub(crate) day: Option<u8>,
    pub(crate) hour: Option<u8>,
    pub(crate) minute: Option<u8>,
    pub(crate) second: Option<u8>,
    pub(crate) fractional_second: Option<Decimal>,
    pub(crate) timezone: Option<i16>,
}

/// Infers the schema type of a lexical date/time from its punctuation.
///
/// The lexical spaces of the date/time types overlap, so the shape of the
/// input is the only thing that can select the format to read it with.
pub(crate) fn sniff_schema_type(source: &[u8]) -> SchemaType {
    if source.contains(&b'T') {
        return SchemaType::DateTime;
    }
    if source.get(2) == Some(&b':') {
        return SchemaType::Time;
    }
    if source.starts_with(b"--") {
        if source.get(2) == Some(&b'-') {
            return SchemaType::GDay;
        }
        // `--MM`, `--MMZ` and `--MM±hh:mm`
        if matches!(source.len(), 4 | 5 | 10) {
            return SchemaType::GMonth;
        }
        return SchemaType::GMonthDay;
    }

    // A trailing `±hh:mm` timezone contributes a `-` that is not a separator.
    let mut end = source.len();
    if source.contains(&b':') {
        end = end.saturating_sub(6);
    }
    let separators = source
        .get(1..end)
        .map_or(0, |body| body.iter().filter(|b| **b == b'-').count());
    match separators {
        0 => SchemaType::GYear,
        1 => SchemaType::GYearMonth,
        _ => SchemaType::Date,
    }
}

/// Parses a lexical date/time into its raw fields.
pub(crate) fn parse_moment(source: &[u8]) -> DatatypeResult<ParsedMoment> {
    let schema_type = sniff_schema_type(source);
    let mut cursor = Cursor::new(source);
    let mut moment = ParsedMoment::default();

    let mut template = schema_type.template().bytes();
    while let Some(byte) = template.next() {
        if byte != b'%' {
            cursor.expect(byte)?;
            continue;
        }
        match template.next() {
            Some(b'Y') => moment.year = Some(parse_year(&mut cursor)?),
            Some(b'M') => moment.month = Some(cursor.two_digits()?),
            Some(b'D') => moment.day = Some(cursor.two_digits()?),
            Some(b'h') => moment.hour = Some(cursor.two_digits()?),
            Some(b'm') => moment.minute = Some(cursor.two_digits()?),
            Some(b's') => {
                moment.second = Some(cursor.two_digits()?);
                if cursor.eat(b'.') {
                    moment.fractional_second = Some(parse_fraction(&mut cursor)?);
                }
            }
            Some(b'z') => moment.timezone = parse_timezone(&mut cursor)?,
            _ => return Err(DatatypeError::assert().with_message("Unknown format token.")),
        }
    }

    if !cursor.is_done() {
        return Err(cursor.syntax_error());
    }

    Ok(moment)
}

/// `-?` followed by at least four digits.
fn parse_year(cursor: &mut Cursor<'_>) -> DatatypeResult<BigInt> {
    let negative = cursor.eat(b'-');
    let digits = cursor.take_while(|b| b.is_ascii_digit());
    if digits.len() < 4 {
        return Err(
            DatatypeError::syntax().with_message("A year must have at least four digits.")
        );
    }
    let year = BigInt::parse_bytes(digits, 10).ok_or_else(|| cursor.syntax_error())?;
    Ok(if negative { -year } else { year })
}

/// The digits after the decimal point of a seconds value.
fn parse_fraction(cursor: &mut Cursor<'_>) -> DatatypeResult<Decimal> {
    let digits = cursor.take_while(|b| b.is_ascii_digit());
    if digits.is_empty() {
        return Err(cursor.syntax_error());
    }
    let scale = u32::try_from(digits.len())
        .map_err(|_| DatatypeError::syntax().with_message("Fractional second is too long."))?;
    let unscaled = BigInt::parse_bytes(digits, 10).ok_or_else(|| cursor.syntax_error())?;
    Ok(Decimal::new(unscaled, scale))
}

/// An optional `Z` or `±hh:mm`, as an offset in minutes.
fn parse_timezone(cursor: &mut Cursor<'_>) -> DatatypeResult<Option<i16>> {
    let sign: i16 = match cursor.peek() {
        Some(b'Z') => {
            cursor.pos += 1;
            return Ok(Some(0));
        }
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Ok(None),
    };
    cursor.pos += 1;
    let hours = cursor.two_digits()?;
    cursor.expect(b':')?;
    let minutes = cursor.two_digits()?;
    if minutes > 59 {
        return Err(DatatypeError::syntax().with_message("Timezone minutes must be below 60."));
    }
    Ok(Some(sign * (i16::from(hours) * 60 + i16::from(minutes))))
}

// ==== Formatting ====

/// Writes a lexical duration.
#[derive(Debug)]
pub struct FormattableDuration<'a> {
    pub sign: Sign,
    pub years: Option<&'a BigInt>,
    pub months: Option<&'a BigInt>,
    pub days: Option<&'a BigInt>,
    pub hours: Option<&'a BigInt>,
    pub minutes: Option<&'a BigInt>,
    pub seconds: Option<&'a Decimal>,
}

impl Writeable for FormattableDuration<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if self.sign == Sign::Negative {
            sink.write_char('-')?;
        }
        sink.write_char('P')?;
        write_with_suffix(self.years, DurationField::Years, sink)?;
        write_with_suffix(self.months, DurationField::Months, sink)?;
        write_with_suffix(self.days, DurationField::Days, sink)?;

        if self.hours.is_none() && self.minutes.is_none() && self.seconds.is_none() {
            return Ok(());
        }
        sink.write_char('T')?;
        write_with_suffix(self.hours, DurationField::Hours, sink)?;
        write_with_suffix(self.minutes, DurationField::Minutes, sink)?;
        if let Some(seconds) = self.seconds {
            if seconds.scale() > 0 && seconds.trunc().is_zero() {
                sink.write_str(&seconds.to_fraction_string())?;
            } else {
                write!(sink, "{seconds}")?;
            }
            sink.write_char(DurationField::Seconds.designator())?;
        }
        Ok(())
    }
}

fn write_with_suffix<W: fmt::Write + ?Sized>(
    value: Option<&BigInt>,
    field: DurationField,
    sink: &mut W,
) -> fmt::Result {
    let Some(value) = value else {
        return Ok(());
    };
    write!(sink, "{value}")?;
    sink.write_char(field.designator())
}

/// Writes a lexical date/time using the format of its schema type.
#[derive(Debug)]
pub struct FormattableMoment<'a> {
    pub schema_type: SchemaType,
    pub year: Option<BigInt>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub fractional_second: Option<&'a Decimal>,
    pub timezone: Option<i16>,
}

impl Writeable for FormattableMoment<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let mut template = self.schema_type.template().chars();
        while let Some(ch) = template.next() {
            if ch != '%' {
                sink.write_char(ch)?;
                continue;
            }
            match template.next() {
                Some('Y') => write_year(self.year.as_ref().ok_or(fmt::Error)?, sink)?,
                Some('M') => write_padded_u8(self.month.ok_or(fmt::Error)?, sink)?,
                Some('D') => write_padded_u8(self.day.ok_or(fmt::Error)?, sink)?,
                Some('h') => write_padded_u8(self.hour.ok_or(fmt::Error)?, sink)?,
                Some('m') => write_padded_u8(self.minute.ok_or(fmt::Error)?, sink)?,
                Some('s') => {
                    write_padded_u8(self.second.ok_or(fmt::Error)?, sink)?;
                    if let Some(fraction) = self.fractional_second {
                        sink.write_str(&fraction.to_fraction_string())?;
                    }
                }
                Some('z') => write_timezone(self.timezone, sink)?,
                _ => return Err(fmt::Error),
            }
        }
        Ok(())
    }
}

fn write_padded_u8<W: fmt::Write + ?Sized>(num: u8, sink: &mut W) -> fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

fn write_year<W: fmt::Write + ?Sized>(year: &BigInt, sink: &mut W) -> fmt::Result {
    if year.is_negative() {
        sink.write_char('-')?;
    }
    let digits = year.magnitude().to_str_radix(10);
    for _ in digits.len()..4 {
        sink.write_char('0')?;
    }
    sink.write_str(&digits)
}

fn write_timezone<W: fmt::Write + ?Sized>(timezone: Option<i16>, sink: &mut W) -> fmt::Result {
    match timezone {
        None => Ok(()),
        Some(0) => sink.write_char('Z'),
        Some(offset) => {
            sink.write_char(if offset < 0 { '-' } else { '+' })?;
            let offset = offset.unsigned_abs();
            write_padded_u8((offset / 60) as u8, sink)?;
            sink.write_char(':')?;
            write_padded_u8((offset % 60) as u8, sink)
        }
    }
}

impl_display_with_writeable!(FormattableDuration<'_>);
impl_display_with_writeable!(FormattableMoment<'_>);
