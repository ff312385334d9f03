use alloc::string::ToString;
use core::{cmp::Ordering, str::FromStr};

use num_bigint::BigInt;

use crate::{
    fields::DurationType, partial::PartialDuration, primitive::Decimal, ErrorKind,
    PartialDateTime, Sign,
};

use super::Duration;

fn duration(s: &str) -> Duration {
    Duration::from_str(s).unwrap()
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn partial_duration_empty() {
    let err = Duration::from_partial_duration(true, PartialDuration::default());
    assert_eq!(err.unwrap_err().kind(), ErrorKind::InvalidField);
}

#[test]
fn partial_duration_values() {
    let mut partial = PartialDuration::default();
    let _ = partial.years.insert(BigInt::from(20));
    let result = Duration::from_partial_duration(false, partial).unwrap();
    assert_eq!(result.years(), Some(&BigInt::from(20)));
    assert_eq!(result.months(), None);
    assert_eq!(result.sign(), Sign::Negative);
    assert_eq!(result.to_xml_format(), "-P20Y");
}

#[test]
fn partial_duration_negative_field() {
    let partial = PartialDuration {
        days: Some(BigInt::from(-1)),
        ..Default::default()
    };
    let err = Duration::from_partial_duration(true, partial);
    assert_eq!(err.unwrap_err().kind(), ErrorKind::InvalidField);

    let partial = PartialDuration {
        seconds: Some(decimal("-0.5")),
        ..Default::default()
    };
    let err = Duration::from_partial_duration(true, partial);
    assert_eq!(err.unwrap_err().kind(), ErrorKind::InvalidField);
}

#[test]
fn lexical_round_trip() {
    for s in [
        "P1Y2M3DT4H5M6.7S",
        "-PT.5S",
        "P0D",
        "PT0S",
        "P1Y0M",
        "-P100000000000000000000Y",
        "PT1.000S",
        "P1DT12H",
    ] {
        assert_eq!(duration(s).to_xml_format(), s);
        assert_eq!(duration(s).to_string(), s);
    }
}

#[test]
fn constructors() {
    assert_eq!(Duration::new(true, 1, 2, 3, 4, 5, 6).to_xml_format(), "P1Y2M3DT4H5M6S");
    assert_eq!(Duration::day_time(false, 1, 0, 0, 0).to_xml_format(), "-P1DT0H0M0S");
    assert_eq!(Duration::year_month(true, 0, 11).to_xml_format(), "P0Y11M");
}

#[test]
fn zero_sign() {
    let zero = duration("-P0Y0M");
    assert_eq!(zero.sign(), Sign::Zero);
    assert!(zero.is_zero());
    assert_eq!(zero.to_xml_format(), "P0Y0M");

    assert_eq!(duration("PT0.000S").sign(), Sign::Zero);
    assert_eq!(duration("PT0.001S").sign(), Sign::Positive);
    assert_eq!(duration("-P0Y1M").sign(), Sign::Negative);
}

#[test]
fn double_negation() {
    let value = duration("-P1DT2.5S");
    assert_eq!(value.negate().to_xml_format(), "P1DT2.5S");
    assert_eq!(value.negate().negate(), value);

    let zero = duration("P0D");
    assert_eq!(zero.negate(), zero);
}

#[test]
fn add_keeps_absent_fields_absent() {
    let sum = duration("P1Y").add(&duration("P1M")).unwrap();
    assert_eq!(sum.to_xml_format(), "P1Y1M");

    let sum = duration("PT1H").add(&duration("PT30M")).unwrap();
    assert_eq!(sum.to_xml_format(), "PT1H30M");
}

#[test]
fn add_inverse_is_zero() {
    let value = duration("P1DT2H");
    let sum = value.add(&value.negate()).unwrap();
    assert!(sum.is_zero());
    assert_eq!(sum.to_xml_format(), "P0DT0H");
}

#[test]
fn add_borrows_from_larger_fields() {
    let diff = duration("P1D").subtract(&duration("PT1H")).unwrap();
    assert_eq!(diff.to_xml_format(), "P0DT23H");

    let diff = duration("PT1M30S").subtract(&duration("PT45S")).unwrap();
    assert_eq!(diff.to_xml_format(), "PT0M45S");

    let diff = duration("P1Y").subtract(&duration("P1M")).unwrap();
    assert_eq!(diff.to_xml_format(), "P0Y11M");

    let diff = duration("PT1H").subtract(&duration("P1D")).unwrap();
    assert_eq!(diff.to_xml_format(), "-P0DT23H");
}

#[test]
fn add_mixed_signs_fails() {
    let err = duration("P1M").subtract(&duration("P1D")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalState);
}

#[test]
fn multiply_carries_fractions() {
    let half = decimal("0.5");
    assert_eq!(duration("P1Y").multiply(&half).unwrap().to_xml_format(), "P0Y6M");
    assert_eq!(
        duration("PT1M").multiply(&decimal("1.5")).unwrap().to_xml_format(),
        "PT1M30.0S"
    );
    assert_eq!(duration("P1D").multiply(&decimal("-2")).unwrap().to_xml_format(), "-P2D");

    let zero = duration("P1D").multiply(&Decimal::zero()).unwrap();
    assert!(zero.is_zero());
    assert_eq!(zero.to_xml_format(), "P0D");
}

#[test]
fn multiply_fractional_month_fails() {
    let err = duration("P1M").multiply(&decimal("0.5")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalState);
}

#[test]
fn compare_durations() {
    assert_eq!(duration("P30D").compare(&duration("P1M")).unwrap(), None);
    assert_eq!(duration("P365D").compare(&duration("P1Y")).unwrap(), None);
    assert_eq!(
        duration("P1Y").compare(&duration("P12M")).unwrap(),
        Some(Ordering::Equal)
    );
    assert_eq!(
        duration("P1D").compare(&duration("PT24H")).unwrap(),
        Some(Ordering::Equal)
    );
    assert_eq!(
        duration("P1M").compare(&duration("P27D")).unwrap(),
        Some(Ordering::Greater)
    );
    assert_eq!(
        duration("-P1M").compare(&duration("PT1S")).unwrap(),
        Some(Ordering::Less)
    );
}

#[test]
fn compare_beyond_ceiling_is_unsupported() {
    let err = duration("P2147483648D").compare(&duration("P1D")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    let err = duration("P1D").compare(&duration("PT2147483648S")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert!(duration("P2147483647D").compare(&duration("P1D")).is_ok());
}

#[test]
fn compare_ceiling_ignores_fractional_seconds() {
    assert_eq!(
        duration("PT2147483647.5S").compare(&duration("PT1S")).unwrap(),
        Some(Ordering::Greater)
    );
    let err = duration("PT2147483648.5S").compare(&duration("PT1S")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn longer_and_shorter() {
    assert!(duration("P2D").is_longer_than(&duration("P1D")).unwrap());
    assert!(!duration("P2D").is_shorter_than(&duration("P1D")).unwrap());
    assert!(!duration("P30D").is_longer_than(&duration("P1M")).unwrap());
    assert!(!duration("P30D").is_shorter_than(&duration("P1M")).unwrap());
    assert!(!duration("P1D").is_longer_than(&duration("PT24H")).unwrap());
}

#[test]
fn duration_schema_types() {
    assert_eq!(
        duration("P1Y2M3DT4H5M6S").schema_type().unwrap(),
        DurationType::Duration
    );
    assert_eq!(
        duration("P1DT0H0M0S").schema_type().unwrap(),
        DurationType::DayTimeDuration
    );
    assert_eq!(
        duration("P1Y0M").schema_type().unwrap(),
        DurationType::YearMonthDuration
    );
    let err = duration("P1Y").schema_type().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalState);
}

#[test]
fn parse_as_subtype() {
    assert!(Duration::parse_as("P1Y", DurationType::YearMonthDuration).is_ok());
    assert!(Duration::parse_as("P1D", DurationType::Duration).is_ok());
    assert!(Duration::parse_as("PT1.5S", DurationType::DayTimeDuration).is_ok());

    let err = Duration::parse_as("P1D", DurationType::YearMonthDuration).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    let err = Duration::parse_as("P1YT1H", DurationType::DayTimeDuration).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn total_values() {
    assert_eq!(duration("-P1Y2M").year_month_value(), Some(BigInt::from(-14)));
    assert_eq!(duration("P5M").year_month_value(), Some(BigInt::from(5)));
    assert_eq!(duration("P1D").year_month_value(), None);

    assert_eq!(duration("P1DT1H1M1.5S").day_time_value(), Some(decimal("90061.5")));
    assert_eq!(duration("-PT1M").day_time_value(), Some(decimal("-60")));
    assert_eq!(duration("P1Y").day_time_value(), None);
}

#[test]
fn normalize_with_reference_moment() {
    let start = PartialDateTime::from_str("2000-02-01").unwrap();
    assert_eq!(duration("P1M").normalize_with(&start).unwrap().to_xml_format(), "P29D");

    let start = PartialDateTime::from_str("2000-03-01").unwrap();
    assert_eq!(duration("-P1M").normalize_with(&start).unwrap().to_xml_format(), "-P29D");

    let start = PartialDateTime::from_str("2001-01-01T00:00:00Z").unwrap();
    assert_eq!(
        duration("P1Y2DT1H").normalize_with(&start).unwrap().to_xml_format(),
        "P367DT1H"
    );
}

#[test]
fn normalize_with_needs_a_date() {
    let start = PartialDateTime::from_str("2000-02").unwrap();
    let err = duration("P1M").normalize_with(&start).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidField);
}
