use core::str::FromStr;

use proptest::prelude::*;
use xsd_temporal::{Duration, PartialDateTime};

/// Lexical durations with every combination of present fields.
fn lexical_duration() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        proptest::option::of(0u64..10_000),
        proptest::option::of(0u64..10_000),
        proptest::option::of(0u64..10_000),
        proptest::option::of(0u64..10_000),
        proptest::option::of(0u64..10_000),
        proptest::option::of((0u64..10_000, proptest::option::of("[0-9]{1,4}"))),
    )
        .prop_filter("a duration needs a field", |(_, y, mo, d, h, mi, s)| {
            y.is_some() || mo.is_some() || d.is_some() || h.is_some() || mi.is_some() || s.is_some()
        })
        .prop_map(|(negative, years, months, days, hours, minutes, seconds)| {
            let mut s = String::new();
            if negative {
                s.push('-');
            }
            s.push('P');
            for (value, designator) in [(years, 'Y'), (months, 'M'), (days, 'D')] {
                if let Some(value) = value {
                    s.push_str(&format!("{value}{designator}"));
                }
            }
            if hours.is_some() || minutes.is_some() || seconds.is_some() {
                s.push('T');
                for (value, designator) in [(hours, 'H'), (minutes, 'M')] {
                    if let Some(value) = value {
                        s.push_str(&format!("{value}{designator}"));
                    }
                }
                match seconds {
                    Some((0, Some(fraction))) => s.push_str(&format!(".{fraction}S")),
                    Some((whole, Some(fraction))) => s.push_str(&format!("{whole}.{fraction}S")),
                    Some((whole, None)) => s.push_str(&format!("{whole}S")),
                    None => {}
                }
            }
            s
        })
}

/// Small durations, so that comparing them stays cheap.
fn small_duration() -> impl Strategy<Value = Duration> {
    (any::<bool>(), 0u64..3, 0u64..25, 0u64..62, 0u64..48, 0u64..120, 0u64..120).prop_map(
        |(positive, years, months, days, hours, minutes, seconds)| {
            Duration::new(positive, years, months, days, hours, minutes, seconds)
        },
    )
}

fn timezone() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(String::from("Z")),
        (any::<bool>(), 0u8..14, 0u8..60).prop_map(|(negative, hours, minutes)| {
            let sign = if negative { '-' } else { '+' };
            format!("{sign}{hours:02}:{minutes:02}")
        }),
    ]
}

fn date_time() -> impl Strategy<Value = PartialDateTime> {
    (1990u16..2010, 1u8..=12, 1u8..=28, 0u8..24, 0u8..60, 0u8..60, timezone()).prop_map(
        |(year, month, day, hour, minute, second, timezone)| {
            let s = format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}{timezone}");
            PartialDateTime::from_str(&s).unwrap()
        },
    )
}

fn time() -> impl Strategy<Value = PartialDateTime> {
    (0u8..24, 0u8..60, timezone()).prop_map(|(hour, minute, timezone)| {
        PartialDateTime::from_str(&format!("{hour:02}:{minute:02}:00{timezone}")).unwrap()
    })
}

/// Years of every width, including eon-sized and negative ones. Year zero is
/// not a lexical year.
fn year() -> impl Strategy<Value = String> {
    (any::<bool>(), prop_oneof![1u64..10_000, 10_000u64..1_000_000_000_000]).prop_map(
        |(negative, year)| {
            let sign = if negative { "-" } else { "" };
            format!("{sign}{year:04}")
        },
    )
}

/// Offsets within `±14:00`. A zero offset is always rendered as `Z`.
fn canonical_timezone() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(String::from("Z")),
        (any::<bool>(), 0u8..14, 0u8..60)
            .prop_filter("zero offsets render as Z", |(_, hours, minutes)| {
                *hours != 0 || *minutes != 0
            })
            .prop_map(|(negative, hours, minutes)| {
                let sign = if negative { '-' } else { '+' };
                format!("{sign}{hours:02}:{minutes:02}")
            }),
        Just(String::from("+14:00")),
        Just(String::from("-14:00")),
    ]
}

fn clock() -> impl Strategy<Value = String> {
    (0u8..24, 0u8..60, 0u8..60, proptest::option::of("[0-9]{0,3}[1-9]")).prop_map(
        |(hour, minute, second, fraction)| {
            let fraction = fraction.map(|f| format!(".{f}")).unwrap_or_default();
            format!("{hour:02}:{minute:02}:{second:02}{fraction}")
        },
    )
}

/// Canonical lexical moments of all eight schema types.
fn lexical_moment() -> impl Strategy<Value = String> {
    (0u8..8, year(), 1u8..=12, 1u8..=28, clock(), canonical_timezone()).prop_map(
        |(form, year, month, day, clock, timezone)| match form {
            0 => format!("{year}-{month:02}-{day:02}T{clock}{timezone}"),
            1 => format!("{year}-{month:02}-{day:02}{timezone}"),
            2 => format!("{clock}{timezone}"),
            3 => format!("{year}-{month:02}{timezone}"),
            4 => format!("--{month:02}-{day:02}{timezone}"),
            5 => format!("{year}{timezone}"),
            6 => format!("--{month:02}{timezone}"),
            _ => format!("---{day:02}{timezone}"),
        },
    )
}

proptest! {
    #[test]
    fn moment_lexical_round_trip(s in lexical_moment()) {
        let moment = PartialDateTime::from_str(&s).unwrap();
        prop_assert_eq!(moment.to_xml_format().unwrap(), s);
    }

    #[test]
    fn duration_lexical_round_trip(s in lexical_duration()) {
        let duration = Duration::from_str(&s).unwrap();
        let rendered = duration.to_xml_format();
        let reparsed = Duration::from_str(&rendered).unwrap();
        prop_assert_eq!(&reparsed, &duration);
        prop_assert_eq!(&reparsed.to_xml_format(), &rendered);
        if !duration.is_zero() {
            prop_assert_eq!(&rendered, &s);
        }
    }

    #[test]
    fn double_negation_is_identity(s in lexical_duration()) {
        let duration = Duration::from_str(&s).unwrap();
        prop_assert_eq!(duration.negate().negate(), duration);
    }

    #[test]
    fn adding_the_negation_is_zero(duration in small_duration()) {
        let sum = duration.add(&duration.negate()).unwrap();
        prop_assert!(sum.is_zero());
    }

    #[test]
    fn duration_compare_is_antisymmetric(a in small_duration(), b in small_duration()) {
        let forward = a.compare(&b).unwrap();
        let backward = b.compare(&a).unwrap();
        prop_assert_eq!(forward, backward.map(core::cmp::Ordering::reverse));
    }

    #[test]
    fn date_time_compare_is_antisymmetric(a in date_time(), b in date_time()) {
        prop_assert_eq!(a.compare(&b), b.compare(&a).map(core::cmp::Ordering::reverse));
    }

    #[test]
    fn time_compare_is_antisymmetric(a in time(), b in time()) {
        prop_assert_eq!(a.compare(&b), b.compare(&a).map(core::cmp::Ordering::reverse));
    }

    #[test]
    fn date_time_compare_is_reflexive(a in date_time()) {
        prop_assert_eq!(a.compare(&a), Some(core::cmp::Ordering::Equal));
    }
}
