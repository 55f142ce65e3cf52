//! Property-based tests for rate normalization and unit parsing

use proptest::prelude::*;
use mms_queue::engine::convert_to_rate;
use mms_queue::{TimeUnit, ValueKind};

fn any_unit() -> impl Strategy<Value = TimeUnit> {
    prop_oneof![
        Just(TimeUnit::Hour),
        Just(TimeUnit::Minute),
        Just(TimeUnit::Second),
    ]
}

fn relative_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
}

proptest! {
    /// A rate scaled back by the unit length recovers the input
    #[test]
    fn test_rate_scales_by_unit(
        value in 1e-6f64..1e6,
        unit in any_unit(),
    ) {
        let per_second = convert_to_rate(ValueKind::Rate, value, unit).unwrap();
        prop_assert!(relative_eq(per_second * unit.seconds(), value));
    }

    /// A mean of `v` units is one event every `v * unit` seconds
    #[test]
    fn test_mean_inverts(
        value in 1e-6f64..1e6,
        unit in any_unit(),
    ) {
        let per_second = convert_to_rate(ValueKind::Mean, value, unit).unwrap();
        prop_assert!(relative_eq(per_second * value * unit.seconds(), 1.0));
    }

    /// Rate `1/v` and mean `v` describe the same process
    #[test]
    fn test_rate_and_mean_agree(
        value in 1e-3f64..1e3,
        unit in any_unit(),
    ) {
        let from_mean = convert_to_rate(ValueKind::Mean, value, unit).unwrap();
        let from_rate = convert_to_rate(ValueKind::Rate, 1.0 / value, unit).unwrap();
        prop_assert!((from_mean - from_rate).abs() <= 1e-9 * from_mean);
    }

    /// Zero and negative inputs are rejected for either kind
    #[test]
    fn test_non_positive_rejected(
        value in -1e6f64..=0.0,
        unit in any_unit(),
        mean in any::<bool>(),
    ) {
        let kind = if mean { ValueKind::Mean } else { ValueKind::Rate };
        prop_assert!(convert_to_rate(kind, value, unit).is_err());
    }

    /// Anything other than hour or min counts as seconds
    #[test]
    fn test_unknown_units_are_seconds(raw in "[a-zA-Z ]{0,10}") {
        let normalized = raw.trim().to_lowercase();
        prop_assume!(normalized != "hour" && normalized != "min");

        prop_assert_eq!(TimeUnit::from(raw.as_str()), TimeUnit::Second);
    }

    /// Unit labels are case-insensitive and ignore surrounding whitespace
    #[test]
    fn test_unit_case_insensitive(
        label in prop_oneof![Just("hour"), Just("min")],
        upper in any::<bool>(),
        pad in " {0,3}",
    ) {
        let raw = if upper { label.to_uppercase() } else { label.to_string() };
        let unit = TimeUnit::from(format!("{}{}{}", pad, raw, pad));
        prop_assert_ne!(unit, TimeUnit::Second);
    }
}
