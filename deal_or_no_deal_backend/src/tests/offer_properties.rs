use proptest::prelude::*;
use super::generators::remaining_values;
use crate::offer::{calculate_offer, expected_value, raw_offer, rounding_unit};
use crate::rounds::MAX_ROUND;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn test_offer_never_exceeds_expected_value(values in remaining_values(), round in 1..=MAX_ROUND) {
        prop_assert!(calculate_offer(&values, round) <= expected_value(&values));
    }

    #[test]
    fn test_offer_non_decreasing_across_rounds(values in remaining_values()) {
        for round in 1..MAX_ROUND {
            let now = calculate_offer(&values, round);
            let next = calculate_offer(&values, round + 1);
            prop_assert!(now <= next, "round {}: {} > {}", round, now, next);
        }
    }

    #[test]
    fn test_rounding_stays_within_one_unit(values in remaining_values(), round in 1..=MAX_ROUND) {
        let raw = raw_offer(&values, round);
        let offer = calculate_offer(&values, round);
        prop_assert!(offer.abs_diff(raw) <= rounding_unit(raw));
        prop_assert_eq!(offer % rounding_unit(raw), 0);
    }

    #[test]
    fn test_offer_order_independent(mut values in remaining_values(), round in 1..=MAX_ROUND) {
        let forward = calculate_offer(&values, round);
        values.reverse();
        prop_assert_eq!(forward, calculate_offer(&values, round));
    }
}
