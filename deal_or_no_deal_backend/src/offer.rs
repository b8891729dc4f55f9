// Banker offer engine
//
// offer = round_nice(mean(remaining) * pct(round))
//
// pct(round) starts at 30% and climbs 10 points per round, capped at 95%.
// Everything is integer math on decimals; basis points for the percentage.

use crate::types::{units, CENT};

pub const BP_SCALE: u64 = 10_000;
pub const OFFER_BASE_BP: u64 = 3_000;
pub const OFFER_STEP_BP: u64 = 1_000;
pub const OFFER_CEILING_BP: u64 = 9_500;

/// Banker's share of the expected value for `round`, in basis points.
pub fn offer_percentage_bp(round: u8) -> u64 {
    let steps = round.saturating_sub(1) as u64;
    (OFFER_BASE_BP + OFFER_STEP_BP * steps).min(OFFER_CEILING_BP)
}

/// Floored arithmetic mean. Panics on an empty slice.
pub fn expected_value(values: &[u64]) -> u64 {
    assert!(!values.is_empty(), "expected value of an empty case set");
    let sum: u128 = values.iter().map(|&v| v as u128).sum();
    (sum / values.len() as u128) as u64
}

/// Rounding granularity for an offer of this size. Larger offers never get a
/// finer unit than smaller ones.
pub fn rounding_unit(raw_offer: u64) -> u64 {
    if raw_offer >= units(1_000) {
        units(100)
    } else if raw_offer >= units(100) {
        units(10)
    } else if raw_offer >= units(10) {
        units(1)
    } else {
        CENT
    }
}

/// Round to the nearest band unit, falling back to rounding down when the
/// nearest value would exceed `ceiling`.
pub fn round_offer(raw_offer: u64, ceiling: u64) -> u64 {
    let unit = rounding_unit(raw_offer);
    let down = raw_offer / unit * unit;
    let nearest = (raw_offer + unit / 2) / unit * unit;
    if nearest <= ceiling {
        nearest
    } else {
        down
    }
}

/// Offer before rounding: floor(sum * pct / (count * 10_000)).
pub fn raw_offer(remaining_values: &[u64], round: u8) -> u64 {
    assert!(!remaining_values.is_empty(), "banker offer requested with no cases in play");
    let sum: u128 = remaining_values.iter().map(|&v| v as u128).sum();
    let pct = offer_percentage_bp(round) as u128;
    (sum * pct / (remaining_values.len() as u128 * BP_SCALE as u128)) as u64
}

/// Banker offer over every unopened value (player's case included).
///
/// Never above the mean of `remaining_values`. Calling with no values is a
/// contract violation and panics.
pub fn calculate_offer(remaining_values: &[u64], round: u8) -> u64 {
    let raw = raw_offer(remaining_values, round);
    round_offer(raw, expected_value(remaining_values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_curve() {
        assert_eq!(offer_percentage_bp(1), 3_000);
        assert_eq!(offer_percentage_bp(2), 4_000);
        assert_eq!(offer_percentage_bp(7), 9_000);
        assert_eq!(offer_percentage_bp(8), OFFER_CEILING_BP);
        assert_eq!(offer_percentage_bp(10), OFFER_CEILING_BP);
        // Round 0 never reaches the engine but must not underflow
        assert_eq!(offer_percentage_bp(0), OFFER_BASE_BP);
    }

    #[test]
    fn test_percentage_is_monotonic() {
        for round in 1..30u8 {
            assert!(offer_percentage_bp(round) <= offer_percentage_bp(round + 1));
            assert!(offer_percentage_bp(round) < BP_SCALE);
        }
    }

    #[test]
    fn test_flat_hundreds_round_one() {
        let values = [units(100); 4];
        assert_eq!(raw_offer(&values, 1), units(30));
        assert_eq!(calculate_offer(&values, 1), units(30));
    }

    #[test]
    fn test_rounding_bands() {
        assert_eq!(rounding_unit(units(2_345)), units(100));
        assert_eq!(rounding_unit(units(1_000)), units(100));
        assert_eq!(rounding_unit(units(999)), units(10));
        assert_eq!(rounding_unit(units(100)), units(10));
        assert_eq!(rounding_unit(units(42)), units(1));
        assert_eq!(rounding_unit(units(9)), CENT);
    }

    #[test]
    fn test_round_offer_nearest() {
        let ceiling = u64::MAX / 2;
        assert_eq!(round_offer(units(2_349), ceiling), units(2_300));
        assert_eq!(round_offer(units(2_350), ceiling), units(2_400));
        assert_eq!(round_offer(units(144), ceiling), units(140));
        assert_eq!(round_offer(units(145), ceiling), units(150));
        assert_eq!(round_offer(units(3) + 4_000, ceiling), units(3));
        assert_eq!(round_offer(units(3) + 6_000, ceiling), units(3) + CENT);
    }

    #[test]
    fn test_round_offer_never_exceeds_ceiling() {
        // 1,460 rounds to 1,500 but the mean is only 1,480
        assert_eq!(round_offer(units(1_460), units(1_480)), units(1_400));
    }

    #[test]
    fn test_single_remaining_case() {
        let offer = calculate_offer(&[units(2_500)], 10);
        // 95% of 2,500 = 2,375 -> nearest hundred 2,400 is within the value
        assert_eq!(offer, units(2_400));
    }

    #[test]
    fn test_tiny_values_round_to_cents() {
        let offer = calculate_offer(&[2, 250], 1);
        assert_eq!(offer, 0);
        let offer = calculate_offer(&[units(1), units(5)], 10);
        assert_eq!(offer, units(2) + 85 * CENT);
    }

    #[test]
    fn test_offer_not_above_mean() {
        let values = [units(1), units(1_000), units(2_500)];
        let mean = expected_value(&values);
        for round in 1..=10 {
            assert!(calculate_offer(&values, round) <= mean);
        }
    }

    #[test]
    #[should_panic(expected = "no cases in play")]
    fn test_empty_values_panics() {
        calculate_offer(&[], 1);
    }
}
