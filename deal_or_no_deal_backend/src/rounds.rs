// Round schedule: how many cases must be opened before each banker offer.

use crate::types::RoundDescriptor;

pub const MAX_ROUND: u8 = 10;

// Front-loaded quotas; together they open every case except the player's (25).
const QUOTAS: [u8; MAX_ROUND as usize] = [6, 5, 4, 3, 2, 1, 1, 1, 1, 1];

/// Number of cases to open in `round` (1-based).
///
/// Panics outside `1..=MAX_ROUND`: the state machine never advances past the
/// last round, so such a lookup is a bug in the caller.
pub fn cases_to_open(round: u8) -> u8 {
    match round.checked_sub(1).and_then(|i| QUOTAS.get(i as usize)) {
        Some(quota) => *quota,
        None => panic!("Round {} outside schedule 1..={}", round, MAX_ROUND),
    }
}

pub fn round_schedule() -> Vec<RoundDescriptor> {
    QUOTAS
        .iter()
        .enumerate()
        .map(|(i, &cases_to_open)| RoundDescriptor {
            round: i as u8 + 1,
            cases_to_open,
        })
        .collect()
}
