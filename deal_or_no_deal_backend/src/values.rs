// Value set generation: the canonical prize ladder, scaled to the player's
// stake and shuffled into 26 cases.

use crate::randomness::SeedStream;
use crate::types::{units, BoardEntry, Case, GameSession, CASE_COUNT, CENT, MAX_STAKE, MIN_STAKE};

/// Top prize is this multiple of the stake.
pub const TOP_PRIZE_MULTIPLE: u64 = 5;

/// Classic ladder, 0.01 up to 1,000,000 units.
pub const BASE_VALUES: [u64; CASE_COUNT] = [
    CENT,
    units(1),
    units(5),
    units(10),
    units(25),
    units(50),
    units(75),
    units(100),
    units(200),
    units(300),
    units(400),
    units(500),
    units(750),
    units(1_000),
    units(5_000),
    units(10_000),
    units(25_000),
    units(50_000),
    units(75_000),
    units(100_000),
    units(200_000),
    units(300_000),
    units(400_000),
    units(500_000),
    units(750_000),
    units(1_000_000),
];

const BASE_TOP_PRIZE: u64 = BASE_VALUES[CASE_COUNT - 1];

pub fn clamp_stake(amount: u64) -> u64 {
    amount.clamp(MIN_STAKE, MAX_STAKE)
}

pub fn top_prize(stake: u64) -> u64 {
    clamp_stake(stake) * TOP_PRIZE_MULTIPLE
}

/// The ladder rescaled so its top equals `top_prize(stake)`, ascending.
pub fn scaled_values(stake: u64) -> [u64; CASE_COUNT] {
    let top = top_prize(stake) as u128;
    BASE_VALUES.map(|base| (base as u128 * top / BASE_TOP_PRIZE as u128) as u64)
}

/// Unbiased Fisher-Yates: walk from the last index down, swapping with a
/// uniform index in `[0, i]`.
pub fn shuffle<T>(items: &mut [T], stream: &mut SeedStream) {
    for i in (1..items.len()).rev() {
        let j = stream.below(i as u32 + 1) as usize;
        items.swap(i, j);
    }
}

/// Build the 26 cases for a session. Case ids run 1..=26 in order.
pub fn generate_cases(stake: u64, seed: [u8; 32]) -> Vec<Case> {
    let mut values = scaled_values(stake);
    let mut stream = SeedStream::new(seed);
    shuffle(&mut values, &mut stream);

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| Case {
            id: i as u8 + 1,
            value,
            is_opened: false,
            is_player_case: false,
        })
        .collect()
}

/// Elimination board: every value of the session's ladder, flagged once the
/// case holding it has been opened.
pub fn value_board(session: &GameSession) -> Vec<BoardEntry> {
    let Some(stake) = session.stake else {
        return Vec::new();
    };
    scaled_values(stake)
        .iter()
        .map(|&value| BoardEntry {
            value,
            is_eliminated: session.cases.iter().any(|c| c.is_opened && c.value == value),
        })
        .collect()
}

/// Board for a stake before any case is dealt; nothing is eliminated yet.
pub fn preview_board(stake: u64) -> Vec<BoardEntry> {
    scaled_values(stake)
        .iter()
        .map(|&value| BoardEntry {
            value,
            is_eliminated: false,
        })
        .collect()
}
