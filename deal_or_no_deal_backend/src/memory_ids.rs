//! Central registry for stable memory IDs.
//!
//! IMPORTANT: All memory IDs must be unique across the entire canister.
//!
//! Allocation strategy:
//! - 0-9: Live game state (active sessions)
//! - 10-19: Game history (records, per-player totals)

// Live game state (0-9)
pub const ACTIVE_SESSIONS_MEMORY_ID: u8 = 0;

// Game history (10-19)
pub const GAME_RECORDS_MEMORY_ID: u8 = 10;
pub const PLAYER_TOTALS_MEMORY_ID: u8 = 11;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_ids_are_unique() {
        let mut sorted = [
            ACTIVE_SESSIONS_MEMORY_ID,
            GAME_RECORDS_MEMORY_ID,
            PLAYER_TOTALS_MEMORY_ID,
        ];
        sorted.sort();
        for i in 1..sorted.len() {
            assert_ne!(
                sorted[i - 1],
                sorted[i],
                "Duplicate memory ID found: {}",
                sorted[i]
            );
        }
    }
}
