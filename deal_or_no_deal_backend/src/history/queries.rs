use candid::Principal;
use super::storage::{GAME_RECORDS, PLAYER_TOTALS};
use super::types::{GameRecord, PlayerStats, RECENT_GAMES_KEPT};

pub fn get_player_stats(player: Principal) -> PlayerStats {
    PLAYER_TOTALS.with(|totals| {
        totals
            .borrow()
            .get(&player)
            .map(|t| PlayerStats::from(&t))
            .unwrap_or_default()
    })
}

/// Most recent games of `player`, newest first (at most 100).
///
/// Reads the player's own id index, so the cost does not grow with the log.
pub fn get_recent_games(player: Principal, limit: u32) -> Vec<GameRecord> {
    let limit = (limit as usize).min(RECENT_GAMES_KEPT);
    let ids = PLAYER_TOTALS.with(|totals| {
        totals
            .borrow()
            .get(&player)
            .map(|t| t.recent_game_ids)
            .unwrap_or_default()
    });

    GAME_RECORDS.with(|records| {
        let records = records.borrow();
        ids.iter()
            .rev()
            .take(limit)
            .filter_map(|&id| records.get(id))
            .collect()
    })
}

pub fn get_total_games() -> u64 {
    GAME_RECORDS.with(|r| r.borrow().len())
}
